//! Configuration for the Equation Solver module.

use serde::{Deserialize, Serialize};

/// Default upper bound on the length of an equation, in characters.
pub const DEFAULT_MAX_EQUATION_LEN: usize = 1024;

/// Configuration for the Equation Solver module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EquationSolverConfig {
    /// Longer equations are rejected as malformed before parsing.
    pub max_equation_len: usize,
}

impl Default for EquationSolverConfig {
    fn default() -> Self {
        Self {
            max_equation_len: DEFAULT_MAX_EQUATION_LEN,
        }
    }
}

/// Cross-origin headers stamped on every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Origin`. Default: `"*"`
    pub allow_origin: String,
    /// Joined into `Access-Control-Allow-Methods`. Default: `["GET", "OPTIONS"]`
    pub allow_methods: Vec<String>,
    /// Joined into `Access-Control-Allow-Headers`. Default: `["Content-Type"]`
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_owned(),
            allow_methods: vec!["GET".to_owned(), "OPTIONS".to_owned()],
            allow_headers: vec!["Content-Type".to_owned()],
        }
    }
}
