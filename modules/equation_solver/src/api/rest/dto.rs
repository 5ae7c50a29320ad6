//! REST DTOs for the Equation Solver module.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::service::Solution;

/// Query string of `GET /solve`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SolveQuery {
    /// Equation text, e.g. `x^2 - 4 = 0`.
    pub equation: Option<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Normalized equation and its roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SolutionDto {
    /// Normalized form, always ending in `= 0`.
    pub equation: String,
    /// One `"<variable> = <root>"` entry per root.
    pub solutions: Vec<String>,
}

impl From<Solution> for SolutionDto {
    fn from(solution: Solution) -> Self {
        Self {
            equation: solution.equation,
            solutions: solution.solutions,
        }
    }
}

/// Body of a successful `GET /solve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SolveResponse {
    pub result: SolutionDto,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
