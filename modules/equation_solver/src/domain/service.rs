//! Equation normalization and solving.

use algebra::Expr;

use crate::config::EquationSolverConfig;
use crate::domain::error::DomainError;

/// Normalized equation and its roots, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Normalized form, always ending in `= 0`.
    pub equation: String,
    /// One `"<variable> = <root>"` entry per root, variables in sorted order.
    pub solutions: Vec<String>,
}

/// Stateless equation service; one instance is shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct Service {
    config: EquationSolverConfig,
}

impl Service {
    #[must_use]
    pub fn new(config: EquationSolverConfig) -> Self {
        Self { config }
    }

    /// Normalizes `equation` to `lhs - rhs = 0` and solves it for each free variable.
    ///
    /// Text without `=` is taken as already equated to zero. An equation
    /// without free variables, or without roots, yields an empty solution list.
    ///
    /// # Errors
    /// - [`DomainError::MissingInput`] for blank text.
    /// - [`DomainError::MalformedEquation`] for more than one `=`, text over the
    ///   configured length, or text the parser rejects.
    /// - [`DomainError::Solve`] when the engine cannot handle the equation class.
    pub fn solve(&self, equation: &str) -> Result<Solution, DomainError> {
        let equation = equation.trim();
        if equation.is_empty() {
            return Err(DomainError::MissingInput);
        }
        if equation.chars().count() > self.config.max_equation_len {
            return Err(DomainError::malformed(format!(
                "equation exceeds {} characters",
                self.config.max_equation_len
            )));
        }

        let expr = normalize(equation)?;
        let mut solutions = Vec::new();
        for variable in expr.free_symbols() {
            for root in algebra::solve(&expr, &variable)? {
                solutions.push(format!("{variable} = {root}"));
            }
        }

        Ok(Solution {
            equation: format!("{expr} = 0"),
            solutions,
        })
    }
}

/// Parses `lhs = rhs` into `lhs - rhs`, or a bare expression as is.
fn normalize(equation: &str) -> Result<Expr, DomainError> {
    if equation.matches('=').count() > 1 {
        return Err(DomainError::malformed("more than one '='"));
    }
    match equation.split_once('=') {
        Some((lhs, rhs)) => Ok(algebra::parse(lhs)? - algebra::parse(rhs)?),
        None => Ok(algebra::parse(equation)?),
    }
}
