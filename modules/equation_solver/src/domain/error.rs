//! Domain error types for the Equation Solver module.

use algebra::{ParseError, SolveError};
use thiserror::Error;

/// Domain-level errors for the Equation Solver module.
#[derive(Error, Debug)]
pub enum DomainError {
    /// No equation text was supplied, or it was blank.
    #[error("Missing equation")]
    MissingInput,

    /// The text is not a well-formed equation.
    #[error("Malformed equation: {reason}")]
    MalformedEquation { reason: String },

    /// The engine could not solve a well-formed equation.
    #[error("Solver failed: {0}")]
    Solve(#[from] SolveError),
}

impl DomainError {
    /// Creates a `MalformedEquation` error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedEquation {
            reason: reason.into(),
        }
    }
}

impl From<ParseError> for DomainError {
    fn from(e: ParseError) -> Self {
        Self::malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = DomainError::malformed("too many '='");
        assert!(matches!(err, DomainError::MalformedEquation { .. }));

        let err: DomainError = algebra::parse("x +").unwrap_err().into();
        assert!(matches!(err, DomainError::MalformedEquation { .. }));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::MissingInput.to_string(), "Missing equation");

        let err = DomainError::malformed("unexpected token");
        assert_eq!(err.to_string(), "Malformed equation: unexpected token");
    }
}
