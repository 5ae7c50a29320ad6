use thiserror::Error;

/// Failure to turn text into an expression.
///
/// `position` is the byte offset into the parsed source where the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at position {position}: {message}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Failure of the solver for a well-formed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("cannot solve for '{variable}': {reason}")]
    Unsupported { variable: String, reason: String },
}

impl SolveError {
    #[must_use]
    pub fn unsupported(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            variable: variable.into(),
            reason: reason.into(),
        }
    }
}
