//! REST error mapping for the Equation Solver module.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use super::dto::ErrorResponse;
use crate::domain::error::DomainError;

pub const MISSING_EQUATION: &str = "Missing 'equation' query parameter";
pub const SYNTAX_ERROR: &str = "Syntax Error";
pub const INTERNAL_ERROR: &str = "Internal Server Error";

pub type ApiResult<T> = Result<T, ApiError>;

/// Error response of the REST layer: a status and a fixed client-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    #[must_use]
    pub fn missing_equation() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: MISSING_EQUATION,
        }
    }

    #[must_use]
    pub fn syntax_error() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: SYNTAX_ERROR,
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_ERROR,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::MissingInput => Self::missing_equation(),
            DomainError::MalformedEquation { reason } => {
                tracing::debug!(reason = %reason, "Rejected malformed equation");
                Self::syntax_error()
            }
            DomainError::Solve(_) => {
                tracing::error!(error = ?e, "Solver failed for a well-formed equation");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message.to_owned(),
        };
        (self.status, Json(body)).into_response()
    }
}
