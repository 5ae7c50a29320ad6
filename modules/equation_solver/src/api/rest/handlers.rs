//! REST handlers for the Equation Solver module.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};
use http::StatusCode;
use utoipa::openapi::OpenApi;

use super::dto::{MessageResponse, SolveQuery, SolveResponse};
use super::error::{ApiError, ApiResult};
use crate::domain::service::Service;

pub const INDEX_MESSAGE: &str = "Equation API. Try /solve?equation=1+1";

/// GET /
///
/// Usage hint for the API.
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: INDEX_MESSAGE.to_owned(),
    })
}

/// GET /solve?equation=...
///
/// Normalize an equation to `<expression> = 0` and solve it for every free variable.
/// The engine runs on the blocking pool.
pub async fn solve(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<SolveQuery>, QueryRejection>,
) -> ApiResult<Json<SolveResponse>> {
    let equation = match query {
        Ok(Query(query)) => query.equation.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable query string");
            String::new()
        }
    };
    let equation = equation.trim().to_owned();
    if equation.is_empty() {
        return Err(ApiError::missing_equation());
    }

    let solution = tokio::task::spawn_blocking(move || service.solve(&equation))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Solver task did not complete");
            ApiError::internal()
        })??;

    tracing::debug!(
        equation = %solution.equation,
        solutions = solution.solutions.len(),
        "Equation solved"
    );
    Ok(Json(SolveResponse {
        result: solution.into(),
    }))
}

/// OPTIONS /, /solve
///
/// Answer CORS preflight requests; the headers come from the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /openapi.json
pub async fn openapi_json(Extension(doc): Extension<Arc<OpenApi>>) -> Json<OpenApi> {
    Json(doc.as_ref().clone())
}
