//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tracing::warn;

use crate::domain::RoutePlan;
use crate::mapbox::MapboxError;
use crate::plan::{PlanError, PlanRequest};

use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route-plan", post(plan_route))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Compute (or return the cached) fuel-optimized route plan.
async fn plan_route(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<RoutePlan>, AppError> {
    let plan = state.planner.compute_plan(&request).await?;
    Ok(Json(plan.as_ref().clone()))
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    UpstreamFailure { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match &e {
            // Provider transport and shape failures are the upstream's
            // fault, not the caller's.
            PlanError::Mapbox(
                MapboxError::Http(_)
                | MapboxError::Api { .. }
                | MapboxError::Json { .. }
                | MapboxError::InvalidScheme
                | MapboxError::Polyline(_),
            ) => AppError::UpstreamFailure {
                message: e.to_string(),
            },
            PlanError::Catalog(_) => AppError::Internal {
                message: e.to_string(),
            },
            // Everything else is a domain outcome the caller can act on.
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::UpstreamFailure { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { detail: message });
        (status, body).into_response()
    }
}
