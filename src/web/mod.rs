mod admin;
mod check;
mod pages;
mod submit;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::{
    auth::{AdminPolicy, AuthorizationError},
    match_service::MatchService,
    repository::{SubmissionRepository, SubmitError, VisibilityRepository},
};

use submit::SubmitResponse;

#[derive(Clone)]
pub struct AppState {
    pub submission_repository: Arc<SubmissionRepository>,
    pub visibility_repository: Arc<VisibilityRepository>,
    pub match_service: Arc<MatchService>,
    pub admin_policy: Arc<dyn AdminPolicy>,
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("Malformed request body: {0}")]
    Malformed(String),
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Submit(SubmitError::Validation(_)) => (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::rejected("missing")),
            )
                .into_response(),
            WebError::Submit(SubmitError::Duplicate) => (
                StatusCode::CONFLICT,
                Json(SubmitResponse::rejected("duplicate")),
            )
                .into_response(),
            WebError::Submit(SubmitError::Internal(err)) => {
                error!("Could not store submission: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SubmitResponse::rejected("internal")),
                )
                    .into_response()
            }
            WebError::Malformed(reason) => {
                debug!("Rejected malformed submission: {reason}");
                (
                    StatusCode::BAD_REQUEST,
                    Json(SubmitResponse::rejected("malformed")),
                )
                    .into_response()
            }
            WebError::Unauthorized(err) => (StatusCode::FORBIDDEN, err.to_string()).into_response(),
            WebError::Internal(err) => {
                error!("Internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(submit::index))
        .route("/submit", post(submit::submit))
        .route("/result-wait", get(submit::result_wait))
        .route("/check", get(check::check_page).post(check::check))
        .route("/api/public", get(check::public_status))
        .route(
            "/admin",
            get(admin::general_admin_page).post(admin::general_admin),
        )
        .route("/admin2", get(admin::data_admin_page).post(admin::data_admin))
        .route("/admin2/export", post(admin::export))
        .route("/ping", get(ping))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> &'static str {
    "ok"
}
