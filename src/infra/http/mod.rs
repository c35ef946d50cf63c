pub mod api;
mod middleware;
mod public;

pub use api::ApiState;
pub use public::HttpState;

use crate::application::error::ErrorReport;
use axum::Router;
use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::middleware as axum_middleware;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;

use middleware::{log_responses, set_request_context};

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

#[derive(Clone)]
pub struct RouterState {
    pub http: HttpState,
    pub api: ApiState,
}

impl FromRef<RouterState> for HttpState {
    fn from_ref(state: &RouterState) -> Self {
        state.http.clone()
    }
}

impl FromRef<RouterState> for ApiState {
    fn from_ref(state: &RouterState) -> Self {
        state.api.clone()
    }
}

/// Public façade and admin API on one listener, with request ids and
/// response logging around both.
pub fn build_router(state: RouterState, upload_body_limit: usize) -> Router {
    public::build_public_router(state.http.upload_storage.public_prefix())
        .merge(api::build_api_router(state.clone(), upload_body_limit))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
