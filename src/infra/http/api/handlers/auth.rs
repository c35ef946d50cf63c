//! Login and session identity

use axum::Json;
use axum::extract::{Extension, State};
use axum::response::IntoResponse;

use crate::application::auth::AdminPrincipal;
use vitrine_api_types::LoginRequest;

use super::auth_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn login(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .auth
        .login(&payload.email, &payload.password)
        .await
        .map_err(auth_to_api)?;

    Ok(Json(session))
}

pub async fn me(Extension(principal): Extension<AdminPrincipal>) -> impl IntoResponse {
    Json(principal.identity())
}
