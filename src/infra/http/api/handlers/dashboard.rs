use axum::Json;
use axum::extract::{Extension, State};
use axum::response::IntoResponse;

use crate::application::auth::AdminPrincipal;

use super::all_data_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn all_data(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.dashboard.all_data().await.map_err(all_data_to_api)?;
    Ok(Json(data))
}
