//! Content, quick links and settings handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::response::IntoResponse;

use crate::application::auth::AdminPrincipal;
use vitrine_api_types::{BatchUpdated, ContentMap, QuickLink, SettingsMap};

use super::admin_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_content(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.content.list_content().await.map_err(admin_to_api)?;
    Ok(Json(rows))
}

pub async fn save_content(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(batch): Json<ContentMap>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .content
        .save_content(&principal.actor_label(), batch)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(BatchUpdated { updated }))
}

pub async fn save_quick_links(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(links): Json<Vec<QuickLink>>,
) -> Result<impl IntoResponse, ApiError> {
    let saved = state
        .content
        .save_quick_links(&principal.actor_label(), links)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(saved))
}

pub async fn get_settings(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let settings = state.content.settings_map().await.map_err(admin_to_api)?;
    Ok(Json(settings))
}

pub async fn save_settings(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(batch): Json<SettingsMap>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .content
        .save_settings(&principal.actor_label(), batch)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(BatchUpdated { updated }))
}
