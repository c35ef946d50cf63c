//! Banner handlers. Banners are addressed by storage id and deleted softly.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::auth::AdminPrincipal;
use vitrine_api_types::BannerFields;

use super::admin_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BannerListQuery {
    pub page: Option<String>,
}

pub async fn list_banners(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
    Query(query): Query<BannerListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let banners = state
        .banners
        .list(query.page.as_deref())
        .await
        .map_err(admin_to_api)?;
    Ok(Json(banners))
}

pub async fn banner_pages(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = state.banners.page_counts().await.map_err(admin_to_api)?;
    Ok(Json(counts))
}

pub async fn get_banner(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let banner = state.banners.find(id).await.map_err(admin_to_api)?;
    Ok(Json(banner))
}

pub async fn create_banner(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<BannerFields>,
) -> Result<impl IntoResponse, ApiError> {
    let banner = state
        .banners
        .create(&principal.actor_label(), payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(banner)))
}

pub async fn update_banner(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
    Json(payload): Json<BannerFields>,
) -> Result<impl IntoResponse, ApiError> {
    let banner = state
        .banners
        .update(&principal.actor_label(), id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(banner))
}

pub async fn delete_banner(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .banners
        .delete(&principal.actor_label(), id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
