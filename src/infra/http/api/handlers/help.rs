//! Help-center handlers: categories, articles and article images

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::auth::AdminPrincipal;
use vitrine_api_types::{HelpArticleInput, HelpCategoryInput, HelpImageInput, ImageOrder};

use super::admin_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArticleListQuery {
    pub category_id: Option<i64>,
}

pub async fn list_help_categories(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.help.list_categories().await.map_err(admin_to_api)?;
    Ok(Json(categories))
}

pub async fn create_help_category(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<HelpCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .help
        .create_category(&principal.actor_label(), payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_help_category(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
    Json(payload): Json<HelpCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .help
        .update_category(&principal.actor_label(), id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(category))
}

pub async fn delete_help_category(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .help
        .delete_category(&principal.actor_label(), id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_help_articles(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
    Query(query): Query<ArticleListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let articles = state
        .help
        .list_articles(query.category_id)
        .await
        .map_err(admin_to_api)?;
    Ok(Json(articles))
}

pub async fn get_help_article(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.help.article_detail(id).await.map_err(admin_to_api)?;
    Ok(Json(detail))
}

pub async fn create_help_article(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<HelpArticleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .help
        .create_article(&principal.actor_label(), payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_help_article(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
    Json(payload): Json<HelpArticleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .help
        .update_article(&principal.actor_label(), id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(article))
}

pub async fn delete_help_article(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .help
        .delete_article(&principal.actor_label(), id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_help_images(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let images = state
        .help
        .list_images(article_id)
        .await
        .map_err(admin_to_api)?;
    Ok(Json(images))
}

pub async fn add_help_image(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(article_id): Path<i64>,
    Json(payload): Json<HelpImageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .help
        .add_image(&principal.actor_label(), article_id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn reorder_help_images(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(article_id): Path<i64>,
    Json(payload): Json<ImageOrder>,
) -> Result<impl IntoResponse, ApiError> {
    let images = state
        .help
        .reorder_images(&principal.actor_label(), article_id, payload.image_ids)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(images))
}

pub async fn update_help_image(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
    Json(payload): Json<HelpImageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .help
        .update_image(&principal.actor_label(), id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(image))
}

pub async fn delete_help_image(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .help
        .delete_image(&principal.actor_label(), id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
