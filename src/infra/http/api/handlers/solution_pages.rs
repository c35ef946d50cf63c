//! Solution page handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::auth::AdminPrincipal;
use vitrine_api_types::{NewSolutionPage, SolutionPageFields};

use super::admin_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_solution_pages(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let pages = state.solution_pages.list().await.map_err(admin_to_api)?;
    Ok(Json(pages))
}

pub async fn create_solution_page(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<NewSolutionPage>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .solution_pages
        .create(&principal.actor_label(), payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn update_solution_page(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(slug): Path<String>,
    Json(payload): Json<SolutionPageFields>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .solution_pages
        .update(&principal.actor_label(), &slug, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(page))
}

pub async fn delete_solution_page(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .solution_pages
        .delete(&principal.actor_label(), &slug)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
