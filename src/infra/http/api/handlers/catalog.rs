//! Solutions, segments and stats handlers, addressed by business key

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::auth::AdminPrincipal;
use vitrine_api_types::{NewSegment, NewSolution, NewStat, SegmentFields, SolutionFields, StatFields};

use super::admin_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_solutions(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let solutions = state.solutions.list().await.map_err(admin_to_api)?;
    Ok(Json(solutions))
}

pub async fn create_solution(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<NewSolution>,
) -> Result<impl IntoResponse, ApiError> {
    let solution = state
        .solutions
        .create(&principal.actor_label(), payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(solution)))
}

pub async fn update_solution(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(solution_id): Path<String>,
    Json(payload): Json<SolutionFields>,
) -> Result<impl IntoResponse, ApiError> {
    let solution = state
        .solutions
        .update(&principal.actor_label(), &solution_id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(solution))
}

pub async fn delete_solution(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(solution_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .solutions
        .delete(&principal.actor_label(), &solution_id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_segments(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let segments = state.segments.list().await.map_err(admin_to_api)?;
    Ok(Json(segments))
}

pub async fn create_segment(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<NewSegment>,
) -> Result<impl IntoResponse, ApiError> {
    let segment = state
        .segments
        .create(&principal.actor_label(), payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(segment)))
}

pub async fn update_segment(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(segment_id): Path<String>,
    Json(payload): Json<SegmentFields>,
) -> Result<impl IntoResponse, ApiError> {
    let segment = state
        .segments
        .update(&principal.actor_label(), &segment_id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(segment))
}

pub async fn delete_segment(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(segment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .segments
        .delete(&principal.actor_label(), &segment_id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_stats(
    State(state): State<ApiState>,
    Extension(_principal): Extension<AdminPrincipal>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.stats.list().await.map_err(admin_to_api)?;
    Ok(Json(stats))
}

pub async fn create_stat(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<NewStat>,
) -> Result<impl IntoResponse, ApiError> {
    let stat = state
        .stats
        .create(&principal.actor_label(), payload)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(stat)))
}

pub async fn update_stat(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(stat_id): Path<String>,
    Json(payload): Json<StatFields>,
) -> Result<impl IntoResponse, ApiError> {
    let stat = state
        .stats
        .update(&principal.actor_label(), &stat_id, payload)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(stat))
}

pub async fn delete_stat(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(stat_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .stats
        .delete(&principal.actor_label(), &stat_id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
