//! Public read façade consumed by the marketing website.

use std::{io::ErrorKind, sync::Arc};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::error;

use crate::{
    application::site::SiteService,
    infra::{
        db::PostgresRepositories,
        uploads::{UploadStorage, UploadStorageError},
    },
};
use vitrine_api_types::DEFAULT_BANNER_PAGE;

use super::{
    RouterState,
    api::{
        error::{ApiError, codes},
        handlers::site_to_api,
    },
    db_health_response,
};

#[derive(Clone)]
pub struct HttpState {
    pub site: Arc<SiteService>,
    pub db: Arc<PostgresRepositories>,
    pub upload_storage: Arc<UploadStorage>,
}

/// Façade routes. Stored uploads are served under `upload_prefix`.
pub fn build_public_router(upload_prefix: &str) -> Router<RouterState> {
    Router::new()
        .route("/content", get(content))
        .route("/content/quick-links", get(quick_links))
        .route("/settings", get(settings))
        .route("/solutions", get(solutions))
        .route("/segments", get(segments))
        .route("/stats", get(stats))
        .route("/banners", get(home_banners))
        .route("/banners/all", get(all_banners))
        .route("/banners/{page}", get(page_banners))
        .route("/solution-pages", get(solution_pages))
        .route("/solution-pages/{slug}", get(solution_page))
        .route("/help/categories", get(help_categories))
        .route("/help/categories/{slug}/articles", get(category_articles))
        .route("/help/articles/{slug}", get(help_article))
        .route("/help/search", get(search_help))
        .route("/health", get(health))
        .route(&format!("{upload_prefix}/{{*path}}"), get(serve_upload))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchQuery {
    q: String,
}

async fn content(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.content().await.map_err(site_to_api)?))
}

async fn quick_links(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.quick_links().await.map_err(site_to_api)?))
}

async fn settings(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.settings().await.map_err(site_to_api)?))
}

async fn solutions(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.solutions().await.map_err(site_to_api)?))
}

async fn segments(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.segments().await.map_err(site_to_api)?))
}

async fn stats(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.stats().await.map_err(site_to_api)?))
}

async fn home_banners(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    let banners = state
        .site
        .banners(DEFAULT_BANNER_PAGE)
        .await
        .map_err(site_to_api)?;
    Ok(Json(banners))
}

async fn page_banners(
    State(state): State<HttpState>,
    Path(page): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.banners(&page).await.map_err(site_to_api)?))
}

async fn all_banners(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.all_banners().await.map_err(site_to_api)?))
}

async fn solution_pages(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.solution_pages().await.map_err(site_to_api)?))
}

async fn solution_page(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.site.solution_page(&slug).await.map_err(site_to_api)?,
    ))
}

async fn help_categories(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.site.help_categories().await.map_err(site_to_api)?))
}

async fn category_articles(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .site
            .category_articles(&slug)
            .await
            .map_err(site_to_api)?,
    ))
}

async fn help_article(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.site.help_article(&slug).await.map_err(site_to_api)?,
    ))
}

async fn search_help(
    State(state): State<HttpState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.site.search_help(&query.q).await.map_err(site_to_api)?,
    ))
}

async fn health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn serve_upload(
    State(state): State<HttpState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    match state.upload_storage.read(&path).await {
        Ok(bytes) => Ok(build_upload_response(&path, bytes)),
        Err(UploadStorageError::InvalidPath) => Err(upload_not_found()),
        Err(UploadStorageError::Io(err)) if err.kind() == ErrorKind::NotFound => {
            Err(upload_not_found())
        }
        Err(err) => {
            error!(
                target = "vitrine::http::uploads",
                path = %path,
                error = %err,
                "failed to read stored upload"
            );
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::UPLOAD,
                "Failed to read uploaded file",
                Some(err.to_string()),
            ))
        }
    }
}

fn upload_not_found() -> ApiError {
    ApiError::not_found("Upload not found", None)
}

fn build_upload_response(path: &str, bytes: Bytes) -> Response {
    let length = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_guesses_content_type() {
        let response = build_upload_response("2025/06/01/abc-logo.png", Bytes::from_static(b"png"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"image/png"[..])
        );
        assert_eq!(
            response.headers().get(CONTENT_LENGTH).map(|v| v.as_bytes()),
            Some(&b"3"[..])
        );
    }
}
