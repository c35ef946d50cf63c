//! Multipart upload into local storage

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::TryStreamExt;
use tracing::{error, info};

use crate::application::auth::AdminPrincipal;
use crate::infra::uploads::UploadStorageError;
use vitrine_api_types::UploadResponse;

use super::upload_storage_to_api;
use crate::infra::http::api::error::{ApiError, codes};
use crate::infra::http::api::state::ApiState;

const SOURCE: &str = "vitrine::http::uploads";
const FALLBACK_FILENAME: &str = "upload.bin";

pub async fn upload_file(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                error!(
                    target = SOURCE,
                    status = err.status().as_u16(),
                    error = %err,
                    "failed to read multipart payload"
                );
                return Err(upload_storage_to_api(classify_stream_error(err)));
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();

        let stored = state
            .upload_storage
            .store_stream(&filename, field.map_err(classify_stream_error))
            .await
            .map_err(upload_storage_to_api)?;

        let url = state.upload_storage.public_url(&stored.stored_path);
        info!(
            target = SOURCE,
            actor = %principal.actor_label(),
            filename = %filename,
            size_bytes = stored.size_bytes,
            url = %url,
            "upload stored"
        );

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url,
                size_bytes: stored.size_bytes,
                checksum: stored.checksum,
            }),
        ));
    }

    Err(ApiError::new(
        StatusCode::BAD_REQUEST,
        codes::MISSING_FIELD,
        "Required field missing",
        Some("file".to_string()),
    ))
}

fn classify_stream_error(err: MultipartError) -> UploadStorageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadStorageError::PayloadTooLarge {
            source: Box::new(err),
        }
    } else {
        UploadStorageError::PayloadStream {
            source: Box::new(err),
        }
    }
}
