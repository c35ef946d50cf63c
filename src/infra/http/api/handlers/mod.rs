//! Admin API handlers organized by entity family.
//!
//! Error conversions shared by every family live here.

mod auth;
mod banners;
mod catalog;
mod content;
mod dashboard;
mod help;
mod solution_pages;
mod uploads;

pub use auth::*;
pub use banners::*;
pub use catalog::*;
pub use content::*;
pub use dashboard::*;
pub use help::*;
pub use solution_pages::*;
pub use uploads::*;

use axum::http::StatusCode;

use crate::application::admin::AdminError;
use crate::application::admin::dashboard::AllDataError;
use crate::application::auth::AuthError;
use crate::application::repos::RepoError;
use crate::application::site::SiteError;
use crate::domain::error::DomainError;
use crate::infra::uploads::UploadStorageError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("Resource not found", None),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

pub(crate) fn admin_to_api(err: AdminError) -> ApiError {
    match err {
        AdminError::MissingField { field } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::MISSING_FIELD,
            "Required field missing",
            Some(field.to_string()),
        ),
        AdminError::Invalid(message) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        AdminError::Domain(DomainError::InvalidKeys { keys }) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_KEY,
            "Invalid keys",
            Some(keys.join(", ")),
        ),
        AdminError::Domain(DomainError::Validation { message }) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        err @ AdminError::Duplicate { .. } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate business key",
            Some(err.to_string()),
        ),
        err @ AdminError::NotFound { .. } => {
            ApiError::not_found("Resource not found", Some(err.to_string()))
        }
        AdminError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn site_to_api(err: SiteError) -> ApiError {
    match err {
        err @ SiteError::NotFound { .. } => {
            ApiError::not_found("Resource not found", Some(err.to_string()))
        }
        SiteError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn auth_to_api(err: AuthError) -> ApiError {
    match err {
        AuthError::MissingToken => ApiError::missing_token(),
        AuthError::InvalidToken => ApiError::invalid_token(),
        AuthError::InvalidCredentials => ApiError::new(
            StatusCode::UNAUTHORIZED,
            codes::INVALID_CREDENTIALS,
            "Invalid email or password",
            None,
        ),
        AuthError::MissingField { field } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::MISSING_FIELD,
            "Required field missing",
            Some(field.to_string()),
        ),
        err @ (AuthError::WeakSecret | AuthError::WeakPassword) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(err.to_string()),
        ),
        err @ (AuthError::Hash(_) | AuthError::Signing(_)) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::AUTH,
            "Authentication failed",
            Some(err.to_string()),
        ),
        AuthError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn all_data_to_api(err: AllDataError) -> ApiError {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        codes::PARTIAL_LOAD,
        "Failed to load admin data",
        Some(err.to_string()),
    )
}

pub(crate) fn upload_storage_to_api(err: UploadStorageError) -> ApiError {
    match err {
        err @ UploadStorageError::PayloadTooLarge { .. } => ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            codes::PAYLOAD_TOO_LARGE,
            "Uploaded file is too large",
            Some(err.to_string()),
        ),
        err @ (UploadStorageError::EmptyPayload
        | UploadStorageError::PayloadStream { .. }
        | UploadStorageError::InvalidPath) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::UPLOAD,
            "Failed to store upload",
            Some(err.to_string()),
        ),
        err @ (UploadStorageError::Io(_) | UploadStorageError::SizeOverflow) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::UPLOAD,
            "Failed to store upload",
            Some(err.to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_business_key_maps_to_conflict() {
        let err = admin_to_api(AdminError::Duplicate {
            entity: "segment",
            key: "retail".into(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), codes::DUPLICATE);
    }

    #[test]
    fn unknown_business_key_maps_to_not_found() {
        let err = admin_to_api(AdminError::not_found("stat", "clients"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_batch_keys_map_to_bad_request() {
        let err = admin_to_api(AdminError::Domain(DomainError::InvalidKeys {
            keys: vec![" padded".into(), String::new()],
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), codes::INVALID_KEY);
    }

    #[test]
    fn auth_failures_distinguish_missing_and_invalid_tokens() {
        assert_eq!(auth_to_api(AuthError::MissingToken).code(), codes::MISSING_TOKEN);
        assert_eq!(auth_to_api(AuthError::InvalidToken).code(), codes::INVALID_TOKEN);
        assert_eq!(
            auth_to_api(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn storage_timeouts_are_unavailable() {
        assert_eq!(
            repo_to_api(RepoError::Timeout).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
