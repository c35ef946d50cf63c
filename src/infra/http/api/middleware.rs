use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::application::auth::AuthError;

use super::error::ApiError;
use super::state::ApiState;

/// Reject the request before any handler runs unless it carries a valid
/// admin bearer token. The verified principal is stored as an extension.
pub async fn require_admin(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers().get(AUTHORIZATION)) {
        Some(token) => token,
        None => return ApiError::missing_token().into_response(),
    };

    let principal = match state.auth.authenticate(&token) {
        Ok(principal) => principal,
        Err(AuthError::MissingToken) => return ApiError::missing_token().into_response(),
        Err(err) => {
            debug!(
                target = "vitrine::http::auth",
                error = %err,
                "bearer token rejected"
            );
            return ApiError::invalid_token().into_response();
        }
    };

    request.extensions_mut().insert(principal.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

fn extract_token(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?.trim();
    (!bearer.is_empty()).then(|| bearer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_non_blank_bearer_headers_yield_a_token() {
        let header = |value: &'static str| HeaderValue::from_static(value);

        assert_eq!(extract_token(Some(&header("Bearer abc"))).as_deref(), Some("abc"));
        assert_eq!(extract_token(Some(&header("Bearer   "))), None);
        assert_eq!(extract_token(Some(&header("Basic abc"))), None);
        assert_eq!(extract_token(None), None);
    }
}
