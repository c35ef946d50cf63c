//! Session tokens for the admin surface.
//!
//! Admins log in with email and password (bcrypt hashes) and receive an HS256
//! JWT valid for the configured session lifetime. Verification needs no store
//! access: the token carries the identity.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::{AdminIdentity, AdminUserRecord};
use vitrine_api_types::LoginResponse;

pub const MIN_SECRET_LEN: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 8;
const BCRYPT_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("access token required")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("jwt secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    name: String,
    iat: i64,
    exp: i64,
}

/// Identity of the admin behind a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl AdminPrincipal {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    pub fn actor_label(&self) -> String {
        format!("admin:{}:{}", self.id, self.email)
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        secret: &str,
        session_ttl: std::time::Duration,
    ) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret);
        }
        let session_ttl =
            Duration::try_from(session_ttl).map_err(|err| AuthError::Signing(err.to_string()))?;

        Ok(Self {
            users,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user.password_hash.clone();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash))
            .await
            .map_err(|err| AuthError::Hash(err.to_string()))?
            .unwrap_or(false);

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let (token, expires_at) = self.issue_token(&user)?;
        info!(target = "vitrine::auth", user_id = user.id, "admin logged in");

        Ok(LoginResponse {
            token,
            expires_at,
            user: user.identity(),
        })
    }

    /// Verify a bearer token and recover the admin identity it carries.
    pub fn authenticate(&self, token: &str) -> Result<AdminPrincipal, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        let id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AdminPrincipal {
            id,
            email: data.claims.email,
            name: data.claims.name,
        })
    }

    fn issue_token(&self, user: &AdminUserRecord) -> Result<(String, i64), AuthError> {
        let now = OffsetDateTime::now_utc();
        let expires_at = (now + self.session_ttl).unix_timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.unix_timestamp(),
            exp: expires_at,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AuthError::Signing(err.to_string()))?;
        Ok((token, expires_at))
    }
}

/// Create an admin account, or reset the name and password of an existing one.
pub async fn provision_admin(
    users: &dyn UsersRepo,
    email: &str,
    name: &str,
    password: &str,
) -> Result<AdminIdentity, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AuthError::MissingField { field: "email" });
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::MissingField { field: "name" });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }

    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|err| AuthError::Hash(err.to_string()))?
        .map_err(|err| AuthError::Hash(err.to_string()))?;

    let user = users.upsert_user(&email, name, &hash).await?;
    Ok(user.identity())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
