#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use tempfile::TempDir;

use vitrine::application::admin::{
    banners::AdminBannerService, content::AdminContentService, dashboard::AdminDashboardService,
    help::AdminHelpService, segments::AdminSegmentService,
    solution_pages::AdminSolutionPageService, solutions::AdminSolutionService,
    stats::AdminStatService,
};
use vitrine::application::auth::{AdminPrincipal, AuthService, provision_admin};
use vitrine::application::site::{SiteRepos, SiteService};
use vitrine::infra::db::PostgresRepositories;
use vitrine::infra::http::{ApiState, HttpState, RouterState};
use vitrine::infra::uploads::UploadStorage;

pub const SECRET: &str = "test-secret-with-at-least-32-bytes!!";
pub const ADMIN_EMAIL: &str = "admin@vitrine.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub state: RouterState,
    pub repos: Arc<PostgresRepositories>,
    pub token: String,
    pub principal: AdminPrincipal,
    _uploads: TempDir,
}

pub async fn build_app(pool: PgPool) -> TestApp {
    build_app_with_upload_prefix(pool, "/uploads").await
}

pub async fn build_app_with_upload_prefix(pool: PgPool, upload_prefix: &str) -> TestApp {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let uploads = tempfile::tempdir().expect("uploads dir");
    let upload_storage = Arc::new(
        UploadStorage::new(uploads.path().to_path_buf(), upload_prefix).expect("upload storage"),
    );

    provision_admin(repos.as_ref(), ADMIN_EMAIL, "Admin", ADMIN_PASSWORD)
        .await
        .expect("provision admin");
    let auth = Arc::new(
        AuthService::new(repos.clone(), SECRET, Duration::from_secs(3600)).expect("auth service"),
    );
    let session = auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("login");
    let principal = auth.authenticate(&session.token).expect("principal");

    let site = SiteService::new(SiteRepos {
        content: repos.clone(),
        settings: repos.clone(),
        solutions: repos.clone(),
        segments: repos.clone(),
        stats: repos.clone(),
        banners: repos.clone(),
        solution_pages: repos.clone(),
        help: repos.clone(),
        help_writer: repos.clone(),
    });

    let api = ApiState {
        auth,
        content: Arc::new(AdminContentService::new(repos.clone(), repos.clone())),
        solutions: Arc::new(AdminSolutionService::new(repos.clone())),
        segments: Arc::new(AdminSegmentService::new(repos.clone())),
        stats: Arc::new(AdminStatService::new(repos.clone())),
        banners: Arc::new(AdminBannerService::new(repos.clone())),
        solution_pages: Arc::new(AdminSolutionPageService::new(repos.clone())),
        help: Arc::new(AdminHelpService::new(repos.clone(), repos.clone())),
        dashboard: Arc::new(AdminDashboardService::new(
            repos.clone(),
            repos.clone(),
            repos.clone(),
            repos.clone(),
            repos.clone(),
            repos.clone(),
            repos.clone(),
            repos.clone(),
        )),
        upload_storage: upload_storage.clone(),
    };

    let http = HttpState {
        site: Arc::new(site),
        db: repos.clone(),
        upload_storage,
    };

    TestApp {
        state: RouterState { http, api },
        repos,
        token: session.token,
        principal,
        _uploads: uploads,
    }
}

pub async fn body_json<T: DeserializeOwned>(response: impl IntoResponse) -> T {
    let response: Response<Body> = response.into_response();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
