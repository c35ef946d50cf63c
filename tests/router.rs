mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

use vitrine::infra::http;
use vitrine_api_types::{AdminIdentity, LoginResponse, UploadResponse};

use common::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, build_app, build_app_with_upload_prefix};

const UPLOAD_LIMIT: usize = 1024 * 1024;

fn router(app: &TestApp) -> Router {
    http::build_router(app.state.clone(), UPLOAD_LIMIT)
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router response")
}

async fn json_body(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_routes_reject_missing_and_invalid_tokens(pool: PgPool) {
    let app = build_app(pool).await;
    let router = router(&app);
    let payload = json!({"primary_color": "#ff0000"});

    let response = send(
        &router,
        json_request("PUT", "/admin/settings", None, payload.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "missing_token");
    assert_eq!(body["error"]["message"], "Access token required");

    let response = send(
        &router,
        json_request("PUT", "/admin/settings", Some("not-a-jwt"), payload),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_token");
    assert_eq!(body["error"]["message"], "Invalid or expired token");

    let response = send(&router, get("/settings")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({}));
}

#[sqlx::test(migrations = "./migrations")]
async fn saved_content_is_served_by_the_facade(pool: PgPool) {
    let app = build_app(pool).await;
    let router = router(&app);

    let response = send(
        &router,
        json_request(
            "PUT",
            "/admin/content",
            Some(&app.token),
            json!({"hero.title": "Acme"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"updated": 1}));

    let content = json_body(send(&router, get("/content")).await).await;
    assert_eq!(content["hero.title"], "Acme");

    let links = json_body(send(&router, get("/content/quick-links")).await).await;
    assert_eq!(links.as_array().map(Vec::len), Some(4));
}

#[sqlx::test(migrations = "./migrations")]
async fn login_issues_a_token_accepted_by_admin_routes(pool: PgPool) {
    let app = build_app(pool).await;
    let router = router(&app);

    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let login: LoginResponse =
        serde_json::from_value(json_body(response).await).expect("login response");
    assert_eq!(login.user.email, ADMIN_EMAIL);

    let request = Request::builder()
        .uri("/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", login.token))
        .body(Body::empty())
        .expect("request");
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me: AdminIdentity = serde_json::from_value(json_body(response).await).expect("identity");
    assert_eq!(me.email, ADMIN_EMAIL);

    let response = send(
        &router,
        json_request(
            "POST",
            "/admin/solutions",
            Some(&login.token),
            json!({"solution_id": "erp", "title": "ERP", "features": ["Fiscal"]}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&router, get("/solutions")).await;
    let body = json_body(response).await;
    assert_eq!(body[0]["solution_id"], "erp");
    assert_eq!(body[0]["features"], json!(["Fiscal"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn wrong_password_is_rejected(pool: PgPool) {
    let app = build_app(pool).await;
    let router = router(&app);

    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            json!({"email": ADMIN_EMAIL, "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn health_reports_database_reachability(pool: PgPool) {
    let app = build_app(pool).await;
    let response = send(&router(&app), get("/health")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn banners_all_is_not_treated_as_a_page(pool: PgPool) {
    let app = build_app(pool).await;
    let router = router(&app);

    for (title, page) in [("Home", "home"), ("About", "sobre")] {
        let response = send(
            &router,
            json_request(
                "POST",
                "/admin/banners",
                Some(&app.token),
                json!({"title": title, "page": page}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let all = json_body(send(&router, get("/banners/all")).await).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let home = json_body(send(&router, get("/banners")).await).await;
    assert_eq!(home.as_array().map(Vec::len), Some(1));
    assert_eq!(home[0]["title"], "Home");

    let about = json_body(send(&router, get("/banners/sobre")).await).await;
    assert_eq!(about[0]["title"], "About");

    let counts =
        json_body(send_authorized(&router, "/admin/banners/pages", &app.token).await).await;
    assert_eq!(counts.as_array().map(Vec::len), Some(2));
}

async fn send_authorized(router: &Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    send(router, request).await
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_help_article_is_not_found(pool: PgPool) {
    let app = build_app(pool).await;
    let response = send(&router(&app), get("/help/articles/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

fn png_upload(token: &str) -> Request<Body> {
    let boundary = "vitrine-boundary";
    let payload = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"hero.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         not-really-a-png\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(payload))
        .expect("request")
}

#[sqlx::test(migrations = "./migrations")]
async fn uploads_are_served_under_the_configured_prefix(pool: PgPool) {
    let app = build_app_with_upload_prefix(pool, "/media").await;
    let router = router(&app);

    let response = send(&router, png_upload(&app.token)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let upload: UploadResponse =
        serde_json::from_value(json_body(response).await).expect("upload response");
    assert!(upload.url.starts_with("/media/"));

    let response = send(&router, get(&upload.url)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let legacy = upload.url.replacen("/media/", "/uploads/", 1);
    let response = send(&router, get(&legacy)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn uploaded_file_is_served_back(pool: PgPool) {
    let app = build_app(pool).await;
    let router = router(&app);

    let response = send(&router, png_upload(&app.token)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let upload: UploadResponse =
        serde_json::from_value(json_body(response).await).expect("upload response");
    assert_eq!(upload.size_bytes, "not-really-a-png".len() as i64);
    assert!(upload.url.starts_with("/uploads/"));
    assert!(upload.url.ends_with(".png"));

    let response = send(&router, get(&upload.url)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("image/png")
    );
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    assert_eq!(&bytes[..], b"not-really-a-png");
}

#[sqlx::test(migrations = "./migrations")]
async fn upload_without_file_field_is_bad_request(pool: PgPool) {
    let app = build_app(pool).await;
    let boundary = "vitrine-boundary";
    let payload = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"note\"\r\n\r\n\
         hello\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .body(Body::from(payload))
        .expect("request");
    let response = send(&router(&app), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "missing_field");
}
