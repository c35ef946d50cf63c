use std::sync::Arc;

use httpmock::MockServer;
use serde_json::{Value, json};
use vitrine_client::{ClientError, Phase, SiteClient, SiteStore};
use vitrine_api_types::{NewSegment, NewSolution, SegmentFields, SolutionFields};

fn client(server: &MockServer) -> SiteClient {
    SiteClient::new(&server.base_url()).expect("client")
}

fn reply(server: &MockServer, path: &str, body: Value) {
    server.mock(|when, then| {
        when.method("GET").path(path.to_string());
        then.status(200)
            .header("content-type", "application/json")
            .body(body.to_string());
    });
}

fn solution_json(id: i64, solution_id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "solution_id": solution_id,
        "title": title,
        "description": "",
        "features": ["Fiscal"],
        "cta_text": "",
        "icon": "",
        "order_num": 0,
        "active": true
    })
}

/// Mock every façade family except the ones listed in `skip`.
fn mock_facade(server: &MockServer, skip: &[&str]) {
    let families = [
        (
            "/content",
            json!({"hero.title": "Gestão", "quick_links.0.label": "Blog", "quick_links.0.url": "/blog"}),
        ),
        ("/settings", json!({"primary_color": "#0044ff"})),
        ("/solutions", json!([solution_json(1, "erp", "ERP")])),
        (
            "/segments",
            json!([{"id": 1, "segment_id": "varejo", "name": "Varejo", "icon": "", "order_num": 0, "active": true}]),
        ),
        (
            "/stats",
            json!([
                {"id": 1, "stat_id": "clients", "value": "500+", "label": "Clientes", "section": "numbers", "order_num": 0},
                {"id": 2, "stat_id": "years", "value": "20", "label": "Anos", "section": "about", "order_num": 0}
            ]),
        ),
        (
            "/banners/all",
            json!([
                {"id": 1, "title": "Home", "order_num": 0, "active": true, "page": "home"},
                {"id": 2, "title": "Sobre", "order_num": 0, "active": true, "page": "sobre"}
            ]),
        ),
        ("/solution-pages", json!([])),
        (
            "/help/categories",
            json!([{"id": 1, "slug": "fiscal", "name": "Fiscal", "description": "", "icon": "", "order_num": 0, "status": "published", "article_count": 3}]),
        ),
    ];

    for (path, body) in families {
        if !skip.contains(&path) {
            reply(server, path, body);
        }
    }
}

#[tokio::test]
async fn fetch_all_builds_snapshot() {
    let server = MockServer::start();
    mock_facade(&server, &[]);

    let store = SiteStore::new(client(&server));
    assert_eq!(store.phase().await, Phase::Idle);

    let snapshot = store.fetch_all().await;
    assert_eq!(store.phase().await, Phase::Ready);
    assert!(!snapshot.is_degraded());
    assert_eq!(snapshot.content("hero.title"), Some("Gestão"));
    assert_eq!(snapshot.setting("primary_color"), Some("#0044ff"));
    assert_eq!(snapshot.quick_links().len(), 1);
    assert_eq!(snapshot.quick_links()[0].url, "/blog");
    assert!(snapshot.solution("erp").is_some());
    assert!(snapshot.segment("varejo").is_some());
    assert_eq!(snapshot.stats_by_section().len(), 2);
    assert_eq!(snapshot.banners_for_page("sobre")[0].fields.title, "Sobre");
    assert_eq!(snapshot.banners_for_page("")[0].fields.title, "Home");
    assert_eq!(snapshot.help_categories[0].article_count, 3);

    assert_eq!(*store.snapshot().await, *snapshot);
}

#[tokio::test]
async fn overlapping_fetches_publish_in_call_order() {
    let server = MockServer::start();
    mock_facade(&server, &[]);
    let store = SiteStore::new(client(&server));

    let (first, second) = tokio::join!(store.fetch_all(), store.fetch_all());

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&store.snapshot().await, &second));
    assert_eq!(store.phase().await, Phase::Ready);
}

#[tokio::test]
async fn failing_family_degrades_to_default() {
    let server = MockServer::start();
    mock_facade(&server, &["/stats", "/banners/all"]);
    server.mock(|when, then| {
        when.method("GET").path("/stats");
        then.status(500)
            .header("content-type", "application/json")
            .body(r#"{"error":{"code":"repo_error","message":"Database error"}}"#);
    });

    let store = SiteStore::new(client(&server));
    let snapshot = store.fetch_all().await;

    assert_eq!(store.phase().await, Phase::Ready);
    assert!(snapshot.stats.is_empty());
    assert!(snapshot.banners.is_empty());
    let families: Vec<&str> = snapshot.degraded.iter().map(|e| e.family).collect();
    assert_eq!(families, ["stats", "banners"]);
    assert!(snapshot.degraded[0].message.contains("repo_error"));
    assert_eq!(snapshot.solutions.len(), 1);
}

#[tokio::test]
async fn save_solution_creates_unknown_key_and_refreshes() -> Result<(), ClientError> {
    let server = MockServer::start();
    mock_facade(&server, &["/solutions"]);
    let listing = server.mock(|when, then| {
        when.method("GET").path("/solutions");
        then.status(200)
            .header("content-type", "application/json")
            .body(json!([solution_json(2, "crm", "CRM")]).to_string());
    });
    let create = server.mock(|when, then| {
        when.method("POST")
            .path("/admin/solutions")
            .header("authorization", "Bearer tok")
            .json_body_partial(r#"{"solution_id":"crm","title":"CRM"}"#);
        then.status(201)
            .header("content-type", "application/json")
            .body(solution_json(2, "crm", "CRM").to_string());
    });

    let store = SiteStore::new(client(&server).with_token("tok"));
    let saved = store
        .save_solution(&NewSolution {
            solution_id: "crm".into(),
            fields: SolutionFields {
                title: "CRM".into(),
                description: String::new(),
                features: vec!["Fiscal".into()],
                cta_text: String::new(),
                icon: String::new(),
                order_num: 0,
                active: true,
            },
        })
        .await?;

    create.assert();
    listing.assert();
    assert_eq!(saved.id, 2);
    assert_eq!(store.phase().await, Phase::Ready);
    assert!(store.snapshot().await.solution("crm").is_some());
    Ok(())
}

#[tokio::test]
async fn save_segment_updates_known_key() -> Result<(), ClientError> {
    let server = MockServer::start();
    mock_facade(&server, &[]);
    let update = server.mock(|when, then| {
        when.method("PUT")
            .path("/admin/segments/varejo")
            .json_body_partial(r#"{"name":"Varejo & Atacado"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(
                json!({"id": 1, "segment_id": "varejo", "name": "Varejo & Atacado", "icon": "", "order_num": 0, "active": true})
                    .to_string(),
            );
    });

    let store = SiteStore::new(client(&server).with_token("tok"));
    store.fetch_all().await;

    let saved = store
        .save_segment(&NewSegment {
            segment_id: "varejo".into(),
            fields: SegmentFields {
                name: "Varejo & Atacado".into(),
                icon: String::new(),
                order_num: 0,
                active: true,
            },
        })
        .await?;

    update.assert();
    assert_eq!(saved.fields.name, "Varejo & Atacado");
    Ok(())
}

#[tokio::test]
async fn failed_write_leaves_snapshot_untouched() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/admin/solutions");
        then.status(409)
            .header("content-type", "application/json")
            .body(r#"{"error":{"code":"duplicate","message":"Duplicate record","hint":"solution `erp` already exists"}}"#);
    });

    let store = SiteStore::new(client(&server).with_token("tok"));
    let err = store
        .create_solution(&NewSolution {
            solution_id: "erp".into(),
            fields: SolutionFields {
                title: "ERP".into(),
                description: String::new(),
                features: Vec::new(),
                cta_text: String::new(),
                icon: String::new(),
                order_num: 0,
                active: true,
            },
        })
        .await
        .expect_err("duplicate");

    assert!(err.is_conflict());
    match err {
        ClientError::Api { code, message, .. } => {
            assert_eq!(code, "duplicate");
            assert!(message.contains("already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.phase().await, Phase::Idle);
    assert!(store.snapshot().await.solutions.is_empty());
}

#[tokio::test]
async fn login_token_is_sent_as_bearer() -> Result<(), ClientError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST")
            .path("/auth/login")
            .json_body_partial(r#"{"email":"admin@vitrine.test"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(
                json!({
                    "token": "tok",
                    "expires_at": 1_900_000_000,
                    "user": {"id": 1, "email": "admin@vitrine.test", "name": "Admin"}
                })
                .to_string(),
            );
    });
    let me = server.mock(|when, then| {
        when.method("GET")
            .path("/auth/me")
            .header("authorization", "Bearer tok");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":1,"email":"admin@vitrine.test","name":"Admin"}"#);
    });

    let anonymous = client(&server);
    let session = anonymous.login("admin@vitrine.test", "secret").await?;
    let identity = anonymous.with_token(session.token).me().await?;

    me.assert();
    assert_eq!(identity.email, "admin@vitrine.test");
    Ok(())
}

#[tokio::test]
async fn missing_token_surfaces_unauthorized() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/admin/all-data");
        then.status(401)
            .header("content-type", "application/json")
            .body(r#"{"error":{"code":"missing_token","message":"Access token required"}}"#);
    });

    let err = client(&server).all_data().await.expect_err("unauthorized");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn search_sends_query_parameter() -> Result<(), ClientError> {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method("GET")
            .path("/help/search")
            .query_param("q", "nota fiscal");
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });

    let hits = client(&server).search_help("nota fiscal").await?;
    search.assert();
    assert!(hits.is_empty());
    Ok(())
}
