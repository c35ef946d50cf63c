use clap::Parser;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_are_valid() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.auth.session_ttl, Duration::from_secs(86_400));
    assert!(settings.auth.jwt_secret.is_none());
    assert_eq!(
        settings.uploads.max_request_bytes.get(),
        DEFAULT_UPLOAD_REQUEST_LIMIT_BYTES
    );
    assert_eq!(settings.uploads.public_prefix, "/uploads");
}

#[test]
fn short_jwt_secret_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("too-short".to_string());

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "auth.jwt_secret"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn zero_session_ttl_is_rejected() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        session_ttl_seconds: Some(0),
        ..Default::default()
    };
    raw.apply_serve_overrides(&overrides);

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "auth.session_ttl_seconds",
            ..
        })
    ));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn secret_is_redacted_in_debug_output() {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("s".repeat(40));
    let settings = Settings::from_raw(raw).expect("valid settings");

    let rendered = format!("{:?}", settings.auth);
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("ssss"));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["vitrine"]);
    assert!(args.command.is_none());

    let args = CliArgs::parse_from(["vitrine", "serve", "--server-port", "8080"]);
    match args.command.expect("serve command") {
        Command::Serve(serve) => assert_eq!(serve.overrides.server_port, Some(8080)),
        other => panic!("wrong command parsed: {other:?}"),
    }
}

#[test]
fn parse_create_admin_arguments() {
    let args = CliArgs::parse_from([
        "vitrine",
        "create-admin",
        "--database-url",
        "postgres://example",
        "--email",
        "ana@acme.test",
        "--name",
        "Ana",
        "--password",
        "correct-horse",
    ]);

    match args.command.expect("create-admin command") {
        Command::CreateAdmin(create) => {
            assert_eq!(
                create.database.database_url.as_deref(),
                Some("postgres://example")
            );
            assert_eq!(create.email, "ana@acme.test");
            assert_eq!(create.name, "Ana");
            assert_eq!(create.password, "correct-horse");
        }
        other => panic!("wrong command parsed: {other:?}"),
    }
}

#[test]
fn upload_prefix_must_be_a_local_path() {
    for prefix in ["media", "https://cdn.example.com", "/a//b", "/{file}"] {
        let mut raw = RawSettings::default();
        raw.uploads.public_prefix = Some(prefix.to_string());
        assert!(
            matches!(
                Settings::from_raw(raw),
                Err(LoadError::Invalid {
                    key: "uploads.public_prefix",
                    ..
                })
            ),
            "{prefix} should be rejected"
        );
    }

    let mut raw = RawSettings::default();
    raw.uploads.public_prefix = Some("/static/media/".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.uploads.public_prefix, "/static/media");
}
