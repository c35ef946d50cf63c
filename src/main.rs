use std::{process, sync::Arc};

use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use vitrine::{
    application::{
        admin::{
            banners::AdminBannerService, content::AdminContentService,
            dashboard::AdminDashboardService, help::AdminHelpService,
            segments::AdminSegmentService, solution_pages::AdminSolutionPageService,
            solutions::AdminSolutionService, stats::AdminStatService,
        },
        auth::{AuthService, provision_admin},
        error::AppError,
        site::{SiteRepos, SiteService},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState, HttpState, RouterState},
        telemetry,
        uploads::UploadStorage,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::CreateAdmin(args) => run_create_admin(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let jwt_secret = settings
        .auth
        .jwt_secret
        .clone()
        .ok_or_else(|| InfraError::configuration("auth.jwt_secret is not configured"))?;
    let repositories = init_repositories(&settings).await?;
    let router_state = build_router_state(repositories, &settings, &jwt_secret)?;

    let upload_body_limit = usize::try_from(settings.uploads.max_request_bytes.get())
        .map_err(|_| AppError::validation("uploads.max_request_bytes exceeds usize"))?;
    let router = http::build_router(router_state, upload_body_limit);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(addr = %settings.server.addr, "vitrine listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!("vitrine stopped");
    Ok(())
}

async fn run_create_admin(
    settings: config::Settings,
    args: config::CreateAdminArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let identity = provision_admin(
        repositories.as_ref(),
        &args.email,
        &args.name,
        &args.password,
    )
    .await?;

    info!(
        admin_id = identity.id,
        email = %identity.email,
        "admin account ready"
    );
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_router_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
    jwt_secret: &str,
) -> Result<RouterState, AppError> {
    let upload_storage = Arc::new(
        UploadStorage::new(
            settings.uploads.directory.clone(),
            &settings.uploads.public_prefix,
        )
        .map_err(|err| AppError::from(InfraError::from(err)))?,
    );

    let auth = AuthService::new(
        repositories.clone(),
        jwt_secret,
        settings.auth.session_ttl,
    )?;

    let site = SiteService::new(SiteRepos {
        content: repositories.clone(),
        settings: repositories.clone(),
        solutions: repositories.clone(),
        segments: repositories.clone(),
        stats: repositories.clone(),
        banners: repositories.clone(),
        solution_pages: repositories.clone(),
        help: repositories.clone(),
        help_writer: repositories.clone(),
    });

    let api = ApiState {
        auth: Arc::new(auth),
        content: Arc::new(AdminContentService::new(
            repositories.clone(),
            repositories.clone(),
        )),
        solutions: Arc::new(AdminSolutionService::new(repositories.clone())),
        segments: Arc::new(AdminSegmentService::new(repositories.clone())),
        stats: Arc::new(AdminStatService::new(repositories.clone())),
        banners: Arc::new(AdminBannerService::new(repositories.clone())),
        solution_pages: Arc::new(AdminSolutionPageService::new(repositories.clone())),
        help: Arc::new(AdminHelpService::new(
            repositories.clone(),
            repositories.clone(),
        )),
        dashboard: Arc::new(AdminDashboardService::new(
            repositories.clone(),
            repositories.clone(),
            repositories.clone(),
            repositories.clone(),
            repositories.clone(),
            repositories.clone(),
            repositories.clone(),
            repositories.clone(),
        )),
        upload_storage: upload_storage.clone(),
    };

    let http = HttpState {
        site: Arc::new(site),
        db: repositories,
        upload_storage,
    };

    Ok(RouterState { http, api })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
