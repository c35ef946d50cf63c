use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the Vitrine binary.
#[derive(Debug, Parser)]
#[command(name = "vitrine", version, about = "Vitrine marketing-site content server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "VITRINE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server (public façade and admin API).
    Serve(Box<ServeArgs>),
    /// Create an admin account, or reset the password of an existing one.
    #[command(name = "create-admin")]
    CreateAdmin(CreateAdminArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the admin session lifetime.
    #[arg(long = "auth-session-ttl-seconds", value_name = "SECONDS")]
    pub session_ttl_seconds: Option<u64>,

    /// Override the uploads directory.
    #[arg(long = "uploads-directory", value_name = "PATH")]
    pub uploads_directory: Option<PathBuf>,

    /// Override the maximum request size for uploads in bytes.
    #[arg(long = "uploads-max-request-bytes", value_name = "BYTES")]
    pub uploads_max_request_bytes: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct CreateAdminArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Login email of the admin.
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Display name of the admin.
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Password to set; prefer the environment variable over the flag.
    #[arg(long, env = "VITRINE_ADMIN_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub password: String,
}
