use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the inkpost binary.
#[derive(Debug, Parser)]
#[command(name = "inkpost", version, about = "Inkpost blog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "INKPOST_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the public HTTP service.
    Serve(Box<ServeArgs>),
    /// Read the live post store once and report which data source would serve pages.
    #[command(name = "check-store")]
    CheckStore,
    /// Apply the bundled migrations to a Postgres store.
    #[command(name = "migrate")]
    Migrate,
}

/// Live store connection overrides, accepted before or after any subcommand.
#[derive(Debug, Args, Default, Clone)]
pub struct StoreOverrides {
    /// Override the live store endpoint (REST base URL or Postgres connection string).
    #[arg(
        long = "store-url",
        env = "SUPABASE_URL",
        value_name = "URL",
        global = true
    )]
    pub store_url: Option<String>,

    /// Override the live store access key.
    #[arg(
        long = "store-key",
        env = "SUPABASE_ANON_KEY",
        value_name = "KEY",
        hide_env_values = true,
        global = true
    )]
    pub store_key: Option<String>,

    /// Override the live store backend (rest|postgres).
    #[arg(long = "store-backend", value_name = "BACKEND", global = true)]
    pub store_backend: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

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

    /// Override the live store read timeout.
    #[arg(long = "store-timeout-seconds", value_name = "SECONDS")]
    pub store_timeout_seconds: Option<u64>,

    /// Override the public site URL used for canonical and feed links.
    #[arg(long = "site-public-url", value_name = "URL")]
    pub site_public_url: Option<String>,
}
