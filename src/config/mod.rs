//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{fmt, net::SocketAddr, num::NonZeroU32, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use cli::{CliArgs, Command, ServeArgs, ServeOverrides, StoreOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "inkpost";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_STORE_TABLE: &str = "posts";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORE_MAX_CONNECTIONS: u32 = 4;
const MAX_TABLE_NAME_LEN: usize = 63;
const DEFAULT_SITE_TITLE: &str = "Personal Blog | Next.js + Supabase";
const DEFAULT_SITE_DESCRIPTION: &str = "A modern personal blog built with Next.js and Supabase.";
const DEFAULT_SITE_PUBLIC_URL: &str = "http://localhost:3000";
const DEFAULT_CONTACT_EMAIL: &str = "hello@example.com";

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Which adapter speaks to the live store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// PostgREST-compatible HTTP endpoint.
    #[default]
    Rest,
    /// Direct Postgres connection.
    Postgres,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Rest => "rest",
            StoreBackend::Postgres => "postgres",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rest" | "postgrest" | "supabase" => Ok(StoreBackend::Rest),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!(
                "unknown backend `{other}`; expected `rest` or `postgres`"
            )),
        }
    }
}

/// Live store connection settings. `url` and `key` are `None` when blank.
#[derive(Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub key: Option<String>,
    pub table: String,
    pub timeout: Duration,
    pub max_connections: NonZeroU32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: None,
            key: None,
            table: DEFAULT_STORE_TABLE.to_string(),
            timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            max_connections: NonZeroU32::new(DEFAULT_STORE_MAX_CONNECTIONS)
                .unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("backend", &self.backend)
            .field("url", &self.url)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
    /// Absolute base URL without a trailing slash.
    pub public_url: String,
    pub contact_email: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_SITE_TITLE.to_string(),
            description: DEFAULT_SITE_DESCRIPTION.to_string(),
            public_url: DEFAULT_SITE_PUBLIC_URL.to_string(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("INKPOST").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::CheckStore) | Some(Command::Migrate) | None => {}
    }
    raw.apply_store_overrides(&cli.store);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    store: RawStoreSettings,
    site: RawSiteSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(seconds) = overrides.store_timeout_seconds {
            self.store.timeout_seconds = Some(seconds);
        }
        if let Some(url) = overrides.site_public_url.as_ref() {
            self.site.public_url = Some(url.clone());
        }
    }

    fn apply_store_overrides(&mut self, overrides: &StoreOverrides) {
        if let Some(url) = overrides.store_url.as_ref() {
            self.store.url = Some(url.clone());
        }
        if let Some(key) = overrides.store_key.as_ref() {
            self.store.key = Some(key.clone());
        }
        if let Some(backend) = overrides.store_backend.as_ref() {
            self.store.backend = Some(backend.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            store,
            site,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let store = build_store_settings(store)?;
        let site = build_site_settings(site)?;

        Ok(Self {
            server,
            logging,
            store,
            site,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let backend = match store.backend.as_deref().and_then(non_blank) {
        Some(value) => StoreBackend::from_str(value)
            .map_err(|reason| LoadError::invalid("store.backend", reason))?,
        None => StoreBackend::default(),
    };

    let url = store.url.as_deref().and_then(non_blank).map(str::to_string);
    let key = store.key.as_deref().and_then(non_blank).map(str::to_string);

    let table = store
        .table
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(DEFAULT_STORE_TABLE)
        .to_string();
    validate_table_name(&table).map_err(|reason| LoadError::invalid("store.table", reason))?;

    let timeout_secs = store.timeout_seconds.unwrap_or(DEFAULT_STORE_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "store.timeout_seconds",
            "must be greater than zero",
        ));
    }

    let max_connections = non_zero_u32(
        store
            .max_connections
            .unwrap_or(DEFAULT_STORE_MAX_CONNECTIONS)
            .into(),
        "store.max_connections",
    )?;

    Ok(StoreSettings {
        backend,
        url,
        key,
        table,
        timeout: Duration::from_secs(timeout_secs),
        max_connections,
    })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let title = site
        .title
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(DEFAULT_SITE_TITLE)
        .to_string();
    let description = site
        .description
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(DEFAULT_SITE_DESCRIPTION)
        .to_string();

    let public_url = site
        .public_url
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(DEFAULT_SITE_PUBLIC_URL);
    let public_url = normalize_public_url(public_url)
        .map_err(|reason| LoadError::invalid("site.public_url", reason))?;

    let contact_email = site
        .contact_email
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(DEFAULT_CONTACT_EMAIL)
        .to_string();
    if !contact_email.contains('@') {
        return Err(LoadError::invalid(
            "site.contact_email",
            "must be an email address",
        ));
    }

    Ok(SiteSettings {
        title,
        description,
        public_url,
        contact_email,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    backend: Option<String>,
    url: Option<String>,
    key: Option<String>,
    table: Option<String>,
    timeout_seconds: Option<u64>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    description: Option<String>,
    public_url: Option<String>,
    contact_email: Option<String>,
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Table names are spliced into SQL and REST paths, so only plain identifiers pass.
fn validate_table_name(table: &str) -> Result<(), String> {
    if table.len() > MAX_TABLE_NAME_LEN {
        return Err(format!(
            "`{table}` exceeds {MAX_TABLE_NAME_LEN} characters"
        ));
    }

    let mut chars = table.chars();
    let starts_well = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    if !starts_well || !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(format!("`{table}` is not a plain identifier"));
    }

    Ok(())
}

fn normalize_public_url(value: &str) -> Result<String, String> {
    let parsed = Url::parse(value).map_err(|err| format!("`{value}` is not a URL: {err}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("`{value}` must use http or https"));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
