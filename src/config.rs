use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::info;

const CONFIG_DIR: &str = "config";
const DEFAULT_ENV: &str = "development";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    #[error("configuration load error: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Comma-separated list of allowed CORS origins; unset means permissive
    /// in development and an error in production.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
    /// Storage location assigned to goods received with an unknown location code.
    #[serde(default = "default_location")]
    pub default_location: String,
    /// Role receiving approved-request notifications.
    #[serde(default = "default_dispatch_notify_role")]
    pub dispatch_notify_role: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_true() -> bool {
    true
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    10
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_location() -> String {
    "FG-A1".to_string()
}
fn default_dispatch_notify_role() -> String {
    "FinishedGoodsStoreManager".to_string()
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
            || self.environment.eq_ignore_ascii_case("test")
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn validate(&self) -> Result<(), AppConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(AppConfigError::Validation(
                "database_url must not be empty".into(),
            ));
        }
        if self.db_min_connections > self.db_max_connections {
            return Err(AppConfigError::Validation(format!(
                "db_min_connections ({}) exceeds db_max_connections ({})",
                self.db_min_connections, self.db_max_connections
            )));
        }
        Ok(())
    }
}

/// Load configuration from built-in defaults, optional `config/*.toml`
/// profiles, and `APP__`-prefixed environment variables (highest priority).
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let builder = Config::builder()
        .set_default("database_url", "sqlite://fgstore.db?mode=rwc")?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false));

    let config = builder
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}

/// Initialize the global tracing subscriber. Honors RUST_LOG when set,
/// otherwise derives a directive from the configured level.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("fgstore_api={},tower_http=info", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::try_new(filter_directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if json {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init();
    }
}
