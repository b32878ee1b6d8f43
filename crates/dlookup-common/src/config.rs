//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables everywhere else.
//! Config precedence: env vars > .env file > dlookup.toml (or an explicit path) > defaults

use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

/// Default directory lookup endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-lookup.dartmouth.edu/v1/lookup";

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration from the environment.
///
/// Should be called once at startup. `path` overrides the default optional
/// `dlookup.toml` in the working directory; an explicit path must exist.
pub fn init(path: Option<&Path>) -> Result<&'static AppConfig, config::ConfigError> {
    if let Some(existing) = CONFIG.get() {
        return Ok(existing);
    }
    let app_config = load(path)?;
    Ok(CONFIG.get_or_init(|| app_config))
}

/// Build a configuration without touching the global slot.
pub fn load(path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let file_source = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name("dlookup").required(false),
    };

    let cfg = config::Config::builder()
        // Defaults
        .set_default("lookup.base_url", DEFAULT_BASE_URL)?
        .set_default("lookup.timeout_secs", 10)?
        .set_default(
            "lookup.user_agent",
            concat!("dlookup/", env!("CARGO_PKG_VERSION")),
        )?
        .set_default("log.filter", "dlookup=info")?
        .add_source(file_source)
        // Environment variables (DLOOKUP__LOOKUP__BASE_URL, DLOOKUP__LOG__FILTER, etc.)
        .add_source(
            config::Environment::with_prefix("DLOOKUP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub lookup: LookupConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    /// Lookup endpoint; query parameters are appended per request.
    pub base_url: String,
    /// Whole-request timeout for the HTTP client.
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 10,
            user_agent: concat!("dlookup/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}
