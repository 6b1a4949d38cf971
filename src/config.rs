//! Environment-driven configuration for the monitoring service.
//!
//! The configuration is read once in `main` and handed to every component
//! that needs it; nothing in the crate reads the environment afterwards.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::trace;

const AGENTS_OWNER: &str = "ALEPH_AGENTS_OWNER";
const AGENT_CHANNEL: &str = "ALEPH_AGENT_CHANNEL";
const LOG_LEVEL: &str = "LOG_LEVEL";
const LOG_FILE: &str = "LOG_FILE";
const API_URL: &str = "ALEPH_API_URL";
const SCHEDULER_URL: &str = "ALEPH_SCHEDULER_URL";
const MONITOR_ADDR: &str = "MONITOR_ADDR";
const MONITOR_PORT: &str = "MONITOR_PORT";
const HTTP_TIMEOUT_SECS: &str = "ALEPH_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "https://api2.aleph.im";
pub const DEFAULT_SCHEDULER_URL: &str = "https://scheduler.api.aleph.cloud";

const DEFAULT_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0));
const DEFAULT_PORT: u16 = 8000;

/// Matches the total timeout aiohttp applies when none is configured.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Immutable service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address whose instance messages are monitored
    pub owner: String,

    /// Channel filter; `None` queries every channel
    pub channel: Option<String>,

    pub log_level: LevelFilter,

    /// Append logs to this file instead of stderr
    pub log_file: Option<PathBuf>,

    /// Base URL of the Aleph message API
    pub api_url: String,

    /// Base URL of the Aleph scheduler
    pub scheduler_url: String,

    pub bind_addr: SocketAddr,

    /// Timeout applied to every upstream HTTP request
    pub http_timeout: Duration,
}

impl Config {
    /// Hydrates `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key).and_then(|value| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
        };

        let owner = get(AGENTS_OWNER).ok_or(ConfigError::MissingVar { key: AGENTS_OWNER })?;

        let log_level = get(LOG_LEVEL)
            .map(|level| parse_log_level(&level))
            .unwrap_or(LevelFilter::INFO);

        let addr = get(MONITOR_ADDR)
            .and_then(|addr| addr.parse().ok())
            .unwrap_or(DEFAULT_ADDR);
        let port = get(MONITOR_PORT)
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let http_timeout = get(HTTP_TIMEOUT_SECS)
            .and_then(|secs| secs.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let config = Self {
            owner,
            channel: get(AGENT_CHANNEL),
            log_level,
            log_file: get(LOG_FILE).map(PathBuf::from),
            api_url: get(API_URL)
                .map(trim_trailing_slash)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            scheduler_url: get(SCHEDULER_URL)
                .map(trim_trailing_slash)
                .unwrap_or_else(|| DEFAULT_SCHEDULER_URL.to_string()),
            bind_addr: SocketAddr::new(addr, port),
            http_timeout: Duration::from_secs(http_timeout),
        };

        trace!("loaded config: {config:?}");
        Ok(config)
    }
}

/// Maps a severity name onto a level filter, falling back to `INFO`.
///
/// Accepts `TRACE`, `DEBUG`, `INFO`, `WARN`/`WARNING` and `ERROR`/`CRITICAL`.
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "CRITICAL" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Loads `.env` from the working directory or one of its parents.
fn hydrate_env_file() -> Result<(), ConfigError> {
    tolerate_missing_env_file(dotenv::dotenv().map(|_| ()))
}

/// Loads the variables of the env file at `path`. A missing file is not an
/// error; a malformed one is.
pub fn hydrate_env_file_from(path: &Path) -> Result<(), ConfigError> {
    tolerate_missing_env_file(dotenv::from_path(path))
}

fn tolerate_missing_env_file(result: Result<(), dotenv::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err)),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{key}`")]
    MissingVar { key: &'static str },

    #[error("failed to load .env file: {0}")]
    Dotenv(#[source] dotenv::Error),
}
