//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::num::NonZeroU64;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::CacheConfig;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "comanda";
const DEFAULT_TENANT_ID: &str = "default";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PREFERENCES_PATH: &str = "comanda-prefs.toml";
const DEFAULT_REFRESH_INVENTORY_SECS: u64 = 60;
const DEFAULT_REFRESH_ORDERS_SECS: u64 = 120;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientSettings,
    pub cache: CacheConfig,
    pub refresh: RefreshSettings,
    pub logging: LoggingSettings,
    pub preferences_path: PathBuf,
}

/// Connection settings for the operations backend.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub tenant_id: String,
    /// Path to a file containing the bearer token; absent means anonymous.
    pub api_key_file: Option<PathBuf>,
    pub request_timeout: Duration,
}

/// Auto-refresh cadences for long-lived dashboard views.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub inventory: Duration,
    pub orders: Duration,
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

/// CLI-supplied overrides, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ClientOverrides {
    pub base_url: Option<String>,
    pub tenant_id: Option<String>,
    pub api_key_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
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
pub fn load(overrides: &ClientOverrides) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("COMANDA").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    client: RawClientSettings,
    cache: CacheConfig,
    refresh: RawRefreshSettings,
    logging: RawLoggingSettings,
    preferences: RawPreferenceSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ClientOverrides) {
        if let Some(base_url) = overrides.base_url.as_ref() {
            self.client.base_url = Some(base_url.clone());
        }
        if let Some(tenant_id) = overrides.tenant_id.as_ref() {
            self.client.tenant_id = Some(tenant_id.clone());
        }
        if let Some(key_file) = overrides.api_key_file.as_ref() {
            self.client.api_key_file = Some(key_file.clone());
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawClientSettings {
    base_url: Option<String>,
    tenant_id: Option<String>,
    api_key_file: Option<PathBuf>,
    request_timeout_secs: Option<NonZeroU64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRefreshSettings {
    inventory_secs: Option<NonZeroU64>,
    orders_secs: Option<NonZeroU64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPreferenceSettings {
    path: Option<PathBuf>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let base_url = raw
            .client
            .base_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                LoadError::invalid(
                    "client.base_url",
                    "missing; set it in comanda.toml, COMANDA__CLIENT__BASE_URL, or --site",
                )
            })?;

        let client = ClientSettings {
            base_url,
            tenant_id: raw
                .client
                .tenant_id
                .filter(|tenant| !tenant.is_empty())
                .unwrap_or_else(|| DEFAULT_TENANT_ID.to_string()),
            api_key_file: raw.client.api_key_file,
            request_timeout: Duration::from_secs(
                raw.client
                    .request_timeout_secs
                    .map_or(DEFAULT_REQUEST_TIMEOUT_SECS, NonZeroU64::get),
            ),
        };

        let refresh = RefreshSettings {
            inventory: Duration::from_secs(
                raw.refresh
                    .inventory_secs
                    .map_or(DEFAULT_REFRESH_INVENTORY_SECS, NonZeroU64::get),
            ),
            orders: Duration::from_secs(
                raw.refresh
                    .orders_secs
                    .map_or(DEFAULT_REFRESH_ORDERS_SECS, NonZeroU64::get),
            ),
        };

        let logging = build_logging_settings(raw.logging)?;

        Ok(Self {
            client,
            cache: raw.cache,
            refresh,
            logging,
            preferences_path: raw
                .preferences
                .path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH)),
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level.as_deref() {
        None => LevelFilter::INFO,
        Some(raw) => raw
            .parse::<LevelFilter>()
            .map_err(|e| LoadError::invalid("logging.level", e.to_string()))?,
    };
    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    Ok(LoggingSettings { level, format })
}
