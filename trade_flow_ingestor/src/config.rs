//! TOML configuration for the providers.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working setup against the public endpoints:
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//!
//! [cafef]
//! foreign_page_size = 2000
//! self_page_size = 1000
//! max_pages = 500
//!
//! [smoney]
//! base_url = "https://smoney.com.vn"
//! ```
//!
//! Lookup order for the file: explicit path, then `TRADE_FLOW_CONFIG`.
//! `TRADE_FLOW_USER_AGENT` and `TRADE_FLOW_TIMEOUT_SECS` override the file.

use std::{fs, num::NonZeroU32, path::Path};

use serde::{Deserialize, Serialize};
use shared_utils::env::{EnvVarError, get_optional_env_var};
use thiserror::Error;
use tracing::{debug, error};

pub const CONFIG_PATH_ENV: &str = "TRADE_FLOW_CONFIG";
pub const USER_AGENT_ENV: &str = "TRADE_FLOW_USER_AGENT";
pub const TIMEOUT_ENV: &str = "TRADE_FLOW_TIMEOUT_SECS";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Env(#[from] EnvVarError),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestorConfig {
    pub http: HttpConfig,
    pub cafef: CafefConfig,
    pub smoney: SmoneyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout. Timeouts are not retried.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CafefConfig {
    pub base_url: String,
    pub referer: String,
    pub foreign_page_size: u32,
    /// Proprietary history is shorter, so smaller pages are enough.
    pub self_page_size: u32,
    /// Ceiling on requests per collection; unset means page until the end.
    pub max_pages: Option<NonZeroU32>,
}

impl Default for CafefConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cafef.vn/du-lieu/Ajax/PageNew/DataHistory".to_string(),
            referer: "https://cafef.vn/".to_string(),
            foreign_page_size: 2000,
            self_page_size: 1000,
            max_pages: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoneyConfig {
    pub base_url: String,
}

impl Default for SmoneyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://smoney.com.vn".to_string(),
        }
    }
}

/// Reads and parses a config file.
pub fn read_config(config_path: impl AsRef<Path>) -> Result<IngestorConfig, ConfigError> {
    let path = config_path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| {
        error!("Failed to read config file {}: {source}", path.display());
        ConfigError::Read {
            path: path.display().to_string(),
            source,
        }
    })?;

    toml::from_str(&content).map_err(|source| {
        error!("Failed to parse config file {}: {source}", path.display());
        ConfigError::Parse {
            path: path.display().to_string(),
            source,
        }
    })
}

/// Resolves the effective configuration: file (explicit or from the
/// environment), falling back to defaults, then environment overrides.
pub fn load_config(config_path: Option<&str>) -> Result<IngestorConfig, ConfigError> {
    let path = match config_path {
        Some(p) => Some(p.to_string()),
        None => get_optional_env_var(CONFIG_PATH_ENV)?,
    };

    let mut config = match &path {
        Some(p) => {
            debug!(path = %p, "loading config file");
            read_config(p)?
        }
        None => IngestorConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut IngestorConfig) -> Result<(), ConfigError> {
    if let Some(agent) = get_optional_env_var(USER_AGENT_ENV)? {
        config.http.user_agent = agent;
    }
    if let Some(raw) = get_optional_env_var(TIMEOUT_ENV)? {
        config.http.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: TIMEOUT_ENV.to_string(),
            value: raw.clone(),
        })?;
    }
    Ok(())
}
