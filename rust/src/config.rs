use std::path::{Path, PathBuf};
use std::time::Duration;

use hub_protocol::DEFAULT_OPERATOR_NAME;
use serde::{Deserialize, Serialize};

use crate::bot_format::default_bot_identities;

pub const CONFIG_FILE_NAME: &str = "hub_config.json";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_CHANNEL: &str = "general";
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid base_url `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub base_url: String,
    pub channel_id: String,
    /// Name outbound messages are sent under.
    pub operator_name: String,
    /// Sender names or ids whose messages render as bullet lists.
    pub bot_identities: Vec<String>,
    pub log_filter: String,
    pub request_timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            channel_id: DEFAULT_CHANNEL.to_string(),
            operator_name: DEFAULT_OPERATOR_NAME.to_string(),
            bot_identities: default_bot_identities(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl HubConfig {
    /// Read `hub_config.json` from `data_dir` (absent file means defaults),
    /// then apply `HUB_*` environment overrides.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<HubConfig>(&raw)
                .map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config: no file, using defaults");
                HubConfig::default()
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("HUB_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = non_empty("HUB_CHANNEL") {
            self.channel_id = v;
        }
        if let Some(v) = non_empty("HUB_OPERATOR_NAME") {
            self.operator_name = v;
        }
        if let Some(v) = non_empty("HUB_LOG") {
            self.log_filter = v;
        }
        if let Some(v) = non_empty("HUB_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn default_config_json() -> String {
    serde_json::to_string_pretty(&HubConfig::default()).unwrap_or_else(|_| "{}".to_string())
}
