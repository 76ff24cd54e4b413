use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINTS: [&str; 4] = [
    "https://api.deathwing.me",
    "https://api.hive.blog",
    "https://hive-api.arcange.eu",
    "https://api.openhive.network",
];

pub const DEFAULT_BENEFICIARY_ACCOUNT: &str = "commentrewarder";
pub const DEFAULT_MIN_BENEFICIARY_WEIGHT: u16 = 300;
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Ten years; keeps the cutoff arithmetic far from overflow.
pub const MAX_WINDOW_HOURS: i64 = 87_600;

/// Upper bound the feed API accepts for `limit`.
pub const MAX_PAGE_LIMIT: u32 = 20;

/// Basis points representing a 100% share.
pub const FULL_WEIGHT: u16 = 10_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub endpoints: Vec<String>,
    pub beneficiary_account: String,
    pub min_beneficiary_weight: u16,
    pub window_hours: i64,
    pub tag: String,
    pub observer: String,
    pub page_limit: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub post_link_base: String,
    pub log_file: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            beneficiary_account: DEFAULT_BENEFICIARY_ACCOUNT.to_string(),
            min_beneficiary_weight: DEFAULT_MIN_BENEFICIARY_WEIGHT,
            window_hours: DEFAULT_WINDOW_HOURS,
            tag: String::new(),
            observer: String::new(),
            page_limit: MAX_PAGE_LIMIT,
            request_timeout_secs: 30,
            user_agent: concat!("commentrewarder/", env!("CARGO_PKG_VERSION")).to_string(),
            post_link_base: "https://www.peakd.com".to_string(),
            log_file: PathBuf::from("main.log"),
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => ConfigError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => ConfigError::ValidationFailed {
                reason: format!("cannot read {}: {}", path.display(), e),
            },
        })?;

        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::MissingField {
                field: "endpoints".to_string(),
            });
        }

        for endpoint in &self.endpoints {
            let parsed = url::Url::parse(endpoint).map_err(|_| ConfigError::InvalidValue {
                field: "endpoints".to_string(),
                value: endpoint.clone(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    field: "endpoints".to_string(),
                    value: endpoint.clone(),
                });
            }
        }

        if self.beneficiary_account.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "beneficiary_account".to_string(),
            });
        }

        if self.min_beneficiary_weight == 0 || self.min_beneficiary_weight > FULL_WEIGHT {
            return Err(ConfigError::InvalidValue {
                field: "min_beneficiary_weight".to_string(),
                value: self.min_beneficiary_weight.to_string(),
            });
        }

        if self.window_hours <= 0 || self.window_hours > MAX_WINDOW_HOURS {
            return Err(ConfigError::InvalidValue {
                field: "window_hours".to_string(),
                value: self.window_hours.to_string(),
            });
        }

        if self.page_limit == 0 || self.page_limit > MAX_PAGE_LIMIT {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "page_limit must be between 1 and {}, got {}",
                    MAX_PAGE_LIMIT, self.page_limit
                ),
            });
        }

        Ok(())
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.window_hours)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
