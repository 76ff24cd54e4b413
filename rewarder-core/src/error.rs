use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Hive API error: {0}")]
    HiveApi(#[from] HiveApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone)]
pub enum HiveApiError {
    #[error("API endpoint unavailable: {endpoint} (status {status_code})")]
    EndpointUnavailable { endpoint: String, status_code: u16 },

    #[error("No API endpoint produced a usable response ({attempted} attempted)")]
    AllEndpointsFailed { attempted: usize },

    #[error("No API endpoints configured")]
    NoEndpointsConfigured,

    #[error("Invalid API response for {method}: {details}")]
    InvalidResponse { method: String, details: String },

    #[error("RPC error {code} from {method}: {message}")]
    RpcError {
        method: String,
        code: i64,
        message: String,
    },

    #[error("Missing field in API response: {field}")]
    MissingField { field: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Permission denied accessing config: {path}")]
    PermissionDenied { path: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
