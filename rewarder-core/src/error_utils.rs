use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_transient(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::HiveApi(e) => {
                error!("Hive API error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_transient(&self) -> bool {
        match self {
            CoreError::HiveApi(e) => e.is_transient(),
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::HiveApi(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::Serialization(_) => {
                "Received data could not be decoded. The report may be incomplete.".to_string()
            }
            CoreError::Io(_) => "A local file could not be read or written.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::HiveApi(_) => "HIVE_API".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
        }
    }
}

impl ErrorExt for HiveApiError {
    fn log_error(&self) -> &Self {
        error!("HiveApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("HiveApiError (warning): {}", self);
        self
    }

    fn is_transient(&self) -> bool {
        matches!(
            self,
            HiveApiError::EndpointUnavailable { .. } | HiveApiError::AllEndpointsFailed { .. }
        )
    }

    fn user_friendly_message(&self) -> String {
        match self {
            HiveApiError::EndpointUnavailable { endpoint, .. } => {
                format!("{} is temporarily unavailable.", endpoint)
            }
            HiveApiError::AllEndpointsFailed { attempted } => format!(
                "None of the {} configured Hive API nodes answered. Please try again later.",
                attempted
            ),
            HiveApiError::NoEndpointsConfigured => {
                "No Hive API nodes are configured.".to_string()
            }
            HiveApiError::InvalidResponse { method, .. } => format!(
                "The Hive API returned an unexpected response for {}. The report may be incomplete.",
                method
            ),
            HiveApiError::RpcError { message, .. } => {
                format!("The Hive API rejected the request: {}", message)
            }
            HiveApiError::MissingField { field } => format!(
                "The Hive API response is missing '{}'. The report may be incomplete.",
                field
            ),
        }
    }

    fn error_code(&self) -> String {
        match self {
            HiveApiError::EndpointUnavailable { .. } => "HIVE_ENDPOINT_UNAVAILABLE".to_string(),
            HiveApiError::AllEndpointsFailed { .. } => "HIVE_ALL_ENDPOINTS_FAILED".to_string(),
            HiveApiError::NoEndpointsConfigured => "HIVE_NO_ENDPOINTS".to_string(),
            HiveApiError::InvalidResponse { .. } => "HIVE_INVALID_RESPONSE".to_string(),
            HiveApiError::RpcError { .. } => "HIVE_RPC_ERROR".to_string(),
            HiveApiError::MissingField { .. } => "HIVE_MISSING_FIELD".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_transient(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => format!(
                "Configuration file not found at '{}'. Please check the path.",
                path
            ),
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::PermissionDenied { .. } => {
                "Permission denied accessing configuration. Please check file permissions."
                    .to_string()
            }
            _ => "Configuration error occurred. Please check your settings.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs a top-level failure with its code and user-facing message.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
        if error.is_transient() {
            info!("Failure is temporary, a later run may succeed");
        }
    }
}
