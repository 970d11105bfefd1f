use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Gateway(e) => {
                error!("Gateway error details: {:?}", e);
            }
            CoreError::Storage(e) => {
                error!("Storage error details: {:?}", e);
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

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Gateway(e) => e.user_friendly_message(),
            CoreError::Storage(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            CoreError::Scheduler { message } => {
                format!("The daily schedule could not be set up: {}", message)
            }
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Gateway(_) => "GATEWAY".to_string(),
            CoreError::Storage(_) => "STORAGE".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Scheduler { .. } => "SCHEDULER".to_string(),
        }
    }
}

impl ErrorExt for GatewayError {
    fn log_error(&self) -> &Self {
        error!("GatewayError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("GatewayError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            GatewayError::RequestTimeout => {
                "The scraping gateway did not answer in time.".to_string()
            }
            GatewayError::Network { .. } => {
                "Could not reach the scraping gateway. Please check your connection.".to_string()
            }
            GatewayError::Status { status_code, .. } if matches!(*status_code, 401 | 403) => {
                "The scraping gateway rejected the API key. Please check SCRAPER_API_KEY.".to_string()
            }
            GatewayError::Status { status_code, .. } => {
                format!("The scraping gateway answered with status {}.", status_code)
            }
            GatewayError::InvalidTargetUrl { url } => {
                format!("Could not build a search page URL from '{}'.", url)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            GatewayError::RequestTimeout => "GATEWAY_TIMEOUT".to_string(),
            GatewayError::Network { .. } => "GATEWAY_NETWORK".to_string(),
            GatewayError::Status { .. } => "GATEWAY_STATUS".to_string(),
            GatewayError::InvalidTargetUrl { .. } => "GATEWAY_INVALID_URL".to_string(),
        }
    }
}

impl ErrorExt for StorageError {
    fn log_error(&self) -> &Self {
        error!("StorageError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("StorageError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            StorageError::ConnectionFailed { .. } => {
                "Database connection failed. Please check the storage credentials.".to_string()
            }
            StorageError::MigrationFailed { migration } => {
                format!("Database migration '{}' failed.", migration)
            }
            StorageError::Rejected { message, .. } => {
                format!("The database rejected the listings: {}", message)
            }
            StorageError::Network { .. } => {
                "Could not reach the database service.".to_string()
            }
            StorageError::InvalidResponse { .. } => {
                "The database service returned an unexpected response.".to_string()
            }
            StorageError::Sql(_) => "A database query failed.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            StorageError::ConnectionFailed { .. } => "STORAGE_CONNECTION_FAILED".to_string(),
            StorageError::MigrationFailed { .. } => "STORAGE_MIGRATION_FAILED".to_string(),
            StorageError::Rejected { .. } => "STORAGE_REJECTED".to_string(),
            StorageError::Network { .. } => "STORAGE_NETWORK".to_string(),
            StorageError::InvalidResponse { .. } => "STORAGE_INVALID_RESPONSE".to_string(),
            StorageError::Sql(_) => "STORAGE_SQL".to_string(),
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

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' was not found.", path)
            }
            ConfigError::MissingField { field } => {
                format!("Required setting '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, value } => {
                format!("Setting '{}' has an invalid value '{}'.", field, value)
            }
            ConfigError::MissingStorage => {
                "No database configured. Set SUPABASE_URL and SUPABASE_ANON_KEY, or DATABASE_URL."
                    .to_string()
            }
            ConfigError::Parse(_) => "The configuration file could not be parsed.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::MissingStorage => "CONFIG_MISSING_STORAGE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
            info!("Error code: {}", error.error_code());
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
