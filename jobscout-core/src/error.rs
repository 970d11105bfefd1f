use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Scheduler error: {message}")]
    Scheduler { message: String },
}

/// Failure to obtain a rendered page for one search query.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Request timeout")]
    RequestTimeout,

    #[error("Network failure: {reason}")]
    Network { reason: String },

    #[error("Gateway returned status {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("Invalid target URL: {url}")]
    InvalidTargetUrl { url: String },
}

/// Failure to persist a batch of listings. The whole batch is considered unsaved.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Migration failed: {migration}")]
    MigrationFailed { migration: String },

    #[error("Insert rejected with status {status_code}: {message}")]
    Rejected { status_code: u16, message: String },

    #[error("Network failure: {reason}")]
    Network { reason: String },

    #[error("Invalid response: {details}")]
    InvalidResponse { details: String },

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("No storage configured: set SUPABASE_URL and SUPABASE_ANON_KEY, or DATABASE_URL")]
    MissingStorage,

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
