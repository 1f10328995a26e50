use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Job board error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Listing store error: {0}")]
    Store(#[from] StoreError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Forum error: {0}")]
    Forum(#[from] ForumError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum ScrapeError {
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Listing page unavailable: {url}")]
    PageUnavailable { url: String },

    #[error("Invalid listing page: {details}")]
    InvalidPage { details: String },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Migration failed: {details}")]
    MigrationFailed { details: String },

    #[error("Invalid date in column {column}: {value:?}")]
    InvalidDate { column: String, value: String },

    #[error("Unknown status value: {value:?}")]
    UnknownStatus { value: String },

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

#[derive(Error, Debug, Clone)]
pub enum DatasetError {
    #[error("Duplicate posting key in stored dataset: {key}")]
    DuplicateKey { key: String },
}

#[derive(Error, Debug, Clone)]
pub enum ForumError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Forbidden access to resource: {resource}")]
    Forbidden { resource: String },

    #[error("CSRF token unavailable")]
    CsrfUnavailable,

    #[error("Topic rejected: {details}")]
    TopicRejected { details: String },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Environment variable not set: {var_name}")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}
