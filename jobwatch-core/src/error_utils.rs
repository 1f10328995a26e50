use crate::error::*;
use std::time::Duration;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn retry_after(&self) -> Option<Duration>;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Scrape(e) => {
                error!("Job board error details: {:?}", e);
            }
            CoreError::Store(e) => {
                error!("Listing store error details: {:?}", e);
            }
            CoreError::Forum(e) => {
                error!("Forum error details: {:?}", e);
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

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Scrape(e) => e.is_retryable(),
            CoreError::Store(e) => e.is_retryable(),
            CoreError::Forum(e) => e.is_retryable(),
            CoreError::Network(_) => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::Scrape(e) => e.retry_after(),
            CoreError::Store(e) => e.retry_after(),
            CoreError::Forum(e) => e.retry_after(),
            _ if self.is_retryable() => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Scrape(_) => "SCRAPE".to_string(),
            CoreError::Store(_) => "STORE".to_string(),
            CoreError::Dataset(_) => "DATASET".to_string(),
            CoreError::Forum(_) => "FORUM".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for ScrapeError {
    fn log_error(&self) -> &Self {
        error!("ScrapeError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ScrapeError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::RateLimitExceeded { .. } => true,
            ScrapeError::RequestTimeout => true,
            ScrapeError::ServerError { status_code } => *status_code >= 500,
            ScrapeError::PageUnavailable { .. } => false,
            ScrapeError::InvalidPage { .. } => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ScrapeError::RateLimitExceeded { retry_after } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ if self.is_retryable() => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn error_code(&self) -> String {
        match self {
            ScrapeError::RateLimitExceeded { .. } => "SCRAPE_RATE_LIMIT".to_string(),
            ScrapeError::PageUnavailable { .. } => "SCRAPE_PAGE_UNAVAILABLE".to_string(),
            ScrapeError::InvalidPage { .. } => "SCRAPE_INVALID_PAGE".to_string(),
            ScrapeError::RequestTimeout => "SCRAPE_TIMEOUT".to_string(),
            ScrapeError::ServerError { .. } => "SCRAPE_SERVER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for StoreError {
    fn log_error(&self) -> &Self {
        error!("StoreError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("StoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        matches!(self, StoreError::ConnectionFailed { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        if self.is_retryable() {
            Some(Duration::from_secs(1))
        } else {
            None
        }
    }

    fn error_code(&self) -> String {
        match self {
            StoreError::ConnectionFailed { .. } => "STORE_CONNECTION_FAILED".to_string(),
            StoreError::MigrationFailed { .. } => "STORE_MIGRATION_FAILED".to_string(),
            StoreError::InvalidDate { .. } => "STORE_INVALID_DATE".to_string(),
            StoreError::UnknownStatus { .. } => "STORE_UNKNOWN_STATUS".to_string(),
            StoreError::Sql(_) => "STORE_SQL_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ForumError {
    fn log_error(&self) -> &Self {
        error!("ForumError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ForumError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            ForumError::RateLimitExceeded { .. } => true,
            ForumError::RequestTimeout => true,
            ForumError::ServerError { status_code } => *status_code >= 500,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ForumError::RateLimitExceeded { retry_after } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ if self.is_retryable() => Some(Duration::from_secs(30)),
            _ => None,
        }
    }

    fn error_code(&self) -> String {
        match self {
            ForumError::AuthenticationFailed { .. } => "FORUM_AUTH_FAILED".to_string(),
            ForumError::RateLimitExceeded { .. } => "FORUM_RATE_LIMIT".to_string(),
            ForumError::Forbidden { .. } => "FORUM_FORBIDDEN".to_string(),
            ForumError::CsrfUnavailable => "FORUM_CSRF_UNAVAILABLE".to_string(),
            ForumError::TopicRejected { .. } => "FORUM_TOPIC_REJECTED".to_string(),
            ForumError::InvalidResponse { .. } => "FORUM_INVALID_RESPONSE".to_string(),
            ForumError::RequestTimeout => "FORUM_TIMEOUT".to_string(),
            ForumError::ServerError { .. } => "FORUM_SERVER_ERROR".to_string(),
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

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::MissingEnvironmentVariable { .. } => "CONFIG_MISSING_ENV_VAR".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
        }
    }
}

pub async fn retry_with_backoff<F, Fut, T>(
    operation_name: &str,
    max_retries: usize,
    initial_delay: Duration,
    mut operation: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, CoreError>>,
{
    let mut attempt = 0;
    let mut delay = initial_delay;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if attempt >= max_retries || !error.is_retryable() {
                    return Err(error);
                }

                if let Some(retry_delay) = error.retry_after() {
                    delay = retry_delay;
                }

                info!(
                    "Retrying {} (attempt {}/{}) after {:?}",
                    operation_name,
                    attempt + 1,
                    max_retries,
                    delay
                );

                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(60)); // Exponential backoff with max 60s
                attempt += 1;
            }
        }
    }
}
