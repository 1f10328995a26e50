use jobwatch_core::{
    retry_with_backoff, ConfigError, CoreError, DatasetError, ErrorExt, ForumError, ScrapeError,
    StoreError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_error_codes() {
    let scrape_error = CoreError::Scrape(ScrapeError::RequestTimeout);
    assert_eq!(scrape_error.error_code(), "SCRAPE");

    let store_error = CoreError::Store(StoreError::UnknownStatus {
        value: "Paused".to_string(),
    });
    assert_eq!(store_error.error_code(), "STORE");

    let dataset_error = CoreError::Dataset(DatasetError::DuplicateKey {
        key: "a1".to_string(),
    });
    assert_eq!(dataset_error.error_code(), "DATASET");

    let forum_error = CoreError::Forum(ForumError::CsrfUnavailable);
    assert_eq!(forum_error.error_code(), "FORUM");

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "DISCOURSE_API_KEY".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");
}

#[test]
fn test_retryable_errors() {
    let retryable = CoreError::Scrape(ScrapeError::RateLimitExceeded { retry_after: 60 });
    assert!(retryable.is_retryable());

    let server_error = CoreError::Forum(ForumError::ServerError { status_code: 503 });
    assert!(server_error.is_retryable());

    let non_retryable = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "DISCOURSE_API_KEY".to_string(),
    });
    assert!(!non_retryable.is_retryable());

    let corrupt_store = CoreError::Dataset(DatasetError::DuplicateKey {
        key: "a1".to_string(),
    });
    assert!(!corrupt_store.is_retryable());
}

#[test]
fn test_retry_after() {
    let rate_limited = CoreError::Scrape(ScrapeError::RateLimitExceeded { retry_after: 60 });
    assert_eq!(rate_limited.retry_after(), Some(Duration::from_secs(60)));

    let forum_rate_limited = CoreError::Forum(ForumError::RateLimitExceeded { retry_after: 30 });
    assert_eq!(
        forum_rate_limited.retry_after(),
        Some(Duration::from_secs(30))
    );

    let permanent = CoreError::Scrape(ScrapeError::PageUnavailable {
        url: "https://example.com/jobs".to_string(),
    });
    assert_eq!(permanent.retry_after(), None);
}

#[tokio::test]
async fn test_retry_with_backoff_recovers_from_transient_failures() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();

    let result = retry_with_backoff("test_operation", 3, Duration::from_millis(1), move || {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(CoreError::Scrape(ScrapeError::ServerError {
                    status_code: 500,
                }))
            } else {
                Ok(42)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_with_backoff_gives_up_on_permanent_errors() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();

    let result: Result<i32, CoreError> =
        retry_with_backoff("test_operation", 3, Duration::from_millis(1), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CoreError::Scrape(ScrapeError::PageUnavailable {
                    url: "https://example.com/jobs".to_string(),
                }))
            }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}
