use std::collections::HashSet;
use std::time::Duration;

use jobwatch_core::{identity, retry_with_backoff, CoreError, JobBoardConfig, Posting, ScrapeError};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::extract;

#[derive(Debug)]
pub struct JobBoardClient {
    http_client: Client,
    config: JobBoardConfig,
}

impl JobBoardClient {
    pub fn new(config: JobBoardConfig) -> Self {
        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            config,
        }
    }

    /// Walk the listing pages until one stops yielding postings we have not
    /// already collected this run. Cross-page duplicates (overlapping
    /// pagination) are dropped by key, first occurrence wins.
    pub async fn fetch_all_postings(&self) -> Result<Vec<Posting>, CoreError> {
        let mut postings = Vec::new();
        let mut seen_keys = HashSet::new();

        for page in 1..=self.config.max_pages {
            let html = retry_with_backoff(
                "fetch listing page",
                3,
                Duration::from_secs(2),
                || self.fetch_page(page),
            )
            .await?;

            let page_postings = extract::extract_postings(&html, &self.config.listing_url)?;
            let mut new_on_page = 0;
            for posting in page_postings {
                let key = identity::key_for(&posting);
                if seen_keys.insert(key) {
                    postings.push(posting);
                    new_on_page += 1;
                }
            }

            info!(
                page,
                new_on_page,
                total = postings.len(),
                "Scraped listing page"
            );

            if new_on_page == 0 {
                debug!("No new postings on page {page}, stopping pagination");
                break;
            }
        }

        Ok(postings)
    }

    async fn fetch_page(&self, page: u32) -> Result<String, CoreError> {
        let url = self.page_url(page);
        debug!(%url, "Fetching listing page");

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    return Err(CoreError::Scrape(ScrapeError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(60);
            warn!(retry_after, "Job board rate limited the scrape");
            return Err(CoreError::Scrape(ScrapeError::RateLimitExceeded {
                retry_after,
            }));
        }
        if status.is_server_error() {
            return Err(CoreError::Scrape(ScrapeError::ServerError {
                status_code: status.as_u16(),
            }));
        }
        if !status.is_success() {
            return Err(CoreError::Scrape(ScrapeError::PageUnavailable { url }));
        }

        response.text().await.map_err(CoreError::Network)
    }

    fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.config.listing_url.clone()
        } else {
            format!("{}?page={}", self.config.listing_url, page)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JobBoardConfig {
        JobBoardConfig {
            listing_url: "https://example.com/jobs/crewai".to_string(),
            user_agent: "jobwatch-test/0.1".to_string(),
            max_pages: 5,
        }
    }

    #[test]
    fn first_page_uses_the_bare_listing_url() {
        let client = JobBoardClient::new(config());
        assert_eq!(client.page_url(1), "https://example.com/jobs/crewai");
    }

    #[test]
    fn later_pages_carry_the_page_parameter() {
        let client = JobBoardClient::new(config());
        assert_eq!(client.page_url(3), "https://example.com/jobs/crewai?page=3");
    }
}
