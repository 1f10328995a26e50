use std::time::Duration;

use jobwatch_core::{CoreError, DiscourseConfig, ForumError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

#[derive(Debug, Deserialize)]
struct CsrfResponse {
    csrf: String,
}

#[derive(Debug, Serialize)]
struct NewTopicRequest<'a> {
    title: &'a str,
    raw: &'a str,
    category: u32,
    tags: &'a [&'a str],
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPostResponse {
    topic_id: Option<u64>,
}

#[derive(Debug)]
pub struct DiscourseClient {
    http_client: Client,
    config: DiscourseConfig,
}

impl DiscourseClient {
    pub fn new(config: DiscourseConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            config,
        }
    }

    /// The CSRF token is tied to the session cookie the same client holds.
    async fn fetch_csrf_token(&self) -> Result<String, CoreError> {
        let url = format!("{}/session/csrf.json", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(CoreError::Network)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "CSRF token request failed");
            return Err(CoreError::Forum(ForumError::CsrfUnavailable));
        }

        let body: CsrfResponse = response
            .json()
            .await
            .map_err(|_| CoreError::Forum(ForumError::CsrfUnavailable))?;

        debug!("Fetched Discourse CSRF token");
        Ok(body.csrf)
    }

    /// Create the digest topic and return its URL.
    pub async fn publish_digest(&self, title: &str, raw: &str) -> Result<String, CoreError> {
        let csrf_token = self.fetch_csrf_token().await?;
        let url = format!("{}/posts.json", self.config.base_url);

        let request = NewTopicRequest {
            title,
            raw,
            category: self.config.category_id,
            tags: &["jobs", "automated"],
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        info!(
            category = self.config.category_id,
            "Creating Discourse topic"
        );
        let response = self
            .http_client
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .header("Api-Username", &self.config.api_username)
            .header("X-CSRF-Token", csrf_token)
            .json(&request)
            .send()
            .await
            .map_err(CoreError::Network)?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(60);
            warn!(retry_after, "Discourse rate limited the topic creation");
            return Err(CoreError::Forum(ForumError::RateLimitExceeded {
                retry_after,
            }));
        }
        if status.as_u16() == 401 {
            return Err(CoreError::Forum(ForumError::AuthenticationFailed {
                reason: "API key rejected".to_string(),
            }));
        }
        if status.as_u16() == 403 {
            return Err(CoreError::Forum(ForumError::Forbidden {
                resource: url,
            }));
        }
        if status.is_server_error() {
            return Err(CoreError::Forum(ForumError::ServerError {
                status_code: status.as_u16(),
            }));
        }
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            error!(%status, details = %details, "Discourse rejected the topic");
            return Err(CoreError::Forum(ForumError::TopicRejected { details }));
        }

        let body: CreatedPostResponse = response.json().await.map_err(|e| {
            error!("Failed to parse created post response: {}", e);
            CoreError::Forum(ForumError::InvalidResponse {
                details: "Failed to parse created post response".to_string(),
            })
        })?;

        match body.topic_id {
            Some(topic_id) => {
                let topic_url = format!("{}/t/{}", self.config.base_url, topic_id);
                info!(%topic_url, "Created Discourse topic");
                Ok(topic_url)
            }
            None => Err(CoreError::Forum(ForumError::InvalidResponse {
                details: "Response missing topic id".to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_the_configured_identity() {
        let client = DiscourseClient::new(DiscourseConfig {
            base_url: "https://forum.example.com".to_string(),
            api_key: "key".to_string(),
            api_username: "bot".to_string(),
            category_id: 7,
        });

        assert_eq!(client.config.base_url, "https://forum.example.com");
        assert_eq!(client.config.category_id, 7);
    }

    #[test]
    fn topic_request_serializes_expected_fields() {
        let request = NewTopicRequest {
            title: "CrewAI Job Listings - Updated Daily",
            raw: "body",
            category: 7,
            tags: &["jobs", "automated"],
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["category"], 7);
        assert_eq!(json["tags"][0], "jobs");
        assert_eq!(json["title"], "CrewAI Job Listings - Updated Daily");
    }
}
