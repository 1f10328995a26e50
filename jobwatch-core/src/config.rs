use std::env;

use crate::error::ConfigError;
use crate::reconcile::ReconcilePolicy;

const DEFAULT_LISTING_URL: &str = "https://job.zip/jobs/crewai";
const DEFAULT_DATABASE_URL: &str = "sqlite://job_listings.db";
const DEFAULT_USER_AGENT: &str = "jobwatch/0.1";
const DEFAULT_ORGANIZATION: &str = "CrewAI";
const DEFAULT_MAX_PAGES: u32 = 20;

#[derive(Debug, Clone)]
pub struct JobBoardConfig {
    pub listing_url: String,
    pub user_agent: String,
    pub max_pages: u32,
}

#[derive(Debug, Clone)]
pub struct DiscourseConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_username: String,
    pub category_id: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub organization: String,
    pub database_url: String,
    pub job_board: JobBoardConfig,
    pub discourse: Option<DiscourseConfig>,
    pub reconcile: ReconcilePolicy,
}

impl AppConfig {
    /// Read configuration from the process environment. Collaborator
    /// settings live in explicit structs handed to constructors; nothing
    /// here is global. Publishing is optional: no `DISCOURSE_URL` means the
    /// run stops after saving, but a configured forum with a missing key is
    /// an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let job_board = JobBoardConfig {
            listing_url: optional("JOBWATCH_LISTING_URL")
                .unwrap_or_else(|| DEFAULT_LISTING_URL.to_string()),
            user_agent: optional("JOBWATCH_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            max_pages: match optional("JOBWATCH_MAX_PAGES") {
                Some(value) => parse_u32("JOBWATCH_MAX_PAGES", &value)?,
                None => DEFAULT_MAX_PAGES,
            },
        };

        let discourse = match optional("DISCOURSE_URL") {
            Some(base_url) => {
                let category = required("DISCOURSE_CATEGORY_ID")?;
                Some(DiscourseConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    api_key: required("DISCOURSE_API_KEY")?,
                    api_username: required("DISCOURSE_USERNAME")?,
                    category_id: parse_u32("DISCOURSE_CATEGORY_ID", &category)?,
                })
            }
            None => None,
        };

        let reconcile = ReconcilePolicy {
            refresh_details_on_reappear: optional("JOBWATCH_REFRESH_DETAILS")
                .map(|value| parse_bool(&value))
                .unwrap_or(false),
        };

        Ok(Self {
            organization: optional("JOBWATCH_ORGANIZATION")
                .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string()),
            database_url: optional("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            job_board,
            discourse,
            reconcile,
        })
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn required(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingEnvironmentVariable {
        var_name: name.to_string(),
    })
}

fn parse_u32(field: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_u32_rejects_garbage() {
        assert_eq!(parse_u32("DISCOURSE_CATEGORY_ID", "7").unwrap(), 7);
        assert!(matches!(
            parse_u32("DISCOURSE_CATEGORY_ID", "jobs"),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "DISCOURSE_CATEGORY_ID"
        ));
    }

    #[test]
    fn parse_bool_accepts_common_truthy_spellings() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("yes"));
    }
}
