use anyhow::{Context, Result};
use chrono::Utc;
use database::ListingStore;
use discourse_client::{digest, DiscourseClient};
use jobboard_client::JobBoardClient;
use jobwatch_core::{reconcile, AppConfig, KeyedPosting, RunSummary};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            "jobwatch=info,jobwatch_core=info,database=info,jobboard_client=info,discourse_client=info",
        )
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(organization = %config.organization, "Starting jobwatch run");

    let store = ListingStore::connect(&config.database_url)
        .await
        .context("Failed to open listing store")?;
    store
        .run_migrations()
        .await
        .context("Failed to migrate listing store")?;

    let existing = store
        .load_dataset()
        .await
        .context("Failed to load listing dataset")?;
    info!(tracked = existing.len(), "Loaded existing listings");

    let client = JobBoardClient::new(config.job_board.clone());
    let postings = client
        .fetch_all_postings()
        .await
        .context("Failed to scrape job board")?;
    info!(fetched = postings.len(), "Fetched postings from job board");
    if postings.is_empty() {
        warn!("Scrape returned no postings; every tracked listing will go inactive");
    }

    let today = Utc::now().date_naive();
    let batch: Vec<KeyedPosting> = postings.into_iter().map(KeyedPosting::new).collect();
    let updated = reconcile(existing, &batch, today, &config.reconcile);
    let summary = RunSummary::project(&updated, today);

    store
        .save_dataset(&updated)
        .await
        .context("Failed to save listing dataset")?;
    info!(
        active = summary.active,
        inactive = summary.inactive,
        total = summary.total,
        new_today = summary.new_today,
        "Reconciled listing dataset"
    );

    match &config.discourse {
        Some(discourse) => {
            let publisher = DiscourseClient::new(discourse.clone());
            let title = digest::digest_title(&config.organization);
            let body = digest::format_digest(&config.organization, &updated, &summary, today);
            let topic_url = publisher
                .publish_digest(&title, &body)
                .await
                .context("Failed to publish digest")?;
            info!(%topic_url, "Published job digest");
        }
        None => {
            info!("Discourse publishing disabled; skipping digest");
        }
    }

    Ok(())
}
