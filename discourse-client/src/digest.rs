use std::collections::BTreeMap;

use chrono::NaiveDate;
use jobwatch_core::{Dataset, PersistedRecord, RunSummary, JOB_TYPE_NOT_SPECIFIED};

pub fn digest_title(organization: &str) -> String {
    format!("{organization} Job Listings - Updated Daily")
}

/// Render the active listings plus run summary as forum Markdown: listings
/// grouped by company (alphabetical), newest first within a company, with a
/// badge on postings discovered today.
pub fn format_digest(
    organization: &str,
    dataset: &Dataset,
    summary: &RunSummary,
    updated_on: NaiveDate,
) -> String {
    let mut content = String::new();
    content.push_str(&format!("# 🤖 {organization} Job Listings\n"));
    content.push_str(&format!("*Last Updated: {}*\n\n", updated_on.format("%Y-%m-%d")));
    content.push_str(&format!(
        "Looking for roles in the {organization} ecosystem? Here are the latest opportunities:\n\n"
    ));

    // dataset.active() is already newest-first, so per-company groups keep
    // that order as they fill.
    let mut by_company: BTreeMap<&str, Vec<&PersistedRecord>> = BTreeMap::new();
    for record in dataset.active() {
        by_company
            .entry(record.company.as_str())
            .or_default()
            .push(record);
    }

    for (company, records) in &by_company {
        content.push_str(&format!("### {company}\n"));
        for record in records {
            let new_badge = if record.first_seen == updated_on {
                " 🆕"
            } else {
                ""
            };
            content.push_str(&format!(
                "**[{}]({})**{}\n",
                record.title, record.link, new_badge
            ));
            content.push_str(&format!("📍 {}", record.location));
            if record.job_type != JOB_TYPE_NOT_SPECIFIED {
                content.push_str(&format!(" | 💼 {}", record.job_type));
            }
            content.push_str("\n\n");
        }
    }

    content.push_str("---\n\n");
    content.push_str("### Summary\n");
    content.push_str(&format!("- 📊 Total Active Jobs: {}\n", summary.active));
    content.push_str(&format!("- 🆕 New Today: {}\n\n", summary.new_today));
    content.push_str("*This post is automatically updated daily.*\n\n");
    content.push_str("ℹ️ Having trouble with a job link? Let us know in the comments below.");

    content
}
