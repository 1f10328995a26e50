use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::types::{Dataset, KeyedPosting, PersistedRecord, Status};

/// How a reconciliation run treats a posting that reappears.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePolicy {
    /// Refresh job type and link from the fresh observation when a known
    /// posting reappears. Off by default: descriptive fields stay as first
    /// recorded, so formatting churn between scrapes never rewrites a
    /// record. Location cannot drift either way since it is part of the key.
    pub refresh_details_on_reappear: bool,
}

/// Merge a freshly scraped batch into the persisted dataset.
///
/// Every existing record first goes Inactive; the batch then reactivates
/// whatever was observed again and inserts what is new. Records are never
/// removed, `first_seen` is never touched after insertion, and `last_seen`
/// only moves for keys present in the batch. Within one batch the first
/// occurrence of a key wins; later duplicates are dropped.
pub fn reconcile(
    mut dataset: Dataset,
    batch: &[KeyedPosting],
    observed_on: NaiveDate,
    policy: &ReconcilePolicy,
) -> Dataset {
    for record in dataset.records_mut() {
        record.status = Status::Inactive;
    }

    let mut processed = HashSet::new();
    for entry in batch {
        if !processed.insert(entry.key.clone()) {
            debug!(key = %entry.key, "Dropping duplicate posting within batch");
            continue;
        }

        match dataset.get_mut(&entry.key) {
            Some(record) => {
                record.last_seen = observed_on;
                record.status = Status::Active;
                if policy.refresh_details_on_reappear {
                    record.job_type = entry.posting.job_type.clone();
                    record.link = entry.posting.link.clone();
                }
            }
            None => {
                dataset.insert(PersistedRecord::discovered(
                    entry.key.clone(),
                    &entry.posting,
                    observed_on,
                ));
            }
        }
    }

    dataset
}
