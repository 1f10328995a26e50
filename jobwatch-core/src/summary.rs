use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Dataset, Status};

/// Read-only aggregates over a reconciled dataset. Recomputed on demand,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub active: usize,
    pub inactive: usize,
    pub total: usize,
    pub new_today: usize,
}

impl RunSummary {
    pub fn project(dataset: &Dataset, observed_on: NaiveDate) -> Self {
        let mut active = 0;
        let mut new_today = 0;
        for record in dataset.records() {
            if record.status == Status::Active {
                active += 1;
            }
            if record.first_seen == observed_on {
                new_today += 1;
            }
        }

        Self {
            active,
            inactive: dataset.len() - active,
            total: dataset.len(),
            new_today,
        }
    }
}
