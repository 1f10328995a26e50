use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::identity;

/// Sentinel substituted at extraction time when a card carries no location.
pub const LOCATION_NOT_SPECIFIED: &str = "Location not specified";

/// Sentinel substituted at extraction time when a card carries no job type.
pub const JOB_TYPE_NOT_SPECIFIED: &str = "Not specified";

/// A freshly scraped job listing. Built once per scrape, never mutated,
/// carries no identity until keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub time_posted: String,
    pub link: String,
}

/// Content-derived fingerprint identifying a posting across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingKey(String);

impl PostingKey {
    pub fn new(digest: String) -> Self {
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A posting paired with its computed key, ready for reconciliation.
#[derive(Debug, Clone)]
pub struct KeyedPosting {
    pub key: PostingKey,
    pub posting: Posting,
}

impl KeyedPosting {
    pub fn new(posting: Posting) -> Self {
        let key = identity::key_for(&posting);
        Self { key, posting }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Status> {
        match value {
            "Active" => Some(Status::Active),
            "Inactive" => Some(Status::Inactive),
            _ => None,
        }
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Status::Active => 0,
            Status::Inactive => 1,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The durable representation of a tracked posting. Descriptive fields are
/// written at discovery; `first_seen` never changes afterwards, `last_seen`
/// only advances on a run that actually observed the posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub key: PostingKey,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub link: String,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub status: Status,
}

impl PersistedRecord {
    /// Record for a posting seen for the first time on `observed_on`.
    pub fn discovered(key: PostingKey, posting: &Posting, observed_on: NaiveDate) -> Self {
        Self {
            key,
            title: posting.title.clone(),
            company: posting.company.clone(),
            location: posting.location.clone(),
            job_type: posting.job_type.clone(),
            link: posting.link.clone(),
            first_seen: observed_on,
            last_seen: observed_on,
            status: Status::Active,
        }
    }
}

/// All tracked postings, indexed by key. Exactly one record per key; the
/// index replaces repeated table scans during reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: HashMap<PostingKey, PersistedRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from loaded records. A duplicate key means the
    /// durable store is corrupt and is surfaced, never repaired here.
    pub fn from_records(
        records: impl IntoIterator<Item = PersistedRecord>,
    ) -> Result<Self, DatasetError> {
        let mut dataset = Self::new();
        for record in records {
            if dataset.records.contains_key(&record.key) {
                return Err(DatasetError::DuplicateKey {
                    key: record.key.to_string(),
                });
            }
            dataset.records.insert(record.key.clone(), record);
        }
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &PostingKey) -> Option<&PersistedRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &PostingKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn records(&self) -> impl Iterator<Item = &PersistedRecord> {
        self.records.values()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut PersistedRecord> {
        self.records.values_mut()
    }

    pub(crate) fn get_mut(&mut self, key: &PostingKey) -> Option<&mut PersistedRecord> {
        self.records.get_mut(key)
    }

    pub(crate) fn insert(&mut self, record: PersistedRecord) {
        self.records.insert(record.key.clone(), record);
    }

    /// Records in presentation order: Active before Inactive, newest first
    /// within a status, key as the deterministic tiebreak.
    pub fn sorted_records(&self) -> Vec<&PersistedRecord> {
        let mut records: Vec<&PersistedRecord> = self.records.values().collect();
        records.sort_by(|a, b| presentation_order(a, b));
        records
    }

    /// The Active subset, in presentation order.
    pub fn active(&self) -> Vec<&PersistedRecord> {
        self.sorted_records()
            .into_iter()
            .filter(|record| record.status == Status::Active)
            .collect()
    }
}

fn presentation_order(a: &PersistedRecord, b: &PersistedRecord) -> Ordering {
    a.status
        .sort_rank()
        .cmp(&b.status.sort_rank())
        .then_with(|| b.first_seen.cmp(&a.first_seen))
        .then_with(|| a.key.cmp(&b.key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, first_seen: &str, status: Status) -> PersistedRecord {
        PersistedRecord {
            key: PostingKey::new(key.to_string()),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            job_type: "Full-time".to_string(),
            link: "https://example.com/jobs/1".to_string(),
            first_seen: first_seen.parse().unwrap(),
            last_seen: first_seen.parse().unwrap(),
            status,
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(Status::parse("Active"), Some(Status::Active));
        assert_eq!(Status::parse("Inactive"), Some(Status::Inactive));
        assert_eq!(Status::parse("active"), None);
        assert_eq!(Status::Active.as_str(), "Active");
    }

    #[test]
    fn from_records_rejects_duplicate_keys() {
        let result = Dataset::from_records(vec![
            record("a1", "2024-01-01", Status::Active),
            record("a1", "2024-01-02", Status::Active),
        ]);

        assert!(matches!(result, Err(DatasetError::DuplicateKey { ref key }) if key == "a1"));
    }

    #[test]
    fn sorted_records_put_active_first_then_newest() {
        let dataset = Dataset::from_records(vec![
            record("old-active", "2024-01-01", Status::Active),
            record("inactive", "2024-03-01", Status::Inactive),
            record("new-active", "2024-02-01", Status::Active),
        ])
        .unwrap();

        let keys: Vec<&str> = dataset
            .sorted_records()
            .iter()
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(keys, vec!["new-active", "old-active", "inactive"]);
    }

    #[test]
    fn active_filters_out_inactive_records() {
        let dataset = Dataset::from_records(vec![
            record("a1", "2024-01-01", Status::Active),
            record("b2", "2024-01-02", Status::Inactive),
        ])
        .unwrap();

        let active = dataset.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].key.as_str(), "a1");
    }
}
