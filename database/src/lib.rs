use std::str::FromStr;

use chrono::NaiveDate;
use jobwatch_core::{CoreError, Dataset, PersistedRecord, PostingKey, Status, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info, warn};


/// Column layout of the listing table, in spreadsheet order. Loads tolerate
/// tables missing columns; `run_migrations` adds them back with
/// empty-string defaults.
const COLUMNS: [&str; 9] = [
    "Job ID",
    "Title",
    "Company",
    "Location",
    "Job Type",
    "Link",
    "First Seen",
    "Last Seen",
    "Status",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the tabular store before coercion into a typed record.
#[derive(Debug, Clone)]
pub struct RawListingRow {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub link: String,
    pub first_seen: String,
    pub last_seen: String,
    pub status: String,
}

/// Durable tabular store for the listing dataset, backed by SQLite.
pub struct ListingStore {
    pool: SqlitePool,
}

impl ListingStore {
    pub async fn connect(database_url: &str) -> Result<Self, CoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        debug!(database_url, "Connected to listing store");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS job_listings (
                "Job ID" TEXT NOT NULL DEFAULT '',
                "Title" TEXT NOT NULL DEFAULT '',
                "Company" TEXT NOT NULL DEFAULT '',
                "Location" TEXT NOT NULL DEFAULT '',
                "Job Type" TEXT NOT NULL DEFAULT '',
                "Link" TEXT NOT NULL DEFAULT '',
                "First Seen" TEXT NOT NULL DEFAULT '',
                "Last Seen" TEXT NOT NULL DEFAULT '',
                "Status" TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::Sql)?;

        self.backfill_missing_columns().await
    }

    /// Tables written by older layouts may lack columns. Add them with
    /// empty-string defaults so loading never fails on shape alone.
    async fn backfill_missing_columns(&self) -> Result<(), CoreError> {
        let rows = sqlx::query("PRAGMA table_info(job_listings)")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Sql)?;

        let present: Vec<String> = rows
            .iter()
            .map(|row| row.get::<String, _>("name"))
            .collect();

        for column in COLUMNS {
            if !present.iter().any(|name| name == column) {
                warn!(column, "Backfilling missing column in listing table");
                sqlx::query(&format!(
                    r#"ALTER TABLE job_listings ADD COLUMN "{column}" TEXT NOT NULL DEFAULT ''"#
                ))
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::MigrationFailed {
                    details: e.to_string(),
                })?;
            }
        }

        Ok(())
    }

    pub async fn load_dataset(&self) -> Result<Dataset, CoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "Job ID", "Title", "Company", "Location", "Job Type",
                   "Link", "First Seen", "Last Seen", "Status"
            FROM job_listings
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Sql)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let raw = RawListingRow {
                job_id: column(&row, "Job ID"),
                title: column(&row, "Title"),
                company: column(&row, "Company"),
                location: column(&row, "Location"),
                job_type: column(&row, "Job Type"),
                link: column(&row, "Link"),
                first_seen: column(&row, "First Seen"),
                last_seen: column(&row, "Last Seen"),
                status: column(&row, "Status"),
            };
            records.push(normalize(raw)?);
        }

        let dataset = Dataset::from_records(records)?;
        debug!(listings = dataset.len(), "Loaded listing dataset");
        Ok(dataset)
    }

    /// Replace the stored table with the dataset, written in presentation
    /// order inside one transaction.
    pub async fn save_dataset(&self, dataset: &Dataset) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::Sql)?;

        sqlx::query("DELETE FROM job_listings")
            .execute(&mut *tx)
            .await
            .map_err(StoreError::Sql)?;

        for record in dataset.sorted_records() {
            sqlx::query(
                r#"
                INSERT INTO job_listings
                    ("Job ID", "Title", "Company", "Location", "Job Type",
                     "Link", "First Seen", "Last Seen", "Status")
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.key.as_str())
            .bind(&record.title)
            .bind(&record.company)
            .bind(&record.location)
            .bind(&record.job_type)
            .bind(&record.link)
            .bind(record.first_seen.format(DATE_FORMAT).to_string())
            .bind(record.last_seen.format(DATE_FORMAT).to_string())
            .bind(record.status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::Sql)?;
        }

        tx.commit().await.map_err(StoreError::Sql)?;
        info!(listings = dataset.len(), "Saved listing dataset");
        Ok(())
    }
}

fn column(row: &sqlx::sqlite::SqliteRow, name: &str) -> String {
    row.get::<Option<String>, _>(name).unwrap_or_default()
}

/// Coerce a raw row into a typed record. Date and status content must
/// parse; a row that cannot be coerced is a typed failure, not a silently
/// defaulted record.
pub fn normalize(row: RawListingRow) -> Result<PersistedRecord, StoreError> {
    let first_seen = parse_date("First Seen", &row.first_seen)?;
    let last_seen = parse_date("Last Seen", &row.last_seen)?;
    let status = Status::parse(&row.status).ok_or_else(|| StoreError::UnknownStatus {
        value: row.status.clone(),
    })?;

    Ok(PersistedRecord {
        key: PostingKey::new(row.job_id),
        title: row.title,
        company: row.company,
        location: row.location,
        job_type: row.job_type,
        link: row.link,
        first_seen,
        last_seen,
        status,
    })
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| StoreError::InvalidDate {
        column: column.to_string(),
        value: value.to_string(),
    })
}
