//! Append-only SQLite table of rate observations.

use std::str::FromStr;

use log::{debug, info};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StoreError;
use crate::exchange_rate::{RateObservation, RateSnapshot};

const CREATE_RATES: &str = "CREATE TABLE IF NOT EXISTS curss (
    title TEXT NOT NULL,
    curs REAL NOT NULL,
    date TEXT NOT NULL
)";

const CREATE_NAMES: &str = "CREATE TABLE IF NOT EXISTS names (
    name TEXT NOT NULL
)";

/// One historical quote as shown in the history view.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub rate: f64,
    pub observed_at: String,
}

/// Rows are never updated or deleted, and identical rows may repeat;
/// every read collapses duplicates.
pub struct RateStore {
    pool: SqlitePool,
}

impl RateStore {
    /// Opens (creating if needed) the store at `database_url` and ensures the schema.
    pub async fn open(database_url: &str) -> Result<Self, StoreError> {
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = std::path::Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // A single connection serializes every writer and keeps `:memory:` stores alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_RATES).execute(&pool).await?;
        sqlx::query(CREATE_NAMES).execute(&pool).await?;
        debug!("rate store ready at {database_url}");

        Ok(Self { pool })
    }

    pub async fn append(&self, observation: &RateObservation) -> Result<(), StoreError> {
        check_rate(observation)?;
        sqlx::query("INSERT INTO curss (title, curs, date) VALUES (?, ?, ?)")
            .bind(&observation.code)
            .bind(observation.rate)
            .bind(&observation.observed_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Appends a whole fetch in one transaction. Nothing is stored if any rate is invalid.
    pub async fn append_all(&self, observations: &[RateObservation]) -> Result<(), StoreError> {
        observations.iter().try_for_each(check_rate)?;
        let mut tx = self.pool.begin().await?;
        for observation in observations {
            sqlx::query("INSERT INTO curss (title, curs, date) VALUES (?, ?, ?)")
                .bind(&observation.code)
                .bind(observation.rate)
                .bind(&observation.observed_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        info!("stored {} observations", observations.len());
        Ok(())
    }

    /// All observations sharing the most recent timestamp.
    ///
    /// When one code has several rows at that timestamp the last inserted wins.
    /// Fails with [`StoreError::NoData`] on an empty store. The domestic
    /// currency is not part of the result.
    pub async fn latest_snapshot(&self) -> Result<RateSnapshot, StoreError> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM curss")
            .fetch_one(&self.pool)
            .await?;
        let Some(observed_at) = latest else {
            return Err(StoreError::NoData);
        };

        let rows: Vec<(String, f64)> =
            sqlx::query_as("SELECT title, curs FROM curss WHERE date = ? ORDER BY title, rowid")
                .bind(&observed_at)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(code, rate)| RateObservation {
                code,
                rate,
                observed_at: observed_at.clone(),
            })
            .collect())
    }

    /// Distinct `(rate, timestamp)` pairs for `code`, newest first. Empty when unknown.
    pub async fn history(&self, code: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let rows: Vec<(f64, String)> = sqlx::query_as(
            "SELECT DISTINCT curs, date FROM curss WHERE title = ? ORDER BY date DESC, curs DESC",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(rate, observed_at)| HistoryEntry { rate, observed_at })
            .collect())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn check_rate(observation: &RateObservation) -> Result<(), StoreError> {
    if observation.rate.is_finite() && observation.rate > 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidRate {
            code: observation.code.clone(),
            rate: observation.rate,
        })
    }
}
