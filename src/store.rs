//! Stats persistence to the relational store.
//!
//! The `gbfs_stats` table is append-only: no uniqueness constraint, no
//! upsert, one new row per (provider, feed, run). The table is created on
//! first use if it does not already exist.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::DbConfig;
use crate::stats::StationTotals;

/// One row appended to `gbfs_stats`. The identity column is left to the
/// database's auto-increment.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatsRecord {
    pub provider: String,
    pub feed: String,
    pub timestamp: DateTime<Utc>,
    pub total_bikes: i64,
    pub available_docks: i64,
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Appends one stats row; the timestamp is captured at insert time.
    async fn record_stats(&self, provider: &str, feed: &str, totals: StationTotals) -> Result<()>;
}

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS gbfs_stats (
    id INT AUTO_INCREMENT PRIMARY KEY,
    provider VARCHAR(255),
    feed VARCHAR(255),
    timestamp DATETIME,
    total_bikes INT,
    available_docks INT
)";

const INSERT_ROW: &str = "\
INSERT INTO gbfs_stats (provider, feed, timestamp, total_bikes, available_docks)
VALUES (?, ?, ?, ?, ?)";

/// [`StatsStore`] backed by MySQL.
pub struct MySqlStatsStore {
    pool: MySqlPool,
}

impl MySqlStatsStore {
    /// Connects using the configured host, port, and credentials.
    ///
    /// One connection is held for the whole run and released when the
    /// store is dropped, whatever happened in between.
    ///
    /// # Errors
    ///
    /// Connection failure here is fatal to the run; per-row insert
    /// failures later are not.
    pub async fn connect(db: &DbConfig) -> Result<Self> {
        let url = format!(
            "mysql://{}:{}@{}:{}/{}",
            db.user, db.password, db.host, db.port, db.database
        );
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .with_context(|| format!("failed to connect to MySQL at {}:{}", db.host, db.port))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl StatsStore for MySqlStatsStore {
    async fn record_stats(&self, provider: &str, feed: &str, totals: StationTotals) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .context("failed to ensure the gbfs_stats table exists")?;

        let row = StatsRecord {
            provider: provider.to_string(),
            feed: feed.to_string(),
            timestamp: Utc::now(),
            total_bikes: totals.total_bikes,
            available_docks: totals.available_docks,
        };

        sqlx::query(INSERT_ROW)
            .bind(&row.provider)
            .bind(&row.feed)
            .bind(row.timestamp)
            .bind(row.total_bikes)
            .bind(row.available_docks)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to insert stats row for {provider}/{feed}"))?;

        Ok(())
    }
}
