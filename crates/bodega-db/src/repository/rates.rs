//! # Rate Repository
//!
//! The rate store: a durable, append-only history of exchange-rate
//! observations from multiple named sources, with latest-value lookup and
//! short per-source trend histories.
//!
//! ## Append-Only
//! Observations are never updated or deleted. Repeated polling produces
//! repeated rows — duplicates per source are valid data, not conflicts —
//! and consumers always select the most recent row per source.
//!
//! ## Degraded Mode
//! When the upstream feed is unreachable, `record` simply isn't called.
//! Reads keep serving the last known values; an empty store resolves to
//! zero rather than an error.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bodega_core::{RateObservation, RatePolicy, RateQuote};

/// Repository for exchange-rate observations.
#[derive(Debug, Clone)]
pub struct RateRepository {
    pool: SqlitePool,
}

impl RateRepository {
    /// Creates a new RateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateRepository { pool }
    }

    /// Appends one observation row per quote, all at `observed_at`.
    ///
    /// The batch is a single transaction: one bad insert aborts the whole
    /// recording deterministically. An empty batch is a no-op, not an
    /// error.
    pub async fn record(&self, quotes: &[RateQuote], observed_at: DateTime<Utc>) -> DbResult<()> {
        if quotes.is_empty() {
            return Ok(());
        }

        debug!(count = quotes.len(), "Recording rate observations");

        let mut tx = self.pool.begin().await?;

        for quote in quotes {
            sqlx::query(
                r#"
                INSERT INTO rate_observations (source, rate, observed_at)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(&quote.source)
            .bind(quote.value)
            .bind(observed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count = quotes.len(), "Rate observations recorded");
        Ok(())
    }

    /// Returns the most recent observation per distinct source.
    pub async fn latest(&self) -> DbResult<Vec<RateObservation>> {
        let observations = sqlx::query_as::<_, RateObservation>(
            r#"
            WITH ranked AS (
                SELECT
                    id,
                    source,
                    rate,
                    observed_at,
                    ROW_NUMBER() OVER (
                        PARTITION BY source
                        ORDER BY observed_at DESC, id DESC
                    ) AS rn
                FROM rate_observations
            )
            SELECT id, source, rate, observed_at
            FROM ranked
            WHERE rn = 1
            ORDER BY source
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(observations)
    }

    /// Returns a short trend history: per source, the latest observation of
    /// each of its most recent `per_source_days` calendar days, newest
    /// first.
    ///
    /// Intra-day polling noise collapses to one row per source/day.
    pub async fn history(&self, per_source_days: u32) -> DbResult<Vec<RateObservation>> {
        let observations = sqlx::query_as::<_, RateObservation>(
            r#"
            WITH recent_days AS (
                SELECT source, day
                FROM (
                    SELECT
                        source,
                        DATE(observed_at) AS day,
                        ROW_NUMBER() OVER (
                            PARTITION BY source
                            ORDER BY DATE(observed_at) DESC
                        ) AS rn
                    FROM rate_observations
                    GROUP BY source, DATE(observed_at)
                )
                WHERE rn <= ?1
            ),
            daily_latest AS (
                SELECT
                    o.id,
                    o.source,
                    o.rate,
                    o.observed_at,
                    ROW_NUMBER() OVER (
                        PARTITION BY o.source, DATE(o.observed_at)
                        ORDER BY o.observed_at DESC, o.id DESC
                    ) AS rn
                FROM rate_observations o
                JOIN recent_days d
                    ON o.source = d.source AND DATE(o.observed_at) = d.day
            )
            SELECT id, source, rate, observed_at
            FROM daily_latest
            WHERE rn = 1
            ORDER BY source, observed_at DESC
            "#,
        )
        .bind(per_source_days as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(observations)
    }

    /// Resolves a single usable rate under the given policy.
    ///
    /// Missing sources count as zero; an empty store resolves to 0.0.
    /// Callers decide what a zero means — the sale engine refuses to open
    /// against one.
    pub async fn current_rate(&self, policy: &RatePolicy) -> DbResult<f64> {
        // A fixed override never touches the store.
        if let RatePolicy::Fixed { value } = policy {
            return Ok(*value);
        }

        let quotes: Vec<RateQuote> = self
            .latest()
            .await?
            .into_iter()
            .map(|o| RateQuote::new(o.source, o.rate))
            .collect();

        Ok(policy.resolve(&quotes))
    }

    /// Counts all stored observations (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rate_observations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
