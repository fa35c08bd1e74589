//! # Rate Feed Boundary
//!
//! The seam between the rate store and whatever supplies fresh quotes.
//!
//! ## Why a Trait?
//! The actual feed is an HTTP collaborator owned by the host application —
//! it polls a public rates API with a bounded timeout. The core never
//! speaks HTTP; it consumes the feed's output through [`RateFeed`] so the
//! whole path stays testable with a canned implementation.
//!
//! ## Failure Posture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  feed unreachable / timeout / garbage response                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  refresh_rates: warn + return 0 recorded                            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  the store keeps serving the last known values — stale beats        │
//! │  absent, and a feed outage never aborts a sale or payment           │
//! │                                                                     │
//! │  storage failure while recording a good batch                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  propagated: that one is ours                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::DbResult;
use crate::repository::rates::RateRepository;
use bodega_core::RateQuote;

/// Errors an upstream rate feed can produce.
///
/// All of them degrade freshness and nothing else.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The endpoint could not be reached.
    #[error("Rate feed unreachable: {0}")]
    Unreachable(String),

    /// The request exceeded its bounded timeout.
    #[error("Rate feed timed out")]
    Timeout,

    /// The response did not contain usable quotes.
    #[error("Rate feed returned malformed data: {0}")]
    Malformed(String),
}

/// A source of fresh exchange-rate quotes.
///
/// Implementors live in the host application (HTTP client, test stub);
/// this crate only consumes them.
#[allow(async_fn_in_trait)]
pub trait RateFeed {
    /// Fetches the current quote per source.
    async fn fetch(&self) -> Result<Vec<RateQuote>, FeedError>;
}

/// Pulls the feed once and records whatever it returned.
///
/// Feed failures are logged and swallowed — the caller gets `Ok(0)` and
/// the store keeps its last known values. Storage failures propagate.
/// Returns the number of observations recorded.
pub async fn refresh_rates<F: RateFeed>(feed: &F, rates: &RateRepository) -> DbResult<usize> {
    let quotes = match feed.fetch().await {
        Ok(quotes) => quotes,
        Err(err) => {
            warn!(error = %err, "Rate feed unavailable; keeping last known rates");
            return Ok(0);
        }
    };

    let count = quotes.len();
    rates.record(&quotes, Utc::now()).await?;

    info!(count = count, "Rates refreshed from feed");
    Ok(count)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bodega_core::{SOURCE_CRYPTO, SOURCE_OFFICIAL};

    struct StaticFeed(Vec<RateQuote>);

    impl RateFeed for StaticFeed {
        async fn fetch(&self) -> Result<Vec<RateQuote>, FeedError> {
            Ok(self.0.clone())
        }
    }

    struct DownFeed;

    impl RateFeed for DownFeed {
        async fn fetch(&self) -> Result<Vec<RateQuote>, FeedError> {
            Err(FeedError::Unreachable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_refresh_records_feed_output() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let feed = StaticFeed(vec![
            RateQuote::new(SOURCE_OFFICIAL, 36.0),
            RateQuote::new(SOURCE_CRYPTO, 38.0),
        ]);

        let recorded = refresh_rates(&feed, &db.rates()).await.unwrap();
        assert_eq!(recorded, 2);
        assert_eq!(db.rates().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_feed_failure_is_swallowed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Seed one observation, then fail a refresh: the stored value
        // must survive untouched.
        db.rates()
            .record(&[RateQuote::new(SOURCE_OFFICIAL, 36.0)], Utc::now())
            .await
            .unwrap();

        let recorded = refresh_rates(&DownFeed, &db.rates()).await.unwrap();
        assert_eq!(recorded, 0);

        let latest = db.rates().latest().await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].rate, 36.0);
    }
}
