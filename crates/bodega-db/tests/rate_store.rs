//! Integration tests for the rate store.
//!
//! The properties under test: recording is an atomic append-only batch,
//! duplicates are independent rows, latest-per-source and per-day history
//! pick the right rows, and policy resolution degrades to zero instead of
//! failing.

use chrono::{Duration, Utc};
use bodega_core::{RatePolicy, RateQuote, SOURCE_CRYPTO, SOURCE_OFFICIAL, SOURCE_PARALLEL};
use bodega_db::{Database, DbConfig};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

#[tokio::test]
async fn empty_batch_is_a_noop() {
    let db = test_db().await;

    db.rates().record(&[], Utc::now()).await.unwrap();
    assert_eq!(db.rates().count().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_source_in_one_batch_produces_two_rows() {
    let db = test_db().await;

    db.rates()
        .record(
            &[
                RateQuote::new(SOURCE_OFFICIAL, 36.0),
                RateQuote::new(SOURCE_OFFICIAL, 36.2),
            ],
            Utc::now(),
        )
        .await
        .unwrap();

    assert_eq!(db.rates().count().await.unwrap(), 2);

    // Same timestamp; the later insert wins the latest-per-source pick.
    let latest = db.rates().latest().await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].rate, 36.2);
}

#[tokio::test]
async fn latest_picks_the_newest_row_per_source() {
    let db = test_db().await;
    let now = Utc::now();

    db.rates()
        .record(
            &[
                RateQuote::new(SOURCE_OFFICIAL, 35.0),
                RateQuote::new(SOURCE_PARALLEL, 38.0),
            ],
            now - Duration::hours(6),
        )
        .await
        .unwrap();
    db.rates()
        .record(&[RateQuote::new(SOURCE_OFFICIAL, 36.4)], now)
        .await
        .unwrap();

    let latest = db.rates().latest().await.unwrap();
    assert_eq!(latest.len(), 2);

    let official = latest.iter().find(|o| o.source == SOURCE_OFFICIAL).unwrap();
    let parallel = latest.iter().find(|o| o.source == SOURCE_PARALLEL).unwrap();
    assert_eq!(official.rate, 36.4);
    assert_eq!(parallel.rate, 38.0);
}

#[tokio::test]
async fn history_collapses_to_one_row_per_source_per_day() {
    let db = test_db().await;
    let now = Utc::now();

    // Three observations today (morning noise + the day's last word),
    // one yesterday, one three days ago.
    db.rates()
        .record(&[RateQuote::new(SOURCE_OFFICIAL, 30.0)], now - Duration::days(3))
        .await
        .unwrap();
    db.rates()
        .record(&[RateQuote::new(SOURCE_OFFICIAL, 33.0)], now - Duration::days(1))
        .await
        .unwrap();
    db.rates()
        .record(&[RateQuote::new(SOURCE_OFFICIAL, 35.5)], now - Duration::hours(8))
        .await
        .unwrap();
    db.rates()
        .record(&[RateQuote::new(SOURCE_OFFICIAL, 35.8)], now - Duration::hours(4))
        .await
        .unwrap();
    db.rates()
        .record(&[RateQuote::new(SOURCE_OFFICIAL, 36.1)], now)
        .await
        .unwrap();

    let history = db.rates().history(14).await.unwrap();

    // Three distinct days, newest first, today's row is the day's latest.
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].rate, 36.1);
    assert_eq!(history[1].rate, 33.0);
    assert_eq!(history[2].rate, 30.0);
}

#[tokio::test]
async fn history_limits_days_per_source_independently() {
    let db = test_db().await;
    let now = Utc::now();

    for day in 0..5 {
        db.rates()
            .record(
                &[RateQuote::new(SOURCE_OFFICIAL, 30.0 + day as f64)],
                now - Duration::days(day),
            )
            .await
            .unwrap();
    }
    db.rates()
        .record(&[RateQuote::new(SOURCE_CRYPTO, 39.0)], now)
        .await
        .unwrap();

    let history = db.rates().history(2).await.unwrap();

    let official_days = history.iter().filter(|o| o.source == SOURCE_OFFICIAL).count();
    let crypto_days = history.iter().filter(|o| o.source == SOURCE_CRYPTO).count();
    assert_eq!(official_days, 2);
    assert_eq!(crypto_days, 1);
}

#[tokio::test]
async fn current_rate_follows_the_policy() {
    let db = test_db().await;

    db.rates()
        .record(
            &[
                RateQuote::new(SOURCE_OFFICIAL, 36.0),
                RateQuote::new(SOURCE_CRYPTO, 38.0),
            ],
            Utc::now(),
        )
        .await
        .unwrap();

    let official = db.rates().current_rate(&RatePolicy::official()).await.unwrap();
    assert_eq!(official, 36.0);

    let average = db
        .rates()
        .current_rate(&RatePolicy::reference_average())
        .await
        .unwrap();
    assert_eq!(average, 37.0);

    // Parallel never reported: zero, not an error.
    let parallel = db.rates().current_rate(&RatePolicy::parallel()).await.unwrap();
    assert_eq!(parallel, 0.0);

    // A fixed override ignores the store.
    let fixed = db
        .rates()
        .current_rate(&RatePolicy::Fixed { value: 42.0 })
        .await
        .unwrap();
    assert_eq!(fixed, 42.0);
}

#[tokio::test]
async fn empty_store_serves_zero_defaults() {
    let db = test_db().await;

    assert!(db.rates().latest().await.unwrap().is_empty());
    assert!(db.rates().history(14).await.unwrap().is_empty());
    assert_eq!(
        db.rates()
            .current_rate(&RatePolicy::reference_average())
            .await
            .unwrap(),
        0.0
    );
}
