//! Offline tests for cointrend-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::collections::HashMap;

use cointrend_core::build_app_config;
use cointrend_db::{MarketSentimentDbRow, PoolConfig, TrendingSnapshotRow};

fn lookup(
    vars: HashMap<&'static str, &'static str>,
) -> impl Fn(&str) -> Result<String, std::env::VarError> {
    move |key| {
        vars.get(key)
            .map(|v| (*v).to_string())
            .ok_or(std::env::VarError::NotPresent)
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = build_app_config(lookup(HashMap::from([
        ("DATABASE_URL", "postgres://example"),
        ("COINTREND_DB_MAX_CONNECTIONS", "42"),
        ("COINTREND_DB_MIN_CONNECTIONS", "7"),
        ("COINTREND_DB_ACQUIRE_TIMEOUT_SECS", "9"),
    ])))
    .expect("config should build");

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn connect_from_config_without_url_fails_fast() {
    let app_config = build_app_config(lookup(HashMap::new())).expect("config should build");

    let err = cointrend_db::connect_pool_from_config(&app_config)
        .await
        .expect_err("no database url configured");
    assert!(matches!(err, cointrend_db::DbError::MissingDatabaseUrl));
}

/// Compile-time smoke test for [`TrendingSnapshotRow`]'s shape.
#[test]
fn trending_snapshot_row_has_expected_fields() {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    let row = TrendingSnapshotRow {
        id: 1,
        snapshot_id: Uuid::new_v4(),
        captured_at: Utc::now(),
        rank: 1,
        canonical_id: "alpha".to_string(),
        display_name: "Alpha".to_string(),
        price_change_pct_24h: Decimal::from(10),
        mention_count: 3,
        norm_price_change: Decimal::ONE,
        norm_mentions: Decimal::ZERO,
        composite_score: Decimal::ONE,
        created_at: Utc::now(),
    };

    assert_eq!(row.rank, 1);
    assert_eq!(row.composite_score, row.norm_price_change + row.norm_mentions);
}

#[test]
fn market_sentiment_row_allows_missing_sentiment() {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    let row = MarketSentimentDbRow {
        id: 1,
        batch_id: Uuid::new_v4(),
        row_index: 0,
        date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        open: None,
        high: None,
        low: None,
        close: 42_000.0,
        volume: None,
        sentiment_value: None,
        sentiment_classification: None,
        sentiment_timestamp: None,
        created_at: Utc::now(),
    };

    assert!(row.sentiment_value.is_none());
}
