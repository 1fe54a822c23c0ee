//! Database operations for the `market_sentiment_rows` table.

use chrono::{DateTime, NaiveDate, Utc};
use cointrend_core::MarketSentimentRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `market_sentiment_rows` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MarketSentimentDbRow {
    pub id: i64,
    pub batch_id: Uuid,
    pub row_index: i32,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
    pub sentiment_value: Option<f64>,
    pub sentiment_classification: Option<String>,
    pub sentiment_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Append `rows` as one batch tagged with a fresh batch id, in a single
/// transaction. Row order is kept in `row_index`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; nothing of the batch is
/// stored in that case.
pub async fn insert_market_sentiment_batch(
    pool: &PgPool,
    rows: &[MarketSentimentRow],
) -> Result<Uuid, DbError> {
    let batch_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    for (idx, row) in rows.iter().enumerate() {
        let row_index = i32::try_from(idx).map_err(|_| DbError::OutOfRange {
            column: "row_index",
            value: idx.to_string(),
        })?;

        sqlx::query(
            "INSERT INTO market_sentiment_rows \
                 (batch_id, row_index, date, open, high, low, close, volume, \
                  sentiment_value, sentiment_classification, sentiment_timestamp) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(batch_id)
        .bind(row_index)
        .bind(row.date)
        .bind(row.open)
        .bind(row.high)
        .bind(row.low)
        .bind(row.close)
        .bind(row.volume)
        .bind(row.sentiment_value)
        .bind(row.sentiment_classification.as_deref())
        .bind(row.sentiment_timestamp)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(%batch_id, rows = rows.len(), "stored market/sentiment batch");
    Ok(batch_id)
}

/// Return one stored batch in its original row order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_market_sentiment_batch(
    pool: &PgPool,
    batch_id: Uuid,
) -> Result<Vec<MarketSentimentDbRow>, DbError> {
    let rows = sqlx::query_as::<_, MarketSentimentDbRow>(
        "SELECT id, batch_id, row_index, date, open, high, low, close, volume, \
                sentiment_value, sentiment_classification, sentiment_timestamp, created_at \
         FROM market_sentiment_rows \
         WHERE batch_id = $1 \
         ORDER BY row_index",
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
