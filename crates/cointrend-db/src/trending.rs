//! Database operations for the `trending_snapshots` table.

use chrono::{DateTime, Utc};
use cointrend_core::ScoredEntity;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Scores are rounded to this many decimal places before storage.
const SCORE_SCALE: u32 = 10;

/// A row from the `trending_snapshots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendingSnapshotRow {
    pub id: i64,
    pub snapshot_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub rank: i32,
    pub canonical_id: String,
    pub display_name: String,
    pub price_change_pct_24h: Decimal,
    pub mention_count: i64,
    pub norm_price_change: Decimal,
    pub norm_mentions: Decimal,
    pub composite_score: Decimal,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn to_decimal(column: &'static str, value: f64) -> Result<Decimal, DbError> {
    Decimal::try_from(value)
        .map(|d| d.round_dp(SCORE_SCALE))
        .map_err(|_| DbError::OutOfRange {
            column,
            value: value.to_string(),
        })
}

/// Insert one ranked snapshot in a single transaction and return its id.
///
/// `entities` must already be in rank order; rank 1 is the first entity.
/// An empty ranking inserts nothing and still returns a fresh id.
///
/// # Errors
///
/// Returns [`DbError::OutOfRange`] if a score cannot be represented as
/// `NUMERIC`, or [`DbError::Sqlx`] if the insert fails.
pub async fn insert_trending_snapshot(
    pool: &PgPool,
    captured_at: DateTime<Utc>,
    entities: &[ScoredEntity],
) -> Result<Uuid, DbError> {
    let snapshot_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    for (idx, entity) in entities.iter().enumerate() {
        let rank = i32::try_from(idx + 1).map_err(|_| DbError::OutOfRange {
            column: "rank",
            value: (idx + 1).to_string(),
        })?;
        let mention_count =
            i64::try_from(entity.mention_count).map_err(|_| DbError::OutOfRange {
                column: "mention_count",
                value: entity.mention_count.to_string(),
            })?;

        sqlx::query(
            "INSERT INTO trending_snapshots \
                 (snapshot_id, captured_at, rank, canonical_id, display_name, \
                  price_change_pct_24h, mention_count, norm_price_change, norm_mentions, \
                  composite_score) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(snapshot_id)
        .bind(captured_at)
        .bind(rank)
        .bind(&entity.canonical_id)
        .bind(&entity.display_name)
        .bind(to_decimal(
            "price_change_pct_24h",
            entity.price_change_pct_24h,
        )?)
        .bind(mention_count)
        .bind(to_decimal("norm_price_change", entity.norm_price_change)?)
        .bind(to_decimal("norm_mentions", entity.norm_mentions)?)
        .bind(to_decimal("composite_score", entity.composite_score)?)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(%snapshot_id, entities = entities.len(), "stored trending snapshot");
    Ok(snapshot_id)
}

/// Return the rows of the most recently captured snapshot, ordered by rank.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_latest_trending(pool: &PgPool) -> Result<Vec<TrendingSnapshotRow>, DbError> {
    let rows = sqlx::query_as::<_, TrendingSnapshotRow>(
        "SELECT id, snapshot_id, captured_at, rank, canonical_id, display_name, \
                price_change_pct_24h, mention_count, norm_price_change, norm_mentions, \
                composite_score, created_at \
         FROM trending_snapshots \
         WHERE snapshot_id = ( \
             SELECT snapshot_id FROM trending_snapshots \
             ORDER BY captured_at DESC, id DESC \
             LIMIT 1 \
         ) \
         ORDER BY rank",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_conversion_rounds_scores() {
        let d = to_decimal("composite_score", 1.234_567_890_123_4).unwrap();
        assert_eq!(d.to_string(), "1.2345678901");
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        assert!(matches!(
            to_decimal("composite_score", f64::NAN),
            Err(DbError::OutOfRange {
                column: "composite_score",
                ..
            })
        ));
        assert!(to_decimal("composite_score", f64::INFINITY).is_err());
    }

    #[test]
    fn pass_through_scores_fit() {
        let d = to_decimal("norm_price_change", 5.0).unwrap();
        assert_eq!(d, Decimal::from(5));
    }
}
