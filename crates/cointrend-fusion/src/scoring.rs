//! Trending ranking: market momentum fused with social mention volume.

use cointrend_core::{MarketRecord, MentionRecord, ScoredEntity};

use crate::mentions::aggregate_mentions;
use crate::normalize::normalize;

pub const DEFAULT_TOP_N: usize = 5;

/// Scores every trending candidate and returns the best `top_n`.
///
/// Only records with a strictly positive 24h change are candidates. Each
/// candidate is left-joined with the mention counts on its canonical key
/// (missing counts become 0), both metrics are min–max normalized over this
/// candidate set, and the composite is their unweighted sum. Ties keep the
/// relative order of `market`.
///
/// Returns fewer than `top_n` entities when fewer candidates exist, and an
/// empty list when none do.
#[must_use]
pub fn score_trending(
    market: &[MarketRecord],
    mentions: &[MentionRecord],
    top_n: usize,
) -> Vec<ScoredEntity> {
    let mut ranked = rank_candidates(market, mentions);
    ranked.truncate(top_n);
    ranked
}

/// The full ranking behind [`score_trending`], before truncation.
#[must_use]
pub fn rank_candidates(market: &[MarketRecord], mentions: &[MentionRecord]) -> Vec<ScoredEntity> {
    let candidates: Vec<(&MarketRecord, f64)> = market
        .iter()
        .filter_map(|record| match record.price_change_pct_24h {
            Some(change) if change > 0.0 => Some((record, change)),
            _ => None,
        })
        .collect();

    if candidates.is_empty() {
        return Vec::new();
    }

    let counts = aggregate_mentions(mentions);

    let joined: Vec<(&MarketRecord, f64, String, u64)> = candidates
        .into_iter()
        .map(|(record, change)| {
            let key = record.canonical_key();
            // An empty key never joins: two nameless rows are not the same coin.
            let count = if key.is_empty() {
                0
            } else {
                counts.get(&key).copied().unwrap_or(0)
            };
            (record, change, key, count)
        })
        .collect();

    let changes: Vec<f64> = joined.iter().map(|(_, change, _, _)| *change).collect();
    #[allow(clippy::cast_precision_loss)]
    let mention_values: Vec<f64> = joined.iter().map(|(_, _, _, count)| *count as f64).collect();

    let norm_changes = normalize(&changes);
    let norm_mentions = normalize(&mention_values);

    let mut scored: Vec<ScoredEntity> = joined
        .into_iter()
        .zip(norm_changes.into_iter().zip(norm_mentions))
        .map(
            |((record, change, key, count), (norm_price_change, norm_mentions))| ScoredEntity {
                canonical_id: key,
                display_name: record.display_name.clone(),
                price_change_pct_24h: change,
                mention_count: count,
                norm_price_change,
                norm_mentions,
                composite_score: norm_price_change + norm_mentions,
            },
        )
        .collect();

    // `sort_by` is stable, so equal scores keep market order.
    scored.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    scored
}

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;
