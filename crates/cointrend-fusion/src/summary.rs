//! Summary tables for reporting consumers. All of them accept empty input.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use cointrend_core::{
    MarketRecord, MarketSentimentRow, MentionCount, MentionRecord, NewsArticle, ScoredEntity,
    SentimentPoint, TickerPrice,
};
use serde::Serialize;

use crate::mentions::aggregate_mentions;

pub const DEFAULT_SUMMARY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// One trending entity's fraction of all mentions within the trending set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentionShare {
    pub canonical_id: String,
    pub display_name: String,
    pub mention_count: u64,
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub top_movers: Vec<MarketRecord>,
    pub keyword_frequency: Vec<MentionCount>,
    pub latest_sentiment: Option<SentimentPoint>,
    pub news_volume: Vec<DailyCount>,
    pub ticker_snapshot: Vec<TickerPrice>,
    pub mention_share: Option<Vec<MentionShare>>,
    pub close_sentiment_correlation: Option<f64>,
}

/// Inputs to [`summarize`], borrowed from a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInputs<'a> {
    pub market: &'a [MarketRecord],
    pub mentions: &'a [MentionRecord],
    pub sentiment: &'a [SentimentPoint],
    pub news: &'a [NewsArticle],
    pub tickers: &'a [TickerPrice],
    pub trending: &'a [ScoredEntity],
    pub aligned: &'a [MarketSentimentRow],
}

#[must_use]
pub fn summarize(inputs: SummaryInputs<'_>, limit: usize) -> Summary {
    Summary {
        top_movers: top_movers(inputs.market, limit),
        keyword_frequency: keyword_frequency(inputs.mentions, limit),
        latest_sentiment: latest_sentiment(inputs.sentiment).cloned(),
        news_volume: news_volume(inputs.news),
        ticker_snapshot: ticker_snapshot(inputs.tickers, limit),
        mention_share: mention_share(inputs.trending),
        close_sentiment_correlation: close_sentiment_correlation(inputs.aligned),
    }
}

/// Largest 24h movers, declining assets included. Rows without a change are
/// skipped.
#[must_use]
pub fn top_movers(market: &[MarketRecord], n: usize) -> Vec<MarketRecord> {
    let mut movers: Vec<(&MarketRecord, f64)> = market
        .iter()
        .filter_map(|r| r.price_change_pct_24h.map(|c| (r, c)))
        .collect();
    movers.sort_by(|a, b| b.1.total_cmp(&a.1));
    movers.into_iter().take(n).map(|(r, _)| r.clone()).collect()
}

/// Mention counts by count descending, then key ascending.
#[must_use]
pub fn keyword_frequency(mentions: &[MentionRecord], n: usize) -> Vec<MentionCount> {
    let mut counts: Vec<MentionCount> = aggregate_mentions(mentions)
        .into_iter()
        .map(|(canonical_id, count)| MentionCount {
            canonical_id,
            count,
        })
        .collect();
    // Keys arrive sorted, and the sort is stable.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

#[must_use]
pub fn latest_sentiment(points: &[SentimentPoint]) -> Option<&SentimentPoint> {
    points.iter().max_by_key(|p| p.timestamp)
}

/// Article count per UTC publication date, ascending by date.
#[must_use]
pub fn news_volume(articles: &[NewsArticle]) -> Vec<DailyCount> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for article in articles {
        *by_date.entry(article.date()).or_insert(0) += 1;
    }
    by_date
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

#[must_use]
pub fn ticker_snapshot(tickers: &[TickerPrice], n: usize) -> Vec<TickerPrice> {
    let mut sorted = tickers.to_vec();
    sorted.sort_by(|a, b| b.price.total_cmp(&a.price));
    sorted.truncate(n);
    sorted
}

/// `None` when the trending set has no mentions at all.
#[must_use]
pub fn mention_share(trending: &[ScoredEntity]) -> Option<Vec<MentionShare>> {
    let total: u64 = trending.iter().map(|e| e.mention_count).sum();
    if total == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let shares: Vec<MentionShare> = trending
        .iter()
        .map(|e| MentionShare {
            canonical_id: e.canonical_id.clone(),
            display_name: e.display_name.clone(),
            mention_count: e.mention_count,
            share: e.mention_count as f64 / total as f64,
        })
        .collect();
    Some(shares)
}

/// Pearson correlation of close price against the matched sentiment value.
///
/// Only rows with a sentiment match take part. `None` with fewer than two such
/// rows or when either side has zero variance.
#[must_use]
pub fn close_sentiment_correlation(rows: &[MarketSentimentRow]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|r| r.sentiment_value.map(|s| (r.close, s)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
