//! Typed records produced by the cleaners and the fusion stages.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::canonical_key;

/// One tradable asset from a market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub coin_id: Option<String>,
    pub symbol: Option<String>,
    pub display_name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_change_pct_24h: Option<f64>,
}

impl MarketRecord {
    /// Convenience constructor for the two fields scoring cares about.
    #[must_use]
    pub fn new(display_name: impl Into<String>, price_change_pct_24h: Option<f64>) -> Self {
        Self {
            coin_id: None,
            symbol: None,
            display_name: display_name.into(),
            current_price: None,
            market_cap: None,
            price_change_pct_24h,
        }
    }

    #[must_use]
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.display_name)
    }
}

/// One social post matched to a search keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionRecord {
    pub keyword: String,
    pub title: Option<String>,
    pub score: Option<i64>,
    pub url: Option<String>,
    pub num_comments: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub subreddit: Option<String>,
}

impl MentionRecord {
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            title: None,
            score: None,
            url: None,
            num_comments: None,
            created_at: None,
            author: None,
            subreddit: None,
        }
    }

    #[must_use]
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.keyword)
    }
}

/// Number of mentions sharing one canonical key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionCount {
    pub canonical_id: String,
    pub count: u64,
}

/// A trending candidate after fusion and scoring.
///
/// `composite_score` is always `norm_price_change + norm_mentions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub canonical_id: String,
    pub display_name: String,
    pub price_change_pct_24h: f64,
    pub mention_count: u64,
    pub norm_price_change: f64,
    pub norm_mentions: f64,
    pub composite_score: f64,
}

/// One daily close from the price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

/// One reading of the sentiment index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub classification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub published_at: DateTime<Utc>,
    pub keyword: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl NewsArticle {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: f64,
}

/// A price-history row left-joined with the sentiment reading of the same
/// UTC date. Sentiment fields are `None` when no reading shares the date.
///
/// Kept flat so it serializes to a single CSV row or database row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSentimentRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
    pub sentiment_value: Option<f64>,
    pub sentiment_classification: Option<String>,
    pub sentiment_timestamp: Option<DateTime<Utc>>,
}

impl MarketSentimentRow {
    #[must_use]
    pub fn new(price: &PricePoint, sentiment: Option<&SentimentPoint>) -> Self {
        Self {
            date: price.date,
            open: price.open,
            high: price.high,
            low: price.low,
            close: price.close,
            volume: price.volume,
            sentiment_value: sentiment.map(|s| s.value),
            sentiment_classification: sentiment.and_then(|s| s.classification.clone()),
            sentiment_timestamp: sentiment.map(|s| s.timestamp),
        }
    }
}
