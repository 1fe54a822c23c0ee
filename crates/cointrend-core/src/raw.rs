//! Raw table rows as they sit in the raw data directory.
//!
//! Every cell is an optional string: nothing is coerced here. Type coercion
//! happens at the cleaner boundary, where bad cells become dropped rows rather
//! than failed loads. Column names match the upstream APIs so the CSV files
//! stay interchangeable with other tooling.

use serde::{Deserialize, Serialize};

use crate::source::SourceTable;

/// One row of the CoinGecko `/coins/markets` snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMarketRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: Option<String>,
    #[serde(default)]
    pub market_cap: Option<String>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<String>,
}

/// One Reddit post matched by a search keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMentionRow {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub num_comments: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subreddit: Option<String>,
}

/// One daily bar of price history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPriceRow {
    #[serde(rename = "Date", alias = "date", default)]
    pub date: Option<String>,
    #[serde(rename = "Open", alias = "open", default)]
    pub open: Option<String>,
    #[serde(rename = "High", alias = "high", default)]
    pub high: Option<String>,
    #[serde(rename = "Low", alias = "low", default)]
    pub low: Option<String>,
    #[serde(rename = "Close", alias = "close", default)]
    pub close: Option<String>,
    #[serde(rename = "Volume", alias = "volume", default)]
    pub volume: Option<String>,
}

/// One Fear & Greed index reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSentimentRow {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub value_classification: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One news article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNewsRow {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "publishedAt", alias = "published_at", default)]
    pub published_at: Option<String>,
}

/// One Binance spot ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTickerRow {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

/// Everything a single pipeline run reads, one independently obtained table
/// per source.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub market: SourceTable<RawMarketRow>,
    pub mentions: SourceTable<RawMentionRow>,
    pub price_history: SourceTable<RawPriceRow>,
    pub sentiment_index: SourceTable<RawSentimentRow>,
    pub news: SourceTable<RawNewsRow>,
    pub tickers: SourceTable<RawTickerRow>,
}

impl Default for RawInputs {
    /// All sources present and empty.
    fn default() -> Self {
        Self {
            market: Ok(Vec::new()),
            mentions: Ok(Vec::new()),
            price_history: Ok(Vec::new()),
            sentiment_index: Ok(Vec::new()),
            news: Ok(Vec::new()),
            tickers: Ok(Vec::new()),
        }
    }
}
