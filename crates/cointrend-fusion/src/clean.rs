//! Per-source cleaners.
//!
//! Each cleaner coerces the typed columns of one raw table, drops the rows a
//! required column cannot be coerced for, and reports every drop. Cleaners
//! never look at another source's table.

use chrono::{DateTime, Utc};
use cointrend_core::{
    MarketRecord, MentionRecord, NewsArticle, PricePoint, RawMarketRow, RawMentionRow,
    RawNewsRow, RawPriceRow, RawSentimentRow, RawTickerRow, SentimentPoint, TickerPrice,
};

use crate::error::MalformedRecord;
use crate::timestamps::{
    parse_any_timestamp, parse_datetime, parse_epoch_seconds, parse_f64, parse_i64,
};

/// Rows that survived cleaning, plus one issue per dropped row.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<T> {
    pub rows: Vec<T>,
    pub issues: Vec<MalformedRecord>,
}

impl<T> Cleaned<T> {
    fn collect<R>(
        raw: &[R],
        mut clean_row: impl FnMut(usize, &R) -> Result<T, MalformedRecord>,
    ) -> Self {
        let mut rows = Vec::with_capacity(raw.len());
        let mut issues = Vec::new();
        for (idx, row) in raw.iter().enumerate() {
            match clean_row(idx + 1, row) {
                Ok(clean) => rows.push(clean),
                Err(issue) => {
                    tracing::debug!(error = %issue, "dropping malformed row");
                    issues.push(issue);
                }
            }
        }
        Self { rows, issues }
    }

    #[must_use]
    pub fn dropped(&self) -> usize {
        self.issues.len()
    }
}

fn cell(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn owned(value: Option<&String>) -> Option<String> {
    cell(value).map(str::to_string)
}

fn lenient_f64(value: Option<&String>) -> Option<f64> {
    cell(value).and_then(parse_f64)
}

fn require<'a>(
    row: usize,
    column: &'static str,
    value: Option<&'a String>,
) -> Result<&'a str, MalformedRecord> {
    cell(value).ok_or(MalformedRecord::Missing { row, column })
}

fn coerce<T>(
    row: usize,
    column: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, MalformedRecord> {
    parse(value).ok_or_else(|| MalformedRecord::Unparsable {
        row,
        column,
        value: value.to_string(),
    })
}

/// Market snapshot: a blank 24h change is kept as absent, a non-numeric one
/// drops the row.
#[must_use]
pub fn clean_market(raw: &[RawMarketRow]) -> Cleaned<MarketRecord> {
    Cleaned::collect(raw, |row, r| {
        let price_change_pct_24h = match cell(r.price_change_percentage_24h.as_ref()) {
            None => None,
            Some(text) => Some(coerce(row, "price_change_percentage_24h", text, parse_f64)?),
        };
        Ok(MarketRecord {
            coin_id: owned(r.id.as_ref()),
            symbol: owned(r.symbol.as_ref()),
            display_name: r.name.as_deref().unwrap_or_default().to_string(),
            current_price: lenient_f64(r.current_price.as_ref()),
            market_cap: lenient_f64(r.market_cap.as_ref()),
            price_change_pct_24h,
        })
    })
}

/// Social mentions: nothing is required, so no row is ever dropped. A missing
/// keyword is carried as empty and excluded later by the aggregator.
#[must_use]
pub fn clean_mentions(raw: &[RawMentionRow]) -> Cleaned<MentionRecord> {
    Cleaned::collect(raw, |_, r| {
        Ok(MentionRecord {
            keyword: r.keyword.as_deref().unwrap_or_default().to_string(),
            title: owned(r.title.as_ref()),
            score: cell(r.score.as_ref()).and_then(parse_i64),
            url: owned(r.url.as_ref()),
            num_comments: cell(r.num_comments.as_ref()).and_then(parse_i64),
            created_at: cell(r.created.as_ref()).and_then(parse_any_timestamp),
            author: owned(r.author.as_ref()),
            subreddit: owned(r.subreddit.as_ref()),
        })
    })
}

/// Daily price bars: `Date` and `Close` are required.
#[must_use]
pub fn clean_price_history(raw: &[RawPriceRow]) -> Cleaned<PricePoint> {
    Cleaned::collect(raw, |row, r| {
        let timestamp: DateTime<Utc> =
            coerce(row, "Date", require(row, "Date", r.date.as_ref())?, parse_datetime)?;
        let close = coerce(row, "Close", require(row, "Close", r.close.as_ref())?, parse_f64)?;
        Ok(PricePoint {
            date: timestamp.date_naive(),
            timestamp,
            open: lenient_f64(r.open.as_ref()),
            high: lenient_f64(r.high.as_ref()),
            low: lenient_f64(r.low.as_ref()),
            close,
            volume: lenient_f64(r.volume.as_ref()),
        })
    })
}

/// Sentiment index readings: epoch-seconds `timestamp` and numeric `value`
/// are required; the label is optional.
#[must_use]
pub fn clean_sentiment_index(raw: &[RawSentimentRow]) -> Cleaned<SentimentPoint> {
    Cleaned::collect(raw, |row, r| {
        let timestamp = coerce(
            row,
            "timestamp",
            require(row, "timestamp", r.timestamp.as_ref())?,
            parse_epoch_seconds,
        )?;
        let value = coerce(row, "value", require(row, "value", r.value.as_ref())?, parse_f64)?;
        Ok(SentimentPoint {
            date: timestamp.date_naive(),
            timestamp,
            value,
            classification: owned(r.value_classification.as_ref()),
        })
    })
}

#[must_use]
pub fn clean_news(raw: &[RawNewsRow]) -> Cleaned<NewsArticle> {
    Cleaned::collect(raw, |row, r| {
        let published_at = coerce(
            row,
            "publishedAt",
            require(row, "publishedAt", r.published_at.as_ref())?,
            parse_datetime,
        )?;
        Ok(NewsArticle {
            published_at,
            keyword: owned(r.keyword.as_ref()),
            source: owned(r.source.as_ref()),
            author: owned(r.author.as_ref()),
            title: owned(r.title.as_ref()),
            url: owned(r.url.as_ref()),
        })
    })
}

#[must_use]
pub fn clean_tickers(raw: &[RawTickerRow]) -> Cleaned<TickerPrice> {
    Cleaned::collect(raw, |row, r| {
        let price = coerce(row, "price", require(row, "price", r.price.as_ref())?, parse_f64)?;
        Ok(TickerPrice {
            symbol: r.symbol.as_deref().map(str::trim).unwrap_or_default().to_string(),
            price,
        })
    })
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
