//! One synchronous pass from raw tables to ranked and aligned outputs.

use cointrend_core::{
    MarketRecord, MarketSentimentRow, MentionRecord, NewsArticle, PricePoint, RawInputs,
    ScoredEntity, SentimentPoint, SourceFailure, SourceKind, SourceTable, TickerPrice,
};
use serde::Serialize;

use crate::align::align_market_sentiment;
use crate::clean::{
    clean_market, clean_mentions, clean_news, clean_price_history, clean_sentiment_index,
    clean_tickers, Cleaned,
};
use crate::scoring::{score_trending, DEFAULT_TOP_N};
use crate::summary::{summarize, Summary, SummaryInputs, DEFAULT_SUMMARY_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub top_n: usize,
    /// Row limit for the ranked summary tables.
    pub summary_limit: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            summary_limit: DEFAULT_SUMMARY_LIMIT,
        }
    }
}

/// What became of one source during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// Delivered and cleaned with at least one usable row. `dropped` rows
    /// failed coercion.
    Ready { rows: usize, dropped: usize },
    /// Delivered with zero rows.
    Empty,
    Unavailable { reason: String },
    /// Structure unreadable, or every delivered row failed coercion.
    Malformed { reason: String },
}

impl SourceStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    #[serde(flatten)]
    pub status: SourceStatus,
}

/// Cleaned rows of every source. Sources that were not ready contribute
/// empty tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTables {
    pub market: Vec<MarketRecord>,
    pub mentions: Vec<MentionRecord>,
    pub price_history: Vec<PricePoint>,
    pub sentiment_index: Vec<SentimentPoint>,
    pub news: Vec<NewsArticle>,
    pub tickers: Vec<TickerPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub sources: Vec<SourceReport>,
    pub trending: Vec<ScoredEntity>,
    pub market_sentiment: Vec<MarketSentimentRow>,
    pub summary: Summary,
    #[serde(skip)]
    pub tables: CleanTables,
}

impl PipelineReport {
    /// Sources that did not deliver usable rows this run.
    #[must_use]
    pub fn degraded_sources(&self) -> Vec<&SourceReport> {
        self.sources
            .iter()
            .filter(|report| !report.status.is_ready())
            .collect()
    }

    #[must_use]
    pub fn status(&self, source: SourceKind) -> Option<&SourceStatus> {
        self.sources
            .iter()
            .find(|report| report.source == source)
            .map(|report| &report.status)
    }
}

/// Cleans every delivered table independently.
#[must_use]
pub fn clean_inputs(inputs: RawInputs) -> (CleanTables, Vec<SourceReport>) {
    let mut reports = Vec::with_capacity(SourceKind::ALL.len());

    let market = clean_source(SourceKind::Market, inputs.market, clean_market, &mut reports);
    let mentions = clean_source(
        SourceKind::Mentions,
        inputs.mentions,
        clean_mentions,
        &mut reports,
    );
    let price_history = clean_source(
        SourceKind::PriceHistory,
        inputs.price_history,
        clean_price_history,
        &mut reports,
    );
    let sentiment_index = clean_source(
        SourceKind::SentimentIndex,
        inputs.sentiment_index,
        clean_sentiment_index,
        &mut reports,
    );
    let news = clean_source(SourceKind::News, inputs.news, clean_news, &mut reports);
    let tickers = clean_source(SourceKind::Tickers, inputs.tickers, clean_tickers, &mut reports);

    let tables = CleanTables {
        market,
        mentions,
        price_history,
        sentiment_index,
        news,
        tickers,
    };
    (tables, reports)
}

/// Runs cleaning, scoring, alignment and summaries over `inputs`.
///
/// Never fails: a missing or malformed source yields empty rows for that
/// source and a non-ready entry in [`PipelineReport::sources`].
#[must_use]
pub fn run_pipeline(inputs: RawInputs, options: &PipelineOptions) -> PipelineReport {
    let (tables, sources) = clean_inputs(inputs);

    let trending = score_trending(&tables.market, &tables.mentions, options.top_n);
    let market_sentiment = align_market_sentiment(&tables.price_history, &tables.sentiment_index);

    let summary = summarize(
        SummaryInputs {
            market: &tables.market,
            mentions: &tables.mentions,
            sentiment: &tables.sentiment_index,
            news: &tables.news,
            tickers: &tables.tickers,
            trending: &trending,
            aligned: &market_sentiment,
        },
        options.summary_limit,
    );

    let degraded = sources.iter().filter(|r| !r.status.is_ready()).count();
    tracing::info!(
        trending = trending.len(),
        aligned_rows = market_sentiment.len(),
        degraded_sources = degraded,
        "pipeline run complete"
    );

    PipelineReport {
        sources,
        trending,
        market_sentiment,
        summary,
        tables,
    }
}

fn clean_source<R, T>(
    source: SourceKind,
    table: SourceTable<R>,
    cleaner: fn(&[R]) -> Cleaned<T>,
    reports: &mut Vec<SourceReport>,
) -> Vec<T> {
    let (rows, status) = match table {
        Err(SourceFailure::Unavailable(reason)) => {
            tracing::warn!(source = %source, reason = %reason, "source unavailable");
            (Vec::new(), SourceStatus::Unavailable { reason })
        }
        Err(SourceFailure::Malformed(reason)) => {
            tracing::warn!(source = %source, reason = %reason, "source malformed");
            (Vec::new(), SourceStatus::Malformed { reason })
        }
        Ok(raw) if raw.is_empty() => {
            tracing::warn!(source = %source, "source delivered no rows");
            (Vec::new(), SourceStatus::Empty)
        }
        Ok(raw) => {
            let cleaned = cleaner(&raw);
            let dropped = cleaned.dropped();
            if dropped > 0 {
                tracing::warn!(
                    source = %source,
                    rows = cleaned.rows.len(),
                    dropped,
                    "dropped malformed rows"
                );
            } else {
                tracing::debug!(source = %source, rows = cleaned.rows.len(), "source cleaned");
            }
            // Rows were delivered but none survived coercion.
            let status = if cleaned.rows.is_empty() {
                SourceStatus::Malformed {
                    reason: format!("all {dropped} rows failed coercion"),
                }
            } else {
                SourceStatus::Ready {
                    rows: cleaned.rows.len(),
                    dropped,
                }
            };
            (cleaned.rows, status)
        }
    };
    reports.push(SourceReport { source, status });
    rows
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
