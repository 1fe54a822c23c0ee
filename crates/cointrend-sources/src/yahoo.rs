//! Yahoo Finance daily chart history.

use chrono::DateTime;
use cointrend_core::RawPriceRow;
use serde::Deserialize;

use crate::error::SourceError;
use crate::http::{endpoint, HttpFetcher};

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

/// Fetches the full daily history of `ticker` (e.g. `BTC-USD`).
///
/// Bars are written with a `YYYY-MM-DD HH:MM:SS+00:00` date.
///
/// # Errors
///
/// Returns [`SourceError::Api`] if Yahoo reports a chart error, or another
/// [`SourceError`] if the chart cannot be fetched or decoded.
pub async fn fetch_history(
    http: &HttpFetcher,
    base_url: &str,
    ticker: &str,
) -> Result<Vec<RawPriceRow>, SourceError> {
    let url = endpoint(base_url, &format!("v8/finance/chart/{ticker}"))?;
    let envelope: ChartEnvelope = http
        .fetch_json("yahoo", |client| {
            client
                .get(url.clone())
                .query(&[("range", "max"), ("interval", "1d")])
        })
        .await?;

    if let Some(err) = envelope.chart.error {
        return Err(SourceError::Api {
            provider: "Yahoo",
            message: err
                .description
                .or(err.code)
                .unwrap_or_else(|| "unknown chart error".to_string()),
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let cell = |series: &[Option<f64>], i: usize| -> Option<String> {
        series.get(i).copied().flatten().map(|v| v.to_string())
    };

    Ok(result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, &ts)| RawPriceRow {
            date: DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%:z").to_string()),
            open: cell(&quote.open, i),
            high: cell(&quote.high, i),
            low: cell(&quote.low, i),
            close: cell(&quote.close, i),
            volume: cell(&quote.volume, i),
        })
        .collect())
}
