//! Binance spot ticker prices.

use cointrend_core::RawTickerRow;
use serde_json::Value;

use crate::error::SourceError;
use crate::http::{endpoint, json_cell, HttpFetcher};

/// # Errors
///
/// Returns [`SourceError`] if the ticker list cannot be fetched or decoded.
pub async fn fetch_tickers(
    http: &HttpFetcher,
    base_url: &str,
) -> Result<Vec<RawTickerRow>, SourceError> {
    let url = endpoint(base_url, "api/v3/ticker/price")?;
    let body: Vec<Value> = http
        .fetch_json("binance", |client| client.get(url.clone()))
        .await?;

    Ok(body
        .iter()
        .map(|ticker| RawTickerRow {
            symbol: json_cell(ticker.get("symbol")),
            price: json_cell(ticker.get("price")),
        })
        .collect())
}
