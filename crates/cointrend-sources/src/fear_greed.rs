//! Alternative.me Fear & Greed index history.

use cointrend_core::RawSentimentRow;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;
use crate::http::{endpoint, json_cell, HttpFetcher};

/// The API wraps readings in `data`; a bare array is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FngResponse {
    Wrapped { data: Vec<Value> },
    Bare(Vec<Value>),
}

/// Fetches the last `limit` readings; `0` requests the full history.
///
/// # Errors
///
/// Returns [`SourceError`] if the index cannot be fetched or decoded.
pub async fn fetch_index(
    http: &HttpFetcher,
    base_url: &str,
    limit: u32,
) -> Result<Vec<RawSentimentRow>, SourceError> {
    let url = endpoint(base_url, "fng/")?;
    let limit = limit.to_string();
    let body: FngResponse = http
        .fetch_json("fear_greed", |client| {
            client.get(url.clone()).query(&[("limit", limit.as_str())])
        })
        .await?;

    let readings = match body {
        FngResponse::Wrapped { data } | FngResponse::Bare(data) => data,
    };

    Ok(readings
        .iter()
        .map(|reading| RawSentimentRow {
            value: json_cell(reading.get("value")),
            value_classification: json_cell(reading.get("value_classification")),
            timestamp: json_cell(reading.get("timestamp")),
        })
        .collect())
}
