//! CoinGecko `/coins/markets` snapshot.

use cointrend_core::RawMarketRow;
use serde_json::Value;

use crate::error::SourceError;
use crate::http::{endpoint, json_cell, HttpFetcher};

pub const PER_PAGE: u32 = 250;

/// Fetches up to `pages` pages of USD market data ordered by market cap.
///
/// Stops early when a page comes back empty.
///
/// # Errors
///
/// Returns [`SourceError`] if any page cannot be fetched or decoded.
pub async fn fetch_markets(
    http: &HttpFetcher,
    base_url: &str,
    pages: u32,
) -> Result<Vec<RawMarketRow>, SourceError> {
    let url = endpoint(base_url, "coins/markets")?;
    let per_page = PER_PAGE.to_string();
    let mut rows = Vec::new();

    for page in 1..=pages {
        let page_param = page.to_string();
        let body: Vec<Value> = http
            .fetch_json("coingecko", |client| {
                client.get(url.clone()).query(&[
                    ("vs_currency", "usd"),
                    ("order", "market_cap_desc"),
                    ("per_page", per_page.as_str()),
                    ("page", page_param.as_str()),
                    ("sparkline", "false"),
                ])
            })
            .await?;

        tracing::debug!(page, rows = body.len(), "fetched CoinGecko page");
        if body.is_empty() {
            break;
        }
        rows.extend(body.iter().map(to_row));
    }

    Ok(rows)
}

fn to_row(coin: &Value) -> RawMarketRow {
    RawMarketRow {
        id: json_cell(coin.get("id")),
        symbol: json_cell(coin.get("symbol")),
        name: json_cell(coin.get("name")),
        current_price: json_cell(coin.get("current_price")),
        market_cap: json_cell(coin.get("market_cap")),
        price_change_percentage_24h: json_cell(coin.get("price_change_percentage_24h")),
    }
}
