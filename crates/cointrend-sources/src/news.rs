//! NewsAPI `/v2/everything` articles.

use cointrend_core::RawNewsRow;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;
use crate::http::{endpoint, json_cell, HttpFetcher};

const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Value>,
    message: Option<String>,
}

/// Fetches the newest English articles matching `keyword`.
///
/// The API key travels in the `X-Api-Key` header so it never appears in
/// logged URLs.
///
/// # Errors
///
/// Returns [`SourceError::Api`] if NewsAPI reports an error status, or another
/// [`SourceError`] if the request fails.
pub async fn fetch_articles(
    http: &HttpFetcher,
    base_url: &str,
    api_key: &str,
    keyword: &str,
) -> Result<Vec<RawNewsRow>, SourceError> {
    let url = endpoint(base_url, "v2/everything")?;
    let body: EverythingResponse = http
        .fetch_json("news", |client| {
            client.get(url.clone()).header("X-Api-Key", api_key).query(&[
                ("q", keyword),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("pageSize", PAGE_SIZE),
            ])
        })
        .await?;

    if body.status != "ok" {
        return Err(SourceError::Api {
            provider: "NewsAPI",
            message: body.message.unwrap_or(body.status),
        });
    }

    Ok(body
        .articles
        .iter()
        .map(|article| RawNewsRow {
            keyword: Some(keyword.to_string()),
            source: json_cell(article.get("source").and_then(|s| s.get("name"))),
            author: json_cell(article.get("author")),
            title: json_cell(article.get("title")),
            url: json_cell(article.get("url")),
            published_at: json_cell(article.get("publishedAt")),
        })
        .collect())
}

/// Articles for every keyword, combined in keyword order.
///
/// A failing keyword is skipped with a warning; the source fails only when
/// every keyword does.
///
/// # Errors
///
/// Returns the last [`SourceError`] when no keyword could be fetched.
pub async fn fetch_all_keywords(
    http: &HttpFetcher,
    base_url: &str,
    api_key: &str,
    keywords: &[String],
) -> Result<Vec<RawNewsRow>, SourceError> {
    let mut rows = Vec::new();
    let mut last_error = None;
    let mut succeeded = 0usize;
    for keyword in keywords {
        match fetch_articles(http, base_url, api_key, keyword).await {
            Ok(articles) => {
                tracing::debug!(keyword = %keyword, articles = articles.len(), "fetched news");
                succeeded += 1;
                rows.extend(articles);
            }
            Err(e) => {
                tracing::warn!(
                    source = "news",
                    keyword = %keyword,
                    error = %e,
                    "keyword fetch failed"
                );
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if succeeded == 0 => Err(e),
        _ => Ok(rows),
    }
}
