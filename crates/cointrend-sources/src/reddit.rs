//! Reddit subreddit search (client-credentials OAuth).

use cointrend_core::{RawMentionRow, RedditCredentials};
use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;
use crate::http::{endpoint, json_cell, HttpFetcher};

/// Reddit caps a listing page at 100 items.
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Post>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: Value,
}

/// Where the Reddit collector searches and how much it pulls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditQuery<'a> {
    pub subreddit: &'a str,
    pub keywords: &'a [String],
    /// Maximum posts per keyword.
    pub limit: usize,
}

/// Reddit API client holding a bearer token.
pub struct RedditClient<'a> {
    http: &'a HttpFetcher,
    api_base: String,
    token: String,
    user_agent: String,
}

impl<'a> RedditClient<'a> {
    /// Exchanges client credentials for an application-only token.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Api`] if Reddit rejects the credentials, or
    /// another [`SourceError`] if the exchange fails.
    pub async fn connect(
        http: &'a HttpFetcher,
        auth_base: &str,
        api_base: &str,
        credentials: &RedditCredentials,
    ) -> Result<Self, SourceError> {
        let url = endpoint(auth_base, "api/v1/access_token")?;
        let token: TokenResponse = http
            .fetch_json("reddit", |client| {
                client
                    .post(url.clone())
                    .header("User-Agent", &credentials.user_agent)
                    .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
                    .form(&[("grant_type", "client_credentials")])
            })
            .await?;

        let access_token = token.access_token.ok_or_else(|| SourceError::Api {
            provider: "Reddit",
            message: format!(
                "token exchange failed: {}",
                token.error.as_deref().unwrap_or("no access_token in response")
            ),
        })?;

        Ok(Self {
            http,
            api_base: api_base.to_string(),
            token: access_token,
            user_agent: credentials.user_agent.clone(),
        })
    }

    /// Searches `subreddit` for `keyword`, following `after` cursors until
    /// `limit` posts are collected or the listing ends. Every row is tagged
    /// with the keyword that found it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a page cannot be fetched or decoded.
    pub async fn search(
        &self,
        subreddit: &str,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<RawMentionRow>, SourceError> {
        let url = endpoint(&self.api_base, &format!("r/{subreddit}/search"))?;
        let bearer = format!("Bearer {}", self.token);
        let mut rows = Vec::new();
        let mut after: Option<String> = None;

        while rows.len() < limit {
            let page_size = (limit - rows.len()).min(MAX_PAGE_SIZE).to_string();
            let mut params: Vec<(&str, &str)> = vec![
                ("q", keyword),
                ("restrict_sr", "true"),
                ("sort", "relevance"),
                ("t", "all"),
                ("limit", page_size.as_str()),
                ("raw_json", "1"),
            ];
            if let Some(cursor) = after.as_deref() {
                params.push(("after", cursor));
            }

            let listing: Listing = self
                .http
                .fetch_json("reddit", |client| {
                    client
                        .get(url.clone())
                        .header("Authorization", &bearer)
                        .header("User-Agent", &self.user_agent)
                        .query(&params)
                })
                .await?;

            let page_len = listing.data.children.len();
            let remaining = limit - rows.len();
            rows.extend(
                listing
                    .data
                    .children
                    .iter()
                    .take(remaining)
                    .map(|post| to_row(keyword, &post.data)),
            );

            after = listing.data.after;
            if page_len == 0 || after.is_none() {
                break;
            }
        }

        tracing::debug!(keyword, posts = rows.len(), "collected Reddit posts");
        Ok(rows)
    }
}

fn to_row(keyword: &str, post: &Value) -> RawMentionRow {
    RawMentionRow {
        keyword: Some(keyword.to_string()),
        title: json_cell(post.get("title")),
        score: json_cell(post.get("score")),
        url: json_cell(post.get("url")),
        num_comments: json_cell(post.get("num_comments")),
        created: json_cell(post.get("created_utc")),
        author: json_cell(post.get("author")),
        subreddit: json_cell(post.get("subreddit")),
    }
}

/// Collects posts for every keyword in `query`.
///
/// A keyword whose search fails is skipped with a warning; the source fails
/// only when every keyword does.
///
/// # Errors
///
/// Returns [`SourceError`] if the token exchange fails or no keyword could be
/// searched.
pub async fn fetch_posts(
    http: &HttpFetcher,
    auth_base: &str,
    api_base: &str,
    credentials: &RedditCredentials,
    query: &RedditQuery<'_>,
) -> Result<Vec<RawMentionRow>, SourceError> {
    let client = RedditClient::connect(http, auth_base, api_base, credentials).await?;

    let mut rows = Vec::new();
    let mut last_error = None;
    let mut succeeded = 0usize;
    for keyword in query.keywords {
        match client.search(query.subreddit, keyword, query.limit).await {
            Ok(posts) => {
                succeeded += 1;
                rows.extend(posts);
            }
            Err(e) => {
                tracing::warn!(
                    source = "reddit",
                    keyword = %keyword,
                    error = %e,
                    "keyword search failed"
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
