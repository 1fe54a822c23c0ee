//! Runs the collectors and lands their tables in the raw data directory.

use std::path::Path;

use cointrend_core::{
    AppConfig, Endpoints, RawInputs, RawMarketRow, RawMentionRow, RawNewsRow, RawPriceRow,
    RawSentimentRow, RawTickerRow, RedditCredentials, SourceKind, SourceTable, Watchlist,
};
use futures::future::join_all;
use serde::Serialize;

use crate::error::SourceError;
use crate::files::write_table;
use crate::http::{HttpFetcher, HttpSettings};
use crate::reddit::RedditQuery;
use crate::{binance, coingecko, fear_greed, news, reddit, yahoo};

/// Everything the collectors need, detached from the process configuration.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub http: HttpSettings,
    pub endpoints: Endpoints,
    pub coingecko_pages: u32,
    pub reddit: Option<RedditCredentials>,
    pub newsapi_key: Option<String>,
}

impl CollectorSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            http: HttpSettings::from_config(config),
            endpoints: config.endpoints.clone(),
            coingecko_pages: config.coingecko_pages,
            reddit: config.reddit.clone(),
            newsapi_key: config.newsapi_key.clone(),
        }
    }
}

/// Result of collecting one source.
#[derive(Debug)]
pub struct CollectOutcome {
    pub source: SourceKind,
    /// Rows fetched, or why the source could not be collected.
    pub result: Result<usize, SourceError>,
}

impl CollectOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct Collector {
    http: HttpFetcher,
    settings: CollectorSettings,
    watchlist: Watchlist,
}

impl Collector {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: CollectorSettings, watchlist: Watchlist) -> Result<Self, SourceError> {
        let http = HttpFetcher::new(&settings.http)?;
        Ok(Self {
            http,
            settings,
            watchlist,
        })
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the CoinGecko snapshot cannot be fetched.
    pub async fn fetch_market(&self) -> Result<Vec<RawMarketRow>, SourceError> {
        coingecko::fetch_markets(
            &self.http,
            &self.settings.endpoints.coingecko,
            self.settings.coingecko_pages,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`SourceError::MissingCredentials`] without Reddit credentials,
    /// or another [`SourceError`] if every keyword search fails.
    pub async fn fetch_mentions(&self) -> Result<Vec<RawMentionRow>, SourceError> {
        let credentials = self
            .settings
            .reddit
            .as_ref()
            .ok_or(SourceError::MissingCredentials("Reddit"))?;
        let query = RedditQuery {
            subreddit: &self.watchlist.subreddit,
            keywords: &self.watchlist.reddit_keywords,
            limit: self.watchlist.reddit_limit,
        };
        reddit::fetch_posts(
            &self.http,
            &self.settings.endpoints.reddit_auth,
            &self.settings.endpoints.reddit_api,
            credentials,
            &query,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the Yahoo chart cannot be fetched.
    pub async fn fetch_price_history(&self) -> Result<Vec<RawPriceRow>, SourceError> {
        yahoo::fetch_history(
            &self.http,
            &self.settings.endpoints.yahoo_chart,
            &self.watchlist.price_ticker,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the Fear & Greed index cannot be fetched.
    pub async fn fetch_sentiment_index(&self) -> Result<Vec<RawSentimentRow>, SourceError> {
        fear_greed::fetch_index(
            &self.http,
            &self.settings.endpoints.fear_greed,
            self.watchlist.fear_greed_limit,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`SourceError::MissingCredentials`] without a NewsAPI key, or
    /// another [`SourceError`] if every keyword fetch fails.
    pub async fn fetch_news(&self) -> Result<Vec<RawNewsRow>, SourceError> {
        let api_key = self
            .settings
            .newsapi_key
            .as_deref()
            .ok_or(SourceError::MissingCredentials("NewsAPI"))?;
        news::fetch_all_keywords(
            &self.http,
            &self.settings.endpoints.newsapi,
            api_key,
            &self.watchlist.news_keywords,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the Binance tickers cannot be fetched.
    pub async fn fetch_tickers(&self) -> Result<Vec<RawTickerRow>, SourceError> {
        binance::fetch_tickers(&self.http, &self.settings.endpoints.binance).await
    }

    /// Fetches every source concurrently into memory without touching disk.
    pub async fn fetch_inputs(&self) -> RawInputs {
        let (market, mentions, price_history, sentiment_index, news, tickers) = tokio::join!(
            self.fetch_market(),
            self.fetch_mentions(),
            self.fetch_price_history(),
            self.fetch_sentiment_index(),
            self.fetch_news(),
            self.fetch_tickers(),
        );
        RawInputs {
            market: into_table(SourceKind::Market, market),
            mentions: into_table(SourceKind::Mentions, mentions),
            price_history: into_table(SourceKind::PriceHistory, price_history),
            sentiment_index: into_table(SourceKind::SentimentIndex, sentiment_index),
            news: into_table(SourceKind::News, news),
            tickers: into_table(SourceKind::Tickers, tickers),
        }
    }

    /// Fetches one source and, unless `raw_dir` is `None`, writes it to its
    /// raw table file. Returns the number of rows fetched.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch or the write fails.
    pub async fn collect(
        &self,
        source: SourceKind,
        raw_dir: Option<&Path>,
    ) -> Result<usize, SourceError> {
        match source {
            SourceKind::Market => land(source, raw_dir, &self.fetch_market().await?),
            SourceKind::Mentions => land(source, raw_dir, &self.fetch_mentions().await?),
            SourceKind::PriceHistory => land(source, raw_dir, &self.fetch_price_history().await?),
            SourceKind::SentimentIndex => {
                land(source, raw_dir, &self.fetch_sentiment_index().await?)
            }
            SourceKind::News => land(source, raw_dir, &self.fetch_news().await?),
            SourceKind::Tickers => land(source, raw_dir, &self.fetch_tickers().await?),
        }
    }

    /// Collects `sources` concurrently. A failing source is reported in its
    /// outcome and never stops the others.
    pub async fn collect_all(
        &self,
        sources: &[SourceKind],
        raw_dir: Option<&Path>,
    ) -> Vec<CollectOutcome> {
        let futures = sources.iter().map(|&source| async move {
            let result = self.collect(source, raw_dir).await;
            match &result {
                Ok(rows) => tracing::info!(source = %source, rows, "collected"),
                Err(e) => tracing::warn!(source = %source, error = %e, "collection failed"),
            }
            CollectOutcome { source, result }
        });
        join_all(futures).await
    }
}

fn land<T: Serialize>(
    source: SourceKind,
    raw_dir: Option<&Path>,
    rows: &[T],
) -> Result<usize, SourceError> {
    if let Some(dir) = raw_dir {
        write_table(&dir.join(source.raw_file_name()), rows)?;
    }
    Ok(rows.len())
}

fn into_table<T>(source: SourceKind, result: Result<Vec<T>, SourceError>) -> SourceTable<T> {
    result.map_err(|e| {
        tracing::warn!(source = %source, error = %e, "source fetch failed");
        e.into()
    })
}
