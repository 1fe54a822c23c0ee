use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The independent input tables the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Market,
    Mentions,
    PriceHistory,
    SentimentIndex,
    News,
    Tickers,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Market,
        SourceKind::Mentions,
        SourceKind::PriceHistory,
        SourceKind::SentimentIndex,
        SourceKind::News,
        SourceKind::Tickers,
    ];

    /// File name of this source's table inside the raw data directory.
    #[must_use]
    pub fn raw_file_name(self) -> &'static str {
        match self {
            SourceKind::Market => "coingecko_prices.csv",
            SourceKind::Mentions => "reddit_posts.csv",
            SourceKind::PriceHistory => "yahoo_crypto.csv",
            SourceKind::SentimentIndex => "fear_greed_index.csv",
            SourceKind::News => "news_articles.csv",
            SourceKind::Tickers => "binance_prices.csv",
        }
    }

    /// File name of this source's cleaned table inside the processed directory.
    #[must_use]
    pub fn processed_file_name(self) -> &'static str {
        match self {
            SourceKind::Market => "coingecko_prices_cleaned.csv",
            SourceKind::Mentions => "reddit_posts_cleaned.csv",
            SourceKind::PriceHistory => "yahoo_crypto_cleaned.csv",
            SourceKind::SentimentIndex => "fear_greed_index_cleaned.csv",
            SourceKind::News => "news_articles_cleaned.csv",
            SourceKind::Tickers => "binance_prices_cleaned.csv",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceKind::Market => "market",
            SourceKind::Mentions => "mentions",
            SourceKind::PriceHistory => "price-history",
            SourceKind::SentimentIndex => "sentiment-index",
            SourceKind::News => "news",
            SourceKind::Tickers => "tickers",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| {
                let known: Vec<String> = SourceKind::ALL.iter().map(ToString::to_string).collect();
                format!("unknown source '{s}'; expected one of: {}", known.join(", "))
            })
    }
}

/// Why a whole table could not be supplied for this run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceFailure {
    /// The provider could not deliver the table at all (missing file,
    /// transport error, timeout).
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The table was delivered but its structure could not be read.
    #[error("source malformed: {0}")]
    Malformed(String),
}

/// A table as handed over by a provider: rows, or the reason there are none.
pub type SourceTable<T> = Result<Vec<T>, SourceFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_from_str_agree() {
        for kind in SourceKind::ALL {
            let parsed: SourceKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_source_lists_choices() {
        let err = "prices".parse::<SourceKind>().unwrap_err();
        assert!(err.contains("price-history"), "got: {err}");
    }

    #[test]
    fn raw_file_names_are_distinct() {
        let mut names: Vec<&str> = SourceKind::ALL.iter().map(|k| k.raw_file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SourceKind::ALL.len());
    }
}
