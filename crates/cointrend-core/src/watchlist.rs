use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::keys::canonical_key;
use crate::ConfigError;

/// Query keywords and source parameters the collectors search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watchlist {
    pub subreddit: String,
    pub reddit_keywords: Vec<String>,
    /// Maximum posts fetched per Reddit keyword.
    pub reddit_limit: usize,
    pub news_keywords: Vec<String>,
    pub price_ticker: String,
    /// Number of Fear & Greed readings to request; `0` means full history.
    pub fear_greed_limit: u32,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            subreddit: "cryptocurrency".to_string(),
            reddit_keywords: ["bitcoin", "ethereum", "ripple", "litecoin", "cardano"]
                .map(String::from)
                .to_vec(),
            reddit_limit: 1000,
            news_keywords: ["bitcoin", "crypto", "ethereum"].map(String::from).to_vec(),
            price_ticker: "BTC-USD".to_string(),
            fear_greed_limit: 0,
        }
    }
}

/// Load and validate the watchlist from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watchlist(path: &Path) -> Result<Watchlist, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let watchlist: Watchlist = serde_yaml::from_str(&content)?;
    validate_watchlist(&watchlist)?;

    Ok(watchlist)
}

fn validate_watchlist(watchlist: &Watchlist) -> Result<(), ConfigError> {
    if watchlist.subreddit.trim().is_empty() {
        return Err(ConfigError::Validation(
            "subreddit must be non-empty".to_string(),
        ));
    }
    if watchlist.price_ticker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "price_ticker must be non-empty".to_string(),
        ));
    }
    validate_keywords("reddit_keywords", &watchlist.reddit_keywords)?;
    validate_keywords("news_keywords", &watchlist.news_keywords)?;
    Ok(())
}

fn validate_keywords(field: &str, keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must list at least one keyword"
        )));
    }

    let mut seen = HashSet::new();
    for keyword in keywords {
        let key = canonical_key(keyword);
        if key.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{field} contains a blank keyword"
            )));
        }
        if !seen.insert(key.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate keyword in {field}: '{keyword}' (canonical '{key}')"
            )));
        }
    }
    Ok(())
}
