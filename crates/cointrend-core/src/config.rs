use crate::app_config::{AppConfig, Endpoints, Environment, RedditCredentials};
use crate::ConfigError;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_BINANCE_URL: &str = "https://api.binance.com";
pub const DEFAULT_FEAR_GREED_URL: &str = "https://api.alternative.me";
pub const DEFAULT_YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_NEWSAPI_URL: &str = "https://newsapi.org";
pub const DEFAULT_REDDIT_API_URL: &str = "https://oauth.reddit.com";
pub const DEFAULT_REDDIT_AUTH_URL: &str = "https://www.reddit.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment, so
/// tests can drive it with a plain `HashMap`.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("COINTREND_ENV", "development"))?;
    let log_level = or_default("COINTREND_LOG_LEVEL", "info");
    let bind_addr = or_default("COINTREND_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("COINTREND_BIND_ADDR", e.to_string()))?;

    let raw_data_dir = PathBuf::from(or_default("COINTREND_RAW_DATA_DIR", "./data/raw"));
    let processed_data_dir = PathBuf::from(or_default(
        "COINTREND_PROCESSED_DATA_DIR",
        "./data/processed",
    ));
    let watchlist_path = PathBuf::from(or_default(
        "COINTREND_WATCHLIST_PATH",
        "./config/watchlist.yaml",
    ));

    let default_top_n = parse_usize("COINTREND_TOP_N", "5")?;
    if default_top_n == 0 {
        return Err(invalid("COINTREND_TOP_N", "must be at least 1".to_string()));
    }

    let source_timeout_secs = parse_u64("COINTREND_SOURCE_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("COINTREND_USER_AGENT", "cointrend/0.1 (market-intelligence)");
    let max_retries = parse_u32("COINTREND_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("COINTREND_RETRY_BACKOFF_BASE_MS", "500")?;
    let coingecko_pages = parse_u32("COINTREND_COINGECKO_PAGES", "3")?;

    let endpoints = Endpoints {
        coingecko: or_default("COINGECKO_API_URL", DEFAULT_COINGECKO_URL),
        binance: or_default("BINANCE_API_URL", DEFAULT_BINANCE_URL),
        fear_greed: or_default("FEAR_GREED_API_URL", DEFAULT_FEAR_GREED_URL),
        yahoo_chart: or_default("YAHOO_CHART_API_URL", DEFAULT_YAHOO_CHART_URL),
        newsapi: or_default("NEWSAPI_URL", DEFAULT_NEWSAPI_URL),
        reddit_api: or_default("REDDIT_API_URL", DEFAULT_REDDIT_API_URL),
        reddit_auth: or_default("REDDIT_AUTH_URL", DEFAULT_REDDIT_AUTH_URL),
    };

    // Reddit is all-or-nothing: a partial credential set is a misconfiguration,
    // an empty one just disables the source.
    let reddit = match (
        optional("REDDIT_CLIENT_ID"),
        optional("REDDIT_CLIENT_SECRET"),
    ) {
        (Some(client_id), Some(client_secret)) => Some(RedditCredentials {
            client_id,
            client_secret,
            user_agent: or_default("REDDIT_USER_AGENT", &user_agent),
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::MissingEnvVar("REDDIT_CLIENT_SECRET".to_string()))
        }
        (None, Some(_)) => return Err(ConfigError::MissingEnvVar("REDDIT_CLIENT_ID".to_string())),
    };

    let newsapi_key = optional("NEWSAPI_KEY");
    let database_url = optional("DATABASE_URL");

    let db_max_connections = parse_u32("COINTREND_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("COINTREND_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("COINTREND_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        log_level,
        bind_addr,
        raw_data_dir,
        processed_data_dir,
        watchlist_path,
        default_top_n,
        source_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        coingecko_pages,
        endpoints,
        reddit,
        newsapi_key,
        database_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COINTREND_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
