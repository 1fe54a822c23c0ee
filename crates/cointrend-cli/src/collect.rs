//! `collect` command: fetch raw tables from the upstream providers.
//!
//! Every source is fetched independently; a failure is reported next to the
//! others and never stops them.

use std::io::ErrorKind;
use std::path::Path;

use cointrend_core::{AppConfig, ConfigError, SourceKind, Watchlist};
use cointrend_sources::{CollectOutcome, Collector, CollectorSettings};

/// Load the watchlist, falling back to the built-in defaults when the file
/// does not exist. A file that exists but does not parse or validate is an
/// error.
pub(crate) fn load_watchlist_or_default(path: &Path) -> anyhow::Result<Watchlist> {
    match cointrend_core::load_watchlist(path) {
        Ok(watchlist) => Ok(watchlist),
        Err(ConfigError::WatchlistFileIo { source, .. })
            if source.kind() == ErrorKind::NotFound =>
        {
            tracing::warn!(
                path = %path.display(),
                "watchlist file not found; using built-in defaults"
            );
            Ok(Watchlist::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Collect one source (or all of them) into the raw data directory.
///
/// With `dry_run` the tables are fetched and counted but not written.
/// Returns the per-source outcomes; failed sources have already been logged.
///
/// # Errors
///
/// Returns an error if the watchlist is invalid or the HTTP client cannot be
/// built. Per-source fetch failures are reported in the outcomes instead.
pub(crate) async fn run_collect(
    config: &AppConfig,
    source: Option<SourceKind>,
    dry_run: bool,
) -> anyhow::Result<Vec<CollectOutcome>> {
    let watchlist = load_watchlist_or_default(&config.watchlist_path)?;
    let collector = Collector::new(CollectorSettings::from_config(config), watchlist)
        .map_err(|e| anyhow::anyhow!("failed to build collector: {e}"))?;

    let sources: Vec<SourceKind> = source.map_or_else(|| SourceKind::ALL.to_vec(), |s| vec![s]);
    let raw_dir = (!dry_run).then_some(config.raw_data_dir.as_path());

    let outcomes = collector.collect_all(&sources, raw_dir).await;

    let prefix = if dry_run { "dry-run: " } else { "" };
    for outcome in &outcomes {
        match &outcome.result {
            Ok(rows) => println!("{prefix}{:<18}{rows} rows", outcome.source.to_string()),
            Err(e) => println!("{prefix}{:<18}failed: {e}", outcome.source.to_string()),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    tracing::info!(
        sources = outcomes.len(),
        failed,
        dry_run,
        "collection finished"
    );

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_watchlist_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let watchlist = load_watchlist_or_default(&dir.path().join("absent.yaml"))
            .expect("missing file should fall back");
        assert_eq!(watchlist, Watchlist::default());
    }

    #[test]
    fn invalid_watchlist_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"reddit_keywords: []\n").expect("write");
        assert!(load_watchlist_or_default(file.path()).is_err());
    }
}
