//! Processing commands: `clean`, `trending`, `summary`.
//!
//! All of them read the raw data directory afresh and run the pipeline once.

use std::path::Path;

use cointrend_core::{AppConfig, SourceKind};
use cointrend_fusion::{run_pipeline, PipelineOptions, PipelineReport, SourceStatus};
use cointrend_sources::{load_raw_inputs, write_table};
use serde::Serialize;

use crate::output;

pub(crate) const MERGED_FILE_NAME: &str = "yahoo_fgi_merged.csv";
pub(crate) const TRENDING_FILE_NAME: &str = "trending_coins.csv";

/// Resolve the `--top-n` flag against the configured default.
///
/// # Errors
///
/// Returns an error if the flag is `0`.
pub(crate) fn top_n_or_default(config: &AppConfig, top_n: Option<usize>) -> anyhow::Result<usize> {
    match top_n {
        Some(0) => anyhow::bail!("--top-n must be at least 1"),
        Some(n) => Ok(n),
        None => Ok(config.default_top_n),
    }
}

/// Load the raw tables and run the pipeline once.
///
/// # Errors
///
/// Returns an error only for an invalid `top_n`; unreadable or malformed
/// sources are reported in the returned report.
pub(crate) fn process(config: &AppConfig, top_n: Option<usize>) -> anyhow::Result<PipelineReport> {
    let options = PipelineOptions {
        top_n: top_n_or_default(config, top_n)?,
        ..PipelineOptions::default()
    };
    Ok(process_dir(&config.raw_data_dir, &options))
}

pub(crate) fn process_dir(raw_dir: &Path, options: &PipelineOptions) -> PipelineReport {
    let report = run_pipeline(load_raw_inputs(raw_dir), options);
    for degraded in report.degraded_sources() {
        tracing::warn!(
            source = %degraded.source,
            status = %output::status_label(&degraded.status),
            "source degraded"
        );
    }
    report
}

/// Write every usable cleaned table, the aligned market/sentiment table and
/// the trending table to `dir`.
///
/// Sources that were unavailable or malformed keep whatever processed file
/// they already had.
///
/// # Errors
///
/// Returns an error if any file cannot be written.
pub(crate) fn write_processed_to(dir: &Path, report: &PipelineReport) -> anyhow::Result<()> {
    let tables = &report.tables;
    for source in SourceKind::ALL {
        if !matches!(
            report.status(source),
            Some(SourceStatus::Ready { .. } | SourceStatus::Empty)
        ) {
            tracing::warn!(source = %source, "skipping processed table for degraded source");
            continue;
        }
        let path = dir.join(source.processed_file_name());
        match source {
            SourceKind::Market => write_table(&path, &tables.market)?,
            SourceKind::Mentions => write_table(&path, &tables.mentions)?,
            SourceKind::PriceHistory => write_table(&path, &tables.price_history)?,
            SourceKind::SentimentIndex => write_table(&path, &tables.sentiment_index)?,
            SourceKind::News => write_table(&path, &tables.news)?,
            SourceKind::Tickers => write_table(&path, &tables.tickers)?,
        }
    }

    write_table(&dir.join(MERGED_FILE_NAME), &report.market_sentiment)?;
    write_table(&dir.join(TRENDING_FILE_NAME), &report.trending)?;

    tracing::info!(
        dir = %dir.display(),
        trending = report.trending.len(),
        merged = report.market_sentiment.len(),
        "processed tables written"
    );
    Ok(())
}

pub(crate) fn write_processed(config: &AppConfig, report: &PipelineReport) -> anyhow::Result<()> {
    write_processed_to(&config.processed_data_dir, report)
}

/// `clean`: process the raw tables and write the processed directory.
///
/// # Errors
///
/// Returns an error if a processed file cannot be written.
pub(crate) fn run_clean(config: &AppConfig) -> anyhow::Result<()> {
    let report = process(config, None)?;
    write_processed(config, &report)?;
    println!("{}", output::render_sources(&report.sources));
    Ok(())
}

/// `trending`: print the ranked entities.
///
/// # Errors
///
/// Returns an error for an invalid `top_n` or if JSON encoding fails.
pub(crate) fn run_trending(
    config: &AppConfig,
    top_n: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let report = process(config, top_n)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report.trending)?);
    } else {
        println!("{}", output::render_trending(&report.trending));
    }
    Ok(())
}

#[derive(Serialize)]
struct SummaryView<'a> {
    sources: &'a [cointrend_fusion::SourceReport],
    summary: &'a cointrend_fusion::Summary,
}

/// `summary`: print the summary tables and per-source statuses.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub(crate) fn run_summary(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let report = process(config, None)?;
    if json {
        let view = SummaryView {
            sources: &report.sources,
            summary: &report.summary,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", output::render_summary(&report.summary));
        println!("{}", output::render_sources(&report.sources));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const MARKET_CSV: &str = "id,symbol,name,current_price,market_cap,price_change_percentage_24h\n\
        alpha,alp,Alpha,1.0,100,10\n\
        beta,bet,Beta,2.0,200,5\n\
        gamma,gam,Gamma,3.0,300,-2\n";

    const MENTIONS_CSV: &str = "keyword,title,score,url,num_comments,created,author,subreddit\n\
        beta,b1,1,,0,1704067200,u,cryptocurrency\n\
        Beta,b2,1,,0,1704067200,u,cryptocurrency\n\
        alpha,a1,1,,0,1704067200,u,cryptocurrency\n";

    const PRICES_CSV: &str = "Date,Open,High,Low,Close,Volume\n\
        2024-01-01 00:00:00+00:00,1,2,0.5,1.5,10\n\
        2024-01-02 00:00:00+00:00,1.5,2,1,1.8,12\n";

    const FNG_CSV: &str = "value,value_classification,timestamp\n\
        40,Fear,1704067200\n";

    fn raw_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("coingecko_prices.csv"), MARKET_CSV).expect("write");
        fs::write(dir.path().join("reddit_posts.csv"), MENTIONS_CSV).expect("write");
        fs::write(dir.path().join("yahoo_crypto.csv"), PRICES_CSV).expect("write");
        fs::write(dir.path().join("fear_greed_index.csv"), FNG_CSV).expect("write");
        dir
    }

    #[test]
    fn processes_raw_directory_with_missing_sources() {
        let dir = raw_dir();
        let report = process_dir(dir.path(), &PipelineOptions::default());

        let names: Vec<&str> = report
            .trending
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(report.market_sentiment.len(), 2);
        assert!(matches!(
            report.status(SourceKind::News),
            Some(SourceStatus::Unavailable { .. })
        ));
    }

    #[test]
    fn writes_processed_and_merged_tables() {
        let raw = raw_dir();
        let out = tempfile::tempdir().expect("tempdir");
        let report = process_dir(raw.path(), &PipelineOptions::default());

        write_processed_to(out.path(), &report).expect("write processed");

        assert!(out.path().join(MERGED_FILE_NAME).exists());
        assert!(out.path().join(TRENDING_FILE_NAME).exists());
        assert!(out
            .path()
            .join(SourceKind::Market.processed_file_name())
            .exists());
        // news was never collected, so no processed file is produced for it
        assert!(!out.path().join(SourceKind::News.processed_file_name()).exists());

        let trending = fs::read_to_string(out.path().join(TRENDING_FILE_NAME)).expect("read");
        assert!(trending.starts_with("canonical_id,display_name"));
        assert_eq!(trending.lines().count(), 3);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let config = cointrend_core::build_app_config(|_| Err(std::env::VarError::NotPresent))
            .expect("default config");
        assert!(top_n_or_default(&config, Some(0)).is_err());
        assert_eq!(top_n_or_default(&config, None).unwrap(), config.default_top_n);
    }
}
