//! Postgres commands: `store` and `db`.

use chrono::Utc;
use clap::Subcommand;
use cointrend_core::AppConfig;
use cointrend_fusion::PipelineReport;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = cointrend_db::connect_pool_from_config(config).await?;
    Ok(pool)
}

/// Append the report's trending snapshot and aligned rows to Postgres.
///
/// Pending migrations are applied first so a fresh database works.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or any insert fails.
pub(crate) async fn store_report(config: &AppConfig, report: &PipelineReport) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    cointrend_db::run_migrations(&pool).await?;

    let snapshot_id =
        cointrend_db::insert_trending_snapshot(&pool, Utc::now(), &report.trending).await?;
    let batch_id =
        cointrend_db::insert_market_sentiment_batch(&pool, &report.market_sentiment).await?;

    tracing::info!(
        %snapshot_id,
        %batch_id,
        trending = report.trending.len(),
        rows = report.market_sentiment.len(),
        "stored pipeline outputs"
    );
    println!(
        "stored trending snapshot {snapshot_id} ({} entities) and market/sentiment batch {batch_id} ({} rows)",
        report.trending.len(),
        report.market_sentiment.len()
    );
    Ok(())
}

/// Run a `db` sub-command.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or a migration fails.
pub(crate) async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match command {
        DbCommands::Ping => {
            cointrend_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = cointrend_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}
