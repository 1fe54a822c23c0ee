mod analyze;
mod collect;
mod output;
mod store;

use clap::{Parser, Subcommand};
use cointrend_core::SourceKind;
use tracing_subscriber::EnvFilter;

use crate::store::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "cointrend-cli")]
#[command(about = "Crypto market intelligence: collect, fuse, and rank trending assets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch raw tables from the upstream providers into the raw data directory
    Collect {
        /// Collect a single source (market, mentions, price-history,
        /// sentiment-index, news, tickers)
        #[arg(long)]
        source: Option<SourceKind>,

        /// Fetch and report row counts without writing any files
        #[arg(long)]
        dry_run: bool,
    },
    /// Clean every raw table and write the processed and merged tables
    Clean,
    /// Print the ranked trending assets
    Trending {
        /// Number of entities to rank (defaults to `COINTREND_TOP_N`)
        #[arg(long)]
        top_n: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the summary tables and the status of every source
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Collect, process, and report in one pass
    Run {
        #[arg(long)]
        top_n: Option<usize>,

        /// Reuse the tables already in the raw data directory
        #[arg(long)]
        skip_collect: bool,

        /// Also store the trending snapshot and aligned rows in Postgres
        #[arg(long)]
        store: bool,
    },
    /// Store the current trending snapshot and aligned rows in Postgres
    Store {
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cointrend_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Collect { source, dry_run }) => {
            let outcomes = collect::run_collect(&config, source, dry_run).await?;
            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            if failed > 0 {
                anyhow::bail!("{failed} of {} sources failed to collect", outcomes.len());
            }
        }
        Some(Commands::Clean) => analyze::run_clean(&config)?,
        Some(Commands::Trending { top_n, json }) => analyze::run_trending(&config, top_n, json)?,
        Some(Commands::Summary { json }) => analyze::run_summary(&config, json)?,
        Some(Commands::Run {
            top_n,
            skip_collect,
            store,
        }) => {
            if !skip_collect {
                collect::run_collect(&config, None, false).await?;
            }
            let report = analyze::process(&config, top_n)?;
            analyze::write_processed(&config, &report)?;
            println!("{}", output::render_trending(&report.trending));
            println!("{}", output::render_sources(&report.sources));
            if store {
                store::store_report(&config, &report).await?;
            }
        }
        Some(Commands::Store { top_n }) => {
            let report = analyze::process(&config, top_n)?;
            store::store_report(&config, &report).await?;
        }
        Some(Commands::Db { command }) => store::run_db(&config, command).await?,
        None => println!("cointrend-cli ready; run with --help to list commands"),
    }

    Ok(())
}
