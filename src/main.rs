//! Bybit Trading Journal Generator
//!
//! Reconstructs trades from a Bybit account's execution history and writes
//! a markdown journal with per-trade KPIs and account statistics.

use bybit_journal::{
    client::{auth::RequestSigner, BybitClient},
    config::{Config, LoggingConfig},
    pipeline::JournalPipeline,
    types::Timeframe,
};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bybit-journal")]
#[command(about = "Trading journal generator for Bybit derivatives accounts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the account history and write the journal file
    Generate {
        /// Start date (YYYY-MM-DD, or YYYY-MM for monthly journals).
        /// Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Journal timeframe: daily, weekly or monthly
        #[arg(short, long, default_value = "daily")]
        timeframe: String,
    },
    /// Compute and print the account stats without writing a file
    Preview {
        /// Start date (YYYY-MM-DD, or YYYY-MM for monthly journals).
        /// Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Journal timeframe: daily, weekly or monthly
        #[arg(short, long, default_value = "daily")]
        timeframe: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    init_logging(&config.logging);

    match cli.command {
        Commands::Generate { date, timeframe } => {
            let (date, timeframe) = resolve_window(date, &timeframe)?;
            let client = BybitClient::new(config.api.clone(), RequestSigner::from_env()?)?;
            let pipeline = JournalPipeline::new(config, date, timeframe);

            match pipeline.run(&client).await {
                Ok(path) => {
                    tracing::info!("journal written to {}", path.display());
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("error caught while running the pipeline: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Preview { date, timeframe } => {
            let (date, timeframe) = resolve_window(date, &timeframe)?;
            let client = BybitClient::new(config.api.clone(), RequestSigner::from_env()?)?;
            let pipeline = JournalPipeline::new(config, date, timeframe);

            let raw = pipeline.fetch(&client).await?;
            let data = pipeline.build(&raw)?;
            print_stats(&data.stats, data.trades.len());
            Ok(())
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.log_to_file {
        let file_appender = tracing_appender::rolling::daily(&logging.log_dir, "bybit-journal");
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Resolve CLI date/timeframe inputs, falling back with a warning on an
/// unsupported timeframe instead of aborting.
fn resolve_window(date: Option<String>, timeframe: &str) -> anyhow::Result<(NaiveDate, Timeframe)> {
    let timeframe = match timeframe.parse::<Timeframe>() {
        Ok(tf) => tf,
        Err(e) => {
            tracing::warn!("{e}, defaulting to the daily timeframe");
            Timeframe::Daily
        }
    };

    let date = match date {
        None => Utc::now().date_naive(),
        Some(raw) => parse_start_date(&raw)
            .ok_or_else(|| anyhow::anyhow!("invalid date '{raw}', use YYYY-MM-DD or YYYY-MM"))?,
    };

    Ok((date, timeframe))
}

fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    // month-only input starts at the first of the month
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
}

fn print_stats(stats: &bybit_journal::journal::AccountStats, trades: usize) {
    println!("\nAccount stats\n");
    println!("{:<20} {}", "Trades", trades);
    println!("{:<20} {}", "Wins", stats.wins);
    println!("{:<20} {}", "Stopped out", stats.stopped_out);
    println!("{:<20} {}", "Risk managed", stats.risk_managed);
    println!("{:<20} {}", "PnL", stats.pnl);
    match stats.profit_factor {
        Some(pf) => println!("{:<20} {}", "Profit factor", pf),
        None => println!("{:<20} ∞", "Profit factor"),
    }

    if !stats.trades_by_asset.is_empty() {
        println!("\nBy asset:");
        for (symbol, count) in &stats.trades_by_asset {
            println!("  {symbol:<12} {count}");
        }
    }
    if !stats.trades_by_session.is_empty() {
        println!("\nBy session:");
        for (session, count) in &stats.trades_by_session {
            println!("  {:<12} {count}", session.label());
        }
    }
}
