//! Command-line interface for the aurum gold market pipeline

mod render;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use aurum_market::analysis::{DebtSnapshot, MacroSignal};
use aurum_market::{LiveRunner, MarketConfig, MarketPipeline, MarketReport, MarketSnapshot};
use aurum_utils::AppConfig;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "aurum")]
#[command(about = "Gold market sentiment and recommendations", long_about = None)]
struct Cli {
    /// JSON configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one text and show both analyzer sub-scores
    Score {
        text: String,
    },

    /// Run the pipeline over a snapshot file
    Analyze {
        /// Snapshot JSON (sources, prices, optional debt)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Add news from the configured providers
        #[arg(long)]
        live_news: bool,

        /// Replace snapshot prices with Alpha Vantage daily closes
        #[arg(long)]
        live_prices: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Rows in the ranking table
        #[arg(short, long, default_value = "8")]
        top: usize,
    },

    /// Refresh on a timer with live news through the provider cache
    Watch {
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Seconds between refreshes
        #[arg(long, default_value = "300")]
        interval: u64,

        /// Stop after this many refreshes (at least 1)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        iterations: Option<u64>,

        #[arg(long)]
        live_prices: bool,

        #[arg(long)]
        json: bool,

        #[arg(short, long, default_value = "8")]
        top: usize,
    },

    /// Show the built-in global debt snapshot and its macro signal
    Macro {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let app = AppConfig::from_env();
    if app.json_logs {
        aurum_utils::init_tracing_json();
    } else {
        aurum_utils::init_tracing();
    }

    let cli = Cli::parse();
    info!(environment = %app.environment, "Starting {}", app.app_name);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Score { text } => score(&config, &text),
        Commands::Analyze {
            input,
            live_news,
            live_prices,
            json,
            top,
        } => {
            let snapshot = load_snapshot(input.as_deref())?;
            let report = if live_news || live_prices {
                let config = MarketConfig {
                    live_news,
                    live_prices,
                    ..config
                };
                LiveRunner::from_config(&config)
                    .context("failed to set up provider clients")?
                    .refresh(snapshot)
                    .await
            } else {
                MarketPipeline::new(&config)
                    .context("invalid scoring configuration")?
                    .run(snapshot)
            };
            emit(&report, json, top)
        }
        Commands::Watch {
            input,
            interval,
            iterations,
            live_prices,
            json,
            top,
        } => {
            let config = MarketConfig {
                live_news: true,
                live_prices,
                ..config
            };
            watch(&config, input.as_deref(), interval, iterations, json, top).await
        }
        Commands::Macro { json } => show_macro(&config, json),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MarketConfig> {
    let config = match path {
        Some(path) => MarketConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => MarketConfig::default(),
    };
    Ok(config.with_env_keys())
}

fn load_snapshot(path: Option<&Path>) -> anyhow::Result<MarketSnapshot> {
    match path {
        Some(path) => MarketSnapshot::from_json_file(path)
            .with_context(|| format!("failed to read snapshot {}", path.display())),
        None => {
            warn!("No snapshot given, starting from an empty one");
            Ok(MarketSnapshot::default())
        }
    }
}

fn score(config: &MarketConfig, text: &str) -> anyhow::Result<()> {
    let pipeline = MarketPipeline::new(config).context("invalid scoring configuration")?;
    let result = pipeline.scorer().score(text);
    println!("{}", render::score_table(&result));
    Ok(())
}

fn emit(report: &MarketReport, json: bool, top: usize) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("failed to serialize report")?
        );
    } else {
        println!("{}", render::report(report, top));
    }
    Ok(())
}

async fn watch(
    config: &MarketConfig,
    input: Option<&Path>,
    interval: u64,
    iterations: Option<u64>,
    json: bool,
    top: usize,
) -> anyhow::Result<()> {
    let runner = LiveRunner::from_config(config).context("failed to set up provider clients")?;
    info!(adapters = ?runner.adapter_names(), interval, "Watching");

    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    let mut runs = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                return Ok(());
            }
        }

        // re-read each round so edits to the snapshot file are picked up
        let snapshot = load_snapshot(input)?;
        let report = runner.refresh(snapshot).await;
        emit(&report, json, top)?;

        runs += 1;
        if iterations.is_some_and(|limit| runs >= limit) {
            return Ok(());
        }
    }
}

fn show_macro(config: &MarketConfig, json: bool) -> anyhow::Result<()> {
    let snapshot = DebtSnapshot::latest().context("built-in debt history is empty")?;
    let signal = MacroSignal::evaluate(&snapshot, &config.weights.macro_signal);

    if json {
        let value = serde_json::json!({ "debt": snapshot, "signal": signal });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("failed to serialize macro signal")?
        );
    } else {
        println!("{}", render::macro_table(&snapshot, &signal));
    }
    Ok(())
}
