//! SigLab CLI: strategy search over CSV bar data.
//!
//! Commands:
//! - `search`: sample and evaluate random strategy configs against a bar
//!   series, honoring an iteration budget and an early-stop target.
//! - `replay`: re-run one saved StrategyConfig JSON on the same data and
//!   print its backtest result (exact replay of a persisted config).
//!
//! Bars come in as CSV with a `timestamp,open,high,low,close,volume` header.
//! Search settings load from a TOML file or from flags; reports go out as
//! JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use siglab_core::domain::{validate_series, Bar};
use siglab_core::indicators::IndicatorCache;
use siglab_core::sim::{SimConfig, TradeSimulator};
use siglab_core::strategies::{create_strategy, StrategyConfig};
use siglab_search::{ParallelOptimizer, SearchConfig, TargetMetric};

#[derive(Parser)]
#[command(name = "siglab", about = "SigLab: randomized trading-strategy search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search randomized strategy configs for one meeting the target return.
    Search {
        /// CSV file of bars (timestamp,open,high,low,close,volume).
        bars: PathBuf,

        /// TOML search config; flags below override its fields.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of configurations to evaluate.
        #[arg(long)]
        count: Option<usize>,

        /// Early-stop target for total return, in percent.
        #[arg(long)]
        target_return: Option<f64>,

        /// Worker thread count.
        #[arg(long)]
        workers: Option<usize>,

        /// Master seed for reproducible sampling.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the full JSON report here (stdout gets a summary).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Re-run a saved strategy config and print its backtest result.
    Replay {
        /// CSV file of bars.
        bars: PathBuf,

        /// StrategyConfig JSON file (e.g. the `best.config` of a report).
        strategy: PathBuf,

        #[arg(long, default_value_t = 100_000.0)]
        capital: f64,

        #[arg(long, default_value_t = 0.0009)]
        commission: f64,
    },
}

/// Subset of `SearchConfig` accepted from TOML; missing fields use defaults.
#[derive(Debug, Default, Deserialize)]
struct SearchFileConfig {
    iterations: Option<usize>,
    target_value: Option<f64>,
    workers: Option<usize>,
    seed: Option<u64>,
    initial_capital: Option<f64>,
    commission_rate: Option<f64>,
    allow_short: Option<bool>,
    min_hold_bars: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            bars,
            config,
            count,
            target_return,
            workers,
            seed,
            output,
        } => run_search(&bars, config.as_deref(), count, target_return, workers, seed, output),
        Commands::Replay {
            bars,
            strategy,
            capital,
            commission,
        } => run_replay(&bars, &strategy, capital, commission),
    }
}

fn run_search(
    bars_path: &Path,
    config_path: Option<&Path>,
    count: Option<usize>,
    target_return: Option<f64>,
    workers: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let bars = load_bars(bars_path)?;
    validate_series(&bars).context("input bar series failed validation")?;

    let file_config: SearchFileConfig = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SearchFileConfig::default(),
    };

    let defaults = SearchConfig::default();
    let search_config = SearchConfig {
        iterations: count.or(file_config.iterations).unwrap_or(defaults.iterations),
        target_metric: TargetMetric::TotalReturn,
        target_value: target_return
            .or(file_config.target_value)
            .unwrap_or(defaults.target_value),
        workers: workers.or(file_config.workers).unwrap_or(defaults.workers),
        seed: seed.or(file_config.seed).unwrap_or(defaults.seed),
        sim: SimConfig {
            initial_capital: file_config
                .initial_capital
                .unwrap_or(defaults.sim.initial_capital),
            commission_rate: file_config
                .commission_rate
                .unwrap_or(defaults.sim.commission_rate),
            allow_short: file_config.allow_short.unwrap_or(defaults.sim.allow_short),
            min_hold_bars: file_config
                .min_hold_bars
                .unwrap_or(defaults.sim.min_hold_bars),
        },
    };

    let optimizer = ParallelOptimizer::new(search_config)?;
    let outcome = optimizer.run(&bars, None)?;

    println!(
        "evaluated {} configs ({} skipped) in {:.2}s{}",
        outcome.evaluated,
        outcome.skipped,
        outcome.elapsed_secs,
        if outcome.early_stopped {
            " [early stop]"
        } else {
            ""
        }
    );
    match &outcome.best {
        Some(best) => println!(
            "best: {} return={:+.2}% trades={} win_rate={:.0}% max_dd={:.1}%",
            best.config.family,
            best.result.total_return_pct,
            best.result.trade_count,
            best.result.win_rate * 100.0,
            best.result.max_drawdown * 100.0,
        ),
        None => println!("no configuration completed successfully"),
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&outcome)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("report written to {}", path.display());
    }

    Ok(())
}

fn run_replay(bars_path: &Path, strategy_path: &Path, capital: f64, commission: f64) -> Result<()> {
    let bars = load_bars(bars_path)?;
    validate_series(&bars).context("input bar series failed validation")?;

    let text = fs::read_to_string(strategy_path)
        .with_context(|| format!("reading strategy {}", strategy_path.display()))?;
    let config: StrategyConfig =
        serde_json::from_str(&text).context("parsing strategy config JSON")?;

    let strategy = create_strategy(&config)?;
    let cache = IndicatorCache::new();
    let set = cache.compute(&bars, &strategy.indicators())?;
    let simulator = TradeSimulator::new(SimConfig {
        initial_capital: capital,
        commission_rate: commission,
        allow_short: false,
        min_hold_bars: 0,
    })?;
    let result = simulator.run(&bars, strategy.as_ref(), &set)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Load bars from CSV. Timestamps accept `YYYY-MM-DD HH:MM:SS` or a bare
/// date (read as midnight).
fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening bars {}", path.display()))?;

    #[derive(Deserialize)]
    struct Row {
        timestamp: String,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    }

    let mut bars = Vec::new();
    for record in reader.deserialize() {
        let row: Row = record.context("parsing CSV row")?;
        let timestamp = parse_timestamp(&row.timestamp)
            .with_context(|| format!("bad timestamp: {}", row.timestamp))?;
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    if bars.is_empty() {
        bail!("no bars in {}", path.display());
    }
    Ok(bars)
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")?;
    Ok(date.and_hms_opt(0, 0, 0).expect("midnight is valid"))
}
