//! Fraud Score CLI
//!
//! Reads a customer history JSON document and prints its risk assessment.

mod settings;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use fraud_engine::{CustomerHistory, RiskScorer};
use settings::{LogFormat, LogSettings, Settings};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "fraud-score")]
#[command(about = "Score a customer's order and support history for fraud risk")]
#[command(version)]
struct Cli {
    /// Customer history JSON file; `-` or omitted reads stdin
    input: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shop offset from UTC in minutes for late-night checks (overrides config)
    #[arg(long, allow_hyphen_values = true)]
    local_offset_minutes: Option<i32>,

    /// Include the per-indicator point breakdown
    #[arg(long)]
    explain: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(minutes) = cli.local_offset_minutes {
        settings.engine.local_offset_minutes = Some(minutes);
    }

    init_tracing(&settings.log);

    let scorer = RiskScorer::with_config(&settings.engine).context("Invalid engine configuration")?;
    let history = read_history(cli.input.as_deref())?;

    info!(
        "Scoring history: {} active orders, {} delivered orders, {} issues",
        history.active_orders.len(),
        history.delivered_orders.len(),
        history.issues.len()
    );

    let output = match (cli.explain, cli.pretty) {
        (true, true) => scorer.explain(&history).to_json_pretty(),
        (true, false) => scorer.explain(&history).to_json(),
        (false, true) => scorer.assess(&history).to_json_pretty(),
        (false, false) => scorer.assess(&history).to_json(),
    }
    .context("Failed to serialize output")?;
    println!("{}", output);

    Ok(())
}

/// Logs go to stderr; stdout carries only the assessment
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry.with(fmt::layer().with_writer(io::stderr)).init(),
    }
}

fn read_history(input: Option<&Path>) -> anyhow::Result<CustomerHistory> {
    match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            CustomerHistory::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to read history from {}", path.display()))
        }
        _ => CustomerHistory::from_reader(io::stdin().lock())
            .context("Failed to read history from stdin"),
    }
}
