//! # Battery Protection Replay
//!
//! Runs a recorded measurement trace through a freshly configured protection
//! engine and prints one JSON line per cycle with the published limits and
//! force-override states. With `--check`, exits with status 2 if any
//! expectation written in the trace is not met.

use std::io::Write;
use std::path::PathBuf;
use std::process;

use bp_common::config::{ConfigLoader, LogLevel};
use bp_common::consts::DEFAULT_CONFIG_PATH;
use bp_engine::config::{ProtectionFile, load_config};
use bp_engine::replay::{Trace, replay};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Battery protection engine: deterministic trace replay
#[derive(Parser, Debug)]
#[command(name = "bp_engine")]
#[command(version)]
#[command(about = "Replay a battery measurement trace through the current-limit protection engine")]
struct Args {
    /// Path to the protection configuration TOML.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to the trace TOML (`[[cycle]]` entries).
    #[arg(long, value_name = "FILE")]
    trace: PathBuf,

    /// Exit with status 2 when a trace expectation is not met.
    #[arg(long)]
    check: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = load_config(&args.config);

    let level = match (&loaded, args.verbose) {
        (_, true) => LogLevel::Debug,
        (Ok(file), false) => file.shared.log_level,
        (Err(_), false) => LogLevel::Info,
    };
    setup_tracing(level, args.json);

    info!("Battery protection replay v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|file| run(&args, &file));

    match result {
        Ok(true) => info!("Replay complete"),
        Ok(false) => {
            warn!("Replay complete with unmet expectations");
            if args.check {
                process::exit(2);
            }
        }
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    }
}

/// Replay the trace; returns whether every expectation was met.
fn run(args: &Args, file: &ProtectionFile) -> Result<bool, Box<dyn std::error::Error>> {
    info!(
        "Config OK: battery={}, confirm={}s",
        file.shared.battery_id, file.protection.force_confirm_duration_s
    );

    let trace = Trace::load(&args.trace)?;
    info!("Loaded {} cycles from {}", trace.cycles.len(), args.trace.display());

    let mut engine = file.build_engine()?;
    let records = replay(&mut engine, &trace)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut all_met = true;
    for record in &records {
        if record.expectation_met == Some(false) {
            all_met = false;
            warn!(
                cycle = record.cycle,
                label = record.label.as_deref().unwrap_or(""),
                charge = record.limits.charge_max_current,
                discharge = record.limits.discharge_max_current,
                "expectation not met"
            );
        }
        writeln!(out, "{}", serde_json::to_string(record)?)?;
    }

    Ok(all_met)
}

/// Setup tracing subscriber; `RUST_LOG` overrides the configured level.
fn setup_tracing(level: LogLevel, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    // Logs go to stderr; stdout carries the replay records.
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
