//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;
pub mod scan;
pub mod settle;
pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Oddsedge - Sports betting arbitrage detection and stake allocation.
#[derive(Parser, Debug)]
#[command(name = "oddsedge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scanner loop (foreground, interactive)
    Run(RunArgs),

    /// Run a single scan cycle and exit
    Scan(RunArgs),

    /// Show ledger statistics
    Stats(ConfigPathArg),

    /// Settle a recorded opportunity
    Settle(SettleArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `oddsedge check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` and `scan` subcommands.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override the minimum margin filter (fraction, e.g. 0.02)
    #[arg(long)]
    pub min_margin: Option<Decimal>,

    /// Override the allocation bankroll
    #[arg(long)]
    pub bankroll: Option<Decimal>,

    /// Override seconds between scan cycles
    #[arg(long)]
    pub interval: Option<u64>,

    /// Enable Telegram notifications
    #[arg(long)]
    pub telegram: bool,
}

/// Arguments for the `settle` subcommand.
#[derive(Parser, Debug)]
pub struct SettleArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Fingerprint of the opportunity to settle
    pub fingerprint: String,

    /// Mark the opportunity as acted on by the operator
    #[arg(long)]
    pub confirmed: bool,

    /// Realized profit (or loss, negative) after settlement
    #[arg(long)]
    pub profit: Option<Decimal>,
}
