//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// WhaleMarket - binary-outcome betting market core.
#[derive(Parser, Debug)]
#[command(name = "whalemarket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON scenario against an in-memory market
    Run(RunArgs),

    /// Validate a market configuration file
    Check(ConfigPathArg),

    /// Quote both outcomes for given totals
    Quote(QuoteArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the scenario file
    pub scenario: PathBuf,

    /// Stop at the first rejected step
    #[arg(long)]
    pub strict: bool,

    /// Also write the final snapshot to this path
    #[arg(long)]
    pub snapshot_out: Option<PathBuf>,
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "market.json")]
    pub config: PathBuf,
}

/// Arguments for the `quote` subcommand.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Configuration file; defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Whole shares sold on outcome A
    #[arg(long, default_value = "0")]
    pub sold_a: Decimal,

    /// Whole shares sold on outcome B
    #[arg(long, default_value = "0")]
    pub sold_b: Decimal,
}
