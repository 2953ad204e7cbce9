mod cli;
mod logging;
mod scenario;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use whalemarket_pricing::PricingEngine;
use whalemarket_types::{MarketConfig, MarketTotals, Outcome, constants, units};

use crate::cli::{Cli, Commands, ConfigPathArg, QuoteArgs, RunArgs};
use crate::scenario::Scenario;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.json_logs);
    info!(
        engine = constants::ENGINE_NAME,
        version = constants::VERSION,
        "whalemarket starting"
    );

    let result = match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Check(args) => check(&args),
        Commands::Quote(args) => quote(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Fatal error");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let replay = scenario.replay(args.strict)?;

    let market = &replay.market;
    market
        .audit()
        .verify()
        .context("audit chain failed verification")?;
    info!(
        applied = replay.applied,
        rejected = replay.rejected,
        status = %market.status(),
        balance = %units::to_decimal(market.custody_balance()),
        audit_head = %market.audit().head_hex(),
        "Replay finished"
    );

    let json = market.snapshot().to_json()?;
    if let Some(path) = &args.snapshot_out {
        std::fs::write(path, &json)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
    }
    println!("{json}");
    Ok(())
}

fn check(args: &ConfigPathArg) -> anyhow::Result<()> {
    let config = MarketConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    println!("Configuration OK: {}", args.config.display());
    print_config(&config);
    Ok(())
}

fn quote(args: &QuoteArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => MarketConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MarketConfig::default(),
    };
    let totals = MarketTotals::new(
        units::from_decimal(args.sold_a).context("--sold-a")?,
        units::from_decimal(args.sold_b).context("--sold-b")?,
    );
    let engine = PricingEngine::new(&config);
    for outcome in Outcome::ALL {
        println!(
            "{outcome}: {}",
            units::to_decimal(engine.quote(outcome, &totals))
        );
    }
    Ok(())
}

fn print_config(config: &MarketConfig) {
    println!("  base_price:           {}", units::to_decimal(config.base_price));
    println!("  skew_sensitivity:     {}", units::to_decimal(config.skew_sensitivity));
    println!("  price_step:           {}", units::to_decimal(config.price_step));
    println!("  max_bet:              {}", units::to_decimal(config.max_bet));
    println!("  redemption_per_share: {}", units::to_decimal(config.redemption_per_share));
}
