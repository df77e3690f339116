//! Handler for the `scan` command: one cycle, then exit.

use crate::cli::{output, run, RunArgs};
use crate::config::Config;
use crate::error::Result;

/// Execute a single scan cycle and print its counters.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    run::apply_overrides(&mut config, args);
    config.logging.init();

    let mut app = run::build_app(&config)?;
    let report = app.run_cycle().await?;

    output::section("Scan cycle");
    output::key_value("Snapshots", report.snapshots);
    output::key_value("Skipped", report.skipped);
    output::key_value("Arbitrages", report.arbitrages);
    output::key_value("Below margin", report.below_margin);
    output::key_value("Unfundable", report.unfundable);
    output::key_value("Alerts", report.alerts);
    output::key_value("Confirmations", report.confirmations);
    println!();

    Ok(())
}
