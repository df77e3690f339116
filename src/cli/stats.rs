//! Handler for the `stats` command.

use tabled::{Table, Tabled};

use crate::adapter::store::SqliteLedger;
use crate::cli::{output, ConfigPathArg};
use crate::config::Config;
use crate::error::Result;
use crate::port::LedgerStore;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Recorded")]
    recorded: String,
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Stake")]
    stake: String,
    #[tabled(rename = "Guaranteed")]
    guaranteed: String,
    #[tabled(rename = "Realized")]
    realized: String,
}

/// Print the recorded ledger and its aggregate statistics.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;
    let pool = crate::db::create_pool(&config.database)?;
    let ledger = SqliteLedger::new(pool);

    let entries = ledger.entries().await?;
    let stats = ledger.stats().await?;

    output::section("Recorded opportunities");
    if entries.is_empty() {
        output::note("No opportunities recorded yet.");
    } else {
        let rows: Vec<EntryRow> = entries
            .iter()
            .map(|entry| EntryRow {
                recorded: entry.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
                fingerprint: entry.fingerprint.to_string(),
                margin: format!("{:.4}", entry.margin),
                stake: entry.total_stake.to_string(),
                guaranteed: entry.guaranteed_profit.to_string(),
                realized: entry
                    .realized_profit
                    .map_or_else(|| "-".to_string(), |p| p.to_string()),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    output::section("Summary");
    output::key_value("Opportunities", stats.opportunities_recorded);
    output::key_value("Operator confirmed", stats.operator_confirmed);
    output::key_value("Settled", stats.settled);
    output::key_value("Guaranteed profit", stats.total_guaranteed_profit);
    output::key_value("Realized profit", stats.total_realized_profit);
    match (stats.latency_ms_min, stats.latency_ms_mean, stats.latency_ms_max) {
        (Some(min), Some(mean), Some(max)) => {
            output::key_value(
                "Detect-to-alert (ms)",
                format!("min {min} / mean {mean} / max {max}"),
            );
        }
        _ => output::key_value("Detect-to-alert (ms)", "-"),
    }
    println!();

    Ok(())
}
