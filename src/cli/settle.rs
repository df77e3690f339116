//! Handler for the `settle` command.

use crate::adapter::store::SqliteLedger;
use crate::cli::{output, SettleArgs};
use crate::config::Config;
use crate::domain::Fingerprint;
use crate::error::Result;
use crate::port::LedgerStore;

/// Record the outcome of an alerted opportunity.
pub async fn execute(args: &SettleArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let pool = crate::db::create_pool(&config.database)?;
    let ledger = SqliteLedger::new(pool);

    let fingerprint = Fingerprint::from(args.fingerprint.as_str());
    ledger
        .settle(&fingerprint, args.confirmed, args.profit)
        .await?;

    output::ok(&format!("Settled {fingerprint}"));
    if let Some(profit) = args.profit {
        output::key_value("Realized profit", profit);
    }
    output::key_value("Operator confirmed", args.confirmed);

    Ok(())
}
