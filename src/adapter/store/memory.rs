//! In-memory ledger for tests and ephemeral runs.

use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::{Fingerprint, LedgerEntry};
use crate::error::{LedgerError, Result};
use crate::port::LedgerStore;

/// In-memory, append-only ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedger {
    async fn record(&self, entry: &LedgerEntry) -> Result<()> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    async fn settle(
        &self,
        fingerprint: &Fingerprint,
        operator_confirmed: bool,
        realized_profit: Option<Decimal>,
    ) -> Result<()> {
        let mut entries = self.entries.write();

        // Prefer the most recent unsettled entry; fall back to the most
        // recent one so a settlement can be corrected.
        let index = entries
            .iter()
            .rposition(|e| &e.fingerprint == fingerprint && e.settled_at.is_none())
            .or_else(|| entries.iter().rposition(|e| &e.fingerprint == fingerprint))
            .ok_or_else(|| LedgerError::UnknownFingerprint(fingerprint.clone()))?;

        let entry = &mut entries[index];
        entry.operator_confirmed = operator_confirmed;
        entry.realized_profit = realized_profit;
        entry.settled_at = Some(Utc::now());
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.entries.read().clone())
    }
}
