//! Ledger store port: durable history of surfaced opportunities.

use std::future::Future;

use rust_decimal::Decimal;

use crate::domain::{Fingerprint, LedgerEntry, LedgerStats};
use crate::error::Result;

/// Storage operations for the opportunity ledger.
///
/// The store owns durability; the core owns correctness of content.
/// Implementations must be thread-safe (`Send + Sync`).
pub trait LedgerStore: Send + Sync {
    /// Append a record for a surfaced opportunity.
    fn record(&self, entry: &LedgerEntry) -> impl Future<Output = Result<()>> + Send;

    /// Settle the most recent unsettled entry for a fingerprint.
    ///
    /// Fails with [`crate::error::LedgerError::UnknownFingerprint`] when no
    /// entry exists for the fingerprint.
    fn settle(
        &self,
        fingerprint: &Fingerprint,
        operator_confirmed: bool,
        realized_profit: Option<Decimal>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// All recorded entries, oldest first.
    fn entries(&self) -> impl Future<Output = Result<Vec<LedgerEntry>>> + Send;

    /// Aggregate statistics projected over the entry set.
    fn stats(&self) -> impl Future<Output = Result<LedgerStats>> + Send {
        async move {
            let entries = self.entries().await?;
            Ok(LedgerStats::from_entries(&entries))
        }
    }
}
