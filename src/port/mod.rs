//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the extension points adapters implement to integrate with
//! external systems: the odds feed, the ledger store and the notification
//! channel. The core pipeline only ever talks to these traits.

mod ledger;
mod notifier;
mod provider;

pub use ledger::LedgerStore;
pub use notifier::{AlertEvent, AlertLeg, Event, Notifier, SummaryEvent};
pub use provider::SnapshotSource;
