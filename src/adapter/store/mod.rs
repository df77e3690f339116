//! Ledger persistence adapters with pluggable backends.

mod memory;
mod sqlite;

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
