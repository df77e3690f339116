//! Bookmaker-agnostic domain logic: snapshots, detection, allocation,
//! opportunity lifecycle and ledger records.

mod allocator;
mod detector;
mod ids;
mod ledger;
mod opportunity;
mod snapshot;
mod tracker;

// Core domain types
pub use ids::{BookmakerId, EventId, OutcomeId};
pub use snapshot::{MarketKind, MarketSnapshot, OutcomeQuote};

// Detector
pub use detector::{detect, ArbitrageVerdict, DetectorConfig};

// Allocator
pub use allocator::{allocate, AllocatorConfig, StakePlan};

// Opportunity lifecycle
pub use opportunity::{Fingerprint, Leg, Opportunity, OpportunityState};
pub use tracker::{Observation, OpportunityTracker, TrackerConfig, Transition};

// Ledger records
pub use ledger::{LedgerEntry, LedgerLeg, LedgerStats};
