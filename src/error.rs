use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{BookmakerId, EventId, Fingerprint, OutcomeId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised when a market snapshot cannot be evaluated.
///
/// These are local to a single event: the caller must skip the event for
/// the cycle rather than treat it as "no opportunity".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot for {event_id} is incomplete: expected {expected} outcomes, found {found}")]
    Incomplete {
        event_id: EventId,
        expected: usize,
        found: usize,
    },

    #[error("invalid decimal price {price} for outcome '{outcome_id}' (must be > 1.0)")]
    InvalidPrice {
        outcome_id: OutcomeId,
        price: Decimal,
    },
}

/// Errors raised by the stake allocator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Misuse guard: allocation requested on a non-arbitrage verdict.
    #[error("allocation requested for a non-arbitrage verdict (implied sum {implied_sum})")]
    NotArbitrage { implied_sum: Decimal },

    #[error("bankroll {bankroll} too small: stake for '{outcome_id}' rounds to {stake}, below minimum {minimum}")]
    BankrollTooSmall {
        bankroll: Decimal,
        outcome_id: OutcomeId,
        stake: Decimal,
        minimum: Decimal,
    },

    #[error("bankroll must be positive, got {bankroll}")]
    NonPositiveBankroll { bankroll: Decimal },
}

/// Errors raised by the opportunity tracker.
///
/// A fingerprint collision indicates a fingerprint-derivation defect and is
/// fatal for the scan cycle, never silently absorbed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("fingerprint {fingerprint} collides across different outcome sets ({existing:?} vs {observed:?})")]
    FingerprintCollision {
        fingerprint: Fingerprint,
        existing: Vec<(OutcomeId, BookmakerId)>,
        observed: Vec<(OutcomeId, BookmakerId)>,
    },
}

/// Errors raised by ledger stores.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Settlement referenced an opportunity that was never recorded.
    #[error("no ledger entry for fingerprint {0}")]
    UnknownFingerprint(Fingerprint),

    #[error("database error: {0}")]
    Database(String),

    #[error("connection error: {0}")]
    Connection(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("odds provider error: {0}")]
    Provider(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
