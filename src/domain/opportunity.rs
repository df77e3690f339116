//! Opportunities: a verdict and stake plan bound to an event, with lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::allocator::StakePlan;
use super::detector::ArbitrageVerdict;
use super::ids::{BookmakerId, EventId, OutcomeId};
use super::snapshot::{MarketKind, MarketSnapshot};

/// Stable identity for one cross-bookmaker price combination.
///
/// Derived from the event, market kind and the sorted set of
/// `(outcome, bookmaker)` legs - never from the price values, so that
/// re-detection of the same bookmaker combination is recognized as the same
/// opportunity even when prices drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Derive the fingerprint for a snapshot's best-quote combination.
    #[must_use]
    pub fn derive(snapshot: &MarketSnapshot) -> Self {
        let legs = snapshot
            .legs()
            .iter()
            .map(|(outcome, bookmaker)| format!("{outcome}@{bookmaker}"))
            .collect::<Vec<_>>()
            .join("+");
        Self(format!(
            "{}|{}|{}",
            snapshot.event_id, snapshot.market_kind, legs
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One leg of an opportunity: the bookmaker and price backing an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub outcome_id: OutcomeId,
    pub bookmaker_id: BookmakerId,
    pub decimal_price: Decimal,
}

/// Lifecycle state of a tracked opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpportunityState {
    /// Created on first detection, not yet surfaced.
    New,
    /// Surfaced to the notifier; reconfirmations are silent.
    Alerted,
    /// Not reconfirmed within the freshness window.
    Stale,
    /// Past maximum lifetime or no longer showing arbitrage; evicted.
    Expired,
}

impl OpportunityState {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, OpportunityState::New | OpportunityState::Alerted)
    }
}

impl fmt::Display for OpportunityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpportunityState::New => write!(f, "new"),
            OpportunityState::Alerted => write!(f, "alerted"),
            OpportunityState::Stale => write!(f, "stale"),
            OpportunityState::Expired => write!(f, "expired"),
        }
    }
}

/// A detected arbitrage bound to its event and stake plan.
///
/// Owned exclusively by the tracker; state transitions happen only there.
#[derive(Debug, Clone)]
pub struct Opportunity {
    pub fingerprint: Fingerprint,
    pub event_id: EventId,
    pub market_kind: MarketKind,
    /// The legs contributing the best quotes, sorted by outcome.
    pub legs: Vec<Leg>,
    pub verdict: ArbitrageVerdict,
    pub plan: StakePlan,
    /// When the quotes backing the detection were taken.
    pub detected_at: DateTime<Utc>,
    pub first_seen_at: DateTime<Utc>,
    pub last_confirmed_at: DateTime<Utc>,
    pub state: OpportunityState,
}

impl Opportunity {
    /// Create a fresh opportunity in the `New` state.
    #[must_use]
    pub fn new(
        snapshot: &MarketSnapshot,
        verdict: ArbitrageVerdict,
        plan: StakePlan,
        now: DateTime<Utc>,
    ) -> Self {
        let legs = snapshot
            .best_quotes
            .iter()
            .map(|(outcome, quote)| Leg {
                outcome_id: outcome.clone(),
                bookmaker_id: quote.bookmaker_id.clone(),
                decimal_price: quote.decimal_price,
            })
            .collect();
        Self {
            fingerprint: Fingerprint::derive(snapshot),
            event_id: snapshot.event_id.clone(),
            market_kind: snapshot.market_kind,
            legs,
            verdict,
            plan,
            detected_at: snapshot.taken_at,
            first_seen_at: now,
            last_confirmed_at: now,
            state: OpportunityState::New,
        }
    }

    /// The price-free leg identity the fingerprint is derived from.
    #[must_use]
    pub fn leg_keys(&self) -> Vec<(OutcomeId, BookmakerId)> {
        self.legs
            .iter()
            .map(|leg| (leg.outcome_id.clone(), leg.bookmaker_id.clone()))
            .collect()
    }
}
