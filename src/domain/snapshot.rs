//! Normalized price snapshots: the best quote per outcome for one market.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{BookmakerId, EventId, OutcomeId};
use crate::error::SnapshotError;

/// The shape of a market: how many mutually exclusive outcomes it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    /// Two outcomes (e.g. tennis match winner).
    TwoWay,
    /// Three outcomes (e.g. football home/draw/away).
    ThreeWay,
}

impl MarketKind {
    /// Number of outcomes a complete snapshot must carry.
    #[must_use]
    pub fn outcome_count(self) -> usize {
        match self {
            MarketKind::TwoWay => 2,
            MarketKind::ThreeWay => 3,
        }
    }

    /// Infer the market kind from a distinct outcome count, if supported.
    #[must_use]
    pub fn from_outcome_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(MarketKind::TwoWay),
            3 => Some(MarketKind::ThreeWay),
            _ => None,
        }
    }
}

impl std::fmt::Display for MarketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketKind::TwoWay => write!(f, "two_way"),
            MarketKind::ThreeWay => write!(f, "three_way"),
        }
    }
}

/// One bookmaker's price for one possible result of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeQuote {
    pub outcome_id: OutcomeId,
    pub bookmaker_id: BookmakerId,
    /// Payout multiple per unit stake. Always > 1.0.
    pub decimal_price: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl OutcomeQuote {
    /// Create a quote, rejecting prices that cannot pay back the stake.
    pub fn new(
        outcome_id: impl Into<OutcomeId>,
        bookmaker_id: impl Into<BookmakerId>,
        decimal_price: Decimal,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, SnapshotError> {
        let outcome_id = outcome_id.into();
        if decimal_price <= Decimal::ONE {
            return Err(SnapshotError::InvalidPrice {
                outcome_id,
                price: decimal_price,
            });
        }
        Ok(Self {
            outcome_id,
            bookmaker_id: bookmaker_id.into(),
            decimal_price,
            observed_at,
        })
    }
}

/// The best quote per outcome for one event+market at one point in time.
///
/// Assembled from all observed quotes by keeping, per outcome, the quote
/// with the maximum decimal price across bookmakers. Completeness against
/// the declared [`MarketKind`] is enforced by the detector, not here: a
/// snapshot with missing outcomes can exist but never yields a verdict.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub event_id: EventId,
    pub market_kind: MarketKind,
    pub taken_at: DateTime<Utc>,
    pub best_quotes: BTreeMap<OutcomeId, OutcomeQuote>,
}

impl MarketSnapshot {
    /// Assemble a snapshot from raw quotes, keeping the best price per outcome.
    pub fn assemble(
        event_id: impl Into<EventId>,
        market_kind: MarketKind,
        taken_at: DateTime<Utc>,
        quotes: impl IntoIterator<Item = OutcomeQuote>,
    ) -> Self {
        let mut best_quotes: BTreeMap<OutcomeId, OutcomeQuote> = BTreeMap::new();
        for quote in quotes {
            match best_quotes.get(&quote.outcome_id) {
                Some(existing) if existing.decimal_price >= quote.decimal_price => {}
                _ => {
                    best_quotes.insert(quote.outcome_id.clone(), quote);
                }
            }
        }
        Self {
            event_id: event_id.into(),
            market_kind,
            taken_at,
            best_quotes,
        }
    }

    /// Whether the snapshot carries exactly one quote per declared outcome.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.best_quotes.len() == self.market_kind.outcome_count()
    }

    /// The contributing `(outcome, bookmaker)` legs, sorted by outcome.
    ///
    /// This is the identity the opportunity fingerprint is derived from.
    #[must_use]
    pub fn legs(&self) -> Vec<(OutcomeId, BookmakerId)> {
        self.best_quotes
            .iter()
            .map(|(outcome, quote)| (outcome.clone(), quote.bookmaker_id.clone()))
            .collect()
    }
}
