//! Notifier port for surfacing opportunities to an operator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{LedgerStats, Opportunity};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A new arbitrage opportunity was surfaced.
    OpportunityFound(AlertEvent),
    /// A stale opportunity was reconfirmed with fresh quotes.
    OpportunityRefreshed(AlertEvent),
    /// Periodic ledger summary.
    DailySummary(SummaryEvent),
}

/// One leg of an alert: where to place how much at what price.
#[derive(Debug, Clone)]
pub struct AlertLeg {
    pub outcome: String,
    pub bookmaker: String,
    pub decimal_price: Decimal,
    pub stake: Decimal,
}

/// Alert payload: everything a human needs to act, with no further
/// computation required by the notifier.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub fingerprint: String,
    pub event_id: String,
    pub market_kind: String,
    pub legs: Vec<AlertLeg>,
    /// Profit fraction of total stake.
    pub margin: Decimal,
    pub total_stake: Decimal,
    pub guaranteed_return: Decimal,
    pub guaranteed_profit: Decimal,
    pub detected_at: DateTime<Utc>,
}

impl From<&Opportunity> for AlertEvent {
    fn from(opp: &Opportunity) -> Self {
        let legs = opp
            .legs
            .iter()
            .map(|leg| AlertLeg {
                outcome: leg.outcome_id.to_string(),
                bookmaker: leg.bookmaker_id.to_string(),
                decimal_price: leg.decimal_price,
                stake: opp
                    .plan
                    .per_outcome_stake
                    .get(&leg.outcome_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
            })
            .collect();
        Self {
            fingerprint: opp.fingerprint.to_string(),
            event_id: opp.event_id.to_string(),
            market_kind: opp.market_kind.to_string(),
            legs,
            margin: opp.verdict.margin,
            total_stake: opp.plan.total_stake,
            guaranteed_return: opp.plan.guaranteed_return,
            guaranteed_profit: opp.plan.guaranteed_profit,
            detected_at: opp.detected_at,
        }
    }
}

/// Ledger summary event.
#[derive(Debug, Clone)]
pub struct SummaryEvent {
    pub date: chrono::NaiveDate,
    pub stats: LedgerStats,
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget. Implementations must be thread-safe
/// (`Send + Sync`) and must not block; slow delivery (e.g. HTTP calls)
/// belongs on a spawned task.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}
