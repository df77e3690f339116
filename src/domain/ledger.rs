//! Ledger records: durable history of surfaced opportunities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{BookmakerId, EventId, OutcomeId};
use super::opportunity::{Fingerprint, Opportunity};
use super::snapshot::MarketKind;

/// One recorded bet leg: outcome, bookmaker, price and the stake to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLeg {
    pub outcome_id: OutcomeId,
    pub bookmaker_id: BookmakerId,
    pub decimal_price: Decimal,
    pub stake: Decimal,
}

/// Durable record of a surfaced opportunity.
///
/// Appended when an alert is emitted; settlement details arrive later from
/// the operator.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub fingerprint: Fingerprint,
    pub event_id: EventId,
    pub market_kind: MarketKind,
    pub legs: Vec<LedgerLeg>,
    pub margin: Decimal,
    pub total_stake: Decimal,
    pub guaranteed_return: Decimal,
    pub guaranteed_profit: Decimal,
    /// When the quotes backing the detection were taken.
    pub detected_at: DateTime<Utc>,
    /// When the alert was surfaced to the notifier.
    pub alerted_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
    /// Set externally once the operator has placed the bets.
    pub operator_confirmed: bool,
    /// Null until settled.
    pub realized_profit: Option<Decimal>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Build an entry from a surfaced opportunity.
    #[must_use]
    pub fn from_opportunity(opportunity: &Opportunity, recorded_at: DateTime<Utc>) -> Self {
        let legs = opportunity
            .legs
            .iter()
            .map(|leg| LedgerLeg {
                outcome_id: leg.outcome_id.clone(),
                bookmaker_id: leg.bookmaker_id.clone(),
                decimal_price: leg.decimal_price,
                stake: opportunity
                    .plan
                    .per_outcome_stake
                    .get(&leg.outcome_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
            })
            .collect();
        Self {
            fingerprint: opportunity.fingerprint.clone(),
            event_id: opportunity.event_id.clone(),
            market_kind: opportunity.market_kind,
            legs,
            margin: opportunity.verdict.margin,
            total_stake: opportunity.plan.total_stake,
            guaranteed_return: opportunity.plan.guaranteed_return,
            guaranteed_profit: opportunity.plan.guaranteed_profit,
            detected_at: opportunity.detected_at,
            alerted_at: opportunity.last_confirmed_at,
            recorded_at,
            operator_confirmed: false,
            realized_profit: None,
            settled_at: None,
        }
    }
}

/// Aggregate statistics projected over the ledger entries.
///
/// Recomputed on demand; no separate mutable aggregate state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerStats {
    pub opportunities_recorded: u64,
    pub operator_confirmed: u64,
    pub settled: u64,
    pub total_guaranteed_profit: Decimal,
    pub total_realized_profit: Decimal,
    /// Detection-to-alert latency over all entries, in milliseconds.
    pub latency_ms_min: Option<i64>,
    pub latency_ms_mean: Option<i64>,
    pub latency_ms_max: Option<i64>,
}

impl LedgerStats {
    /// Project statistics from a set of entries.
    #[must_use]
    pub fn from_entries(entries: &[LedgerEntry]) -> Self {
        let mut stats = LedgerStats {
            opportunities_recorded: entries.len() as u64,
            ..Default::default()
        };

        let mut latency_sum: i64 = 0;
        let mut latency_count: i64 = 0;
        for entry in entries {
            if entry.operator_confirmed {
                stats.operator_confirmed += 1;
            }
            if entry.settled_at.is_some() {
                stats.settled += 1;
            }
            if let Some(profit) = entry.realized_profit {
                stats.total_realized_profit += profit;
            }
            stats.total_guaranteed_profit += entry.guaranteed_profit;

            let latency = (entry.alerted_at - entry.detected_at).num_milliseconds();
            stats.latency_ms_min = Some(stats.latency_ms_min.map_or(latency, |m| m.min(latency)));
            stats.latency_ms_max = Some(stats.latency_ms_max.map_or(latency, |m| m.max(latency)));
            latency_sum += latency;
            latency_count += 1;
        }
        if latency_count > 0 {
            stats.latency_ms_mean = Some(latency_sum / latency_count);
        }

        stats
    }
}
