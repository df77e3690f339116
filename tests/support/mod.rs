//! Shared builders for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use oddsedge::domain::{
    allocate, detect, AllocatorConfig, DetectorConfig, LedgerEntry, MarketKind, MarketSnapshot,
    Opportunity, OutcomeQuote,
};

/// A three-way snapshot with the given best prices.
pub fn three_way_snapshot(
    event: &str,
    prices: [(&str, &str, Decimal); 3],
    taken_at: DateTime<Utc>,
) -> MarketSnapshot {
    MarketSnapshot::assemble(
        event,
        MarketKind::ThreeWay,
        taken_at,
        prices
            .into_iter()
            .map(|(outcome, bookie, price)| {
                OutcomeQuote::new(outcome, bookie, price, taken_at).expect("valid quote")
            })
            .collect::<Vec<_>>(),
    )
}

/// The canonical profitable three-way market (margin just under 0.8%).
pub fn arb_snapshot(event: &str) -> MarketSnapshot {
    three_way_snapshot(
        event,
        [
            ("home", "bet365", dec!(2.10)),
            ("draw", "williamhill", dec!(3.60)),
            ("away", "coral", dec!(4.20)),
        ],
        Utc::now(),
    )
}

/// Run the full detection flow and produce an alerted opportunity.
pub fn opportunity_for(snapshot: &MarketSnapshot) -> Opportunity {
    let verdict = detect(snapshot, &DetectorConfig::default()).expect("complete snapshot");
    assert!(verdict.is_arbitrage, "fixture must be an arbitrage");
    let plan =
        allocate(&verdict, snapshot, dec!(1000), &AllocatorConfig::default()).expect("fundable plan");
    Opportunity::new(snapshot, verdict, plan, Utc::now())
}

/// A ledger entry as the pipeline would record it on alert.
pub fn ledger_entry_for(event: &str) -> LedgerEntry {
    let snapshot = arb_snapshot(event);
    let opportunity = opportunity_for(&snapshot);
    LedgerEntry::from_opportunity(&opportunity, Utc::now())
}
