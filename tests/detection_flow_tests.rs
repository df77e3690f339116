//! End-to-end tests for the detection core: detect, allocate, track, record.

mod support;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use oddsedge::adapter::store::MemoryLedger;
use oddsedge::domain::{
    allocate, detect, AllocatorConfig, DetectorConfig, Fingerprint, Observation,
    OpportunityTracker, OutcomeId, TrackerConfig,
};
use oddsedge::port::LedgerStore;

use support::{arb_snapshot, ledger_entry_for, three_way_snapshot};

#[test]
fn profitable_three_way_market_allocates_equal_returns() {
    let snapshot = arb_snapshot("ev-derby");
    let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();

    assert!(verdict.is_arbitrage);
    // 1/2.10 + 1/3.60 + 1/4.20 is a hair under 0.9921.
    assert!(verdict.margin > dec!(0.0079));
    assert!(verdict.margin < dec!(0.0080));

    let plan = allocate(&verdict, &snapshot, dec!(1000), &AllocatorConfig::default()).unwrap();

    assert_eq!(plan.total_stake, dec!(1000));
    let sum: Decimal = plan.per_outcome_stake.values().copied().sum();
    assert_eq!(sum, dec!(1000));

    // Every outcome pays out the same amount, about 1008 on 1000 staked.
    assert!((plan.guaranteed_return - dec!(1008)).abs() < dec!(0.01));
    assert!(plan.guaranteed_profit > dec!(7.99));

    for (outcome, stake) in &plan.per_outcome_stake {
        let price = snapshot.best_quotes[outcome].decimal_price;
        let payout = *stake * price;
        assert!(
            (payout - plan.guaranteed_return).abs() < dec!(0.25),
            "payout for {outcome} drifted: {payout} vs {}",
            plan.guaranteed_return
        );
    }
}

#[test]
fn fair_market_yields_no_arbitrage() {
    let snapshot = three_way_snapshot(
        "ev-fair",
        [
            ("home", "bet365", dec!(2.00)),
            ("draw", "williamhill", dec!(3.00)),
            ("away", "coral", dec!(3.50)),
        ],
        Utc::now(),
    );
    let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
    assert!(!verdict.is_arbitrage);
    assert!(verdict.margin < Decimal::ZERO);
}

#[test]
fn opportunity_alerts_once_per_episode_and_realerts_after_staleness() {
    let t0 = Utc::now();
    let mut tracker = OpportunityTracker::new(TrackerConfig::default());

    let snapshot = arb_snapshot("ev-derby");
    let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
    let plan = allocate(&verdict, &snapshot, dec!(1000), &AllocatorConfig::default()).unwrap();

    let first = tracker.observe(&snapshot, &verdict, &plan, t0).unwrap();
    assert!(matches!(first, Observation::FirstSeen(_)));

    // Confirmations within the freshness window stay silent.
    for minutes in [5, 9] {
        tracker.sweep(t0 + Duration::minutes(minutes));
        let obs = tracker
            .observe(&snapshot, &verdict, &plan, t0 + Duration::minutes(minutes))
            .unwrap();
        assert!(matches!(obs, Observation::Confirmed), "minute {minutes}");
    }

    // Unseen past the freshness window: stale, then reconfirmed.
    let late = t0 + Duration::minutes(9) + Duration::seconds(601);
    tracker.sweep(late);
    let obs = tracker.observe(&snapshot, &verdict, &plan, late).unwrap();
    assert!(matches!(obs, Observation::Refreshed(_)));
}

#[test]
fn expired_opportunity_restarts_as_a_fresh_episode() {
    let t0 = Utc::now();
    let mut tracker = OpportunityTracker::new(TrackerConfig::default());

    let snapshot = arb_snapshot("ev-derby");
    let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
    let plan = allocate(&verdict, &snapshot, dec!(1000), &AllocatorConfig::default()).unwrap();

    tracker.observe(&snapshot, &verdict, &plan, t0).unwrap();
    assert_eq!(tracker.len(), 1);

    // Past max lifetime the entry is evicted entirely.
    tracker.sweep(t0 + Duration::seconds(1801));
    assert_eq!(tracker.len(), 0);

    let again = tracker
        .observe(&snapshot, &verdict, &plan, t0 + Duration::seconds(1802))
        .unwrap();
    assert!(matches!(again, Observation::FirstSeen(_)));
}

#[test]
fn fingerprint_ignores_price_moves_but_not_bookmaker_changes() {
    let t0 = Utc::now();
    let a = arb_snapshot("ev-derby");
    let drifted = three_way_snapshot(
        "ev-derby",
        [
            ("home", "bet365", dec!(2.15)),
            ("draw", "williamhill", dec!(3.55)),
            ("away", "coral", dec!(4.10)),
        ],
        t0,
    );
    assert_eq!(Fingerprint::derive(&a), Fingerprint::derive(&drifted));

    let rerouted = three_way_snapshot(
        "ev-derby",
        [
            ("home", "paddypower", dec!(2.10)),
            ("draw", "williamhill", dec!(3.60)),
            ("away", "coral", dec!(4.20)),
        ],
        t0,
    );
    assert_ne!(Fingerprint::derive(&a), Fingerprint::derive(&rerouted));
}

#[tokio::test]
async fn ledger_settlement_feeds_the_stats_projection() {
    let ledger = MemoryLedger::new();

    let entry = ledger_entry_for("ev-derby");
    let fingerprint = entry.fingerprint.clone();
    ledger.record(&entry).await.unwrap();
    ledger.record(&ledger_entry_for("ev-cup")).await.unwrap();

    ledger
        .settle(&fingerprint, true, Some(dec!(7.95)))
        .await
        .unwrap();

    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.opportunities_recorded, 2);
    assert_eq!(stats.operator_confirmed, 1);
    assert_eq!(stats.settled, 1);
    assert_eq!(stats.total_realized_profit, dec!(7.95));
    assert!(stats.total_guaranteed_profit > dec!(15));
    assert!(stats.latency_ms_min.is_some());
}

#[tokio::test]
async fn settling_an_unknown_fingerprint_fails() {
    let ledger = MemoryLedger::new();
    let missing = Fingerprint::from("ev-x|three_way|a@b+c@d+e@f");
    let err = ledger.settle(&missing, false, None).await.unwrap_err();
    assert!(err.to_string().contains("no ledger entry"));
}

#[test]
fn stake_outcomes_are_keyed_by_outcome_id() {
    let snapshot = arb_snapshot("ev-derby");
    let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
    let plan = allocate(&verdict, &snapshot, dec!(1000), &AllocatorConfig::default()).unwrap();

    let keys: Vec<&OutcomeId> = plan.per_outcome_stake.keys().collect();
    assert_eq!(keys.len(), 3);
    assert!(plan.per_outcome_stake.contains_key(&OutcomeId::from("draw")));
}
