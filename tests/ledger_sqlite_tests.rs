//! Integration tests for the SQLite-backed ledger.

mod support;

use rust_decimal_macros::dec;
use tempfile::TempDir;

use oddsedge::adapter::store::SqliteLedger;
use oddsedge::db::create_pool;
use oddsedge::domain::{Fingerprint, MarketKind};
use oddsedge::port::LedgerStore;

use support::ledger_entry_for;

fn temp_ledger(dir: &TempDir) -> SqliteLedger {
    let path = dir.path().join("ledger.db");
    let pool = create_pool(path.to_str().expect("utf8 path")).expect("create pool");
    SqliteLedger::new(pool)
}

#[tokio::test]
async fn entries_round_trip_through_sqlite() {
    let dir = TempDir::new().unwrap();
    let ledger = temp_ledger(&dir);

    let entry = ledger_entry_for("ev-derby");
    ledger.record(&entry).await.unwrap();

    let loaded = ledger.entries().await.unwrap();
    assert_eq!(loaded.len(), 1);

    let got = &loaded[0];
    assert_eq!(got.fingerprint, entry.fingerprint);
    assert_eq!(got.market_kind, MarketKind::ThreeWay);
    assert_eq!(got.legs.len(), 3);
    assert_eq!(got.total_stake, entry.total_stake);
    assert_eq!(got.margin, entry.margin);
    assert_eq!(got.guaranteed_return, entry.guaranteed_return);
    assert_eq!(got.detected_at, entry.detected_at);
    assert!(!got.operator_confirmed);
    assert!(got.realized_profit.is_none());
    assert!(got.settled_at.is_none());
}

#[tokio::test]
async fn settle_updates_the_most_recent_unsettled_entry() {
    let dir = TempDir::new().unwrap();
    let ledger = temp_ledger(&dir);

    // Same fingerprint recorded twice: two episodes of one opportunity.
    let first = ledger_entry_for("ev-derby");
    let second = ledger_entry_for("ev-derby");
    assert_eq!(first.fingerprint, second.fingerprint);

    ledger.record(&first).await.unwrap();
    ledger.record(&second).await.unwrap();

    ledger
        .settle(&first.fingerprint, true, Some(dec!(7.50)))
        .await
        .unwrap();

    let loaded = ledger.entries().await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded[0].realized_profit.is_none());
    assert_eq!(loaded[1].realized_profit, Some(dec!(7.50)));
    assert!(loaded[1].operator_confirmed);
    assert!(loaded[1].settled_at.is_some());
}

#[tokio::test]
async fn settle_unknown_fingerprint_is_an_error() {
    let dir = TempDir::new().unwrap();
    let ledger = temp_ledger(&dir);

    let missing = Fingerprint::from("ev-x|two_way|a@b+c@d");
    let err = ledger.settle(&missing, false, None).await.unwrap_err();
    assert!(err.to_string().contains("no ledger entry"));
}

#[tokio::test]
async fn stats_project_over_persisted_entries() {
    let dir = TempDir::new().unwrap();
    let ledger = temp_ledger(&dir);

    ledger.record(&ledger_entry_for("ev-derby")).await.unwrap();
    ledger.record(&ledger_entry_for("ev-cup")).await.unwrap();

    let entry = ledger_entry_for("ev-final");
    ledger.record(&entry).await.unwrap();
    ledger
        .settle(&entry.fingerprint, false, Some(dec!(-2.00)))
        .await
        .unwrap();

    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.opportunities_recorded, 3);
    assert_eq!(stats.settled, 1);
    assert_eq!(stats.operator_confirmed, 0);
    assert_eq!(stats.total_realized_profit, dec!(-2.00));
}

#[tokio::test]
async fn ledger_survives_reopening_the_database() {
    let dir = TempDir::new().unwrap();

    let entry = ledger_entry_for("ev-derby");
    {
        let ledger = temp_ledger(&dir);
        ledger.record(&entry).await.unwrap();
    }

    let reopened = temp_ledger(&dir);
    let loaded = reopened.entries().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].fingerprint, entry.fingerprint);
}
