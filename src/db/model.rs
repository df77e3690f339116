//! Database model types for Diesel ORM.
//!
//! Decimals and timestamps are stored as text so values round-trip without
//! loss of precision; conversion to and from domain types lives in the
//! SQLite ledger adapter.

use diesel::prelude::*;

use super::schema::ledger_entries;

/// Database row for a ledger entry (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = ledger_entries)]
pub struct NewLedgerEntryRow {
    pub fingerprint: String,
    pub event_id: String,
    pub market_kind: String,
    pub legs: String,
    pub margin: String,
    pub total_stake: String,
    pub guaranteed_return: String,
    pub guaranteed_profit: String,
    pub detected_at: String,
    pub alerted_at: String,
    pub recorded_at: String,
    pub operator_confirmed: i32,
    pub realized_profit: Option<String>,
    pub settled_at: Option<String>,
}

/// Database row for a ledger entry (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = ledger_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerEntryRow {
    pub id: Option<i32>,
    pub fingerprint: String,
    pub event_id: String,
    pub market_kind: String,
    pub legs: String,
    pub margin: String,
    pub total_stake: String,
    pub guaranteed_return: String,
    pub guaranteed_profit: String,
    pub detected_at: String,
    pub alerted_at: String,
    pub recorded_at: String,
    pub operator_confirmed: i32,
    pub realized_profit: Option<String>,
    pub settled_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_entry_row_is_insertable() {
        // Type check - if this compiles, the Insertable derive works
        let _row = NewLedgerEntryRow {
            fingerprint: "ev|two_way|a@x+b@y".to_string(),
            event_id: "ev".to_string(),
            market_kind: "two_way".to_string(),
            legs: "[]".to_string(),
            margin: "0.0079".to_string(),
            total_stake: "1000".to_string(),
            guaranteed_return: "1008".to_string(),
            guaranteed_profit: "8".to_string(),
            detected_at: "2026-01-01T00:00:00Z".to_string(),
            alerted_at: "2026-01-01T00:00:01Z".to_string(),
            recorded_at: "2026-01-01T00:00:01Z".to_string(),
            operator_confirmed: 0,
            realized_profit: None,
            settled_at: None,
        };
    }
}
