//! SQLite ledger implementation using Diesel.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::db::model::{LedgerEntryRow, NewLedgerEntryRow};
use crate::db::schema::ledger_entries;
use crate::db::DbPool;
use crate::domain::{Fingerprint, LedgerEntry, LedgerLeg, MarketKind};
use crate::error::{Error, LedgerError, Result};
use crate::port::LedgerStore;

/// SQLite-backed opportunity ledger.
pub struct SqliteLedger {
    pool: DbPool,
}

impl SqliteLedger {
    /// Create a new SQLite ledger on an initialized pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(entry: &LedgerEntry) -> Result<NewLedgerEntryRow> {
        Ok(NewLedgerEntryRow {
            fingerprint: entry.fingerprint.to_string(),
            event_id: entry.event_id.to_string(),
            market_kind: entry.market_kind.to_string(),
            legs: serde_json::to_string(&entry.legs)?,
            margin: entry.margin.to_string(),
            total_stake: entry.total_stake.to_string(),
            guaranteed_return: entry.guaranteed_return.to_string(),
            guaranteed_profit: entry.guaranteed_profit.to_string(),
            detected_at: entry.detected_at.to_rfc3339(),
            alerted_at: entry.alerted_at.to_rfc3339(),
            recorded_at: entry.recorded_at.to_rfc3339(),
            operator_confirmed: i32::from(entry.operator_confirmed),
            realized_profit: entry.realized_profit.map(|p| p.to_string()),
            settled_at: entry.settled_at.map(|t| t.to_rfc3339()),
        })
    }

    fn from_row(row: LedgerEntryRow) -> Result<LedgerEntry> {
        let legs: Vec<LedgerLeg> = serde_json::from_str(&row.legs)?;
        Ok(LedgerEntry {
            fingerprint: Fingerprint::from(row.fingerprint),
            event_id: row.event_id.into(),
            market_kind: parse_market_kind(&row.market_kind)?,
            legs,
            margin: parse_decimal(&row.margin)?,
            total_stake: parse_decimal(&row.total_stake)?,
            guaranteed_return: parse_decimal(&row.guaranteed_return)?,
            guaranteed_profit: parse_decimal(&row.guaranteed_profit)?,
            detected_at: parse_datetime(&row.detected_at)?,
            alerted_at: parse_datetime(&row.alerted_at)?,
            recorded_at: parse_datetime(&row.recorded_at)?,
            operator_confirmed: row.operator_confirmed != 0,
            realized_profit: row
                .realized_profit
                .as_deref()
                .map(parse_decimal)
                .transpose()?,
            settled_at: row.settled_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).map_err(|e| Error::Parse(e.to_string()))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

fn parse_market_kind(s: &str) -> Result<MarketKind> {
    match s {
        "two_way" => Ok(MarketKind::TwoWay),
        "three_way" => Ok(MarketKind::ThreeWay),
        other => Err(Error::Parse(format!("unknown market kind '{other}'"))),
    }
}

impl LedgerStore for SqliteLedger {
    async fn record(&self, entry: &LedgerEntry) -> Result<()> {
        let row = Self::to_row(entry)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        diesel::insert_into(ledger_entries::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(())
    }

    async fn settle(
        &self,
        fingerprint: &Fingerprint,
        operator_confirmed: bool,
        realized_profit: Option<Decimal>,
    ) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        let rows: Vec<LedgerEntryRow> = ledger_entries::table
            .filter(ledger_entries::fingerprint.eq(fingerprint.as_str()))
            .order(ledger_entries::id.desc())
            .load(&mut conn)
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        // Prefer the most recent unsettled entry; fall back to the most
        // recent one so a settlement can be corrected.
        let target = rows
            .iter()
            .find(|r| r.settled_at.is_none())
            .or_else(|| rows.first())
            .and_then(|r| r.id)
            .ok_or_else(|| LedgerError::UnknownFingerprint(fingerprint.clone()))?;

        diesel::update(ledger_entries::table.filter(ledger_entries::id.eq(Some(target))))
            .set((
                ledger_entries::operator_confirmed.eq(i32::from(operator_confirmed)),
                ledger_entries::realized_profit.eq(realized_profit.map(|p| p.to_string())),
                ledger_entries::settled_at.eq(Some(Utc::now().to_rfc3339())),
            ))
            .execute(&mut conn)
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(())
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        let rows: Vec<LedgerEntryRow> = ledger_entries::table
            .order(ledger_entries::id.asc())
            .load(&mut conn)
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
