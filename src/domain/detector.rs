//! Arbitrage detection: implied probability sum and profit margin.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::snapshot::MarketSnapshot;
use crate::error::SnapshotError;

/// Configuration for the arbitrage detector.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Margin below this tolerance is not treated as an arbitrage.
    ///
    /// Guards against flagging knife-edge markets where the implied
    /// probability sum sits right at the 1.0 boundary.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 4) // 0.0001
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

/// Result of evaluating a complete market snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitrageVerdict {
    pub is_arbitrage: bool,
    /// Sum over outcomes of `1 / decimal_price`.
    pub implied_probability_sum: Decimal,
    /// `1 - implied_probability_sum`; the profit fraction of total stake
    /// when positive.
    pub margin: Decimal,
}

/// Evaluate a snapshot for arbitrage.
///
/// Pure and deterministic. An incomplete snapshot (missing outcomes or a
/// price at or below 1.0) yields a [`SnapshotError`], never a verdict.
pub fn detect(
    snapshot: &MarketSnapshot,
    config: &DetectorConfig,
) -> Result<ArbitrageVerdict, SnapshotError> {
    let expected = snapshot.market_kind.outcome_count();
    let found = snapshot.best_quotes.len();
    if found != expected {
        return Err(SnapshotError::Incomplete {
            event_id: snapshot.event_id.clone(),
            expected,
            found,
        });
    }

    let mut implied_probability_sum = Decimal::ZERO;
    for (outcome_id, quote) in &snapshot.best_quotes {
        if quote.decimal_price <= Decimal::ONE {
            return Err(SnapshotError::InvalidPrice {
                outcome_id: outcome_id.clone(),
                price: quote.decimal_price,
            });
        }
        implied_probability_sum += Decimal::ONE / quote.decimal_price;
    }

    let margin = Decimal::ONE - implied_probability_sum;

    Ok(ArbitrageVerdict {
        is_arbitrage: margin > config.tolerance,
        implied_probability_sum,
        margin,
    })
}
