//! Stake allocation: the equal-return split that locks in the margin.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::detector::ArbitrageVerdict;
use super::ids::OutcomeId;
use super::snapshot::MarketSnapshot;
use crate::error::AllocationError;

/// Configuration for the stake allocator.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocatorConfig {
    /// Bankroll committed per opportunity when the caller does not override.
    #[serde(default = "default_bankroll")]
    pub default_bankroll: Decimal,

    /// Smallest per-outcome stake worth placing with a bookmaker.
    #[serde(default = "default_minimum_stake")]
    pub minimum_stake: Decimal,

    /// Currency minimum unit stakes are rounded to.
    #[serde(default = "default_rounding_unit")]
    pub rounding_unit: Decimal,
}

fn default_bankroll() -> Decimal {
    Decimal::from(1000)
}

fn default_minimum_stake() -> Decimal {
    Decimal::new(50, 2) // 0.50
}

fn default_rounding_unit() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            default_bankroll: default_bankroll(),
            minimum_stake: default_minimum_stake(),
            rounding_unit: default_rounding_unit(),
        }
    }
}

/// Computed allocation for a given bankroll and verdict.
///
/// Returns are equalized: `stake_o * price_o` is the same for every outcome
/// up to the rounding unit, so the profit is guaranteed regardless of which
/// outcome wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakePlan {
    pub total_stake: Decimal,
    pub per_outcome_stake: BTreeMap<OutcomeId, Decimal>,
    pub guaranteed_return: Decimal,
    pub guaranteed_profit: Decimal,
}

/// Compute the guaranteed-profit stake split.
///
/// Only callable on an arbitrage verdict. Each stake is
/// `bankroll * (1/price_o) / implied_sum`, floored to the rounding unit;
/// the leftover from flooring is added to the largest stake so the total
/// equals the bankroll exactly and never exceeds it.
pub fn allocate(
    verdict: &ArbitrageVerdict,
    snapshot: &MarketSnapshot,
    bankroll: Decimal,
    config: &AllocatorConfig,
) -> Result<StakePlan, AllocationError> {
    if bankroll <= Decimal::ZERO {
        return Err(AllocationError::NonPositiveBankroll { bankroll });
    }
    if !verdict.is_arbitrage {
        return Err(AllocationError::NotArbitrage {
            implied_sum: verdict.implied_probability_sum,
        });
    }

    let implied_sum = verdict.implied_probability_sum;
    let unit = config.rounding_unit;

    let mut per_outcome_stake: BTreeMap<OutcomeId, Decimal> = BTreeMap::new();
    for (outcome_id, quote) in &snapshot.best_quotes {
        let raw = bankroll / quote.decimal_price / implied_sum;
        let rounded = floor_to_unit(raw, unit);
        per_outcome_stake.insert(outcome_id.clone(), rounded);
    }

    // Leftover from flooring goes to the largest stake, keeping the sum
    // exactly at the bankroll.
    let allocated: Decimal = per_outcome_stake.values().copied().sum();
    let remainder = bankroll - allocated;
    if remainder > Decimal::ZERO {
        let largest = per_outcome_stake
            .iter()
            .max_by_key(|(_, stake)| **stake)
            .map(|(outcome, _)| outcome.clone())
            .ok_or(AllocationError::NotArbitrage {
                implied_sum: verdict.implied_probability_sum,
            })?;
        if let Some(stake) = per_outcome_stake.get_mut(&largest) {
            *stake += remainder;
        }
    }

    if let Some((outcome_id, stake)) = per_outcome_stake
        .iter()
        .min_by_key(|(_, stake)| **stake)
        .map(|(outcome, stake)| (outcome.clone(), *stake))
    {
        if stake < config.minimum_stake {
            return Err(AllocationError::BankrollTooSmall {
                bankroll,
                outcome_id,
                stake,
                minimum: config.minimum_stake,
            });
        }
    }

    let guaranteed_return = bankroll / implied_sum;

    Ok(StakePlan {
        total_stake: bankroll,
        per_outcome_stake,
        guaranteed_return,
        guaranteed_profit: guaranteed_return - bankroll,
    })
}

fn floor_to_unit(value: Decimal, unit: Decimal) -> Decimal {
    if unit <= Decimal::ZERO {
        return value;
    }
    (value / unit).floor() * unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detector::{detect, DetectorConfig};
    use crate::domain::snapshot::{MarketKind, OutcomeQuote};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn snapshot_of(kind: MarketKind, prices: &[(&str, Decimal)]) -> MarketSnapshot {
        let quotes = prices
            .iter()
            .map(|(outcome, price)| {
                OutcomeQuote::new(*outcome, "bookie", *price, Utc::now()).unwrap()
            })
            .collect::<Vec<_>>();
        MarketSnapshot::assemble("ev-1", kind, Utc::now(), quotes)
    }

    fn arb_snapshot() -> MarketSnapshot {
        snapshot_of(
            MarketKind::ThreeWay,
            &[("home", dec!(2.10)), ("draw", dec!(3.60)), ("away", dec!(4.20))],
        )
    }

    fn within(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn three_way_split_sums_to_bankroll_with_equal_returns() {
        let snapshot = arb_snapshot();
        let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
        let plan = allocate(&verdict, &snapshot, dec!(1000), &AllocatorConfig::default()).unwrap();

        let total: Decimal = plan.per_outcome_stake.values().copied().sum();
        assert_eq!(total, dec!(1000));
        assert_eq!(plan.total_stake, dec!(1000));

        // Expected split ~480 / 280 / 240 with return ~1008 for any winner.
        assert!(within(plan.per_outcome_stake[&OutcomeId::from("home")], dec!(480), dec!(0.05)));
        assert!(within(plan.per_outcome_stake[&OutcomeId::from("draw")], dec!(280), dec!(0.05)));
        assert!(within(plan.per_outcome_stake[&OutcomeId::from("away")], dec!(240), dec!(0.05)));
        assert!(within(plan.guaranteed_return, dec!(1008), dec!(0.01)));
        assert!(within(plan.guaranteed_profit, dec!(8), dec!(0.01)));

        // stake_o * price_o constant across outcomes, up to rounding.
        for (outcome, stake) in &plan.per_outcome_stake {
            let price = snapshot.best_quotes[outcome].decimal_price;
            assert!(within(*stake * price, plan.guaranteed_return, dec!(0.25)));
        }
    }

    #[test]
    fn stakes_are_floored_to_the_rounding_unit() {
        let snapshot = arb_snapshot();
        let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
        let plan = allocate(&verdict, &snapshot, dec!(1000), &AllocatorConfig::default()).unwrap();

        let unit = dec!(0.01);
        let largest = plan
            .per_outcome_stake
            .values()
            .copied()
            .max()
            .unwrap();
        for stake in plan.per_outcome_stake.values() {
            // All but the remainder-absorbing largest stake are exact multiples.
            if *stake != largest {
                assert_eq!((*stake / unit).fract(), Decimal::ZERO, "stake {stake} not on unit");
            }
        }
    }

    #[test]
    fn non_arbitrage_verdict_is_rejected() {
        let snapshot = snapshot_of(MarketKind::TwoWay, &[("home", dec!(1.80)), ("away", dec!(2.00))]);
        let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
        let err = allocate(&verdict, &snapshot, dec!(1000), &AllocatorConfig::default()).unwrap_err();

        assert!(matches!(err, AllocationError::NotArbitrage { .. }));
    }

    #[test]
    fn tiny_bankroll_fails_below_minimum_stake() {
        let snapshot = arb_snapshot();
        let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
        let err = allocate(&verdict, &snapshot, dec!(1), &AllocatorConfig::default()).unwrap_err();

        match err {
            AllocationError::BankrollTooSmall { minimum, stake, .. } => {
                assert_eq!(minimum, dec!(0.50));
                assert!(stake < minimum);
            }
            other => panic!("expected BankrollTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn zero_bankroll_is_rejected() {
        let snapshot = arb_snapshot();
        let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
        let err =
            allocate(&verdict, &snapshot, Decimal::ZERO, &AllocatorConfig::default()).unwrap_err();

        assert!(matches!(err, AllocationError::NonPositiveBankroll { .. }));
    }

    #[test]
    fn profit_is_positive_for_arbitrage() {
        let snapshot = arb_snapshot();
        let verdict = detect(&snapshot, &DetectorConfig::default()).unwrap();
        let plan = allocate(&verdict, &snapshot, dec!(250), &AllocatorConfig::default()).unwrap();

        assert!(plan.guaranteed_profit > Decimal::ZERO);
        assert_eq!(plan.guaranteed_return, dec!(250) / verdict.implied_probability_sum);
    }
}
