//! Opportunity deduplication and expiry tracking.
//!
//! Converts repeated per-cycle detections into a controlled stream of
//! alert-worthy transitions: at most one alert per fingerprint per episode
//! of continuous confirmation, with re-alerts only after a stale
//! opportunity is reconfirmed.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::allocator::StakePlan;
use super::detector::ArbitrageVerdict;
use super::opportunity::{Fingerprint, Opportunity, OpportunityState};
use super::snapshot::MarketSnapshot;
use crate::error::TrackerError;

/// Configuration for the opportunity tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Opportunities not reconfirmed within this window go stale.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,

    /// Opportunities older than this are expired and evicted.
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
}

fn default_freshness_window_secs() -> u64 {
    600 // 10 minutes
}

fn default_max_lifetime_secs() -> u64 {
    1800 // 30 minutes
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: default_freshness_window_secs(),
            max_lifetime_secs: default_max_lifetime_secs(),
        }
    }
}

/// Outcome of observing one detected arbitrage.
#[derive(Debug, Clone)]
pub enum Observation {
    /// First sighting of this fingerprint; surface an alert.
    FirstSeen(Opportunity),
    /// A stale opportunity was reconfirmed; surface a refreshed alert.
    Refreshed(Opportunity),
    /// Still confirmed within its episode; stay silent.
    Confirmed,
}

impl Observation {
    /// The opportunity to surface, if this observation warrants an alert.
    #[must_use]
    pub fn alertable(&self) -> Option<&Opportunity> {
        match self {
            Observation::FirstSeen(opp) | Observation::Refreshed(opp) => Some(opp),
            Observation::Confirmed => None,
        }
    }
}

/// A state change produced by the sweep step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub fingerprint: Fingerprint,
    pub from: OpportunityState,
    pub to: OpportunityState,
}

/// Stateful gate deciding which detections are worth alerting.
///
/// The fingerprint map is the only mutable shared state in the core; the
/// tracker is owned by a single scan pipeline and mutated through
/// `&mut self`, so concurrent cycles cannot race on it.
#[derive(Debug, Default)]
pub struct OpportunityTracker {
    config: TrackerConfig,
    active: HashMap<Fingerprint, Opportunity>,
}

impl OpportunityTracker {
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            active: HashMap::new(),
        }
    }

    /// Number of tracked opportunities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Look up a tracked opportunity by fingerprint.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&Opportunity> {
        self.active.get(fingerprint)
    }

    /// Age out stale and expired opportunities.
    ///
    /// Run once at the start of each scan cycle, before evaluating new
    /// snapshots. Opportunities past the maximum lifetime are evicted, so a
    /// later identical fingerprint starts a brand-new lifecycle.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> Vec<Transition> {
        let freshness = Duration::seconds(self.config.freshness_window_secs as i64);
        let max_lifetime = Duration::seconds(self.config.max_lifetime_secs as i64);

        let mut transitions = Vec::new();

        self.active.retain(|fingerprint, opp| {
            if now - opp.first_seen_at > max_lifetime {
                transitions.push(Transition {
                    fingerprint: fingerprint.clone(),
                    from: opp.state,
                    to: OpportunityState::Expired,
                });
                return false;
            }
            if opp.state.is_active() && now - opp.last_confirmed_at > freshness {
                transitions.push(Transition {
                    fingerprint: fingerprint.clone(),
                    from: opp.state,
                    to: OpportunityState::Stale,
                });
                opp.state = OpportunityState::Stale;
            }
            true
        });

        transitions
    }

    /// Record a detected arbitrage and decide whether it deserves an alert.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::FingerprintCollision`] when the fingerprint
    /// maps to a different leg set than the one already tracked. That can
    /// only happen through a fingerprint-derivation defect and must halt
    /// the cycle rather than corrupt the dedup state.
    pub fn observe(
        &mut self,
        snapshot: &MarketSnapshot,
        verdict: &ArbitrageVerdict,
        plan: &StakePlan,
        now: DateTime<Utc>,
    ) -> Result<Observation, TrackerError> {
        let fingerprint = Fingerprint::derive(snapshot);

        let Some(existing) = self.active.get_mut(&fingerprint) else {
            let mut opp = Opportunity::new(snapshot, verdict.clone(), plan.clone(), now);
            opp.state = OpportunityState::Alerted;
            self.active.insert(fingerprint, opp.clone());
            return Ok(Observation::FirstSeen(opp));
        };

        let observed_legs = snapshot.legs();
        if existing.leg_keys() != observed_legs {
            return Err(TrackerError::FingerprintCollision {
                fingerprint,
                existing: existing.leg_keys(),
                observed: observed_legs,
            });
        }

        existing.last_confirmed_at = now;
        existing.verdict = verdict.clone();
        existing.plan = plan.clone();

        match existing.state {
            OpportunityState::Stale => {
                existing.state = OpportunityState::Alerted;
                Ok(Observation::Refreshed(existing.clone()))
            }
            OpportunityState::Expired => {
                // Expired entries are evicted at sweep; a lingering one is
                // treated as a fresh lifecycle.
                let mut opp = Opportunity::new(snapshot, verdict.clone(), plan.clone(), now);
                opp.state = OpportunityState::Alerted;
                *existing = opp.clone();
                Ok(Observation::FirstSeen(opp))
            }
            OpportunityState::New | OpportunityState::Alerted => Ok(Observation::Confirmed),
        }
    }

    /// Drop a tracked opportunity whose snapshot no longer shows arbitrage.
    ///
    /// Returns the expired opportunity if it was tracked.
    pub fn invalidate(&mut self, fingerprint: &Fingerprint) -> Option<Opportunity> {
        self.active.remove(fingerprint).map(|mut opp| {
            opp.state = OpportunityState::Expired;
            opp
        })
    }
}
