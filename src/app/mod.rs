//! Scan pipeline: fetch, detect, allocate, dedup, alert, record.
//!
//! One [`App`] owns the whole flow. Cycles run strictly sequentially; a
//! cycle that overruns the interval delays the next tick instead of
//! overlapping it.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::adapter::notifier::NotifierRegistry;
use crate::config::ScannerConfig;
use crate::domain::{
    allocate, detect, AllocatorConfig, DetectorConfig, Fingerprint, LedgerEntry, Observation,
    OpportunityTracker, TrackerConfig,
};
use crate::error::Result;
use crate::port::{Event, LedgerStore, SnapshotSource, SummaryEvent};

/// Counters for one scan cycle, logged at cycle end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Snapshots delivered by the provider.
    pub snapshots: usize,
    /// Events skipped as incomplete or invalid.
    pub skipped: usize,
    /// Snapshots whose implied sum cleared the arbitrage threshold.
    pub arbitrages: usize,
    /// Arbitrages discarded by the margin filter.
    pub below_margin: usize,
    /// Arbitrages dropped because the bankroll could not cover them.
    pub unfundable: usize,
    /// Alerts emitted (first sightings plus reconfirmations).
    pub alerts: usize,
    /// Silent confirmations of already-alerted opportunities.
    pub confirmations: usize,
}

/// The scan application: provider, detection core, notifiers, ledger.
pub struct App<S, L> {
    source: S,
    ledger: L,
    notifiers: NotifierRegistry,
    tracker: OpportunityTracker,
    detector: DetectorConfig,
    allocator: AllocatorConfig,
    scanner: ScannerConfig,
    last_summary_date: Option<NaiveDate>,
}

impl<S, L> App<S, L>
where
    S: SnapshotSource,
    L: LedgerStore,
{
    pub fn new(
        source: S,
        ledger: L,
        notifiers: NotifierRegistry,
        detector: DetectorConfig,
        allocator: AllocatorConfig,
        tracker: TrackerConfig,
        scanner: ScannerConfig,
    ) -> Self {
        Self {
            source,
            ledger,
            notifiers,
            tracker: OpportunityTracker::new(tracker),
            detector,
            allocator,
            scanner,
            last_summary_date: None,
        }
    }

    /// Number of opportunities currently tracked across episodes.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.tracker.len()
    }

    /// Run one full scan cycle.
    ///
    /// A provider failure aborts the cycle; per-event problems are logged
    /// and skipped so one bad event never hides the rest.
    pub async fn run_cycle(&mut self) -> Result<ScanReport> {
        let now = Utc::now();

        for transition in self.tracker.sweep(now) {
            debug!(
                fingerprint = %transition.fingerprint,
                from = %transition.from,
                to = %transition.to,
                "Opportunity transitioned"
            );
        }

        let snapshots = self.source.fetch_snapshots().await?;
        let mut report = ScanReport {
            snapshots: snapshots.len(),
            ..ScanReport::default()
        };

        for snapshot in &snapshots {
            let verdict = match detect(snapshot, &self.detector) {
                Ok(verdict) => verdict,
                Err(e) => {
                    debug!(event_id = %snapshot.event_id, error = %e, "Skipping event");
                    report.skipped += 1;
                    continue;
                }
            };

            if !verdict.is_arbitrage {
                // Prices collapsed back under fair value. If we were
                // tracking this fingerprint, its episode is over.
                if self
                    .tracker
                    .invalidate(&Fingerprint::derive(snapshot))
                    .is_some()
                {
                    debug!(event_id = %snapshot.event_id, "Tracked opportunity no longer holds");
                }
                continue;
            }
            report.arbitrages += 1;

            if verdict.margin < self.scanner.min_margin {
                report.below_margin += 1;
                if self
                    .tracker
                    .invalidate(&Fingerprint::derive(snapshot))
                    .is_some()
                {
                    debug!(event_id = %snapshot.event_id, "Tracked opportunity fell below margin");
                }
                continue;
            }

            let plan = match allocate(
                &verdict,
                snapshot,
                self.allocator.default_bankroll,
                &self.allocator,
            ) {
                Ok(plan) => plan,
                Err(e) => {
                    warn!(event_id = %snapshot.event_id, error = %e, "Cannot fund opportunity");
                    report.unfundable += 1;
                    continue;
                }
            };

            let observation = self.tracker.observe(snapshot, &verdict, &plan, now)?;
            match observation {
                Observation::FirstSeen(opp) => {
                    info!(
                        fingerprint = %opp.fingerprint,
                        margin = %opp.verdict.margin,
                        profit = %opp.plan.guaranteed_profit,
                        "Arbitrage opportunity found"
                    );
                    self.notifiers.notify_all(Event::OpportunityFound((&opp).into()));
                    self.ledger
                        .record(&LedgerEntry::from_opportunity(&opp, Utc::now()))
                        .await?;
                    report.alerts += 1;
                }
                Observation::Refreshed(opp) => {
                    info!(
                        fingerprint = %opp.fingerprint,
                        margin = %opp.verdict.margin,
                        "Stale opportunity reconfirmed"
                    );
                    self.notifiers
                        .notify_all(Event::OpportunityRefreshed((&opp).into()));
                    self.ledger
                        .record(&LedgerEntry::from_opportunity(&opp, Utc::now()))
                        .await?;
                    report.alerts += 1;
                }
                Observation::Confirmed => {
                    report.confirmations += 1;
                }
            }
        }

        info!(
            snapshots = report.snapshots,
            arbitrages = report.arbitrages,
            alerts = report.alerts,
            below_margin = report.below_margin,
            tracked = self.tracker.len(),
            "Scan cycle complete"
        );

        Ok(report)
    }

    /// Run scan cycles forever at the configured interval.
    ///
    /// Provider failures are logged and retried on the next tick. Only
    /// internal invariant violations (a fingerprint collision) abort the
    /// loop.
    pub async fn run(&mut self) -> Result<()> {
        let period = std::time::Duration::from_secs(self.scanner.scan_interval_secs);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            interval_secs = self.scanner.scan_interval_secs,
            min_margin = %self.scanner.min_margin,
            "Scanner started"
        );

        loop {
            interval.tick().await;
            match self.run_cycle().await {
                Ok(_) => {}
                Err(e @ crate::error::Error::Tracker(_)) => return Err(e),
                Err(e) => {
                    warn!(error = %e, "Scan cycle failed, retrying next tick");
                }
            }
            self.emit_daily_summary().await;
        }
    }

    /// Emit one ledger summary per UTC day once the date rolls over.
    async fn emit_daily_summary(&mut self) {
        let today = Utc::now().date_naive();
        match self.last_summary_date {
            None => {
                // First cycle of this process: anchor the date, no summary.
                self.last_summary_date = Some(today);
            }
            Some(last) if last < today => {
                match self.ledger.stats().await {
                    Ok(stats) => {
                        self.notifiers
                            .notify_all(Event::DailySummary(SummaryEvent { date: last, stats }));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to project ledger stats for summary");
                    }
                }
                self.last_summary_date = Some(today);
            }
            Some(_) => {}
        }
    }
}
