//! Odds feed port: the boundary to the external price provider.

use std::future::Future;

use crate::domain::MarketSnapshot;
use crate::error::Result;

/// Source of assembled market snapshots, one best quote per outcome.
///
/// Providers must deliver complete snapshots or drop the event for the
/// cycle; a partial snapshot must never be best-guess filled. Provider
/// failures surface as errors for the scheduler to decide on, not as
/// empty results.
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current snapshots for all tracked events.
    fn fetch_snapshots(&self) -> impl Future<Output = Result<Vec<MarketSnapshot>>> + Send;
}
