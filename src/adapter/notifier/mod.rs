//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for various notification backends.

#[cfg(feature = "telegram")]
mod telegram;

#[cfg(feature = "telegram")]
pub use telegram::{TelegramConfig, TelegramNotifier};

use crate::port::{Event, Notifier};

/// Registry of notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::info;
        match event {
            Event::OpportunityFound(e) => {
                info!(
                    event_id = %e.event_id,
                    margin = %e.margin,
                    profit = %e.guaranteed_profit,
                    legs = e.legs.len(),
                    "Arbitrage opportunity"
                );
            }
            Event::OpportunityRefreshed(e) => {
                info!(
                    event_id = %e.event_id,
                    margin = %e.margin,
                    profit = %e.guaranteed_profit,
                    "Opportunity reconfirmed after going stale"
                );
            }
            Event::DailySummary(e) => {
                info!(
                    date = %e.date,
                    recorded = e.stats.opportunities_recorded,
                    confirmed = e.stats.operator_confirmed,
                    realized = %e.stats.total_realized_profit,
                    "Daily summary"
                );
            }
        }
    }
}
