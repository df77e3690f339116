//! Adapters binding the ports to concrete backends.

pub mod notifier;
pub mod provider;
pub mod store;
