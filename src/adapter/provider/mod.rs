//! Odds feed adapters.

mod odds_api;

pub use odds_api::{OddsApiSource, ProviderConfig};
