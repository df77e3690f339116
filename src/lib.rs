//! Oddsedge - Sports betting arbitrage detection and stake allocation.
//!
//! Scans bookmaker odds for markets where the best available prices sum to
//! an implied probability below one, sizes stakes so every outcome pays the
//! same guaranteed return, and surfaces each opportunity exactly once per
//! episode.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Detection core: snapshots, detector, allocator, tracker, ledger types
//! - [`port`] - Trait boundaries: odds source, ledger store, notifier
//! - [`adapter`] - Concrete backends: the-odds-api feed, SQLite ledger, Telegram
//! - [`app`] - Scan pipeline and scheduler
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` - Enable Telegram alert delivery (on by default)
//!
//! # Example
//!
//! ```no_run
//! use oddsedge::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod port;
