//! Snapshot source backed by the-odds-api.com v4 REST API.
//!
//! Fetches head-to-head decimal odds per sport and assembles one
//! [`MarketSnapshot`] per event, keeping the best price per outcome across
//! the configured bookmakers.

use std::collections::BTreeSet;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{MarketKind, MarketSnapshot, OutcomeQuote};
use crate::error::{Error, Result};
use crate::port::SnapshotSource;

/// Configuration for the odds provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Sport keys to scan (e.g. `soccer_epl`, `tennis_atp`).
    #[serde(default = "default_sports")]
    pub sports: Vec<String>,

    /// Bookmakers whose prices are considered. Empty means all.
    #[serde(default)]
    pub bookmakers: Vec<String>,
}

fn default_api_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_region() -> String {
    "uk".to_string()
}

fn default_sports() -> Vec<String> {
    vec!["soccer_epl".to_string(), "tennis_atp".to_string()]
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            region: default_region(),
            sports: default_sports(),
            bookmakers: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    id: String,
    #[serde(default)]
    home_team: Option<String>,
    #[serde(default)]
    away_team: Option<String>,
    bookmakers: Vec<ApiBookmaker>,
}

#[derive(Debug, Deserialize)]
struct ApiBookmaker {
    key: String,
    markets: Vec<ApiMarket>,
}

#[derive(Debug, Deserialize)]
struct ApiMarket {
    key: String,
    outcomes: Vec<ApiOutcome>,
}

#[derive(Debug, Deserialize)]
struct ApiOutcome {
    name: String,
    price: Decimal,
}

/// Odds feed backed by the-odds-api.com.
pub struct OddsApiSource {
    client: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
}

impl OddsApiSource {
    #[must_use]
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    async fn fetch_sport(&self, sport: &str) -> Result<Vec<MarketSnapshot>> {
        let url = format!("{}/sports/{}/odds", self.config.api_url, sport);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", self.config.region.as_str()),
                ("markets", "h2h"),
                ("oddsFormat", "decimal"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "odds API returned {} for {sport}",
                response.status()
            )));
        }

        let events: Vec<ApiEvent> = response.json().await?;
        Ok(events
            .into_iter()
            .filter_map(|event| self.assemble_snapshot(event))
            .collect())
    }

    /// Turn one API event into a snapshot, or None if the event cannot form
    /// a supported market. Partial data is dropped here, never filled in.
    fn assemble_snapshot(&self, event: ApiEvent) -> Option<MarketSnapshot> {
        let taken_at = Utc::now();
        let mut quotes = Vec::new();
        let mut outcomes = BTreeSet::new();

        for bookmaker in &event.bookmakers {
            if !self.config.bookmakers.is_empty()
                && !self.config.bookmakers.contains(&bookmaker.key)
            {
                continue;
            }
            for market in &bookmaker.markets {
                if market.key != "h2h" {
                    continue;
                }
                for outcome in &market.outcomes {
                    match OutcomeQuote::new(
                        outcome.name.as_str(),
                        bookmaker.key.as_str(),
                        outcome.price,
                        taken_at,
                    ) {
                        Ok(quote) => {
                            outcomes.insert(outcome.name.clone());
                            quotes.push(quote);
                        }
                        Err(e) => {
                            warn!(event_id = %event.id, error = %e, "Dropping invalid quote");
                        }
                    }
                }
            }
        }

        let Some(kind) = MarketKind::from_outcome_count(outcomes.len()) else {
            debug!(
                event_id = %event.id,
                outcomes = outcomes.len(),
                home = event.home_team.as_deref().unwrap_or(""),
                away = event.away_team.as_deref().unwrap_or(""),
                "Skipping event without a supported outcome set"
            );
            return None;
        };

        Some(MarketSnapshot::assemble(
            event.id.as_str(),
            kind,
            taken_at,
            quotes,
        ))
    }
}

impl SnapshotSource for OddsApiSource {
    async fn fetch_snapshots(&self) -> Result<Vec<MarketSnapshot>> {
        let mut snapshots = Vec::new();
        let mut failures = Vec::new();

        for sport in &self.config.sports {
            match self.fetch_sport(sport).await {
                Ok(mut batch) => snapshots.append(&mut batch),
                Err(e) => {
                    warn!(sport = %sport, error = %e, "Failed to fetch odds");
                    failures.push(sport.clone());
                }
            }
        }

        if snapshots.is_empty() && !failures.is_empty() {
            return Err(Error::Provider(format!(
                "all sports failed to fetch: {}",
                failures.join(", ")
            )));
        }

        Ok(snapshots)
    }
}
