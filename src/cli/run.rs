//! Handler for the `run` command.

use tokio::signal;
use tracing::{error, info};

use crate::adapter::notifier::{LogNotifier, NotifierRegistry};
use crate::adapter::provider::OddsApiSource;
use crate::adapter::store::SqliteLedger;
use crate::app::App;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;

/// Apply CLI overrides on top of the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(min_margin) = args.min_margin {
        config.scanner.min_margin = min_margin;
    }
    if let Some(bankroll) = args.bankroll {
        config.allocator.default_bankroll = bankroll;
    }
    if let Some(interval) = args.interval {
        config.scanner.scan_interval_secs = interval;
    }
    if args.telegram {
        config.telegram.enabled = true;
    }
}

/// Assemble the scan application from configuration.
pub fn build_app(config: &Config) -> Result<App<OddsApiSource, SqliteLedger>> {
    let api_key = config.require_api_key()?.to_string();
    let source = OddsApiSource::new(config.provider.clone(), api_key);

    let pool = crate::db::create_pool(&config.database)?;
    let ledger = SqliteLedger::new(pool);

    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(LogNotifier));

    #[cfg(feature = "telegram")]
    if config.telegram.enabled {
        use crate::adapter::notifier::{TelegramConfig, TelegramNotifier};
        match TelegramConfig::from_env() {
            Some(mut telegram) => {
                telegram.notify_refreshes = config.telegram.notify_refreshes;
                notifiers.register(Box::new(TelegramNotifier::new(telegram)));
                info!("Telegram notifications enabled");
            }
            None => {
                error!("Telegram enabled but TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID missing");
            }
        }
    }

    Ok(App::new(
        source,
        ledger,
        notifiers,
        config.detector.clone(),
        config.allocator.clone(),
        config.tracker.clone(),
        config.scanner.clone(),
    ))
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    apply_overrides(&mut config, args);
    config.logging.init();

    info!(
        database = %config.database,
        sports = ?config.provider.sports,
        "oddsedge starting"
    );

    let mut app = build_app(&config)?;

    tokio::select! {
        result = app.run() => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                return Err(e);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("oddsedge stopped");
    Ok(())
}
