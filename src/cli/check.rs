//! Diagnostic checks for operator setup.

use std::path::Path;

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Validate a configuration file without starting the scanner.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());

    let config = Config::load(path)?;

    output::ok("Configuration file is valid");
    output::section("Summary");
    output::key_value("Database", &config.database);
    output::key_value("Sports", config.provider.sports.join(", "));
    output::key_value(
        "Bookmakers",
        if config.provider.bookmakers.is_empty() {
            "all".to_string()
        } else {
            config.provider.bookmakers.join(", ")
        },
    );
    output::key_value("Scan interval (s)", config.scanner.scan_interval_secs);
    output::key_value("Min margin", config.scanner.min_margin);
    output::key_value("Bankroll", config.allocator.default_bankroll);
    println!();

    if config.api_key.is_some() {
        output::ok("Odds API key found (from ODDS_API_KEY env var)");
    } else {
        output::warn("No odds API key configured");
        output::note("  Set the ODDS_API_KEY environment variable before scanning");
    }

    if config.telegram.enabled {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").is_ok();
        let chat = std::env::var("TELEGRAM_CHAT_ID").is_ok();
        if token && chat {
            output::ok("Telegram configured and enabled");
        } else {
            output::warn("Telegram enabled but missing environment variables:");
            if !token {
                output::note("    - TELEGRAM_BOT_TOKEN");
            }
            if !chat {
                output::note("    - TELEGRAM_CHAT_ID");
            }
        }
    } else {
        output::note("  Telegram: disabled");
    }

    println!();
    output::note("Configuration is ready to use.");

    Ok(())
}
