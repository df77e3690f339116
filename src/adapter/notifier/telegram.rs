//! Telegram notification delivery.
//!
//! Sends opportunity alerts to a configured chat. Delivery happens on a
//! background worker fed through an unbounded channel so `notify` never
//! blocks the scan cycle.
//!
//! Requires the `telegram` feature to be enabled.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::port::{AlertEvent, Event, Notifier};

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for notifications.
    pub chat_id: i64,
    /// Send a message again when a stale opportunity is reconfirmed.
    pub notify_refreshes: bool,
}

impl TelegramConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`. Returns `None`
    /// if required variables are missing or invalid.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()
            .and_then(|s| s.parse().ok())?;

        Some(Self {
            bot_token,
            chat_id,
            notify_refreshes: true,
        })
    }
}

/// Telegram notifier that sends messages to a chat.
///
/// Implements the [`Notifier`] trait and spawns a background worker for
/// message delivery.
pub struct TelegramNotifier {
    sender: mpsc::UnboundedSender<Event>,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier and spawn the background worker.
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(telegram_worker(config, receiver));
        Self { sender }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("Telegram notifier channel closed");
        }
    }
}

async fn telegram_worker(config: TelegramConfig, mut receiver: mpsc::UnboundedReceiver<Event>) {
    let bot = Bot::new(&config.bot_token);
    let chat_id = ChatId(config.chat_id);

    while let Some(event) = receiver.recv().await {
        let Some(message) = format_event_message(&event, &config) else {
            continue;
        };

        if let Err(e) = bot
            .send_message(chat_id, message)
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            error!(error = %e, "Failed to send Telegram message");
        }
    }
}

/// Format an event into a Telegram message, or None if it should be skipped.
fn format_event_message(event: &Event, config: &TelegramConfig) -> Option<String> {
    match event {
        Event::OpportunityFound(e) => Some(format_alert("🎯 *Arbitrage Found*", e)),
        Event::OpportunityRefreshed(e) if config.notify_refreshes => {
            Some(format_alert("🔄 *Arbitrage Reconfirmed*", e))
        }
        Event::OpportunityRefreshed(_) => None,
        Event::DailySummary(e) => Some(format!(
            "📊 *Daily Summary — {}*\n\
            \n\
            🎯 Opportunities: `{}`\n\
            ✅ Confirmed: `{}`\n\
            💰 Realized: `{}`",
            escape_markdown(&e.date.to_string()),
            e.stats.opportunities_recorded,
            e.stats.operator_confirmed,
            escape_markdown(&format!("{:.2}", e.stats.total_realized_profit)),
        )),
    }
}

fn format_alert(title: &str, e: &AlertEvent) -> String {
    let mut message = format!(
        "{}\n\
        \n\
        🏟 {}\n\
        📈 Margin: `{}%`\n\
        💵 Stake: `{}`\n\
        💰 Guaranteed: `{}` \\(profit `{}`\\)\n",
        title,
        escape_markdown(&e.event_id),
        escape_markdown(&format!(
            "{:.2}",
            e.margin * rust_decimal::Decimal::from(100)
        )),
        escape_markdown(&format!("{:.2}", e.total_stake)),
        escape_markdown(&format!("{:.2}", e.guaranteed_return)),
        escape_markdown(&format!("{:.2}", e.guaranteed_profit)),
    );
    for leg in &e.legs {
        message.push_str(&format!(
            "\n• {}: `{}` @ `{}` \\({}\\)",
            escape_markdown(&leg.outcome),
            escape_markdown(&format!("{:.2}", leg.stake)),
            escape_markdown(&leg.decimal_price.to_string()),
            escape_markdown(&leg.bookmaker),
        ));
    }
    message
}

/// Escape reserved MarkdownV2 characters.
fn escape_markdown(text: &str) -> String {
    const RESERVED: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
