//! Notification Sink
//!
//! Best-effort text delivery. `deliver` never fails from the caller's point
//! of view: sinks log their own errors and return.
//!
//! Architecture:
//!     mod.rs      — NotificationSink contract, LogSink, FanoutSink, build_sink
//!     telegram.rs — Telegram bot API (sendMessage)
//!     discord.rs  — Discord webhook
//!
//! Usage:
//!   Set TELEGRAM_BOT_TOKEN + TELEGRAM_CHAT_ID and/or DISCORD_WEBHOOK.
//!   With neither set, alerts go to the log only.

pub mod discord;
pub mod telegram;

pub use discord::DiscordWebhookSink;
pub use telegram::TelegramSink;

use crate::config::AlertConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, text: &str);
}

#[async_trait]
impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    async fn deliver(&self, text: &str) {
        (**self).deliver(text).await
    }
}

#[async_trait]
impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    async fn deliver(&self, text: &str) {
        (**self).deliver(text).await
    }
}

/// Writes alerts to the log at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, text: &str) {
        info!("ALERT: {}", text);
    }
}

/// Delivers to every sink in order; a slow sink delays the ones after it.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl NotificationSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl NotificationSink for FanoutSink {
    async fn deliver(&self, text: &str) {
        for sink in &self.sinks {
            sink.deliver(text).await;
        }
    }
}

/// Log sink always; Telegram and Discord when configured
pub fn build_sink(config: &AlertConfig) -> Arc<dyn NotificationSink> {
    let mut fanout = FanoutSink::new();
    fanout.push(LogSink);

    match &config.telegram {
        Some(tg) => {
            info!("Telegram alerts enabled (chat {})", tg.chat_id);
            fanout.push(TelegramSink::new(&tg.bot_token, &tg.chat_id));
        }
        None => warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set - Telegram alerts disabled"),
    }

    match &config.discord_webhook {
        Some(url) => {
            info!("Discord alerts enabled");
            fanout.push(DiscordWebhookSink::new(url));
        }
        None => warn!("DISCORD_WEBHOOK not set - Discord alerts disabled"),
    }

    Arc::new(fanout)
}

/// Records deliveries in order
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    delivered: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, text: &str) {
        self.delivered.lock().unwrap().push(text.to_string());
    }
}
