//! Discord webhook sink
//!
//! Posts each alert as a plain `content` message to the webhook URL.

use super::NotificationSink;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Discord rejects longer content
const MAX_CONTENT_CHARS: usize = 2000;

/// Discord webhook message structure
#[derive(Serialize)]
struct DiscordMessage<'a> {
    content: &'a str,
    username: &'a str,
}

pub struct DiscordWebhookSink {
    webhook_url: String,
    username: String,
    client: reqwest::Client,
}

impl DiscordWebhookSink {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            webhook_url: webhook_url.to_string(),
            username: "dex-monitor".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    fn message<'a>(&'a self, text: &'a str) -> DiscordMessage<'a> {
        let content = match text.char_indices().nth(MAX_CONTENT_CHARS) {
            Some((idx, _)) => &text[..idx],
            None => text,
        };
        DiscordMessage {
            content,
            username: &self.username,
        }
    }
}

#[async_trait]
impl NotificationSink for DiscordWebhookSink {
    async fn deliver(&self, text: &str) {
        match self
            .client
            .post(&self.webhook_url)
            .json(&self.message(text))
            .send()
            .await
        {
            Ok(response) => {
                if response.status().is_success() {
                    debug!("Discord alert sent");
                } else {
                    warn!("Discord webhook returned status: {}", response.status());
                }
            }
            Err(e) => {
                error!("Failed to send Discord alert: {}", e.without_url());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_body() {
        let sink = DiscordWebhookSink::new("https://discord.com/api/webhooks/1/x");
        let json = serde_json::to_value(sink.message("issue from: bnb1x")).unwrap();
        assert_eq!(json["content"], "issue from: bnb1x");
        assert_eq!(json["username"], "dex-monitor");
    }

    #[test]
    fn test_long_content_truncated() {
        let sink = DiscordWebhookSink::new("https://discord.com/api/webhooks/1/x").with_username("ops");
        let long = "x".repeat(MAX_CONTENT_CHARS + 50);
        let msg = sink.message(&long);
        assert_eq!(msg.content.len(), MAX_CONTENT_CHARS);
        assert_eq!(msg.username, "ops");
    }
}
