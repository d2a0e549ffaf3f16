//! Telegram bot sink
//!
//! GET https://api.telegram.org/bot{token}/sendMessage
//!     ?chat_id={chat}&parse_mode=html&text={text}

use super::NotificationSink;
use async_trait::async_trait;
use tracing::{debug, error, warn};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Telegram rejects longer messages
const MAX_MESSAGE_CHARS: usize = 4096;

pub struct TelegramSink {
    endpoint: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramSink {
    /// Accepts the token with or without its `bot` prefix
    pub fn new(bot_token: &str, chat_id: &str) -> Self {
        let token = bot_token.strip_prefix("bot").unwrap_or(bot_token);
        Self {
            endpoint: format!("{}/bot{}/sendMessage", TELEGRAM_API, token),
            chat_id: chat_id.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// parse_mode=html treats these as markup
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The limit applies to the parsed text, so cut before escaping
fn message_body(text: &str) -> String {
    escape_html(truncate_chars(text, MAX_MESSAGE_CHARS))
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn deliver(&self, text: &str) {
        let body = message_body(text);
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("parse_mode", "html"),
            ("text", body.as_str()),
        ];

        match self.client.get(&self.endpoint).query(&params).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    debug!("Telegram alert sent to chat {}", self.chat_id);
                } else {
                    warn!("Telegram sendMessage returned status: {}", response.status());
                }
            }
            Err(e) => {
                // reqwest errors can carry the URL, which contains the token
                error!("Failed to send Telegram alert: {}", e.without_url());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_token_prefix() {
        let a = TelegramSink::new("123:abc", "-1");
        let b = TelegramSink::new("bot123:abc", "-1");
        assert_eq!(a.endpoint, "https://api.telegram.org/bot123:abc/sendMessage");
        assert_eq!(a.endpoint, b.endpoint);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b> & c"), "a&lt;b&gt; &amp; c");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn test_long_body_keeps_whole_entities() {
        let text = format!(
            "list proposal: from tbnb1qyqszqgpqyqszqgpqyqszqgpqyqszqgp8mvnsc, content {}, net testnet",
            "&".repeat(2048)
        );
        let body = message_body(&text);
        assert_eq!(body, escape_html(&text));
        assert!(body.ends_with("&amp;, net testnet"));

        let long = format!("x{}", "<".repeat(MAX_MESSAGE_CHARS + 10));
        let body = message_body(&long);
        assert!(body.ends_with("&lt;"));
        assert_eq!(body.matches("&lt;").count(), MAX_MESSAGE_CHARS - 1);
    }
}
