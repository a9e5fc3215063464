//! Telegram Bot API notification client

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::TelegramConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;
use crate::HomeworkBotError;

/// Longest `text` the Bot API accepts in `sendMessage`
pub const MAX_MESSAGE_CHARS: usize = 4096;

const TRUNCATION_MARKER: &str = "...";

/// Cut `message` to at most [`MAX_MESSAGE_CHARS`] characters, on a char boundary
pub fn clamp_message(message: &str) -> Cow<'_, str> {
    if message.chars().nth(MAX_MESSAGE_CHARS).is_none() {
        return Cow::Borrowed(message);
    }
    let keep = MAX_MESSAGE_CHARS - TRUNCATION_MARKER.chars().count();
    let end = message
        .char_indices()
        .nth(keep)
        .map_or(message.len(), |(index, _)| index);
    Cow::Owned(format!("{}{}", &message[..end], TRUNCATION_MARKER))
}

/// Envelope returned by every Bot API method
#[derive(Debug, Deserialize)]
struct TelegramApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to a single chat through `sendMessage`
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, http: Arc<dyn HttpClient>) -> Self {
        let send_url = format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            config.token
        );

        tracing::debug!("Created TelegramNotifier for chat {}", config.chat_id);

        Self {
            send_url,
            chat_id: config.chat_id.clone(),
            http,
        }
    }

    fn delivery_failed(&self, message: &str, cause: String) -> HomeworkBotError {
        tracing::error!(
            "Failed to send message '{}' to chat {}: {}",
            message,
            self.chat_id,
            cause
        );
        HomeworkBotError::DeliveryFailed(cause)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, message: &str) -> crate::Result<()> {
        let text = clamp_message(message);
        if matches!(text, Cow::Owned(_)) {
            tracing::warn!(
                "Message of {} characters cut to {} for chat {}",
                message.chars().count(),
                MAX_MESSAGE_CHARS,
                self.chat_id
            );
        }
        let params = [("chat_id", self.chat_id.as_str()), ("text", &*text)];

        let response = match self.http.post_form(&self.send_url, &params).await {
            Ok(response) => response,
            Err(e) => return Err(self.delivery_failed(message, e.to_string())),
        };

        if response.status != 200 {
            return Err(self.delivery_failed(
                message,
                format!(
                    "Telegram API returned status {}: {}",
                    response.status, response.body
                ),
            ));
        }

        match serde_json::from_str::<TelegramApiResponse>(&response.body) {
            Ok(parsed) if parsed.ok => {}
            Ok(parsed) => {
                return Err(self.delivery_failed(
                    message,
                    format!(
                        "Telegram API rejected the message: {}",
                        parsed.description.unwrap_or_default()
                    ),
                ));
            }
            Err(e) => {
                return Err(self.delivery_failed(
                    message,
                    format!("Unreadable Telegram API response: {}", e),
                ));
            }
        }

        tracing::debug!("Bot sent message to chat {}: {}", self.chat_id, message);
        Ok(())
    }
}
