use async_trait::async_trait;
use homework_core::{BotError, BotResult};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delivers plain-text messages to a single chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> BotResult<()>;
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(base_url: String, bot_token: String, chat_id: String, timeout: Duration) -> BotResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(http, base_url, bot_token, chat_id))
    }

    pub fn with_http_client(http: Client, base_url: String, bot_token: String, chat_id: String) -> Self {
        Self {
            http,
            base_url,
            bot_token,
            chat_id,
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.bot_token
        )
    }

    pub async fn send(&self, message: &str) -> BotResult<()> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text: message,
        };

        // The URL embeds the bot token, keep it out of error text
        let resp = self
            .http
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::DeliveryFailed(format!("Telegram API request failed: {}", e.without_url())))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(BotError::DeliveryFailed(format!(
                "Telegram API non-2xx: {status} body={text}"
            )));
        }

        match serde_json::from_str::<ApiResponse>(&text) {
            Ok(api) if api.ok => Ok(()),
            Ok(api) => Err(BotError::DeliveryFailed(format!(
                "Telegram API rejected message: {}",
                api.description.unwrap_or_else(|| "no description".to_string())
            ))),
            Err(e) => Err(BotError::DeliveryFailed(format!(
                "unreadable Telegram API response: {e}"
            ))),
        }
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn notify(&self, message: &str) -> BotResult<()> {
        self.send(message).await?;
        debug!("Message delivered to Telegram chat {}", self.chat_id);
        Ok(())
    }
}
