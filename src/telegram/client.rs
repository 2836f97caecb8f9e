//! Telegram Bot API client
//!
//! Wraps `sendMessage` and `sendChatAction` with retry logic and error handling.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use super::Notifier;
use super::format::{MAX_MESSAGE_LENGTH, split_message};
use crate::core::parameters::TelegramCredentials;
use crate::errors::SauerError;

#[derive(Debug, Default, Deserialize)]
struct TelegramResponse {
    #[serde(default)]
    ok: bool,
    description: Option<String>,
}

/// Options of the `sendMessage` call.
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            parse_mode: "HTML",
            disable_web_page_preview: true,
            disable_notification: true,
        }
    }
}

/// Telegram API client bound to one bot token and one chat.
pub struct TelegramClient {
    http: Client,
    api_url: String,
    api_token: String,
    chat_id: String,
}

impl TelegramClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: &str, credentials: TelegramCredentials) -> Result<Self, SauerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: credentials.api_token,
            chat_id: credentials.chat_id,
        })
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, SauerError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, SauerError>>,
    {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(4);

        RetryIf::spawn(strategy, operation, |e: &SauerError| {
            let retry = matches!(e, SauerError::HttpError(_));
            if retry {
                warn!("Retrying Telegram call after: {}", e);
            }
            retry
        })
        .await
    }

    async fn call(&self, method: &str, form: &[(&str, String)]) -> Result<(), SauerError> {
        let url = format!("{}/bot{}/{}", self.api_url, self.api_token, method);
        let resp = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| SauerError::from(e.without_url()))?;

        let status = resp.status();
        let body_text = resp
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        debug!(method, status = %status, "Telegram response: {}", body_text);

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(SauerError::HttpError(format!(
                "{method} returned {status}: {body_text}"
            )));
        }

        let parsed: TelegramResponse = serde_json::from_str(&body_text).unwrap_or_default();
        if !parsed.ok {
            return Err(SauerError::TelegramError(format!(
                "{method} failed with {status}: {}",
                parsed.description.unwrap_or(body_text)
            )));
        }
        Ok(())
    }

    /// Sends one message, split into several when it exceeds Telegram's limit.
    ///
    /// # Errors
    ///
    /// Returns an error if any part cannot be delivered.
    pub async fn send_message(&self, text: &str, options: &SendOptions) -> Result<(), SauerError> {
        let chunks = split_message(text, MAX_MESSAGE_LENGTH);
        if chunks.is_empty() {
            warn!("Refusing to send an empty Telegram message");
            return Ok(());
        }

        for chunk in chunks {
            debug!("Sending:\n{}", chunk);
            let form = [
                ("chat_id", self.chat_id.clone()),
                ("parse_mode", options.parse_mode.to_string()),
                (
                    "disable_web_page_preview",
                    options.disable_web_page_preview.to_string(),
                ),
                (
                    "disable_notification",
                    options.disable_notification.to_string(),
                ),
                ("text", chunk),
            ];
            self.with_retry(|| self.call("sendMessage", &form)).await?;
        }

        if options.disable_notification {
            self.send_chat_action("typing").await?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the chat action cannot be delivered.
    pub async fn send_chat_action(&self, action: &str) -> Result<(), SauerError> {
        debug!("Sending chat action {}", action);
        let form = [
            ("chat_id", self.chat_id.clone()),
            ("action", action.to_string()),
        ];
        self.with_retry(|| self.call("sendChatAction", &form)).await
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, text: &str) -> Result<(), SauerError> {
        self.send_message(text, &SendOptions::default()).await
    }
}
