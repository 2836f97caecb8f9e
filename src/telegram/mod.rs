//! All Telegram-specific functionality

pub mod client;
pub mod format;
pub mod update;

use async_trait::async_trait;

use crate::errors::SauerError;

pub use client::{SendOptions, TelegramClient};
pub use update::Update;

/// Sends chat messages back to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends an HTML-formatted message to the configured chat.
    async fn send(&self, text: &str) -> Result<(), SauerError>;
}
