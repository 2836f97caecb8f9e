use async_trait::async_trait;
use tracing::info;

use super::{WorkflowStep, conclude};
use crate::core::models::{Payload, Status, StepEvent, StepResult};
use crate::errors::SauerError;
use crate::telegram::Notifier;
use crate::telegram::format::escape_html;
use crate::video::is_video_url;

/// Routing decision for an incoming chat message.
#[must_use]
pub fn classify(text: &str) -> Status {
    if is_video_url(text) {
        Status::Downloader
    } else if text.starts_with('/') {
        Status::Commander
    } else {
        Status::Finish
    }
}

/// Parses the incoming message and picks the next step.
pub struct Dispatcher<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    async fn dispatch(&self, payload: &Payload) -> Result<Status, SauerError> {
        let status = classify(&payload.incoming_text);
        if status == Status::Finish {
            self.notifier
                .send(&format!(
                    "Hello {}, you said '{}'.\n\nI don't know what to do with that.",
                    escape_html(&payload.sender_name),
                    escape_html(&payload.incoming_text)
                ))
                .await?;
        }
        Ok(status)
    }
}

#[async_trait]
impl WorkflowStep for Dispatcher<'_> {
    async fn handle_event(&self, event: StepEvent) -> StepResult {
        info!("Dispatcher - called with {:?}", event);
        let outcome = self.dispatch(&event.message).await;
        conclude("Dispatcher", self.notifier, outcome, event.message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_messages() {
        assert_eq!(classify("https://youtu.be/123456"), Status::Downloader);
        assert_eq!(classify("https://www.youtube.com/watch?v=1"), Status::Downloader);
        assert_eq!(classify("/list"), Status::Commander);
        assert_eq!(classify("hello"), Status::Finish);
        assert_eq!(classify(""), Status::Finish);
    }
}
