//! Workflow steps invoked by the state machine
//!
//! Every step takes a [`StepEvent`] and answers a [`StepResult`] whose status
//! decides the next transition. Steps never fail towards the workflow engine:
//! errors are reported to the chat and turned into [`Status::Failure`].

pub mod commander;
pub mod dispatcher;
pub mod downloader;
pub mod lambda;
pub mod podcaster;

use async_trait::async_trait;
use tracing::error;

use crate::core::models::{Payload, Status, StepEvent, StepResult};
use crate::errors::SauerError;
use crate::telegram::Notifier;
use crate::telegram::format::escape_html;

pub use commander::Commander;
pub use dispatcher::Dispatcher;
pub use downloader::Downloader;
pub use podcaster::Podcaster;

#[async_trait]
pub trait WorkflowStep: Send + Sync {
    async fn handle_event(&self, event: StepEvent) -> StepResult;
}

/// Chat text reporting a failed step.
#[must_use]
pub fn error_message(error: &SauerError) -> String {
    format!("⚠️ Error:\n{}", escape_html(&error.to_string()))
}

/// Turns the outcome of a step body into its result, reporting errors to the chat.
pub(crate) async fn conclude(
    step: &str,
    notifier: &dyn Notifier,
    outcome: Result<Status, SauerError>,
    message: Payload,
) -> StepResult {
    match outcome {
        Ok(status) => StepResult::new(status, message),
        Err(e) => {
            error!("{} failed: {}", step, e);
            if let Err(notify_err) = notifier.send(&error_message(&e)).await {
                error!("Failed to report error to chat: {}", notify_err);
            }
            StepResult::new(Status::Failure, message)
        }
    }
}
