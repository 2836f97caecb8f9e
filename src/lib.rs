/// Sauerpod - a Telegram bot that turns YouTube links into a private podcast feed.
///
/// The crate implements five AWS Lambda functions chained by a Step Functions
/// state machine:
/// 1. A bouncer behind API Gateway that admits messages from one chat and
///    starts the workflow
/// 2. A dispatcher that classifies the message
/// 3. A downloader that stores a video's audio track in S3 and its metadata in
///    `DynamoDB`
/// 4. A commander that lists and deletes episodes
/// 5. A podcaster that renders and uploads the RSS feed
///
/// Each step answers a [`core::models::Status`] that the state machine routes
/// on. The routing table lives in [`workflow::routing`]; the same table drives
/// the in-process [`workflow::LocalWorkflow`].
///
/// # Example
///
/// ```no_run
/// use sauerpod::core::models::{Payload, StepEvent};
/// use sauerpod::steps::{Dispatcher, WorkflowStep};
/// use sauerpod::telegram::Notifier;
///
/// struct Stdout;
///
/// #[async_trait::async_trait]
/// impl Notifier for Stdout {
///     async fn send(&self, text: &str) -> Result<(), sauerpod::errors::SauerError> {
///         println!("{text}");
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     sauerpod::setup_logging();
///
///     let result = Dispatcher::new(&Stdout)
///         .handle_event(StepEvent {
///             message: Payload {
///                 sender_name: "Ann".into(),
///                 incoming_text: "/list".into(),
///                 chat_id: "123456".into(),
///             },
///         })
///         .await;
///     println!("{}", result.status);
/// }
/// ```
pub mod api;
pub mod core;
pub mod errors;
pub mod feed;
pub mod steps;
pub mod storage;
pub mod telegram;
pub mod utils;
pub mod video;
pub mod workflow;

pub use errors::SauerError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// The filter is read from the `LOGGING` environment variable and defaults to
/// `info`. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// sauerpod::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_env("LOGGING").unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
