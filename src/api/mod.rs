//! Telegram webhook endpoint
//!
//! The bouncer admits messages from the allow-listed chat and hands them to the
//! state machine. Everything after that runs in the workflow steps.

pub mod bouncer;
pub mod handler;
pub mod helpers;
pub mod workflow;

pub use bouncer::Bouncer;
pub use handler::function_handler;
pub use workflow::{SfnWorkflowStarter, WorkflowStarter};
