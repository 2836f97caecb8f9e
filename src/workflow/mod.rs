//! Status routing between the workflow steps
//!
//! [`routing`] holds the transition table. [`definition`] renders it as an
//! Amazon States Language document for Step Functions and [`local`] walks it
//! in-process.

pub mod definition;
pub mod local;
pub mod routing;

pub use definition::{WorkflowFunctions, state_machine_definition};
pub use local::{Execution, LocalWorkflow, Outcome};
pub use routing::{StepName, Transition, route};
