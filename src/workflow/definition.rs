//! Amazon States Language definition of the workflow
//!
//! The definition is generated from the routing table so the managed state
//! machine and the local runner cannot drift apart.

use serde_json::{Map, Value, json};
use std::env;

use super::routing::{StepName, Transition, choices};
use crate::errors::SauerError;

/// Overall wall-clock limit of one execution.
pub const TIMEOUT_SECONDS: u64 = 15 * 60;
pub const SUCCEED_STATE: &str = "Succeeded";
pub const FAIL_STATE: &str = "Failed";

/// Lambda function ARNs backing the workflow steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFunctions {
    pub dispatcher: String,
    pub downloader: String,
    pub commander: String,
    pub podcaster: String,
}

impl WorkflowFunctions {
    /// Reads `DISPATCHER_FUNCTION_ARN`, `DOWNLOADER_FUNCTION_ARN`,
    /// `COMMANDER_FUNCTION_ARN` and `PODCASTER_FUNCTION_ARN`.
    pub fn from_env() -> Result<Self, SauerError> {
        let var = |name: &str| {
            env::var(name).map_err(|e| SauerError::ConfigError(format!("{name}: {e}")))
        };
        Ok(Self {
            dispatcher: var("DISPATCHER_FUNCTION_ARN")?,
            downloader: var("DOWNLOADER_FUNCTION_ARN")?,
            commander: var("COMMANDER_FUNCTION_ARN")?,
            podcaster: var("PODCASTER_FUNCTION_ARN")?,
        })
    }

    #[must_use]
    pub fn arn(&self, step: StepName) -> &str {
        match step {
            StepName::Dispatcher => &self.dispatcher,
            StepName::Downloader => &self.downloader,
            StepName::Commander => &self.commander,
            StepName::Podcaster => &self.podcaster,
        }
    }
}

fn target_state(transition: Transition) -> &'static str {
    match transition {
        Transition::Next(step) => step.task_state(),
        Transition::Succeed => SUCCEED_STATE,
        Transition::Fail => FAIL_STATE,
    }
}

fn task_state(step: StepName, functions: &WorkflowFunctions) -> Value {
    json!({
        "Type": "Task",
        "Resource": "arn:aws:states:::lambda:invoke",
        "Parameters": {
            "FunctionName": functions.arn(step),
            "Payload.$": "$"
        },
        "OutputPath": "$.Payload",
        "Retry": [{
            "ErrorEquals": [
                "Lambda.ClientExecutionTimeoutException",
                "Lambda.ServiceException",
                "Lambda.AWSLambdaException",
                "Lambda.SdkClientException"
            ],
            "IntervalSeconds": 2,
            "MaxAttempts": 6,
            "BackoffRate": 2
        }],
        "Next": step.choice_state()
    })
}

fn choice_state(step: StepName) -> Value {
    let rules: Vec<Value> = choices(step)
        .iter()
        .map(|(status, transition)| {
            json!({
                "Variable": "$.status",
                "StringEquals": status.as_str(),
                "Next": target_state(*transition)
            })
        })
        .collect();
    json!({
        "Type": "Choice",
        "Choices": rules,
        "Default": FAIL_STATE
    })
}

/// Builds the state machine definition for the given functions.
#[must_use]
pub fn state_machine_definition(functions: &WorkflowFunctions) -> Value {
    let mut states = Map::new();
    for step in StepName::ALL {
        states.insert(step.task_state().to_string(), task_state(step, functions));
        states.insert(step.choice_state().to_string(), choice_state(step));
    }
    states.insert(
        SUCCEED_STATE.to_string(),
        json!({ "Type": "Succeed", "Comment": "succeeded" }),
    );
    states.insert(
        FAIL_STATE.to_string(),
        json!({ "Type": "Fail", "Comment": "failed" }),
    );

    json!({
        "Comment": "Sauerpod: dispatch chat messages to downloader, commander and podcaster",
        "StartAt": StepName::Dispatcher.task_state(),
        "TimeoutSeconds": TIMEOUT_SECONDS,
        "States": states
    })
}
