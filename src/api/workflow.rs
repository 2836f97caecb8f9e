use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sfn::Client as SfnClient;
use serde_json::Value;
use tracing::info;

use crate::errors::SauerError;

/// Starts one execution of the podcast workflow.
#[async_trait]
pub trait WorkflowStarter: Send + Sync {
    /// Returns the execution ARN.
    async fn start(&self, input: &Value) -> Result<String, SauerError>;
}

pub struct SfnWorkflowStarter {
    client: SfnClient,
    state_machine_arn: String,
}

impl SfnWorkflowStarter {
    #[must_use]
    pub fn new(shared: &SdkConfig, state_machine_arn: &str) -> Self {
        Self {
            client: SfnClient::new(shared),
            state_machine_arn: state_machine_arn.to_string(),
        }
    }
}

#[async_trait]
impl WorkflowStarter for SfnWorkflowStarter {
    async fn start(&self, input: &Value) -> Result<String, SauerError> {
        let resp = self
            .client
            .start_execution()
            .state_machine_arn(&self.state_machine_arn)
            .input(input.to_string())
            .send()
            .await?;
        info!(execution_arn = %resp.execution_arn(), "State machine started");
        Ok(resp.execution_arn().to_string())
    }
}
