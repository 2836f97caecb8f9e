//! Webhook Lambda handler.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::bouncer::{Bouncer, failure_response};
use super::workflow::SfnWorkflowStarter;
use crate::core::config::AppConfig;
use crate::core::parameters::allowed_chat_id;
use crate::errors::SauerError;

/// Lambda handler for `POST /sauerpod`.
///
/// # Errors
///
/// Never fails towards API Gateway; configuration and parameter store errors
/// are answered like any other processing error.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(function_name = %event.context.env_config.function_name)
)]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    info!("Bouncer received request: {}", event.payload);

    let response = match bounce(&event.payload).await {
        Ok(response) => response,
        Err(e) => {
            error!("Bouncer failed to initialize: {}", e);
            failure_response(&event.payload, &e)
        }
    };

    info!("Bouncer answering: {}", response);
    Ok(response)
}

async fn bounce(payload: &Value) -> Result<Value, SauerError> {
    let config = AppConfig::from_env()?;
    let shared = aws_config::from_env().load().await;
    let chat_id = allowed_chat_id(&shared).await?;
    let starter = SfnWorkflowStarter::new(&shared, config.state_machine_arn()?);
    Ok(Bouncer::new(chat_id, &starter).handle_event(payload).await)
}
