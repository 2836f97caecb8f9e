//! Lambda entry points of the workflow steps
//!
//! Each handler builds its AWS-backed dependencies per invocation and hands the
//! parsed event to the matching [`WorkflowStep`].

use aws_config::SdkConfig;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::{Commander, Dispatcher, Downloader, Podcaster, WorkflowStep};
use crate::core::config::AppConfig;
use crate::core::models::{StepEvent, StepResult};
use crate::core::parameters::TelegramCredentials;
use crate::errors::SauerError;
use crate::storage::{DynamoEpisodeTable, S3MediaBucket};
use crate::telegram::TelegramClient;
use crate::video::ytdlp::YtDlp;

/// Shared per-invocation environment of a step function.
struct StepContext {
    config: AppConfig,
    shared: SdkConfig,
    telegram: TelegramClient,
}

impl StepContext {
    async fn load() -> Result<Self, SauerError> {
        let config = AppConfig::from_env()?;
        let shared = aws_config::from_env().load().await;
        let credentials = TelegramCredentials::load(&shared).await?;
        let telegram = TelegramClient::new(&config.telegram_api_url, credentials)?;
        Ok(Self {
            config,
            shared,
            telegram,
        })
    }

    fn table(&self) -> Result<DynamoEpisodeTable, SauerError> {
        Ok(DynamoEpisodeTable::new(
            &self.shared,
            self.config.storage_table_name()?,
        ))
    }

    fn bucket(&self) -> Result<S3MediaBucket, SauerError> {
        Ok(S3MediaBucket::new(
            &self.shared,
            self.config.storage_bucket_name()?,
        ))
    }
}

/// Parses the step input passed through by the state machine.
///
/// # Errors
///
/// Returns an error if the event has no `message` payload.
pub fn parse_step_event(payload: Value) -> Result<StepEvent, SauerError> {
    serde_json::from_value(payload)
        .map_err(|e| SauerError::ParseError(format!("Invalid step event: {e}")))
}

fn prepare(name: &str, event: LambdaEvent<Value>) -> Result<StepEvent, Error> {
    info!("{} - received event: {}", name, event.payload);
    parse_step_event(event.payload).map_err(|e| {
        error!("{} - {}", name, e);
        Error::from(e)
    })
}

async fn load_context(name: &str) -> Result<StepContext, Error> {
    StepContext::load().await.map_err(|e| {
        error!("{} - failed to initialize: {}", name, e);
        Error::from(e)
    })
}

fn finish(name: &str, result: StepResult) -> Result<StepResult, Error> {
    info!(status = %result.status, "{} - returning {:?}", name, result);
    Ok(result)
}

#[tracing::instrument(
    level = "info",
    skip_all,
    fields(function_name = %event.context.env_config.function_name)
)]
pub async fn dispatcher_handler(event: LambdaEvent<Value>) -> Result<StepResult, Error> {
    let step_event = prepare("Dispatcher", event)?;
    let ctx = load_context("Dispatcher").await?;
    let result = Dispatcher::new(&ctx.telegram)
        .handle_event(step_event)
        .await;
    finish("Dispatcher", result)
}

#[tracing::instrument(
    level = "info",
    skip_all,
    fields(function_name = %event.context.env_config.function_name)
)]
pub async fn downloader_handler(event: LambdaEvent<Value>) -> Result<StepResult, Error> {
    let step_event = prepare("Downloader", event)?;
    let ctx = load_context("Downloader").await?;
    let table = ctx.table()?;
    let bucket = ctx.bucket()?;
    let source = YtDlp::new(&ctx.config.yt_dlp_path)?;
    let result = Downloader::new(
        &ctx.telegram,
        &table,
        &bucket,
        &source,
        ctx.config.download_dir.clone(),
    )
    .handle_event(step_event)
    .await;
    finish("Downloader", result)
}

#[tracing::instrument(
    level = "info",
    skip_all,
    fields(function_name = %event.context.env_config.function_name)
)]
pub async fn commander_handler(event: LambdaEvent<Value>) -> Result<StepResult, Error> {
    let step_event = prepare("Commander", event)?;
    let ctx = load_context("Commander").await?;
    let table = ctx.table()?;
    let bucket = ctx.bucket()?;
    let base_url = ctx.config.base_url()?;
    let result = Commander::new(&ctx.telegram, &table, &bucket, &base_url)
        .handle_event(step_event)
        .await;
    finish("Commander", result)
}

#[tracing::instrument(
    level = "info",
    skip_all,
    fields(function_name = %event.context.env_config.function_name)
)]
pub async fn podcaster_handler(event: LambdaEvent<Value>) -> Result<StepResult, Error> {
    let step_event = prepare("Podcaster", event)?;
    let ctx = load_context("Podcaster").await?;
    let table = ctx.table()?;
    let bucket = ctx.bucket()?;
    let base_url = ctx.config.base_url()?;
    let podcaster = Podcaster::new(
        &ctx.telegram,
        &table,
        &bucket,
        &base_url,
        &ctx.config.feed_title,
    )?;
    let result = podcaster.handle_event(step_event).await;
    finish("Podcaster", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_state_machine_input() {
        let event = parse_step_event(json!({
            "message": {
                "sender_name": "Ann",
                "incoming_text": "/help",
                "chat_id": "42"
            }
        }))
        .unwrap();
        assert_eq!(event.message.incoming_text, "/help");
    }

    #[test]
    fn rejects_input_without_message() {
        let err = parse_step_event(json!({ "status": "FINISH" })).unwrap_err();
        assert!(matches!(err, SauerError::ParseError(_)));
    }
}
