use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::helpers::ok_message;
use super::workflow::WorkflowStarter;
use crate::errors::SauerError;
use crate::telegram::Update;

pub const PRIVATE_BOT: &str = "403 - private bot";
pub const STARTED: &str = "Event received, state machine started.";

/// Extracts the raw webhook body, decoding it when API Gateway marked it as
/// base64.
///
/// # Errors
///
/// Returns an error if the event has no string body or the body cannot be
/// decoded.
pub fn extract_body(event: &Value) -> Result<String, SauerError> {
    let body = event
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| SauerError::ParseError("request has no body".to_string()))?;

    let encoded = event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !encoded {
        return Ok(body.to_string());
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| SauerError::ParseError(format!("invalid base64 body: {e}")))?;
    String::from_utf8(bytes).map_err(|e| SauerError::ParseError(format!("body is not UTF-8: {e}")))
}

/// Answer to a webhook delivery that could not be processed.
#[must_use]
pub fn failure_response(event: &Value, error: &SauerError) -> Value {
    ok_message(&format!(
        "500 - error processing incoming event: {event}\n\n{error}"
    ))
}

/// Admits messages from the allow-listed chat and starts the workflow for them.
pub struct Bouncer<'a> {
    allowed_chat_id: String,
    starter: &'a dyn WorkflowStarter,
}

impl<'a> Bouncer<'a> {
    #[must_use]
    pub fn new(allowed_chat_id: impl Into<String>, starter: &'a dyn WorkflowStarter) -> Self {
        Self {
            allowed_chat_id: allowed_chat_id.into(),
            starter,
        }
    }

    async fn admit(&self, event: &Value) -> Result<Value, SauerError> {
        let body = extract_body(event)?;
        let update = Update::from_body(&body)?;

        let chat_id = update.chat_id()?;
        if chat_id != self.allowed_chat_id {
            warn!("{}", SauerError::UnknownChatId(chat_id));
            return Ok(ok_message(PRIVATE_BOT));
        }

        let payload = update.into_payload()?;
        info!(sender = %payload.sender_name, "Starting workflow for incoming message");
        self.starter.start(&json!({ "message": payload })).await?;
        Ok(ok_message(STARTED))
    }

    /// Always answers status 200; rejections and errors are reported in the body.
    pub async fn handle_event(&self, event: &Value) -> Value {
        match self.admit(event).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to process incoming event: {}", e);
                failure_response(event, &e)
            }
        }
    }
}
