use serde::Deserialize;

use crate::core::models::Payload;
use crate::errors::SauerError;

/// Subset of a webhook `Update` the bot cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub first_name: String,
}

impl Update {
    /// Parses a raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON update.
    pub fn from_body(body: &str) -> Result<Self, SauerError> {
        serde_json::from_str(body)
            .map_err(|e| SauerError::ParseError(format!("invalid Telegram update: {e}")))
    }

    /// Chat id of the message, as the string form stored in the parameter store.
    ///
    /// # Errors
    ///
    /// Returns an error if the update carries no message.
    pub fn chat_id(&self) -> Result<String, SauerError> {
        self.message
            .as_ref()
            .map(|m| m.chat.id.to_string())
            .ok_or_else(|| SauerError::ParseError("update has no message".to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if the message has no sender or no text.
    pub fn into_payload(self) -> Result<Payload, SauerError> {
        let message = self
            .message
            .ok_or_else(|| SauerError::ParseError("update has no message".to_string()))?;
        let sender_name = message
            .from
            .map(|u| u.first_name)
            .ok_or_else(|| SauerError::ParseError("message has no sender".to_string()))?;
        let incoming_text = message
            .text
            .ok_or_else(|| SauerError::ParseError("message has no text".to_string()))?;

        Ok(Payload {
            sender_name,
            incoming_text,
            chat_id: message.chat.id.to_string(),
        })
    }
}
