use aws_config::SdkConfig;
use aws_sdk_ssm::Client as SsmClient;

use crate::errors::SauerError;

pub const SSM_PATH_TELEGRAM_API_TOKEN: &str = "/sauerpod/telegram/api-token";
pub const SSM_PATH_TELEGRAM_CHAT_ID: &str = "/sauerpod/telegram/chat-id";

/// Bot token and the single chat id the bot talks to.
#[derive(Clone)]
pub struct TelegramCredentials {
    pub api_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("api_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramCredentials {
    /// # Errors
    ///
    /// Returns an error if either parameter is missing or SSM cannot be reached.
    pub async fn load(shared: &SdkConfig) -> Result<Self, SauerError> {
        let client = SsmClient::new(shared);
        Ok(Self {
            api_token: get_parameter(&client, SSM_PATH_TELEGRAM_API_TOKEN, true).await?,
            chat_id: get_parameter(&client, SSM_PATH_TELEGRAM_CHAT_ID, false).await?,
        })
    }
}

/// Loads only the allow-listed chat id.
///
/// # Errors
///
/// Returns an error if the parameter is missing or SSM cannot be reached.
pub async fn allowed_chat_id(shared: &SdkConfig) -> Result<String, SauerError> {
    let client = SsmClient::new(shared);
    get_parameter(&client, SSM_PATH_TELEGRAM_CHAT_ID, false).await
}

async fn get_parameter(
    client: &SsmClient,
    name: &str,
    with_decryption: bool,
) -> Result<String, SauerError> {
    let resp = client
        .get_parameter()
        .name(name)
        .with_decryption(with_decryption)
        .send()
        .await
        .map_err(|e| {
            SauerError::AwsError(format!(
                "ssm get_parameter {name}: {}",
                aws_sdk_ssm::error::DisplayErrorContext(&e)
            ))
        })?;

    resp.parameter
        .and_then(|p| p.value)
        .ok_or_else(|| SauerError::ConfigError(format!("SSM parameter {name} has no value")))
}
