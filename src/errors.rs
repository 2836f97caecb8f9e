use thiserror::Error;

#[derive(Debug, Error)]
pub enum SauerError {
    #[error("Failed to parse incoming event: {0}")]
    ParseError(String),

    #[error("Missing configuration: {0}")]
    ConfigError(String),

    #[error("Failed to access Telegram API: {0}")]
    TelegramError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Failed to download video: {0}")]
    DownloadError(String),

    #[error("Failed to render feed: {0}")]
    TemplateError(String),

    #[error("Failed to access local file: {0}")]
    IoError(String),

    #[error("Chat id '{0}' not allowed.")]
    UnknownChatId(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<reqwest::Error> for SauerError {
    fn from(error: reqwest::Error) -> Self {
        SauerError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for SauerError {
    fn from(error: anyhow::Error) -> Self {
        SauerError::GeneralError(error.to_string())
    }
}

impl From<serde_json::Error> for SauerError {
    fn from(error: serde_json::Error) -> Self {
        SauerError::ParseError(error.to_string())
    }
}

impl From<std::io::Error> for SauerError {
    fn from(error: std::io::Error) -> Self {
        SauerError::IoError(error.to_string())
    }
}

impl From<minijinja::Error> for SauerError {
    fn from(error: minijinja::Error) -> Self {
        SauerError::TemplateError(error.to_string())
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<aws_sdk_ssm::error::SdkError<E, R>> for SauerError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: aws_sdk_ssm::error::SdkError<E, R>) -> Self {
        SauerError::AwsError(aws_sdk_ssm::error::DisplayErrorContext(&error).to_string())
    }
}
