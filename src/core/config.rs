use std::env;
use std::path::PathBuf;

use crate::errors::SauerError;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_FEED_TITLE: &str = "Sauerpod Cast";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_bucket_name: Option<String>,
    pub storage_table_name: Option<String>,
    pub distribution_domain_name: Option<String>,
    pub state_machine_arn: Option<String>,
    pub download_dir: PathBuf,
    pub yt_dlp_path: String,
    pub telegram_api_url: String,
    pub feed_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_bucket_name: None,
            storage_table_name: None,
            distribution_domain_name: None,
            state_machine_arn: None,
            download_dir: env::temp_dir(),
            yt_dlp_path: "yt-dlp".to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            feed_title: DEFAULT_FEED_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the Lambda environment. Variables that only some functions need are
    /// optional here and checked by the accessors below.
    pub fn from_env() -> Result<Self, SauerError> {
        let defaults = Self::default();
        Ok(Self {
            storage_bucket_name: non_empty_var("STORAGE_BUCKET_NAME"),
            storage_table_name: non_empty_var("STORAGE_TABLE_NAME"),
            distribution_domain_name: non_empty_var("DISTRIBUTION_DOMAIN_NAME"),
            state_machine_arn: non_empty_var("STATE_MACHINE_ARN"),
            download_dir: non_empty_var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            yt_dlp_path: non_empty_var("YT_DLP_PATH").unwrap_or(defaults.yt_dlp_path),
            telegram_api_url: non_empty_var("TELEGRAM_API_URL")
                .unwrap_or(defaults.telegram_api_url),
            feed_title: non_empty_var("FEED_TITLE").unwrap_or(defaults.feed_title),
        })
    }

    pub fn storage_bucket_name(&self) -> Result<&str, SauerError> {
        required(self.storage_bucket_name.as_deref(), "STORAGE_BUCKET_NAME")
    }

    pub fn storage_table_name(&self) -> Result<&str, SauerError> {
        required(self.storage_table_name.as_deref(), "STORAGE_TABLE_NAME")
    }

    pub fn state_machine_arn(&self) -> Result<&str, SauerError> {
        required(self.state_machine_arn.as_deref(), "STATE_MACHINE_ARN")
    }

    /// Public base URL of the CDN distribution in front of the storage bucket.
    pub fn base_url(&self) -> Result<String, SauerError> {
        let domain = required(
            self.distribution_domain_name.as_deref(),
            "DISTRIBUTION_DOMAIN_NAME",
        )?;
        Ok(format!("https://{domain}"))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, SauerError> {
    value.ok_or_else(|| SauerError::ConfigError(format!("{name} is not set")))
}
