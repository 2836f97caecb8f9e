//! Video metadata extraction and media download

pub mod ytdlp;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

use crate::core::models::VideoInformation;
use crate::errors::SauerError;

pub use ytdlp::YtDlp;

const VIDEO_URL_PREFIXES: [&str; 3] = [
    "https://youtu.be",
    "https://www.youtube.com",
    "https://youtube.com",
];

/// Whether a chat message is a link the downloader can handle.
#[must_use]
pub fn is_video_url(text: &str) -> bool {
    VIDEO_URL_PREFIXES.iter().any(|p| text.starts_with(p))
}

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Resolves metadata for the video at `url` without downloading media.
    async fn video_information(&self, url: &str) -> Result<VideoInformation, SauerError>;

    /// Downloads the best audio-only stream into `dir` as `{video_id}.{ext}`.
    async fn download_audio(
        &self,
        video: &VideoInformation,
        dir: &Path,
    ) -> Result<PathBuf, SauerError>;

    /// Downloads the thumbnail into `dir` as `{video_id}_logo{ext}`.
    async fn download_thumbnail(
        &self,
        video: &VideoInformation,
        dir: &Path,
    ) -> Result<PathBuf, SauerError>;
}

/// Lowercase extension of the last path segment of a URL, if it has one.
#[must_use]
pub fn url_extension(url: &str) -> Option<String> {
    let path = Url::parse(url).map_or_else(
        |_| url.split(['?', '#']).next().unwrap_or(url).to_string(),
        |parsed| parsed.path().to_string(),
    );
    let last_segment = path.rsplit('/').next().unwrap_or("");
    Path::new(last_segment)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// File name of a downloaded thumbnail, keeping the extension of the URL path.
#[must_use]
pub fn thumbnail_file_name(video_id: &str, thumbnail_url: &str) -> String {
    let extension = url_extension(thumbnail_url)
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{video_id}_logo{extension}")
}
