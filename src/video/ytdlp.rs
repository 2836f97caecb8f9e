use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use super::{VideoSource, thumbnail_file_name, url_extension};
use crate::core::models::VideoInformation;
use crate::errors::SauerError;

/// Audio formats in order of preference; m4a plays in every podcast client.
const AUDIO_FORMAT: &str = "bestaudio[ext=m4a]/bestaudio";

/// Image types podcast clients accept as channel artwork.
const ARTWORK_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Deserialize)]
struct YtDlpThumbnail {
    url: String,
    preference: Option<i64>,
    width: Option<u64>,
    height: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    id: String,
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
    description: Option<String>,
    thumbnail: Option<String>,
    #[serde(default)]
    thumbnails: Vec<YtDlpThumbnail>,
    duration: Option<f64>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Picks the artwork for a video: the best-ranked JPEG or PNG thumbnail,
/// else the `thumbnail` field yt-dlp chose (often WebP).
///
/// yt-dlp lists thumbnails worst first, so later entries win ties.
fn pick_thumbnail(info: &YtDlpInfo) -> String {
    info.thumbnails
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            url_extension(&t.url).is_some_and(|e| ARTWORK_EXTENSIONS.contains(&e.as_str()))
        })
        .max_by_key(|(index, t)| {
            let area = t.width.unwrap_or(0).saturating_mul(t.height.unwrap_or(0));
            (t.preference.unwrap_or(i64::MIN), area, *index)
        })
        .map(|(_, t)| t.url.clone())
        .or_else(|| info.thumbnail.clone())
        .unwrap_or_default()
}

/// Parses the `--dump-single-json` output of yt-dlp.
///
/// # Errors
///
/// Returns an error if the output is not a video description.
pub fn parse_video_information(json: &str, url: &str) -> Result<VideoInformation, SauerError> {
    let info: YtDlpInfo = serde_json::from_str(json)
        .map_err(|e| SauerError::DownloadError(format!("unexpected yt-dlp output: {e}")))?;

    let thumbnail_url = pick_thumbnail(&info);
    Ok(VideoInformation {
        video_id: info.id,
        title: info.title.unwrap_or_default(),
        author: info.uploader.or(info.channel).unwrap_or_default(),
        description: info.description.unwrap_or_default(),
        thumbnail_url,
        duration_in_seconds: info.duration.map_or(0, |d| d.max(0.0).round() as u64),
        keywords: info.tags,
        source_url: url.to_string(),
    })
}

/// Video source driving the `yt-dlp` executable.
pub struct YtDlp {
    executable: String,
    http: Client,
}

impl YtDlp {
    /// # Errors
    ///
    /// Returns an error if the HTTP client for thumbnails cannot be built.
    pub fn new(executable: &str) -> Result<Self, SauerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            executable: executable.to_string(),
            http,
        })
    }

    async fn run(&self, args: &[&str]) -> Result<String, SauerError> {
        debug!(executable = %self.executable, ?args, "Running yt-dlp");
        let output = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                SauerError::DownloadError(format!("failed to run '{}': {e}", self.executable))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("no error output");
            return Err(SauerError::DownloadError(format!(
                "yt-dlp exited with {}: {reason}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VideoSource for YtDlp {
    async fn video_information(&self, url: &str) -> Result<VideoInformation, SauerError> {
        info!("Resolving video information for {}", url);
        let json = self
            .run(&[
                "--dump-single-json",
                "--skip-download",
                "--no-playlist",
                "--no-warnings",
                url,
            ])
            .await?;
        parse_video_information(&json, url)
    }

    async fn download_audio(
        &self,
        video: &VideoInformation,
        dir: &Path,
    ) -> Result<PathBuf, SauerError> {
        let template = dir.join(format!("{}.%(ext)s", video.video_id));
        let template = template.to_string_lossy();
        let stdout = self
            .run(&[
                "--format",
                AUDIO_FORMAT,
                "--no-playlist",
                "--no-progress",
                "--no-warnings",
                "--output",
                &*template,
                "--print",
                "after_move:filepath",
                video.source_url.as_str(),
            ])
            .await?;

        let path = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                SauerError::DownloadError("yt-dlp did not report the audio file".to_string())
            })?;

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(SauerError::DownloadError(format!(
                "audio file {} is missing after download",
                path.display()
            )));
        }
        info!("Downloaded audio to {}", path.display());
        Ok(path)
    }

    async fn download_thumbnail(
        &self,
        video: &VideoInformation,
        dir: &Path,
    ) -> Result<PathBuf, SauerError> {
        if video.thumbnail_url.is_empty() {
            return Err(SauerError::DownloadError(format!(
                "video {} has no thumbnail",
                video.video_id
            )));
        }
        let bytes = self
            .http
            .get(&video.thumbnail_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let path = dir.join(thumbnail_file_name(&video.video_id, &video.thumbnail_url));
        tokio::fs::write(&path, &bytes).await?;
        info!("Downloaded thumbnail to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_yt_dlp_fields() {
        let json = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "A title",
            "uploader": "A channel",
            "description": "About",
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
            "duration": 212.4,
            "tags": ["music", "video"],
            "formats": []
        }"#;
        let video = parse_video_information(json, "https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(video.video_id, "dQw4w9WgXcQ");
        assert_eq!(video.author, "A channel");
        assert_eq!(video.duration_in_seconds, 212);
        assert_eq!(video.keywords, vec!["music".to_string(), "video".to_string()]);
        assert_eq!(video.source_url, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn missing_optional_fields_default() {
        let video = parse_video_information(r#"{"id": "x", "channel": "c"}"#, "u").unwrap();
        assert_eq!(video.title, "");
        assert_eq!(video.author, "c");
        assert!(video.keywords.is_empty());
        assert_eq!(video.duration_in_seconds, 0);
    }

    #[test]
    fn prefers_jpeg_thumbnail_over_webp() {
        let json = r#"{
            "id": "abc",
            "thumbnail": "https://i.ytimg.com/vi_webp/abc/maxresdefault.webp",
            "thumbnails": [
                {"url": "https://i.ytimg.com/vi/abc/default.jpg", "preference": -12,
                 "width": 120, "height": 90},
                {"url": "https://i.ytimg.com/vi/abc/maxresdefault.jpg", "preference": -1},
                {"url": "https://i.ytimg.com/vi_webp/abc/maxresdefault.webp", "preference": 0}
            ]
        }"#;
        let video = parse_video_information(json, "https://youtu.be/abc").unwrap();
        assert_eq!(video.thumbnail_url, "https://i.ytimg.com/vi/abc/maxresdefault.jpg");
        assert_eq!(
            thumbnail_file_name(&video.video_id, &video.thumbnail_url),
            "abc_logo.jpg"
        );
    }

    #[test]
    fn larger_thumbnail_wins_without_preference() {
        let json = r#"{
            "id": "abc",
            "thumbnails": [
                {"url": "https://example.com/big.png", "width": 1280, "height": 720},
                {"url": "https://example.com/small.jpg?v=1", "width": 320, "height": 180}
            ]
        }"#;
        let video = parse_video_information(json, "u").unwrap();
        assert_eq!(video.thumbnail_url, "https://example.com/big.png");
    }

    #[test]
    fn falls_back_to_thumbnail_field() {
        let json = r#"{
            "id": "abc",
            "thumbnail": "https://i.ytimg.com/vi_webp/abc/maxresdefault.webp",
            "thumbnails": [{"url": "https://i.ytimg.com/vi_webp/abc/hq.webp"}]
        }"#;
        let video = parse_video_information(json, "u").unwrap();
        assert_eq!(
            video.thumbnail_url,
            "https://i.ytimg.com/vi_webp/abc/maxresdefault.webp"
        );
    }

    #[test]
    fn garbage_output_is_a_download_error() {
        let err = parse_video_information("ERROR", "u").unwrap_err();
        assert!(matches!(err, SauerError::DownloadError(_)));
    }
}
