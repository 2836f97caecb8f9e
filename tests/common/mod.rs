#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sauerpod::api::WorkflowStarter;
use sauerpod::core::models::{Episode, Payload, StepEvent, VideoInformation};
use sauerpod::errors::SauerError;
use sauerpod::telegram::Notifier;
use sauerpod::video::{VideoSource, thumbnail_file_name};

pub const CHAT_ID: &str = "123456";
pub const BASE_URL: &str = "https://cdn.example";

/// Collects every chat message instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last(&self) -> String {
        self.messages().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), SauerError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Writes fake media files instead of running yt-dlp.
pub struct FakeVideoSource {
    pub video: VideoInformation,
    pub fail_download: bool,
}

impl FakeVideoSource {
    pub fn new(video: VideoInformation) -> Self {
        Self {
            video,
            fail_download: false,
        }
    }
}

#[async_trait]
impl VideoSource for FakeVideoSource {
    async fn video_information(&self, url: &str) -> Result<VideoInformation, SauerError> {
        Ok(VideoInformation {
            source_url: url.to_string(),
            ..self.video.clone()
        })
    }

    async fn download_audio(
        &self,
        video: &VideoInformation,
        dir: &Path,
    ) -> Result<PathBuf, SauerError> {
        if self.fail_download {
            return Err(SauerError::DownloadError("yt-dlp exited with 1".to_string()));
        }
        let path = dir.join(format!("{}.m4a", video.video_id));
        tokio::fs::write(&path, b"0123456789").await?;
        Ok(path)
    }

    async fn download_thumbnail(
        &self,
        video: &VideoInformation,
        dir: &Path,
    ) -> Result<PathBuf, SauerError> {
        let path = dir.join(thumbnail_file_name(&video.video_id, &video.thumbnail_url));
        tokio::fs::write(&path, b"jpg").await?;
        Ok(path)
    }
}

/// Records workflow inputs instead of starting executions.
#[derive(Default)]
pub struct RecordingStarter {
    pub inputs: Mutex<Vec<Value>>,
    pub fail: bool,
}

#[async_trait]
impl WorkflowStarter for RecordingStarter {
    async fn start(&self, input: &Value) -> Result<String, SauerError> {
        if self.fail {
            return Err(SauerError::AwsError("StateMachineDoesNotExist".to_string()));
        }
        self.inputs.lock().unwrap().push(input.clone());
        Ok("arn:aws:states:eu-central-1:1:execution:sauerpod:1".to_string())
    }
}

pub fn video(id: &str) -> VideoInformation {
    VideoInformation {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        author: "Channel".to_string(),
        description: "About things".to_string(),
        thumbnail_url: format!("https://i.ytimg.com/vi/{id}/sddefault.jpg?v=1"),
        duration_in_seconds: 600,
        keywords: vec!["news".to_string()],
        source_url: format!("https://youtu.be/{id}"),
    }
}

pub fn episode(id: &str, timestamp_utc: i64) -> Episode {
    Episode {
        feed_id: CHAT_ID.to_string(),
        episode_id: id.to_string(),
        title: format!("Episode {id}"),
        author: "Channel".to_string(),
        description: "About things".to_string(),
        duration_in_seconds: 600,
        keywords: vec!["news".to_string()],
        file_length_in_byte: 10,
        bucket_path_episode: format!("audio/{CHAT_ID}/{id}.m4a"),
        bucket_path_thumbnail: format!("audio/{CHAT_ID}/{id}_logo.jpg"),
        timestamp_utc: timestamp_utc.to_string(),
        timestamp_rfc822: "Mon, 14 Feb 2022 00:00:00 +0000".to_string(),
    }
}

pub fn event(text: &str) -> StepEvent {
    StepEvent {
        message: Payload {
            sender_name: "Ann".to_string(),
            incoming_text: text.to_string(),
            chat_id: CHAT_ID.to_string(),
        },
    }
}
