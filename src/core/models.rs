use serde::{Deserialize, Serialize};
use std::fmt;

/// Keywords kept per episode row.
pub const MAX_KEYWORDS: usize = 250;

/// Routing token returned by every workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Downloader,
    Podcaster,
    Commander,
    Finish,
    Failure,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Downloader => "DOWNLOADER",
            Status::Podcaster => "PODCASTER",
            Status::Commander => "COMMANDER",
            Status::Finish => "FINISH",
            Status::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized chat message handed from the bouncer to the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub sender_name: String,
    pub incoming_text: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub message: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub status: Status,
    pub message: Payload,
}

impl StepResult {
    #[must_use]
    pub fn new(status: Status, message: Payload) -> Self {
        Self { status, message }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInformation {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration_in_seconds: u64,
    pub keywords: Vec<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadInformation {
    pub path_to_episode: String,
    pub path_to_thumbnail: String,
    pub timestamp_utc: i64,
    pub timestamp_rfc822: String,
    pub episode_size: u64,
}

/// One metadata row of the episode table, keyed by `(feed_id, timestamp_utc)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Episode {
    pub feed_id: String,
    pub episode_id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub duration_in_seconds: u64,
    pub keywords: Vec<String>,
    pub file_length_in_byte: u64,
    pub bucket_path_episode: String,
    pub bucket_path_thumbnail: String,
    pub timestamp_utc: String,
    pub timestamp_rfc822: String,
}

impl Episode {
    /// Builds the row stored for a freshly uploaded video. Keywords are capped at
    /// [`MAX_KEYWORDS`].
    #[must_use]
    pub fn cleansed(
        chat_id: &str,
        upload: &UploadInformation,
        video: &VideoInformation,
    ) -> Self {
        Self {
            feed_id: chat_id.to_string(),
            episode_id: video.video_id.clone(),
            title: video.title.clone(),
            author: video.author.clone(),
            description: video.description.clone(),
            duration_in_seconds: video.duration_in_seconds,
            keywords: video.keywords.iter().take(MAX_KEYWORDS).cloned().collect(),
            file_length_in_byte: upload.episode_size,
            bucket_path_episode: upload.path_to_episode.clone(),
            bucket_path_thumbnail: upload.path_to_thumbnail.clone(),
            timestamp_utc: upload.timestamp_utc.to_string(),
            timestamp_rfc822: upload.timestamp_rfc822.clone(),
        }
    }

    /// Upload time in epoch seconds; rows with a malformed sort key count as 0.
    #[must_use]
    pub fn uploaded_at(&self) -> i64 {
        self.timestamp_utc.parse().unwrap_or(0)
    }
}
