use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{WorkflowStep, conclude};
use crate::core::models::{
    Episode, Payload, Status, StepEvent, StepResult, UploadInformation, VideoInformation,
};
use crate::errors::SauerError;
use crate::storage::{EpisodeTable, MediaBucket};
use crate::telegram::Notifier;
use crate::telegram::format::escape_html;
use crate::utils::mime::media_type;
use crate::video::VideoSource;

/// Bucket key of a feed's media file.
#[must_use]
pub fn media_key(chat_id: &str, file: &Path) -> String {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("audio/{chat_id}/{file_name}")
}

/// Downloads the submitted video's audio, stores it and records its metadata.
pub struct Downloader<'a> {
    notifier: &'a dyn Notifier,
    table: &'a dyn EpisodeTable,
    bucket: &'a dyn MediaBucket,
    source: &'a dyn VideoSource,
    download_dir: PathBuf,
}

impl<'a> Downloader<'a> {
    #[must_use]
    pub fn new(
        notifier: &'a dyn Notifier,
        table: &'a dyn EpisodeTable,
        bucket: &'a dyn MediaBucket,
        source: &'a dyn VideoSource,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            notifier,
            table,
            bucket,
            source,
            download_dir: download_dir.into(),
        }
    }

    async fn is_existing_video(
        &self,
        video: &VideoInformation,
        chat_id: &str,
    ) -> Result<bool, SauerError> {
        info!("Is this new? {:?}", video.video_id);
        Ok(self
            .table
            .find_episode(chat_id, &video.video_id)
            .await?
            .is_some())
    }

    async fn upload(
        &self,
        chat_id: &str,
        audio_file: &Path,
        thumbnail_file: &Path,
    ) -> Result<UploadInformation, SauerError> {
        let path_to_episode = media_key(chat_id, audio_file);
        let episode_size = self
            .bucket
            .upload_file(audio_file, &path_to_episode, &media_type(audio_file))
            .await?;

        let path_to_thumbnail = media_key(chat_id, thumbnail_file);
        self.bucket
            .upload_file(thumbnail_file, &path_to_thumbnail, &media_type(thumbnail_file))
            .await?;

        let now = Utc::now();
        Ok(UploadInformation {
            path_to_episode,
            path_to_thumbnail,
            timestamp_utc: now.timestamp(),
            timestamp_rfc822: now.to_rfc2822(),
            episode_size,
        })
    }

    async fn fetch_and_store(
        &self,
        payload: &Payload,
        video: &VideoInformation,
        scratch: &mut Vec<PathBuf>,
    ) -> Result<(), SauerError> {
        let audio_file = self
            .source
            .download_audio(video, &self.download_dir)
            .await?;
        scratch.push(audio_file.clone());
        let thumbnail_file = self
            .source
            .download_thumbnail(video, &self.download_dir)
            .await?;
        scratch.push(thumbnail_file.clone());

        let upload = self
            .upload(&payload.chat_id, &audio_file, &thumbnail_file)
            .await?;
        let episode = Episode::cleansed(&payload.chat_id, &upload, video);
        self.table.put_episode(&episode).await?;
        info!("Stored metadata for episode {}", episode.episode_id);
        Ok(())
    }

    async fn download(&self, payload: &Payload) -> Result<Status, SauerError> {
        let video = self
            .source
            .video_information(&payload.incoming_text)
            .await?;

        if self.is_existing_video(&video, &payload.chat_id).await? {
            self.notifier
                .send(&format!(
                    "...'{}' is already in your cast. Skipping download.",
                    escape_html(&video.title)
                ))
                .await?;
            return Ok(Status::Finish);
        }

        self.notifier.send("...Downloading video.").await?;
        let mut scratch = Vec::new();
        let stored = self.fetch_and_store(payload, &video, &mut scratch).await;
        for path in scratch {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove scratch file {}: {}", path.display(), e);
            }
        }
        stored?;
        Ok(Status::Podcaster)
    }
}

#[async_trait]
impl WorkflowStep for Downloader<'_> {
    async fn handle_event(&self, event: StepEvent) -> StepResult {
        info!("Downloader - called with {:?}", event);
        let outcome = self.download(&event.message).await;
        conclude("Downloader", self.notifier, outcome, event.message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_keys_are_grouped_by_feed() {
        assert_eq!(
            media_key("123456", Path::new("/tmp/abc.m4a")),
            "audio/123456/abc.m4a"
        );
    }
}
