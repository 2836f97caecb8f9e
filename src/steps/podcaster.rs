use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{WorkflowStep, conclude};
use crate::core::models::{Payload, Status, StepEvent, StepResult};
use crate::errors::SauerError;
use crate::feed::{FeedContext, FeedRenderer, feed_name};
use crate::storage::{EpisodeTable, MediaBucket, Order};
use crate::telegram::Notifier;

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";

/// Generates a feed's RSS document and uploads it next to the media files.
pub struct Podcaster<'a> {
    notifier: &'a dyn Notifier,
    table: &'a dyn EpisodeTable,
    bucket: &'a dyn MediaBucket,
    renderer: FeedRenderer,
    base_url: String,
    title: String,
}

impl<'a> Podcaster<'a> {
    /// # Errors
    ///
    /// Returns an error if the feed template cannot be loaded.
    pub fn new(
        notifier: &'a dyn Notifier,
        table: &'a dyn EpisodeTable,
        bucket: &'a dyn MediaBucket,
        base_url: &str,
        title: &str,
    ) -> Result<Self, SauerError> {
        Ok(Self {
            notifier,
            table,
            bucket,
            renderer: FeedRenderer::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            title: title.to_string(),
        })
    }

    async fn publish(&self, payload: &Payload) -> Result<Status, SauerError> {
        let episodes = self
            .table
            .query_feed(&payload.chat_id, Order::NewestFirst, None)
            .await?;
        let feed_name = feed_name(&payload.chat_id);
        let feed_url = format!("{}/{}", self.base_url, feed_name);

        let feed = self.renderer.render(&FeedContext {
            last_build_date: Utc::now().to_rfc2822(),
            base_url: &self.base_url,
            feed_url: feed_url.clone(),
            title: &self.title,
            episodes: &episodes,
        })?;
        self.bucket
            .upload_bytes(&feed_name, feed.into_bytes(), RSS_CONTENT_TYPE)
            .await?;
        info!(feed_name = %feed_name, episodes = episodes.len(), "Feed uploaded");

        self.notifier
            .send(&format!(
                "...Podcast feed generated and uploaded:\n\n \
                 <a href=\"{feed_url}\">🎧 {feed_url} 🎧</a>"
            ))
            .await?;
        Ok(Status::Finish)
    }
}

#[async_trait]
impl WorkflowStep for Podcaster<'_> {
    async fn handle_event(&self, event: StepEvent) -> StepResult {
        info!("Podcaster - called with {:?}", event);
        let outcome = self.publish(&event.message).await;
        conclude("Podcaster", self.notifier, outcome, event.message).await
    }
}
