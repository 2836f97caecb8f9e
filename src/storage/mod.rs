//! Episode metadata table and media bucket
//!
//! Steps talk to storage through the [`EpisodeTable`] and [`MediaBucket`] traits.
//! Production uses DynamoDB and S3; the in-memory versions back local runs and
//! tests.

pub mod dynamo;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use std::path::Path;

use crate::core::models::Episode;
use crate::errors::SauerError;

pub use dynamo::DynamoEpisodeTable;
pub use memory::{MemoryBucket, MemoryEpisodeTable};
pub use s3::S3MediaBucket;

/// Sort direction over the `TimestampUtc` sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    OldestFirst,
    NewestFirst,
}

#[async_trait]
pub trait EpisodeTable: Send + Sync {
    /// Episodes of one feed ordered by upload time, optionally capped at `limit`.
    async fn query_feed(
        &self,
        feed_id: &str,
        order: Order,
        limit: Option<usize>,
    ) -> Result<Vec<Episode>, SauerError>;

    /// Looks up an episode by its video id within a feed.
    async fn find_episode(
        &self,
        feed_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, SauerError>;

    /// Inserts or replaces the row keyed by `(feed_id, timestamp_utc)`.
    async fn put_episode(&self, episode: &Episode) -> Result<(), SauerError>;

    /// Deletes the row keyed by `(feed_id, timestamp_utc)` if it still holds
    /// `episode_id`.
    async fn delete_episode(
        &self,
        feed_id: &str,
        timestamp_utc: &str,
        episode_id: &str,
    ) -> Result<(), SauerError>;
}

#[async_trait]
pub trait MediaBucket: Send + Sync {
    /// Uploads a local file; returns its size in bytes.
    async fn upload_file(
        &self,
        path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<u64, SauerError>;

    async fn upload_bytes(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SauerError>;

    async fn delete_object(&self, key: &str) -> Result<(), SauerError>;
}
