use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{EpisodeTable, MediaBucket, Order};
use crate::core::models::Episode;
use crate::errors::SauerError;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, SauerError> {
    mutex
        .lock()
        .map_err(|_| SauerError::GeneralError("in-memory storage lock poisoned".to_string()))
}

/// Episode table held in memory, ordered like the DynamoDB sort key.
#[derive(Default)]
pub struct MemoryEpisodeTable {
    rows: Mutex<BTreeMap<(String, String), Episode>>,
}

impl MemoryEpisodeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_episodes(episodes: impl IntoIterator<Item = Episode>) -> Self {
        let rows = episodes
            .into_iter()
            .map(|e| ((e.feed_id.clone(), e.timestamp_utc.clone()), e))
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Every stored row, across feeds.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Episode> {
        self.rows
            .lock()
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EpisodeTable for MemoryEpisodeTable {
    async fn query_feed(
        &self,
        feed_id: &str,
        order: Order,
        limit: Option<usize>,
    ) -> Result<Vec<Episode>, SauerError> {
        let rows = lock(&self.rows)?;
        let feed = rows.values().filter(|e| e.feed_id == feed_id).cloned();
        let mut episodes: Vec<Episode> = match order {
            Order::OldestFirst => feed.collect(),
            Order::NewestFirst => feed.rev().collect(),
        };
        if let Some(limit) = limit {
            episodes.truncate(limit);
        }
        Ok(episodes)
    }

    async fn find_episode(
        &self,
        feed_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, SauerError> {
        let rows = lock(&self.rows)?;
        Ok(rows
            .values()
            .find(|e| e.feed_id == feed_id && e.episode_id == episode_id)
            .cloned())
    }

    async fn put_episode(&self, episode: &Episode) -> Result<(), SauerError> {
        let mut rows = lock(&self.rows)?;
        rows.insert(
            (episode.feed_id.clone(), episode.timestamp_utc.clone()),
            episode.clone(),
        );
        Ok(())
    }

    async fn delete_episode(
        &self,
        feed_id: &str,
        timestamp_utc: &str,
        episode_id: &str,
    ) -> Result<(), SauerError> {
        let mut rows = lock(&self.rows)?;
        let key = (feed_id.to_string(), timestamp_utc.to_string());
        match rows.get(&key) {
            Some(e) if e.episode_id == episode_id => {
                rows.remove(&key);
                Ok(())
            }
            _ => Err(SauerError::GeneralError(format!(
                "conditional delete failed for episode {episode_id}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Media bucket held in memory.
#[derive(Default)]
pub struct MemoryBucket {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryBucket {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().ok().and_then(|o| o.get(key).cloned())
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MediaBucket for MemoryBucket {
    async fn upload_file(
        &self,
        path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<u64, SauerError> {
        let body = tokio::fs::read(path).await?;
        let size = body.len() as u64;
        self.upload_bytes(key, body, content_type).await?;
        Ok(size)
    }

    async fn upload_bytes(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SauerError> {
        lock(&self.objects)?.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), SauerError> {
        lock(&self.objects)?.remove(key);
        Ok(())
    }
}
