use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{EpisodeTable, Order};
use crate::core::models::Episode;
use crate::errors::SauerError;

type Item = HashMap<String, AttributeValue>;

/// Episode table backed by DynamoDB (`FeedId` partition key, `TimestampUtc`
/// sort key, both strings).
pub struct DynamoEpisodeTable {
    client: DynamoClient,
    table_name: String,
}

impl DynamoEpisodeTable {
    #[must_use]
    pub fn new(shared: &SdkConfig, table_name: &str) -> Self {
        Self::from_client(DynamoClient::new(shared), table_name)
    }

    /// Wraps an already configured client, e.g. one with an endpoint override.
    #[must_use]
    pub fn from_client(client: DynamoClient, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    async fn query_pages(
        &self,
        feed_id: &str,
        order: Order,
        limit: Option<usize>,
        episode_id: Option<&str>,
    ) -> Result<Vec<Episode>, SauerError> {
        let mut episodes = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("FeedId = :feed")
                .expression_attribute_values(":feed", AttributeValue::S(feed_id.to_string()))
                .scan_index_forward(order == Order::OldestFirst)
                .set_exclusive_start_key(start_key.take());

            if let Some(episode_id) = episode_id {
                request = request
                    .filter_expression("EpisodeId = :episode")
                    .expression_attribute_values(
                        ":episode",
                        AttributeValue::S(episode_id.to_string()),
                    );
            } else if let Some(limit) = limit {
                let remaining = limit.saturating_sub(episodes.len());
                request = request.limit(i32::try_from(remaining).unwrap_or(i32::MAX));
            }

            let output = request.send().await?;
            for item in output.items.unwrap_or_default() {
                episodes.push(item_to_episode(&item)?);
            }

            let done_by_limit = limit.is_some_and(|l| episodes.len() >= l);
            let found = episode_id.is_some() && !episodes.is_empty();
            match output.last_evaluated_key {
                Some(key) if !key.is_empty() && !done_by_limit && !found => {
                    start_key = Some(key);
                }
                _ => break,
            }
        }

        if let Some(limit) = limit {
            episodes.truncate(limit);
        }
        debug!(feed_id, count = episodes.len(), "Queried episodes");
        Ok(episodes)
    }
}

#[async_trait]
impl EpisodeTable for DynamoEpisodeTable {
    async fn query_feed(
        &self,
        feed_id: &str,
        order: Order,
        limit: Option<usize>,
    ) -> Result<Vec<Episode>, SauerError> {
        self.query_pages(feed_id, order, limit, None).await
    }

    async fn find_episode(
        &self,
        feed_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, SauerError> {
        let found = self
            .query_pages(feed_id, Order::NewestFirst, None, Some(episode_id))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn put_episode(&self, episode: &Episode) -> Result<(), SauerError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(episode_to_item(episode)))
            .send()
            .await?;
        info!("Storing metadata: {:?}", episode);
        Ok(())
    }

    async fn delete_episode(
        &self,
        feed_id: &str,
        timestamp_utc: &str,
        episode_id: &str,
    ) -> Result<(), SauerError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("FeedId", AttributeValue::S(feed_id.to_string()))
            .key("TimestampUtc", AttributeValue::S(timestamp_utc.to_string()))
            .condition_expression("EpisodeId = :episode")
            .expression_attribute_values(":episode", AttributeValue::S(episode_id.to_string()))
            .send()
            .await?;
        info!(feed_id, episode_id, "Deleted episode row");
        Ok(())
    }
}

#[must_use]
pub fn episode_to_item(episode: &Episode) -> Item {
    let mut item = Item::new();
    let mut s = |name: &str, value: &str| {
        item.insert(name.to_string(), AttributeValue::S(value.to_string()));
    };
    s("FeedId", &episode.feed_id);
    s("EpisodeId", &episode.episode_id);
    s("Title", &episode.title);
    s("Author", &episode.author);
    s("Description", &episode.description);
    s("BucketPathEpisode", &episode.bucket_path_episode);
    s("BucketPathThumbnail", &episode.bucket_path_thumbnail);
    s("TimestampUtc", &episode.timestamp_utc);
    s("TimestampRfc822", &episode.timestamp_rfc822);
    item.insert(
        "DurationInSeconds".to_string(),
        AttributeValue::N(episode.duration_in_seconds.to_string()),
    );
    item.insert(
        "FileLengthInByte".to_string(),
        AttributeValue::N(episode.file_length_in_byte.to_string()),
    );
    item.insert(
        "Keywords".to_string(),
        AttributeValue::L(
            episode
                .keywords
                .iter()
                .map(|k| AttributeValue::S(k.clone()))
                .collect(),
        ),
    );
    item
}

/// # Errors
///
/// Returns an error if a key attribute is missing.
pub fn item_to_episode(item: &Item) -> Result<Episode, SauerError> {
    Ok(Episode {
        feed_id: required_string(item, "FeedId")?,
        episode_id: required_string(item, "EpisodeId")?,
        timestamp_utc: required_string(item, "TimestampUtc")?,
        title: string(item, "Title"),
        author: string(item, "Author"),
        description: string(item, "Description"),
        bucket_path_episode: string(item, "BucketPathEpisode"),
        bucket_path_thumbnail: string(item, "BucketPathThumbnail"),
        timestamp_rfc822: string(item, "TimestampRfc822"),
        duration_in_seconds: number(item, "DurationInSeconds"),
        file_length_in_byte: number(item, "FileLengthInByte"),
        keywords: keywords(item),
    })
}

fn string(item: &Item, name: &str) -> String {
    match item.get(name) {
        Some(AttributeValue::S(s)) => s.clone(),
        Some(AttributeValue::N(n)) => n.clone(),
        _ => String::new(),
    }
}

fn required_string(item: &Item, name: &str) -> Result<String, SauerError> {
    match item.get(name) {
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        Some(AttributeValue::N(n)) => Ok(n.clone()),
        _ => Err(SauerError::ParseError(format!(
            "episode row is missing attribute {name}"
        ))),
    }
}

fn number(item: &Item, name: &str) -> u64 {
    let raw = match item.get(name) {
        Some(AttributeValue::N(n) | AttributeValue::S(n)) => n.as_str(),
        _ => return 0,
    };
    raw.parse::<u64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|f| f.max(0.0) as u64))
        .unwrap_or(0)
}

fn keywords(item: &Item) -> Vec<String> {
    match item.get("Keywords") {
        Some(AttributeValue::L(values)) => values
            .iter()
            .filter_map(|v| v.as_s().ok().cloned())
            .collect(),
        Some(AttributeValue::Ss(values)) => values.clone(),
        Some(AttributeValue::S(value)) => vec![value.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> Episode {
        Episode {
            feed_id: "123456".into(),
            episode_id: "id123".into(),
            title: "Title".into(),
            author: "Author".into(),
            description: "Description".into(),
            duration_in_seconds: 321,
            keywords: vec!["rust".into(), "podcast".into()],
            file_length_in_byte: 4096,
            bucket_path_episode: "audio/123456/id123.m4a".into(),
            bucket_path_thumbnail: "audio/123456/id123_logo.jpg".into(),
            timestamp_utc: "1644796800".into(),
            timestamp_rfc822: "Mon, 14 Feb 2022 00:00:00 +0000".into(),
        }
    }

    #[test]
    fn item_conversion_preserves_every_attribute() {
        let original = episode();
        let item = episode_to_item(&original);
        assert_eq!(item.get("DurationInSeconds"), Some(&AttributeValue::N("321".into())));
        assert_eq!(item.get("TimestampUtc"), Some(&AttributeValue::S("1644796800".into())));
        assert_eq!(item_to_episode(&item).unwrap(), original);
    }

    #[test]
    fn rows_without_keys_are_rejected() {
        let mut item = episode_to_item(&episode());
        item.remove("EpisodeId");
        assert!(item_to_episode(&item).is_err());
    }

    #[test]
    fn numbers_written_as_decimals_are_read() {
        let mut item = episode_to_item(&episode());
        item.insert("DurationInSeconds".into(), AttributeValue::N("12.0".into()));
        assert_eq!(item_to_episode(&item).unwrap().duration_in_seconds, 12);
    }
}
