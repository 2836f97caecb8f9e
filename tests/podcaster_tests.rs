mod common;

use common::{BASE_URL, CHAT_ID, RecordingNotifier, episode, event};
use sauerpod::core::models::Status;
use sauerpod::steps::podcaster::RSS_CONTENT_TYPE;
use sauerpod::steps::{Podcaster, WorkflowStep};
use sauerpod::storage::{MemoryBucket, MemoryEpisodeTable};

#[tokio::test]
async fn test_feed_is_rendered_and_uploaded() {
    let notifier = RecordingNotifier::default();
    let table = MemoryEpisodeTable::with_episodes([
        episode("old", 1_644_796_800),
        episode("new", 1_644_969_600),
    ]);
    let bucket = MemoryBucket::new();
    let podcaster = Podcaster::new(&notifier, &table, &bucket, BASE_URL, "My Cast").unwrap();

    let result = podcaster.handle_event(event("/deletenewest")).await;

    assert_eq!(result.status, Status::Finish);
    let feed = bucket.get(&format!("{CHAT_ID}.rss")).unwrap();
    assert_eq!(feed.content_type, RSS_CONTENT_TYPE);

    let xml = String::from_utf8(feed.body).unwrap();
    assert!(xml.contains("<title>My Cast</title>"));
    assert!(xml.contains(&format!("{BASE_URL}/{CHAT_ID}.rss")));
    assert!(xml.contains(&format!("{BASE_URL}/audio/{CHAT_ID}/new.m4a")));
    let newest = xml.find(">new</guid>").unwrap();
    let oldest = xml.find(">old</guid>").unwrap();
    assert!(newest < oldest, "items should be listed newest first");

    assert_eq!(
        notifier.last(),
        format!(
            "...Podcast feed generated and uploaded:\n\n \
             <a href=\"{BASE_URL}/{CHAT_ID}.rss\">🎧 {BASE_URL}/{CHAT_ID}.rss 🎧</a>"
        )
    );
}

#[tokio::test]
async fn test_empty_feed_is_still_published() {
    let notifier = RecordingNotifier::default();
    let table = MemoryEpisodeTable::new();
    let bucket = MemoryBucket::new();
    let podcaster = Podcaster::new(&notifier, &table, &bucket, BASE_URL, "Cast").unwrap();

    let result = podcaster.handle_event(event("/deleteoldest")).await;

    assert_eq!(result.status, Status::Finish);
    let xml = String::from_utf8(bucket.get(&format!("{CHAT_ID}.rss")).unwrap().body).unwrap();
    assert!(!xml.contains("<item>"));
}
