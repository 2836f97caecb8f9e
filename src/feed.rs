//! RSS feed rendering
//!
//! The feed template is embedded at compile time and rendered with `minijinja`.
//! Every interpolated value is XML-escaped unless marked safe.

use minijinja::{AutoEscape, Environment, Error, ErrorKind, Output, State, Value};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

use crate::core::models::Episode;
use crate::errors::SauerError;
use crate::utils::mime::media_type;

const FEED_TEMPLATE_NAME: &str = "podcast.xml.j2";
const FEED_TEMPLATE: &str = include_str!("../templates/podcast.xml.j2");
const XML_ESCAPE: AutoEscape = AutoEscape::Custom("xml");

/// Values handed to the feed template as `podcast`.
#[derive(Debug, Serialize)]
pub struct FeedContext<'a> {
    pub last_build_date: String,
    pub base_url: &'a str,
    pub feed_url: String,
    pub title: &'a str,
    pub episodes: &'a [Episode],
}

/// Bucket key and public file name of a feed's RSS document.
#[must_use]
pub fn feed_name(chat_id: &str) -> String {
    format!("{chat_id}.rss")
}

fn xml_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), Error> {
    if state.auto_escape() == XML_ESCAPE && !value.is_safe() {
        if value.is_undefined() || value.is_none() {
            return Ok(());
        }
        let text = value.to_string();
        return out
            .write_str(&html_escape::encode_quoted_attribute(&text))
            .map_err(|_| Error::from(ErrorKind::WriteFailure));
    }
    minijinja::escape_formatter(out, state, value)
}

fn media_type_filter(path: String) -> String {
    media_type(Path::new(&path))
}

pub struct FeedRenderer {
    env: Environment<'static>,
}

impl FeedRenderer {
    /// # Errors
    ///
    /// Returns an error if the embedded template does not compile.
    pub fn new() -> Result<Self, SauerError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| XML_ESCAPE);
        env.set_formatter(xml_formatter);
        env.add_filter("media_type", media_type_filter);
        env.add_template(FEED_TEMPLATE_NAME, FEED_TEMPLATE)?;
        Ok(Self { env })
    }

    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&self, context: &FeedContext<'_>) -> Result<String, SauerError> {
        let template = self.env.get_template(FEED_TEMPLATE_NAME)?;
        Ok(template.render(minijinja::context! { podcast => context })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str, title: &str, timestamp: &str) -> Episode {
        Episode {
            feed_id: "123456".into(),
            episode_id: id.into(),
            title: title.into(),
            author: "Author".into(),
            description: "Line one & <two>".into(),
            duration_in_seconds: 90,
            keywords: vec!["a".into(), "b".into()],
            file_length_in_byte: 1024,
            bucket_path_episode: format!("audio/123456/{id}.m4a"),
            bucket_path_thumbnail: format!("audio/123456/{id}_logo.jpg"),
            timestamp_utc: timestamp.into(),
            timestamp_rfc822: "Mon, 14 Feb 2022 00:00:00 +0000".into(),
        }
    }

    #[test]
    fn renders_items_with_enclosures() {
        let episodes = vec![
            episode("new", "Newest", "1644883200"),
            episode("old", "Oldest", "1644796800"),
        ];
        let renderer = FeedRenderer::new().unwrap();
        let xml = renderer
            .render(&FeedContext {
                last_build_date: "Wed, 16 Feb 2022 00:00:00 +0000".into(),
                base_url: "https://cdn.example",
                feed_url: "https://cdn.example/123456.rss".into(),
                title: "Sauerpod Cast",
                episodes: &episodes,
            })
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<title>Sauerpod Cast</title>"));
        assert!(xml.contains(
            "<enclosure url=\"https://cdn.example/audio/123456/new.m4a\" \
             length=\"1024\" type=\"audio/mp4\"/>"
        ));
        assert!(xml.contains("<itunes:keywords>a,b</itunes:keywords>"));
        let newest = xml.find("<guid isPermaLink=\"false\">new</guid>").unwrap();
        let oldest = xml.find("<guid isPermaLink=\"false\">old</guid>").unwrap();
        assert!(newest < oldest);
    }

    #[test]
    fn escapes_episode_text() {
        let episodes = vec![episode("x", "Fish & Chips", "1")];
        let xml = FeedRenderer::new()
            .unwrap()
            .render(&FeedContext {
                last_build_date: String::new(),
                base_url: "https://cdn.example",
                feed_url: String::new(),
                title: "Cast",
                episodes: &episodes,
            })
            .unwrap();
        assert!(xml.contains("<title>Fish &amp; Chips</title>"));
        assert!(xml.contains("Line one &amp; &lt;two&gt;"));
    }

    #[test]
    fn feed_is_named_after_chat() {
        assert_eq!(feed_name("123456"), "123456.rss");
    }
}
