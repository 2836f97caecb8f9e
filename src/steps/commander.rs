use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{WorkflowStep, conclude};
use crate::core::models::{Episode, Payload, Status, StepEvent, StepResult};
use crate::errors::SauerError;
use crate::storage::{EpisodeTable, MediaBucket, Order};
use crate::telegram::Notifier;
use crate::telegram::format::escape_html;

const COMPACT_TITLE_LIMIT: usize = 27;
const COMPACT_TITLE_KEEP: usize = 25;
const EMPTY_CAST: &str = "Your cast is empty.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Id(String),
    Newest,
    Oldest,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { compact: bool },
    Help,
    Delete(DeleteTarget),
    Unknown,
}

#[must_use]
pub fn parse_command(text: &str) -> Command {
    if text.starts_with("/list") {
        Command::List {
            compact: !text.ends_with("full"),
        }
    } else if text.starts_with("/delete") {
        let fragments: Vec<&str> = text.split_whitespace().collect();
        let target = match fragments.as_slice() {
            ["/deletenewest", ..] => DeleteTarget::Newest,
            ["/deleteoldest", ..] => DeleteTarget::Oldest,
            [_, id] => DeleteTarget::Id((*id).to_string()),
            _ => DeleteTarget::Invalid,
        };
        Command::Delete(target)
    } else if text.starts_with("/help") {
        Command::Help
    } else {
        Command::Unknown
    }
}

/// Renders an elapsed duration as `H:MM:SS`, prefixed with `N day, ` or `N days, `.
#[must_use]
pub fn format_age(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / 86_400;
    let rest = seconds % 86_400;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// One line of the `/list` output.
#[must_use]
pub fn format_line_item(episode: &Episode, now: i64, compact: bool, base_url: &str) -> String {
    let title = if compact && episode.title.chars().count() > COMPACT_TITLE_LIMIT {
        let kept: String = episode.title.chars().take(COMPACT_TITLE_KEEP).collect();
        format!("{kept}..")
    } else {
        episode.title.clone()
    };
    let age = format_age(now - episode.uploaded_at());
    format!(
        "* <i>{}</i> (<a href='{}/{}'>{}</a>, <b>-{}</b>) ",
        escape_html(&title),
        base_url,
        episode.bucket_path_episode,
        escape_html(&episode.episode_id),
        age
    )
}

#[must_use]
pub fn help_text() -> String {
    let commands = [
        ("/help", "This text."),
        ("/list", "List entries in database (compact layout)."),
        ("/listfull", "List entries in database (full layout)."),
        ("/delete [id]", "Delete entry from database."),
        ("/deletenewest", "Delete newest entry from database."),
        ("/deleteoldest", "Delete oldest entry from database."),
    ];
    let mut text = String::from("I understand these commands:\n");
    for (command, description) in commands {
        text.push_str(&format!("<pre> {command:<20}</pre>{description}\n"));
    }
    text
}

/// Processes slash-commands against the episode table.
pub struct Commander<'a> {
    notifier: &'a dyn Notifier,
    table: &'a dyn EpisodeTable,
    bucket: &'a dyn MediaBucket,
    base_url: String,
}

impl<'a> Commander<'a> {
    #[must_use]
    pub fn new(
        notifier: &'a dyn Notifier,
        table: &'a dyn EpisodeTable,
        bucket: &'a dyn MediaBucket,
        base_url: &str,
    ) -> Self {
        Self {
            notifier,
            table,
            bucket,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn cmd_list(&self, chat_id: &str, compact: bool) -> Result<(), SauerError> {
        let episodes = self
            .table
            .query_feed(chat_id, Order::NewestFirst, None)
            .await?;
        if episodes.is_empty() {
            return self.notifier.send(EMPTY_CAST).await;
        }

        let now = Utc::now().timestamp();
        let lines: Vec<String> = episodes
            .iter()
            .map(|e| format_line_item(e, now, compact, &self.base_url))
            .collect();
        self.notifier.send(&lines.join("\n")).await
    }

    /// Removes media and row of one episode; `Ok(false)` if it does not exist.
    async fn delete_episode(&self, chat_id: &str, episode_id: &str) -> Result<bool, SauerError> {
        let Some(episode) = self.table.find_episode(chat_id, episode_id).await? else {
            self.notifier
                .send(&format!(
                    "Couldn't find episode <pre>{}</pre> in database. Is this the right id?",
                    escape_html(episode_id)
                ))
                .await?;
            return Ok(false);
        };

        self.bucket
            .delete_object(&episode.bucket_path_thumbnail)
            .await?;
        self.bucket.delete_object(&episode.bucket_path_episode).await?;
        self.table
            .delete_episode(chat_id, &episode.timestamp_utc, episode_id)
            .await?;
        info!(chat_id, episode_id, "Episode deleted");

        self.notifier
            .send(&format!("Episode {} deleted.", escape_html(episode_id)))
            .await?;
        Ok(true)
    }

    async fn edge_episode_id(
        &self,
        chat_id: &str,
        order: Order,
    ) -> Result<Option<String>, SauerError> {
        let episodes = self.table.query_feed(chat_id, order, Some(1)).await?;
        Ok(episodes.into_iter().next().map(|e| e.episode_id))
    }

    async fn cmd_delete(
        &self,
        command: &str,
        chat_id: &str,
        target: DeleteTarget,
    ) -> Result<bool, SauerError> {
        let episode_id = match target {
            DeleteTarget::Id(id) => Some(id),
            DeleteTarget::Newest => self.edge_episode_id(chat_id, Order::NewestFirst).await?,
            DeleteTarget::Oldest => self.edge_episode_id(chat_id, Order::OldestFirst).await?,
            DeleteTarget::Invalid => {
                self.notifier
                    .send(&format!("I don't understand '{}'.", escape_html(command)))
                    .await?;
                return Ok(false);
            }
        };

        match episode_id {
            Some(id) => self.delete_episode(chat_id, &id).await,
            None => {
                self.notifier.send(EMPTY_CAST).await?;
                Ok(false)
            }
        }
    }

    async fn execute(&self, payload: &Payload) -> Result<Status, SauerError> {
        let command = payload.incoming_text.trim();
        match parse_command(command) {
            Command::List { compact } => {
                self.cmd_list(&payload.chat_id, compact).await?;
                Ok(Status::Finish)
            }
            Command::Help => {
                self.notifier.send(&help_text()).await?;
                Ok(Status::Finish)
            }
            Command::Delete(target) => {
                let update_required = self.cmd_delete(command, &payload.chat_id, target).await?;
                Ok(if update_required {
                    Status::Podcaster
                } else {
                    Status::Finish
                })
            }
            Command::Unknown => {
                self.notifier
                    .send(&format!(
                        "I don't understand '{}'. Send /help to see what I can do.",
                        escape_html(command)
                    ))
                    .await?;
                Ok(Status::Finish)
            }
        }
    }
}

#[async_trait]
impl WorkflowStep for Commander<'_> {
    async fn handle_event(&self, event: StepEvent) -> StepResult {
        info!("Commander - called with {:?}", event);
        let outcome = self.execute(&event.message).await;
        conclude("Commander", self.notifier, outcome, event.message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("/list"), Command::List { compact: true });
        assert_eq!(parse_command("/listfull"), Command::List { compact: false });
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(
            parse_command("/delete id123"),
            Command::Delete(DeleteTarget::Id("id123".into()))
        );
        assert_eq!(parse_command("/deletenewest"), Command::Delete(DeleteTarget::Newest));
        assert_eq!(parse_command("/deleteoldest"), Command::Delete(DeleteTarget::Oldest));
        assert_eq!(parse_command("/delete"), Command::Delete(DeleteTarget::Invalid));
        assert_eq!(parse_command("/delete a b"), Command::Delete(DeleteTarget::Invalid));
        assert_eq!(parse_command("/start"), Command::Unknown);
    }

    #[test]
    fn formats_age_with_day_prefix() {
        assert_eq!(format_age(0), "0:00:00");
        assert_eq!(format_age(3_661), "1:01:01");
        assert_eq!(format_age(86_400), "1 day, 0:00:00");
        assert_eq!(format_age(2 * 86_400 + 59), "2 days, 0:00:59");
        assert_eq!(format_age(-5), "0:00:00");
    }

    #[test]
    fn help_pads_command_names() {
        let text = help_text();
        assert!(text.starts_with("I understand these commands:\n"));
        assert!(text.contains("<pre> /help               </pre>This text."));
        assert!(
            text.contains("<pre> /deleteoldest       </pre>Delete oldest entry from database.")
        );
    }
}
