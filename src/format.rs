//! Rendering of API entities as display text or JSON.
//!
//! Everything here is pure: functions take entities and return strings, the
//! caller decides where they are written.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::api::types::{
    Topic, TopicsResponse, Tweet, TweetPublicMetrics, TweetsResponse, User, UserPublicMetrics,
};

pub const RULE_WIDTH: usize = 50;

/// Output mode selected with `--format` or the config file's `defaultFormat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable blocks
    #[default]
    Table,
    /// Pretty-printed JSON of the raw response
    Json,
}

/// Light rule framing a post or bio.
pub fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// Heavy rule between list entries.
pub fn list_separator() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Dashed rule used around side-loaded content such as pinned posts.
pub fn dashed_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Render an ISO 8601 timestamp in local time as `YYYY/MM/DD HH:MM`.
///
/// Unparsable input is returned unchanged.
pub fn format_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y/%m/%d %H:%M").to_string(),
        Err(_) => date.to_string(),
    }
}

fn format_day(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y/%m/%d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// `♥ likes | 🔄 reposts | 💬 replies`, skipping counts that are absent.
pub fn format_tweet_metrics(metrics: Option<&TweetPublicMetrics>) -> String {
    let Some(m) = metrics else {
        return String::new();
    };
    let mut parts = Vec::new();
    if let Some(n) = m.like_count {
        parts.push(format!("♥ {n}"));
    }
    if let Some(n) = m.retweet_count {
        parts.push(format!("🔄 {n}"));
    }
    if let Some(n) = m.reply_count {
        parts.push(format!("💬 {n}"));
    }
    parts.join(" | ")
}

pub fn format_user_metrics(metrics: Option<&UserPublicMetrics>) -> String {
    let Some(m) = metrics else {
        return String::new();
    };
    let mut parts = Vec::new();
    if let Some(n) = m.followers_count {
        parts.push(format!("👥 {n} followers"));
    }
    if let Some(n) = m.following_count {
        parts.push(format!("{n} following"));
    }
    if let Some(n) = m.tweet_count {
        parts.push(format!("📝 {n} tweets"));
    }
    parts.join(" | ")
}

/// One post as a block: author, framed text, date/metrics, id.
pub fn format_tweet(tweet: &Tweet, author: Option<&User>) -> String {
    let mut lines = Vec::new();

    if let Some(author) = author {
        lines.push(format!("@{} ({})", author.username, author.name));
    }

    lines.push(rule());
    lines.push(tweet.text.clone());
    lines.push(rule());

    let mut meta = Vec::new();
    if let Some(created_at) = &tweet.created_at {
        meta.push(format!("🕐 {}", format_date(created_at)));
    }
    let metrics = format_tweet_metrics(tweet.public_metrics.as_ref());
    if !metrics.is_empty() {
        meta.push(metrics);
    }
    if !meta.is_empty() {
        lines.push(meta.join(" | "));
    }

    lines.push(format!("ID: {}", tweet.id));
    lines.join("\n")
}

pub fn format_user(user: &User) -> String {
    let mut lines = vec![format!("@{}", user.username), format!("Name: {}", user.name)];

    if user.verified == Some(true) {
        match &user.verified_type {
            Some(kind) => lines.push(format!("✓ Verified ({kind})")),
            None => lines.push("✓ Verified".to_string()),
        }
    }

    if let Some(description) = user.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(rule());
        lines.push(description.to_string());
        lines.push(rule());
    }

    let metrics = format_user_metrics(user.public_metrics.as_ref());
    if !metrics.is_empty() {
        lines.push(metrics);
    }

    let mut meta = Vec::new();
    if let Some(created_at) = &user.created_at {
        meta.push(format!("Joined: {}", format_day(created_at)));
    }
    if let Some(location) = &user.location {
        meta.push(format!("📍 {location}"));
    }
    if let Some(url) = user.url.as_deref().filter(|u| !u.is_empty()) {
        meta.push(format!("🔗 {url}"));
    }
    if !meta.is_empty() {
        lines.push(meta.join(" | "));
    }

    lines.push(format!("ID: {}", user.id));
    lines.join("\n")
}

pub fn format_topic(topic: &Topic) -> String {
    let mut lines = vec![format!("📌 {}", topic.name), format!("ID: {}", topic.id)];
    if let Some(description) = &topic.description {
        lines.push(format!("Description: {description}"));
    }
    if let Some(query) = &topic.query {
        lines.push(format!("Query: {query}"));
    }
    if let Some(count) = topic.follower_count {
        lines.push(format!("👥 {count} followers"));
    }
    if let Some(created_at) = &topic.created_at {
        lines.push(format!("Created: {}", format_date(created_at)));
    }
    lines.join("\n")
}

/// Number entries `[i/total]` and join them with a full-width rule.
fn format_numbered<T>(items: &[T], empty: &str, render: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let total = items.len();
    let separator = format!("\n\n{}\n\n", list_separator());
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("[{}/{}]\n{}", i + 1, total, render(item)))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Posts with their authors resolved from `users` where possible.
pub fn format_tweet_list(tweets: &[Tweet], users: &HashMap<&str, &User>) -> String {
    format_numbered(tweets, "No tweets found.", |tweet| {
        let author = tweet
            .author_id
            .as_deref()
            .and_then(|id| users.get(id).copied());
        format_tweet(tweet, author)
    })
}

pub fn format_user_list(users: &[User]) -> String {
    format_numbered(users, "No users found.", format_user)
}

pub fn format_topic_list(topics: &[Topic]) -> String {
    format_numbered(topics, "No topics found.", format_topic)
}

pub fn format_pinned_tweet(tweet: &Tweet) -> String {
    let mut lines = vec![
        "📌 Pinned Tweet:".to_string(),
        dashed_rule(),
        tweet.text.clone(),
        dashed_rule(),
    ];
    let metrics = format_tweet_metrics(tweet.public_metrics.as_ref());
    if !metrics.is_empty() {
        lines.push(metrics);
    }
    lines.join("\n")
}

/// Context annotations, reply settings and language of a post, if any.
pub fn format_tweet_extras(tweet: &Tweet) -> Option<String> {
    let mut sections = Vec::new();

    let annotations: Vec<String> = tweet
        .context_annotations
        .iter()
        .flatten()
        .filter_map(|a| match (&a.domain, &a.entity) {
            (Some(domain), Some(entity)) => Some(format!("  • {}: {}", domain.name, entity.name)),
            _ => None,
        })
        .collect();
    if !annotations.is_empty() {
        sections.push(format!("📊 Context Annotations:\n{}", annotations.join("\n")));
    }

    let mut tail = Vec::new();
    if let Some(settings) = &tweet.reply_settings {
        tail.push(format!("🔒 Reply Settings: {settings}"));
    }
    if let Some(lang) = &tweet.lang {
        tail.push(format!("🌐 Language: {lang}"));
    }
    if !tail.is_empty() {
        sections.push(tail.join("\n"));
    }

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}

/// Pretty JSON of the value exactly as received.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Response pages with a display rendering.
pub trait Render {
    fn to_text(&self) -> String;
}

impl Render for TweetsResponse {
    fn to_text(&self) -> String {
        format_tweet_list(self.entities(), &self.users_by_id())
    }
}

impl Render for TopicsResponse {
    fn to_text(&self) -> String {
        format_topic_list(self.entities())
    }
}
