//! X API v2 response types.
//!
//! Every entity keeps the fields it does not model in an `extra` map, so a
//! response printed back as JSON carries everything the service sent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level response wrapper: primary data plus side-loaded includes and
/// pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Includes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Partial failures reported alongside a successful response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RemoteError>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            data: None,
            includes: None,
            meta: None,
            errors: None,
            extra: Map::new(),
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Primary entities, empty when the service omitted `data`.
    ///
    /// The service drops `data` entirely for a zero-result page.
    pub fn entities(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Whether `meta.result_count`, when present, matches the entity count.
    pub fn result_count_consistent(&self) -> bool {
        match self.meta.as_ref().and_then(|m| m.result_count) {
            Some(count) => count as usize == self.entities().len(),
            None => true,
        }
    }

    pub fn next_token(&self) -> Option<&str> {
        self.meta.as_ref()?.next_token.as_deref()
    }
}

impl<T> Envelope<T> {
    /// Side-loaded accounts keyed by id. Empty when no expansion was requested.
    pub fn users_by_id(&self) -> HashMap<&str, &User> {
        self.includes
            .as_ref()
            .map(|inc| inc.users().iter().map(|u| (u.id.as_str(), u)).collect())
            .unwrap_or_default()
    }

    /// First side-loaded post, which is the pinned one for account and
    /// topic lookups expanded on `pinned_tweet_id`.
    pub fn included_tweet(&self) -> Option<&Tweet> {
        self.includes.as_ref()?.tweets.as_ref()?.first()
    }

    pub fn included_user(&self) -> Option<&User> {
        self.includes.as_ref()?.users().first()
    }
}

/// Entities side-loaded through expansions.
///
/// Each list stays `None` when the key was absent, so an explicit empty list
/// is printed back as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweets: Option<Vec<Tweet>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Topic>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places: Option<Vec<Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Includes {
    pub fn users(&self) -> &[User] {
        self.users.as_deref().unwrap_or(&[])
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users().iter().find(|u| u.id == id)
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newest_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldest_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Posts
// ─────────────────────────────────────────────────────────────────────────────

/// A post ("tweet").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,

    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,

    /// ISO 8601 creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metrics: Option<TweetPublicMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_annotations: Option<Vec<ContextAnnotation>>,

    /// BCP 47 language tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possibly_sensitive: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_settings: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_tweets: Option<Vec<ReferencedTweet>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_history_tweet_ids: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Engagement counts. Each count is optional; the service omits the ones a
/// caller is not entitled to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetPublicMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweet_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impression_count: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencedTweet {
    /// "retweeted", "quoted" or "replied_to"
    #[serde(rename = "type")]
    pub ref_type: String,

    pub id: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Classification attached to a post by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<AnnotationEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<AnnotationEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// An account ("user").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Display name
    pub name: String,

    /// Handle, without the leading `@`
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metrics: Option<UserPublicMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,

    /// "blue", "business", "government", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_tweet_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPublicMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweet_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_count: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Topics
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Search query the topic was built from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_tweet_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Error object returned by the service, either in a failed response body or
/// as a partial failure next to `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteError {
    /// Best human-readable line for this error.
    pub fn summary(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .or(self.title.as_deref())
    }
}

/// Error codes are numeric on older endpoints and strings on newer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response aliases
// ─────────────────────────────────────────────────────────────────────────────

pub type TweetResponse = Envelope<Tweet>;
pub type TweetsResponse = Envelope<Vec<Tweet>>;
pub type UserResponse = Envelope<User>;
pub type TopicResponse = Envelope<Topic>;
pub type TopicsResponse = Envelope<Vec<Topic>>;
