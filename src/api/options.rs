//! Per-endpoint request options.
//!
//! Every field is optional. `max_results` falls back to
//! [`DEFAULT_MAX_RESULTS`] on the endpoints that accept it; everything else
//! is left out of the request when unset.

use chrono::{DateTime, Utc};

use super::query::{QueryParams, ToQuery};

pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Post categories that can be excluded from an account timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclude {
    Replies,
    Retweets,
}

impl Exclude {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replies => "replies",
            Self::Retweets => "retweets",
        }
    }
}

impl AsRef<str> for Exclude {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Options for recent post search.
#[derive(Debug, Clone, Default)]
pub struct SearchTweetsOptions {
    /// 10-100
    pub max_results: Option<u32>,
    pub tweet_fields: Vec<String>,
    pub expansions: Vec<String>,
    pub user_fields: Vec<String>,
    pub media_fields: Vec<String>,
    pub place_fields: Vec<String>,
    pub poll_fields: Vec<String>,
    pub next_token: Option<String>,
    pub since_id: Option<String>,
    pub until_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ToQuery for SearchTweetsOptions {
    fn append_to(&self, q: &mut QueryParams) {
        q.push("max_results", self.max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .push_list("tweet.fields", &self.tweet_fields)
            .push_list("expansions", &self.expansions)
            .push_list("user.fields", &self.user_fields)
            .push_list("media.fields", &self.media_fields)
            .push_list("place.fields", &self.place_fields)
            .push_list("poll.fields", &self.poll_fields)
            .push_opt("next_token", self.next_token.as_deref())
            .push_opt("since_id", self.since_id.as_deref())
            .push_opt("until_id", self.until_id.as_deref())
            .push_time("start_time", self.start_time.as_ref())
            .push_time("end_time", self.end_time.as_ref());
    }
}

/// Options for account lookup by handle or id.
#[derive(Debug, Clone, Default)]
pub struct GetUserOptions {
    pub user_fields: Vec<String>,
    pub expansions: Vec<String>,
    pub tweet_fields: Vec<String>,
}

impl ToQuery for GetUserOptions {
    fn append_to(&self, q: &mut QueryParams) {
        q.push_list("user.fields", &self.user_fields)
            .push_list("expansions", &self.expansions)
            .push_list("tweet.fields", &self.tweet_fields);
    }
}

/// Options for an account's timeline.
#[derive(Debug, Clone, Default)]
pub struct GetUserTweetsOptions {
    /// 5-100
    pub max_results: Option<u32>,
    pub tweet_fields: Vec<String>,
    pub expansions: Vec<String>,
    pub user_fields: Vec<String>,
    pub exclude: Vec<Exclude>,
    pub pagination_token: Option<String>,
    pub since_id: Option<String>,
    pub until_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ToQuery for GetUserTweetsOptions {
    fn append_to(&self, q: &mut QueryParams) {
        q.push("max_results", self.max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .push_list("tweet.fields", &self.tweet_fields)
            .push_list("expansions", &self.expansions)
            .push_list("user.fields", &self.user_fields)
            .push_list("exclude", &self.exclude)
            .push_opt("pagination_token", self.pagination_token.as_deref())
            .push_opt("since_id", self.since_id.as_deref())
            .push_opt("until_id", self.until_id.as_deref())
            .push_time("start_time", self.start_time.as_ref())
            .push_time("end_time", self.end_time.as_ref());
    }
}

/// Options for single post lookup.
#[derive(Debug, Clone, Default)]
pub struct GetTweetOptions {
    pub tweet_fields: Vec<String>,
    pub expansions: Vec<String>,
    pub user_fields: Vec<String>,
    pub media_fields: Vec<String>,
    pub place_fields: Vec<String>,
    pub poll_fields: Vec<String>,
}

impl ToQuery for GetTweetOptions {
    fn append_to(&self, q: &mut QueryParams) {
        q.push_list("tweet.fields", &self.tweet_fields)
            .push_list("expansions", &self.expansions)
            .push_list("user.fields", &self.user_fields)
            .push_list("media.fields", &self.media_fields)
            .push_list("place.fields", &self.place_fields)
            .push_list("poll.fields", &self.poll_fields);
    }
}

/// Options for topic search.
#[derive(Debug, Clone, Default)]
pub struct SearchTopicsOptions {
    /// 1-100
    pub max_results: Option<u32>,
    pub topic_fields: Vec<String>,
    pub expansions: Vec<String>,
    pub tweet_fields: Vec<String>,
}

impl ToQuery for SearchTopicsOptions {
    fn append_to(&self, q: &mut QueryParams) {
        q.push("max_results", self.max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .push_list("topic.fields", &self.topic_fields)
            .push_list("expansions", &self.expansions)
            .push_list("tweet.fields", &self.tweet_fields);
    }
}

/// Options for single topic lookup.
#[derive(Debug, Clone, Default)]
pub struct GetTopicOptions {
    pub topic_fields: Vec<String>,
    pub expansions: Vec<String>,
    pub tweet_fields: Vec<String>,
}

impl ToQuery for GetTopicOptions {
    fn append_to(&self, q: &mut QueryParams) {
        q.push_list("topic.fields", &self.topic_fields)
            .push_list("expansions", &self.expansions)
            .push_list("tweet.fields", &self.tweet_fields);
    }
}

/// Options for the posts filed under a topic.
#[derive(Debug, Clone, Default)]
pub struct GetTopicTweetsOptions {
    /// 10-100
    pub max_results: Option<u32>,
    pub tweet_fields: Vec<String>,
    pub expansions: Vec<String>,
    pub user_fields: Vec<String>,
    pub pagination_token: Option<String>,
}

impl ToQuery for GetTopicTweetsOptions {
    fn append_to(&self, q: &mut QueryParams) {
        q.push("max_results", self.max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .push_list("tweet.fields", &self.tweet_fields)
            .push_list("expansions", &self.expansions)
            .push_list("user.fields", &self.user_fields)
            .push_opt("pagination_token", self.pagination_token.as_deref());
    }
}

/// Build an owned field list from string literals.
pub fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_results() {
        let q = SearchTweetsOptions::default().to_query();
        assert_eq!(q.get("max_results"), Some("10"));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_lookup_options_send_nothing_by_default() {
        assert!(GetUserOptions::default().to_query().is_empty());
        assert!(GetTweetOptions::default().to_query().is_empty());
        assert!(GetTopicOptions::default().to_query().is_empty());
    }

    #[test]
    fn test_user_tweets_exclude_and_pagination() {
        let opts = GetUserTweetsOptions {
            max_results: Some(5),
            exclude: vec![Exclude::Replies, Exclude::Retweets],
            pagination_token: Some("abc".into()),
            ..Default::default()
        };
        let q = opts.to_query();
        assert_eq!(q.get("max_results"), Some("5"));
        assert_eq!(q.get("exclude"), Some("replies,retweets"));
        assert_eq!(q.get("pagination_token"), Some("abc"));
        assert_eq!(q.get("next_token"), None);
    }

    #[test]
    fn test_search_topics_fields() {
        let opts = SearchTopicsOptions {
            max_results: Some(20),
            topic_fields: fields(&["id", "name"]),
            ..Default::default()
        };
        let q = opts.to_query();
        assert_eq!(q.get("max_results"), Some("20"));
        assert_eq!(q.get("topic.fields"), Some("id,name"));
        assert_eq!(q.get("expansions"), None);
    }
}
