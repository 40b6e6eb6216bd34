//! X API v2 REST client.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::options::{
    GetTopicOptions, GetTopicTweetsOptions, GetTweetOptions, GetUserOptions,
    GetUserTweetsOptions, SearchTopicsOptions, SearchTweetsOptions,
};
use super::query::{QueryParams, ToQuery};
use super::types::{
    RemoteError, TopicResponse, TopicsResponse, TweetResponse, TweetsResponse, UserResponse,
};
use crate::error::{XApiError, XApiResult};

pub const API_BASE_URL: &str = "https://api.x.com/2";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the read endpoints of the X API.
///
/// Holds one bearer credential; every request is a GET with its parameters
/// in the query string.
#[derive(Debug, Clone)]
pub struct XApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl XApiClient {
    pub fn new(token: impl Into<String>) -> XApiResult<Self> {
        Self::with_timeout(token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(token: impl Into<String>, timeout: Duration) -> XApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("x-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            token: token.into(),
        })
    }

    /// Point the client at another host, e.g. a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, params), fields(params = params.len()))]
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &QueryParams) -> XApiResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Making X API request");

        let response = self
            .client
            .get(&url)
            .query(params.as_pairs())
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "X API request did not complete");
                XApiError::Transport(e)
            })?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> XApiResult<T> {
        let status = response.status();

        if !status.is_success() {
            // A body that cannot be read or parsed still yields the status error.
            let bytes = response.bytes().await.unwrap_or_default();
            let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            warn!(status = status.as_u16(), errors = body.errors.len(), "X API returned an error");

            return Err(XApiError::Request {
                status: status.as_u16(),
                errors: body.errors,
                detail: body.detail.or(body.title),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Post endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// Search posts from the last seven days.
    pub async fn search_tweets(
        &self,
        query: &str,
        options: &SearchTweetsOptions,
    ) -> XApiResult<TweetsResponse> {
        let mut params = QueryParams::new();
        params.push("query", query);
        options.append_to(&mut params);
        self.get("/tweets/search/recent", &params).await
    }

    /// Get a single post.
    pub async fn get_tweet(
        &self,
        tweet_id: &str,
        options: &GetTweetOptions,
    ) -> XApiResult<TweetResponse> {
        let endpoint = format!("/tweets/{}", urlencoding::encode(tweet_id));
        self.get(&endpoint, &options.to_query()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Account endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// Get an account by handle (without the `@`).
    pub async fn get_user_by_username(
        &self,
        username: &str,
        options: &GetUserOptions,
    ) -> XApiResult<UserResponse> {
        let endpoint = format!("/users/by/username/{}", urlencoding::encode(username));
        self.get(&endpoint, &options.to_query()).await
    }

    pub async fn get_user_by_id(
        &self,
        user_id: &str,
        options: &GetUserOptions,
    ) -> XApiResult<UserResponse> {
        let endpoint = format!("/users/{}", urlencoding::encode(user_id));
        self.get(&endpoint, &options.to_query()).await
    }

    /// Get an account's posts, newest first.
    pub async fn get_user_tweets(
        &self,
        user_id: &str,
        options: &GetUserTweetsOptions,
    ) -> XApiResult<TweetsResponse> {
        let endpoint = format!("/users/{}/tweets", urlencoding::encode(user_id));
        self.get(&endpoint, &options.to_query()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Topic endpoints
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn search_topics(
        &self,
        query: &str,
        options: &SearchTopicsOptions,
    ) -> XApiResult<TopicsResponse> {
        let mut params = QueryParams::new();
        params.push("query", query);
        options.append_to(&mut params);
        self.get("/topics/search", &params).await
    }

    pub async fn get_topic(
        &self,
        topic_id: &str,
        options: &GetTopicOptions,
    ) -> XApiResult<TopicResponse> {
        let endpoint = format!("/topics/{}", urlencoding::encode(topic_id));
        self.get(&endpoint, &options.to_query()).await
    }

    pub async fn get_topic_tweets(
        &self,
        topic_id: &str,
        options: &GetTopicTweetsOptions,
    ) -> XApiResult<TweetsResponse> {
        let endpoint = format!("/topics/{}/tweets", urlencoding::encode(topic_id));
        self.get(&endpoint, &options.to_query()).await
    }
}

/// Body of a failed response. Both the `errors` array and the
/// problem-details shape (`title`/`detail`) appear in practice.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<RemoteError>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}
