//! X API v2 client: request building, transport, response types.

pub mod client;
pub mod options;
pub mod query;
pub mod types;

pub use client::{XApiClient, API_BASE_URL, DEFAULT_TIMEOUT};
pub use options::{
    Exclude, GetTopicOptions, GetTopicTweetsOptions, GetTweetOptions, GetUserOptions,
    GetUserTweetsOptions, SearchTopicsOptions, SearchTweetsOptions,
};
pub use query::{QueryParams, ToQuery};
pub use types::{
    Envelope, Includes, Meta, RemoteError, Topic, TopicResponse, TopicsResponse, Tweet,
    TweetPublicMetrics, TweetResponse, TweetsResponse, User, UserPublicMetrics, UserResponse,
};
