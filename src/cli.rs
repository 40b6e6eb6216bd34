//! Command-line definitions.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::format::OutputFormat;

/// CLI tool for X (Twitter) API - search tweets, users, and more
#[derive(Parser, Debug)]
#[command(name = "x-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  $ x-cli search \"typescript\"
  $ x-cli search-users \"elonmusk\"
  $ x-cli user-tweets \"x\" --max-results 20
  $ x-cli tweet \"1234567890\" --include-author
  $ x-cli topic openclaw

Configuration:
  Set your X API token in one of the following ways:
    1. x-cli config --token YOUR_TOKEN
    2. Create ~/.x-cli.json: {\"token\": \"YOUR_TOKEN\"}
    3. Put your token in ~/my/x-token.txt")]
pub struct Cli {
    /// Output format (defaults to the config file's defaultFormat, else table)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Override the API base URL
    #[arg(long, global = true, env = "X_CLI_API_URL", hide = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "X_CLI_TIMEOUT", default_value_t = 30, hide = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search recent tweets on X
    Search(SearchArgs),

    /// Search for X users by username
    SearchUsers(SearchUsersArgs),

    /// Get tweets from a specific X user
    UserTweets(UserTweetsArgs),

    /// Get details of a specific X tweet
    Tweet(TweetArgs),

    /// Search for topics and get topic-related content on X
    #[command(visible_alias = "search-topics")]
    Topic(TopicArgs),

    /// Configure the stored API token
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Maximum number of results (10-100)
    #[arg(short = 'n', long, default_value_t = 10, allow_negative_numbers = true)]
    pub max_results: i64,

    /// Include engagement metrics
    #[arg(long)]
    pub include_metrics: bool,

    /// Pagination token from a previous result page
    #[arg(long)]
    pub next_token: Option<String>,

    /// Oldest creation time to match (RFC 3339)
    #[arg(long)]
    pub start_time: Option<DateTime<Utc>>,

    /// Newest creation time to match (RFC 3339)
    #[arg(long)]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub struct SearchUsersArgs {
    /// Username to search for (with or without @)
    pub username: String,

    /// Treat the argument as a numeric user ID
    #[arg(long)]
    pub by_id: bool,

    /// Include user metrics
    #[arg(long)]
    pub include_metrics: bool,
}

#[derive(Args, Debug)]
pub struct UserTweetsArgs {
    /// Username (with or without @)
    pub username: String,

    /// Maximum number of tweets (5-100)
    #[arg(short = 'n', long, default_value_t = 10, allow_negative_numbers = true)]
    pub max_results: i64,

    /// Exclude reply tweets
    #[arg(long)]
    pub exclude_replies: bool,

    /// Exclude retweets
    #[arg(long)]
    pub exclude_retweets: bool,

    /// Include engagement metrics
    #[arg(long)]
    pub include_metrics: bool,

    /// Pagination token from a previous result page
    #[arg(long)]
    pub next_token: Option<String>,
}

#[derive(Args, Debug)]
pub struct TweetArgs {
    /// Tweet ID (the numeric ID from the tweet URL)
    pub tweet_id: String,

    /// Include author information
    #[arg(long)]
    pub include_author: bool,
}

#[derive(Args, Debug)]
pub struct TopicArgs {
    /// Topic name or search query
    #[arg(required_unless_present = "topic_id")]
    pub query: Option<String>,

    /// Maximum number of results (1-100)
    #[arg(short = 'n', long, default_value_t = 10, allow_negative_numbers = true)]
    pub max_results: i64,

    /// Include related tweets for the topic (with --topic-id)
    #[arg(long)]
    pub include_tweets: bool,

    /// Get specific topic by ID instead of searching
    #[arg(long)]
    pub topic_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Store this bearer token in ~/.x-cli.json
    #[arg(long, alias = "bearer-token")]
    pub token: Option<String>,

    /// Default output format for all commands
    #[arg(long, value_enum)]
    pub default_format: Option<OutputFormat>,

    /// Show where the token is resolved from
    #[arg(long)]
    pub show: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["x-cli", "search", "rust", "-f", "json"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, "rust");
        assert_eq!(args.max_results, 10);
    }

    #[test]
    fn test_out_of_range_counts_parse() {
        let cli = Cli::try_parse_from(["x-cli", "user-tweets", "@x", "-n", "-3"]).unwrap();
        let Commands::UserTweets(args) = cli.command else {
            panic!("expected user-tweets");
        };
        assert_eq!(args.max_results, -3);
    }

    #[test]
    fn test_topic_requires_query_or_id() {
        assert!(Cli::try_parse_from(["x-cli", "topic"]).is_err());
        assert!(Cli::try_parse_from(["x-cli", "topic", "--topic-id", "42"]).is_ok());
        assert!(Cli::try_parse_from(["x-cli", "search-topics", "openclaw"]).is_ok());
    }

    #[test]
    fn test_start_time_parses_rfc3339() {
        let cli = Cli::try_parse_from([
            "x-cli",
            "search",
            "q",
            "--start-time",
            "2024-01-01T00:00:00Z",
        ])
        .unwrap();
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert!(args.start_time.is_some());
    }
}
