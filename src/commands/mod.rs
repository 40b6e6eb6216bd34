//! Command handlers: one per subcommand.
//!
//! Each handler builds request options from its flags, calls the client and
//! writes the rendered result to the given sink.

pub mod config;
pub mod search;
pub mod search_users;
pub mod topic;
pub mod tweet;
pub mod user_tweets;

use std::io::{self, Write};
use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::api::types::Envelope;
use crate::api::XApiClient;
use crate::cli::{Cli, Commands};
use crate::config::{resolve_credential, CredentialPaths};
use crate::format::{dashed_rule, to_json, OutputFormat};

/// Valid `max_results` bounds per endpoint.
pub const SEARCH_RESULTS: RangeInclusive<u32> = 10..=100;
pub const USER_TWEETS_RESULTS: RangeInclusive<u32> = 5..=100;
pub const TOPIC_SEARCH_RESULTS: RangeInclusive<u32> = 1..=100;
pub const TOPIC_TWEETS_RESULTS: RangeInclusive<u32> = 10..=100;

/// Everything a handler needs for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub client: XApiClient,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(client: XApiClient, format: OutputFormat) -> Self {
        Self { client, format }
    }

    /// Resolve the credential and build the client for this invocation.
    pub fn load(cli: &Cli, paths: &CredentialPaths) -> Result<Self> {
        let credential = resolve_credential(paths)?;
        let format = cli
            .format
            .or(credential.default_format)
            .unwrap_or_default();

        let mut client =
            XApiClient::with_timeout(credential.token, Duration::from_secs(cli.timeout))?;
        if let Some(url) = &cli.api_url {
            client = client.with_base_url(url.as_str());
        }

        Ok(Self::new(client, format))
    }
}

/// Run the parsed command against stdout.
pub async fn execute(cli: &Cli) -> Result<()> {
    let paths = CredentialPaths::discover()?;
    let mut out = io::stdout();
    let context = || Context::load(cli, &paths);

    match &cli.command {
        Commands::Search(args) => search::run(&context()?, args, &mut out).await,
        Commands::SearchUsers(args) => search_users::run(&context()?, args, &mut out).await,
        Commands::UserTweets(args) => user_tweets::run(&context()?, args, &mut out).await,
        Commands::Tweet(args) => tweet::run(&context()?, args, &mut out).await,
        Commands::Topic(args) => topic::run(&context()?, args, &mut out).await,
        Commands::Config(args) => config::run(args, &paths, &mut out),
    }
}

/// Clamp a requested result count into an endpoint's valid range.
pub fn clamp_max_results(requested: i64, range: &RangeInclusive<u32>) -> u32 {
    let clamped = requested.clamp(i64::from(*range.start()), i64::from(*range.end()));
    // In range of u32 after the clamp.
    clamped as u32
}

/// Strip one leading `@` from a handle.
pub fn clean_username(username: &str) -> &str {
    username.strip_prefix('@').unwrap_or(username)
}

pub(crate) fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    writeln!(out, "{}", to_json(value)?)?;
    Ok(())
}

pub(crate) fn write_pagination_hint<W: Write>(out: &mut W, next_token: Option<&str>) -> Result<()> {
    if let Some(token) = next_token {
        writeln!(out, "\n{}", dashed_rule())?;
        writeln!(
            out,
            "More results available. Use --next-token {token} to paginate."
        )?;
    }
    Ok(())
}

/// Number of results to announce: `meta.result_count` when sent, else the
/// length of the page.
pub(crate) fn result_count<T>(response: &Envelope<Vec<T>>) -> usize {
    if !response.result_count_consistent() {
        warn!(
            entities = response.entities().len(),
            "result_count in response metadata does not match the returned entities"
        );
    }
    response
        .meta
        .as_ref()
        .and_then(|m| m.result_count)
        .map(|c| c as usize)
        .unwrap_or_else(|| response.entities().len())
}
