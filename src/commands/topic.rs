use std::io::Write;

use anyhow::{Context as _, Result};
use serde::Serialize;
use tracing::info;

use super::{
    clamp_max_results, result_count, write_json, Context, TOPIC_SEARCH_RESULTS,
    TOPIC_TWEETS_RESULTS,
};
use crate::api::options::{fields, GetTopicOptions, GetTopicTweetsOptions, SearchTopicsOptions};
use crate::api::types::{TopicResponse, TweetsResponse};
use crate::cli::TopicArgs;
use crate::format::{format_pinned_tweet, format_topic, list_separator, OutputFormat, Render};

/// Structured output of `topic --topic-id --include-tweets`: both responses
/// untouched.
#[derive(Debug, Serialize)]
struct TopicWithTweets<'a> {
    topic: &'a TopicResponse,
    tweets: &'a TweetsResponse,
}

pub async fn run<W: Write>(ctx: &Context, args: &TopicArgs, out: &mut W) -> Result<()> {
    match (&args.topic_id, &args.query) {
        (Some(topic_id), _) => show_topic(ctx, topic_id, args, out).await,
        (None, Some(query)) => search_topics(ctx, query, args, out).await,
        (None, None) => anyhow::bail!("either a search query or --topic-id is required"),
    }
}

async fn search_topics<W: Write>(
    ctx: &Context,
    query: &str,
    args: &TopicArgs,
    out: &mut W,
) -> Result<()> {
    let max_results = clamp_max_results(args.max_results, &TOPIC_SEARCH_RESULTS);
    let options = SearchTopicsOptions {
        max_results: Some(max_results),
        topic_fields: fields(&["description", "created_at", "query"]),
        ..Default::default()
    };

    info!(query, max_results, "Searching topics");
    let result = ctx
        .client
        .search_topics(query, &options)
        .await
        .context("searching topics")?;

    if ctx.format == OutputFormat::Json {
        return write_json(out, &result);
    }

    if result.entities().is_empty() {
        writeln!(out, "No topics found matching your query.")?;
        return Ok(());
    }

    writeln!(out, "\nFound {} topics:\n", result_count(&result))?;
    writeln!(out, "{}", result.to_text())?;
    writeln!(
        out,
        "\n💡 Tip: Use --topic-id <id> to get details and tweets for a specific topic"
    )?;
    Ok(())
}

async fn show_topic<W: Write>(
    ctx: &Context,
    topic_id: &str,
    args: &TopicArgs,
    out: &mut W,
) -> Result<()> {
    let options = GetTopicOptions {
        topic_fields: fields(&["description", "created_at", "query"]),
        expansions: fields(&["pinned_tweet_id"]),
        tweet_fields: fields(&["created_at", "public_metrics"]),
    };

    info!(topic_id, "Fetching topic");
    let result = ctx
        .client
        .get_topic(topic_id, &options)
        .await
        .with_context(|| format!("fetching topic {topic_id}"))?;

    let Some(topic) = &result.data else {
        if ctx.format == OutputFormat::Json {
            return write_json(out, &result);
        }
        writeln!(out, "Topic not found.")?;
        return Ok(());
    };

    let tweets = if args.include_tweets {
        let max_results = clamp_max_results(args.max_results, &TOPIC_TWEETS_RESULTS);
        let options = GetTopicTweetsOptions {
            max_results: Some(max_results),
            tweet_fields: fields(&["created_at", "public_metrics", "author_id"]),
            expansions: fields(&["author_id"]),
            user_fields: fields(&["username", "name", "verified"]),
            ..Default::default()
        };
        info!(topic_id = %topic.id, max_results, "Fetching topic tweets");
        let tweets = ctx
            .client
            .get_topic_tweets(&topic.id, &options)
            .await
            .with_context(|| format!("fetching tweets for topic {}", topic.id))?;
        Some(tweets)
    } else {
        None
    };

    if ctx.format == OutputFormat::Json {
        return match &tweets {
            Some(tweets) => write_json(
                out,
                &TopicWithTweets {
                    topic: &result,
                    tweets,
                },
            ),
            None => write_json(out, &result),
        };
    }

    writeln!(out, "\nTopic Details:\n")?;
    writeln!(out, "{}", format_topic(topic))?;
    if let Some(pinned) = result.included_tweet() {
        writeln!(out, "\n{}", format_pinned_tweet(pinned))?;
    }

    if let Some(tweets) = tweets {
        writeln!(out, "\n{}\n", list_separator())?;
        if tweets.entities().is_empty() {
            writeln!(out, "No tweets found for this topic.")?;
        } else {
            writeln!(out, "Related tweets ({}):\n", result_count(&tweets))?;
            writeln!(out, "{}", tweets.to_text())?;
        }
    }
    Ok(())
}
