use std::io::Write;

use anyhow::{Context as _, Result};
use serde::Serialize;
use tracing::info;

use super::{
    clamp_max_results, clean_username, result_count, write_json, write_pagination_hint, Context,
    USER_TWEETS_RESULTS,
};
use crate::api::options::{fields, Exclude, GetUserOptions, GetUserTweetsOptions};
use crate::api::types::{TweetsResponse, UserResponse};
use crate::cli::UserTweetsArgs;
use crate::format::{format_user, list_separator, OutputFormat, Render};

/// Structured output of `user-tweets`: the account lookup and its page of
/// posts, both untouched.
#[derive(Debug, Serialize)]
struct UserTimeline<'a> {
    user: &'a UserResponse,
    tweets: &'a TweetsResponse,
}

pub async fn run<W: Write>(ctx: &Context, args: &UserTweetsArgs, out: &mut W) -> Result<()> {
    let max_results = clamp_max_results(args.max_results, &USER_TWEETS_RESULTS);
    let username = clean_username(&args.username);

    info!("Fetching user @{username}...");
    let user_result = ctx
        .client
        .get_user_by_username(
            username,
            &GetUserOptions {
                user_fields: fields(&["created_at", "description", "public_metrics", "verified"]),
                ..Default::default()
            },
        )
        .await
        .with_context(|| format!("looking up user @{username}"))?;

    let Some(user) = &user_result.data else {
        if ctx.format == OutputFormat::Json {
            return write_json(out, &user_result);
        }
        writeln!(out, "User \"{username}\" not found.")?;
        return Ok(());
    };

    let mut exclude = Vec::new();
    if args.exclude_replies {
        exclude.push(Exclude::Replies);
    }
    if args.exclude_retweets {
        exclude.push(Exclude::Retweets);
    }

    let mut tweet_fields = fields(&["created_at"]);
    if args.include_metrics {
        tweet_fields.push("public_metrics".to_string());
    }

    let options = GetUserTweetsOptions {
        max_results: Some(max_results),
        tweet_fields,
        exclude,
        pagination_token: args.next_token.clone(),
        ..Default::default()
    };

    info!(user_id = %user.id, max_results, "Fetching tweets...");
    let tweets = ctx
        .client
        .get_user_tweets(&user.id, &options)
        .await
        .with_context(|| format!("fetching tweets for @{username}"))?;

    if ctx.format == OutputFormat::Json {
        return write_json(
            out,
            &UserTimeline {
                user: &user_result,
                tweets: &tweets,
            },
        );
    }

    writeln!(out, "\nUser info:\n")?;
    writeln!(out, "{}", format_user(user))?;
    writeln!(out, "\n{}\n", list_separator())?;

    if tweets.entities().is_empty() {
        writeln!(out, "No tweets found.")?;
        if args.exclude_replies || args.exclude_retweets {
            writeln!(out, "(Note: Some tweets may have been excluded by filters)")?;
        }
        return Ok(());
    }

    writeln!(out, "Found {} tweets:\n", result_count(&tweets))?;
    writeln!(out, "{}", tweets.to_text())?;
    write_pagination_hint(out, tweets.next_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, output};
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn args(username: &str) -> UserTweetsArgs {
        UserTweetsArgs {
            username: username.to_string(),
            max_results: 3,
            exclude_replies: true,
            exclude_retweets: false,
            include_metrics: false,
            next_token: None,
        }
    }

    async fn mount_user(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/users/by/username/rustlang"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": "99", "name": "Rust", "username": "rustlang" }
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetches_user_then_tweets() {
        let server = MockServer::start().await;
        mount_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/99/tweets"))
            .and(query_param("max_results", "5"))
            .and(query_param("exclude", "replies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": "1", "text": "first" },
                    { "id": "2", "text": "second" }
                ],
                "meta": { "result_count": 2 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut buf = Vec::new();
        run(&ctx, &args("@rustlang"), &mut buf).await.unwrap();

        let out = output(buf);
        assert!(out.contains("User info:"));
        assert!(out.contains("Found 2 tweets:"));
        assert!(out.contains("[2/2]"));
    }

    #[tokio::test]
    async fn test_empty_timeline_mentions_filters() {
        let server = MockServer::start().await;
        mount_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/99/tweets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": { "result_count": 0 }
            })))
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut buf = Vec::new();
        run(&ctx, &args("rustlang"), &mut buf).await.unwrap();

        let out = output(buf);
        assert!(out.contains("No tweets found."));
        assert!(out.contains("excluded by filters"));
    }

    #[tokio::test]
    async fn test_json_combines_user_and_tweets() {
        let server = MockServer::start().await;
        mount_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/99/tweets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "1", "text": "first" }],
                "meta": { "result_count": 1 }
            })))
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Json);
        let mut buf = Vec::new();
        run(&ctx, &args("rustlang"), &mut buf).await.unwrap();

        let printed: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(printed["user"]["data"]["username"], "rustlang");
        assert_eq!(printed["tweets"]["data"][0]["text"], "first");
    }

    #[tokio::test]
    async fn test_missing_user_skips_second_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/by/username/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": [] })))
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut buf = Vec::new();
        run(&ctx, &args("ghost"), &mut buf).await.unwrap();

        assert_eq!(output(buf), "User \"ghost\" not found.\n");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}
