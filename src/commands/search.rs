use std::io::Write;

use anyhow::{Context as _, Result};
use tracing::info;

use super::{clamp_max_results, result_count, write_json, write_pagination_hint, Context, SEARCH_RESULTS};
use crate::api::options::{fields, SearchTweetsOptions};
use crate::cli::SearchArgs;
use crate::format::{OutputFormat, Render};

pub async fn run<W: Write>(ctx: &Context, args: &SearchArgs, out: &mut W) -> Result<()> {
    let max_results = clamp_max_results(args.max_results, &SEARCH_RESULTS);

    let mut tweet_fields = fields(&["created_at", "author_id"]);
    if args.include_metrics {
        tweet_fields.push("public_metrics".to_string());
    }

    let options = SearchTweetsOptions {
        max_results: Some(max_results),
        tweet_fields,
        expansions: fields(&["author_id"]),
        user_fields: fields(&["username", "name", "verified"]),
        next_token: args.next_token.clone(),
        start_time: args.start_time,
        end_time: args.end_time,
        ..Default::default()
    };

    info!(query = %args.query, max_results, "Searching recent tweets");
    let result = ctx
        .client
        .search_tweets(&args.query, &options)
        .await
        .context("searching tweets")?;

    if ctx.format == OutputFormat::Json {
        return write_json(out, &result);
    }

    if result.entities().is_empty() {
        writeln!(out, "No tweets found matching your query.")?;
        return Ok(());
    }

    writeln!(out, "\nFound {} tweets:\n", result_count(&result))?;
    writeln!(out, "{}", result.to_text())?;
    write_pagination_hint(out, result.next_token())
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

    fn args(query: &str, max_results: i64) -> SearchArgs {
        SearchArgs {
            query: query.to_string(),
            max_results,
            include_metrics: false,
            next_token: None,
            start_time: None,
            end_time: None,
        }
    }

    #[tokio::test]
    async fn test_search_renders_authors_and_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tweets/search/recent"))
            .and(query_param("query", "rust"))
            .and(query_param("max_results", "100"))
            .and(query_param("expansions", "author_id"))
            .and(query_param("tweet.fields", "created_at,author_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "1", "text": "Rust 2024 is out", "author_id": "u1" }],
                "includes": { "users": [{ "id": "u1", "name": "Rust", "username": "rustlang" }] },
                "meta": { "result_count": 1, "next_token": "page2" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut buf = Vec::new();
        run(&ctx, &args("rust", 500), &mut buf).await.unwrap();

        let out = output(buf);
        assert!(out.contains("Found 1 tweets:"));
        assert!(out.contains("[1/1]\n@rustlang (Rust)"));
        assert!(out.contains("--next-token page2"));
    }

    #[tokio::test]
    async fn test_search_metrics_flag_and_clamp_floor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tweets/search/recent"))
            .and(query_param("max_results", "10"))
            .and(query_param("tweet.fields", "created_at,author_id,public_metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": { "result_count": 0 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut search = args("nothing", 1);
        search.include_metrics = true;
        let mut buf = Vec::new();
        run(&ctx, &search, &mut buf).await.unwrap();

        assert_eq!(output(buf), "No tweets found matching your query.\n");
    }

    #[tokio::test]
    async fn test_search_json_is_raw_response() {
        let server = MockServer::start().await;
        let body = json!({
            "data": [{ "id": "1", "text": "hi" }],
            "meta": { "result_count": 1 }
        });
        Mock::given(method("GET"))
            .and(path("/tweets/search/recent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Json);
        let mut buf = Vec::new();
        run(&ctx, &args("hi", 10), &mut buf).await.unwrap();

        let printed: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(printed, body);
    }
}
