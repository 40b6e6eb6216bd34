use std::io::Write;

use anyhow::{Context as _, Result};
use tracing::info;

use super::{write_json, Context};
use crate::api::options::{fields, GetTweetOptions};
use crate::cli::TweetArgs;
use crate::format::{format_tweet, format_tweet_extras, OutputFormat};

pub async fn run<W: Write>(ctx: &Context, args: &TweetArgs, out: &mut W) -> Result<()> {
    let mut options = GetTweetOptions {
        tweet_fields: fields(&[
            "created_at",
            "public_metrics",
            "context_annotations",
            "source",
            "lang",
            "possibly_sensitive",
            "reply_settings",
        ]),
        ..Default::default()
    };
    if args.include_author {
        options.expansions = fields(&["author_id"]);
        options.user_fields = fields(&["username", "name", "verified", "profile_image_url"]);
    }

    info!(tweet_id = %args.tweet_id, "Fetching tweet");
    let result = ctx
        .client
        .get_tweet(&args.tweet_id, &options)
        .await
        .with_context(|| format!("fetching tweet {}", args.tweet_id))?;

    if ctx.format == OutputFormat::Json {
        return write_json(out, &result);
    }

    let Some(tweet) = &result.data else {
        writeln!(out, "Tweet not found.")?;
        return Ok(());
    };

    let author = tweet
        .author_id
        .as_deref()
        .and_then(|id| result.includes.as_ref()?.user(id))
        .or_else(|| result.included_user());

    writeln!(out, "\nTweet Details:\n")?;
    writeln!(out, "{}", format_tweet(tweet, author))?;
    if let Some(extras) = format_tweet_extras(tweet) {
        writeln!(out, "\n{extras}")?;
    }
    Ok(())
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

    #[tokio::test]
    async fn test_tweet_with_author() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tweets/20"))
            .and(query_param("expansions", "author_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "id": "20",
                    "text": "just setting up my twttr",
                    "author_id": "12",
                    "lang": "en",
                    "reply_settings": "everyone"
                },
                "includes": { "users": [{ "id": "12", "name": "jack", "username": "jack" }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut buf = Vec::new();
        let args = TweetArgs {
            tweet_id: "20".into(),
            include_author: true,
        };
        run(&ctx, &args, &mut buf).await.unwrap();

        let out = output(buf);
        assert!(out.contains("@jack (jack)"));
        assert!(out.contains("just setting up my twttr"));
        assert!(out.contains("🔒 Reply Settings: everyone"));
        assert!(out.contains("🌐 Language: en"));
    }

    #[tokio::test]
    async fn test_tweet_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tweets/404"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "detail": "Could not find tweet with id: [404].", "resource_type": "tweet" }]
            })))
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut buf = Vec::new();
        let args = TweetArgs {
            tweet_id: "404".into(),
            include_author: false,
        };
        run(&ctx, &args, &mut buf).await.unwrap();

        assert_eq!(output(buf), "Tweet not found.\n");
    }

    #[tokio::test]
    async fn test_http_error_propagates_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tweets/1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let ctx = context(&server, OutputFormat::Table);
        let mut buf = Vec::new();
        let args = TweetArgs {
            tweet_id: "1".into(),
            include_author: false,
        };
        let err = run(&ctx, &args, &mut buf).await.unwrap_err();

        let api_err = err.downcast_ref::<crate::error::XApiError>().unwrap();
        assert_eq!(api_err.status(), Some(401));
        assert!(buf.is_empty());
    }
}
