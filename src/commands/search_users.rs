use std::io::Write;

use anyhow::{Context as _, Result};
use tracing::info;

use super::{clean_username, write_json, Context};
use crate::api::options::{fields, GetUserOptions};
use crate::cli::SearchUsersArgs;
use crate::format::{format_pinned_tweet, format_user_list, OutputFormat};

pub async fn run<W: Write>(ctx: &Context, args: &SearchUsersArgs, out: &mut W) -> Result<()> {
    let username = clean_username(&args.username);

    let mut user_fields = fields(&[
        "created_at",
        "description",
        "profile_image_url",
        "verified",
        "verified_type",
        "url",
        "location",
        "protected",
        "pinned_tweet_id",
    ]);
    if args.include_metrics {
        user_fields.push("public_metrics".to_string());
    }

    let options = GetUserOptions {
        user_fields,
        expansions: fields(&["pinned_tweet_id"]),
        tweet_fields: fields(&["created_at", "public_metrics"]),
    };

    info!(username, by_id = args.by_id, "Looking up user");
    let result = if args.by_id {
        ctx.client.get_user_by_id(username, &options).await
    } else {
        ctx.client.get_user_by_username(username, &options).await
    }
    .with_context(|| format!("looking up user {username}"))?;

    if ctx.format == OutputFormat::Json {
        return write_json(out, &result);
    }

    let Some(user) = &result.data else {
        writeln!(out, "User \"{username}\" not found.")?;
        return Ok(());
    };

    writeln!(out, "\nUser found:\n")?;
    writeln!(out, "{}", format_user_list(std::slice::from_ref(user)))?;

    if let Some(pinned) = result.included_tweet() {
        writeln!(out, "\n{}", format_pinned_tweet(pinned))?;
    }
    Ok(())
}
