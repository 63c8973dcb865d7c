//! Demonstration run for both miners: resolve a couple of well-known pages,
//! report their lengths and recent revisions, and (when credentials are
//! configured) the latest post on a timeline. This is an explicit entry
//! point, not a durable CLI; any failure terminates with the error reported.

use anyhow::{Context, Result};
use quarry_common::observability::{LogConfig, init_logging};
use quarry_config::{QuarryConfig, QuarryConfigLoader};
use quarry_social::{Credentials, TimelineApi};
use quarry_wiki::WikiApi;
use std::num::NonZeroUsize;
use std::path::Path;

const CONFIG_FILE: &str = "quarry.yaml";

fn main() -> Result<()> {
    let mut loader = QuarryConfigLoader::new();
    if Path::new(CONFIG_FILE).exists() {
        loader = loader.with_file(CONFIG_FILE);
    }
    let cfg: QuarryConfig = loader.load()?;

    init_logging(LogConfig::default())?;

    run_wiki_demo(&cfg)?;
    run_social_demo(&cfg)?;

    Ok(())
}

fn run_wiki_demo(cfg: &QuarryConfig) -> Result<()> {
    let wiki = WikiApi::with_endpoint(&cfg.wiki.endpoint)?;

    let titles = ["Albert Einstein", "Germany"];
    println!("Titles: {titles:?}");

    let ids = wiki.resolve_ids(&titles)?;
    println!("Page ids: {ids:?}");

    let lengths = wiki.page_lengths(&ids)?;
    println!("Page lengths: {lengths:?}");

    let first = *ids.first().context("no page ids resolved")?;
    let n = NonZeroUsize::new(3).expect("3 is nonzero");
    let revision_ids = wiki.recent_revision_ids(first, n)?;
    println!("{n} most recent revision ids of page {first}: {revision_ids:?}");

    let newest = revision_ids[0];
    let contents = wiki.revision_content(&revision_ids[..1])?;
    println!("Revision {newest} is {} bytes of wikitext", contents[0].len());

    Ok(())
}

fn run_social_demo(cfg: &QuarryConfig) -> Result<()> {
    let Some(social) = &cfg.social else {
        tracing::info!("no social credentials configured, skipping timeline demo");
        return Ok(());
    };

    let creds = Credentials {
        consumer_key: social.consumer_key.clone(),
        consumer_secret: social.consumer_secret.clone(),
        access_token: social.access_token.clone(),
        access_token_secret: social.access_token_secret.clone(),
    };
    let timeline = TimelineApi::with_endpoint(creds, &social.endpoint)?;

    let text = timeline.latest_post_text(&social.screen_name)?;
    println!("Latest post by @{}: {text}", social.screen_name);

    Ok(())
}
