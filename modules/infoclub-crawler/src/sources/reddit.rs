// Subreddit "hot" listings via the public RSS endpoint.
// No OAuth; Reddit only asks for a browser-like User-Agent.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::traits::{FeedEntry, FeedSource};

const REDDIT_URL: &str = "https://www.reddit.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) InfoClub/1.0";
const FEED_LIMIT: u32 = 100;

pub struct RedditFeed {
    client: reqwest::Client,
    base_url: String,
}

impl RedditFeed {
    pub fn new() -> Self {
        Self::with_base_url(REDDIT_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn feed_url(&self, subreddit: &str) -> String {
        format!(
            "{}/r/{}/hot/.rss?limit={}",
            self.base_url, subreddit, FEED_LIMIT
        )
    }
}

impl Default for RedditFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for RedditFeed {
    async fn hot_entries(&self, subreddit: &str) -> Result<Vec<FeedEntry>> {
        let url = self.feed_url(subreddit);
        let resp = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context("Reddit RSS fetch failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Reddit RSS returned {status} for r/{subreddit}");
        }

        let bytes = resp.bytes().await.context("Failed to read Reddit RSS body")?;
        let entries = parse_feed(&bytes)?;
        info!(subreddit, entries = entries.len(), "reddit: feed parsed");
        Ok(entries)
    }
}

/// Parse an Atom/RSS document into feed entries, keeping the raw HTML body.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = feed_rs::parser::parse(bytes).context("Failed to parse Reddit feed")?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let content_html = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content))
                .unwrap_or_default();

            FeedEntry {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default(),
                author: entry.authors.first().map(|a| a.name.clone()),
                published: entry.published.or(entry.updated),
                content_html,
            }
        })
        .collect();

    Ok(entries)
}
