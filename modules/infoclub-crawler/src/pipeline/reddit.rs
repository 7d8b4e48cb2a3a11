use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use infoclub_common::types::PostRow;
use infoclub_common::{clean_html, parse_post_id, validate};

use crate::insight::PostInsighter;
use crate::pipeline::stats::CrawlStats;
use crate::traits::{FeedEntry, FeedSource, RecordStore};

/// Creator-focused subreddits crawled every cycle, in order.
pub const TARGET_SUBREDDITS: &[&str] = &[
    "NewTubers",
    "YouTubers",
    "PartneredYoutube",
    "smallyoutubers",
    "youtube",
];

const DEFAULT_ITEM_DELAY: Duration = Duration::from_millis(500);
const UNKNOWN_AUTHOR: &str = "unknown";

/// Fetch → clean → validate → (insight) → upsert for each subreddit.
pub struct RedditCrawler {
    feed: Box<dyn FeedSource>,
    store: Arc<dyn RecordStore>,
    insighter: Option<PostInsighter>,
    subreddits: Vec<String>,
    item_delay: Duration,
}

impl RedditCrawler {
    pub fn new(feed: Box<dyn FeedSource>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            feed,
            store,
            insighter: None,
            subreddits: TARGET_SUBREDDITS.iter().map(|s| s.to_string()).collect(),
            item_delay: DEFAULT_ITEM_DELAY,
        }
    }

    pub fn with_insighter(mut self, insighter: PostInsighter) -> Self {
        self.insighter = Some(insighter);
        self
    }

    pub fn with_subreddits(mut self, subreddits: &[&str]) -> Self {
        self.subreddits = subreddits.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Pause after every stored post.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    pub async fn run(&self) -> CrawlStats {
        let mut stats = CrawlStats::new("Reddit");
        info!(subreddits = self.subreddits.len(), "Reddit crawl starting");

        for subreddit in &self.subreddits {
            let entries = match self.feed.hot_entries(subreddit).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(subreddit = subreddit.as_str(), error = %e, "Failed to fetch subreddit feed");
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            for entry in entries {
                stats.items_fetched += 1;
                self.process_entry(subreddit, entry, &mut stats).await;
            }
        }

        info!(
            stored = stats.items_stored,
            rejected = stats.items_rejected,
            "Reddit crawl finished"
        );
        stats
    }

    async fn process_entry(&self, subreddit: &str, entry: FeedEntry, stats: &mut CrawlStats) {
        let content = clean_html(&entry.content_html);
        let verdict = validate(&entry.title, &content);
        if !verdict.accepted {
            debug!(subreddit, title = entry.title.as_str(), reason = verdict.reason.as_str(), "Skipping post");
            stats.items_rejected += 1;
            return;
        }

        let ai_insight = match &self.insighter {
            Some(insighter) => insighter.generate(&entry.title, &content, subreddit).await,
            None => None,
        };
        if ai_insight.is_some() {
            stats.insights_generated += 1;
        }

        let post = build_post(subreddit, entry, content, ai_insight);
        match self.store.upsert_post(&post).await {
            Ok(()) => stats.items_stored += 1,
            Err(e) => {
                warn!(post_id = post.post_id.as_str(), error = %e, "Failed to save post");
                stats.store_failures += 1;
            }
        }

        if !self.item_delay.is_zero() {
            tokio::time::sleep(self.item_delay).await;
        }
    }
}

fn build_post(
    subreddit: &str,
    entry: FeedEntry,
    content: String,
    ai_insight: Option<String>,
) -> PostRow {
    let now = Utc::now();
    PostRow {
        post_id: parse_post_id(&entry.link),
        subreddit: subreddit.to_string(),
        title: entry.title,
        content,
        url: entry.link,
        author: entry.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        upvotes: 0,
        comment_count: 0,
        created_at: entry.published.unwrap_or(now),
        crawled_at: now,
        ai_insight,
    }
}
