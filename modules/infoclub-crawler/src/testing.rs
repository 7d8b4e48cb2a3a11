// Test doubles for the crawl cycles and the analyzer.
//
// One double per trait boundary:
// - MemoryStore (RecordStore): stateful in-memory tables with upsert semantics
// - StubFeed (FeedSource): subreddit → entries, Err for unregistered subreddits
// - StubChart (VideoChart): region → videos, Err for unregistered regions
// - StubTrends (TrendsSource): keyword group → timeline, optional related queries
// - ScriptedChat (ChatModel): fixed reply or fixed failure, records every call
//
// Plus builders for feed entries and video rows.

use std::collections::HashMap;
use std::sync::Mutex;

use ai_client::{ChatModel, ChatOptions, Message};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use infoclub_common::types::{
    PostRow, PostSummary, TrendKeywordRow, TrendSummary, VideoRow, VideoSummary, WeeklyReportRow,
};

use crate::sources::google_trends::InterestTimeline;
use crate::traits::{FeedEntry, FeedSource, RecordStore, TrendsSource, VideoChart};

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory tables. Upserts replace rows with the same key.
/// `failing_writes()` makes every write return `Err`.
#[derive(Default)]
pub struct MemoryStore {
    posts: Mutex<Vec<PostRow>>,
    videos: Mutex<Vec<VideoRow>>,
    trends: Mutex<Vec<TrendKeywordRow>>,
    reports: Mutex<Vec<WeeklyReportRow>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn with_posts(self, posts: Vec<PostRow>) -> Self {
        *self.posts.lock().unwrap() = posts;
        self
    }

    pub fn with_videos(self, videos: Vec<VideoRow>) -> Self {
        *self.videos.lock().unwrap() = videos;
        self
    }

    pub fn with_trends(self, trends: Vec<TrendKeywordRow>) -> Self {
        *self.trends.lock().unwrap() = trends;
        self
    }

    pub fn posts(&self) -> Vec<PostRow> {
        self.posts.lock().unwrap().clone()
    }

    pub fn videos(&self) -> Vec<VideoRow> {
        self.videos.lock().unwrap().clone()
    }

    pub fn trends(&self) -> Vec<TrendKeywordRow> {
        self.trends.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<WeeklyReportRow> {
        self.reports.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            bail!("store unavailable");
        }
        Ok(())
    }
}

fn upsert_by<T: Clone>(rows: &mut Vec<T>, row: &T, same_key: impl Fn(&T) -> bool) {
    match rows.iter_mut().find(|r| same_key(r)) {
        Some(existing) => *existing = row.clone(),
        None => rows.push(row.clone()),
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert_post(&self, post: &PostRow) -> Result<()> {
        self.check_writable()?;
        let mut posts = self.posts.lock().unwrap();
        upsert_by(&mut posts, post, |p| p.post_id == post.post_id);
        Ok(())
    }

    async fn upsert_video(&self, video: &VideoRow) -> Result<()> {
        self.check_writable()?;
        let mut videos = self.videos.lock().unwrap();
        upsert_by(&mut videos, video, |v| v.video_id == video.video_id);
        Ok(())
    }

    async fn save_trend_keyword(&self, row: &TrendKeywordRow) -> Result<()> {
        self.check_writable()?;
        let mut trends = self.trends.lock().unwrap();
        upsert_by(&mut trends, row, |t| {
            t.keyword == row.keyword
                && t.trending_date == row.trending_date
                && t.region == row.region
        });
        Ok(())
    }

    async fn save_weekly_report(&self, report: &WeeklyReportRow) -> Result<()> {
        self.check_writable()?;
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    async fn recent_posts(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<PostSummary>> {
        let mut posts: Vec<PostRow> = self
            .posts()
            .into_iter()
            .filter(|p| p.crawled_at >= since)
            .collect();
        posts.sort_by(|a, b| b.crawled_at.cmp(&a.crawled_at));
        Ok(posts
            .into_iter()
            .take(limit)
            .map(|p| PostSummary {
                title: p.title,
                subreddit: p.subreddit,
                ai_insight: p.ai_insight,
            })
            .collect())
    }

    async fn recent_videos(&self, since: NaiveDate, limit: usize) -> Result<Vec<VideoSummary>> {
        let mut videos: Vec<VideoRow> = self
            .videos()
            .into_iter()
            .filter(|v| v.trending_date >= since)
            .collect();
        videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        Ok(videos
            .into_iter()
            .take(limit)
            .map(|v| VideoSummary {
                title: v.title,
                channel_title: v.channel_title,
                category: v.category,
                view_count: v.view_count,
                region: v.region,
            })
            .collect())
    }

    async fn recent_trends(&self, since: NaiveDate, limit: usize) -> Result<Vec<TrendSummary>> {
        let mut trends: Vec<TrendKeywordRow> = self
            .trends()
            .into_iter()
            .filter(|t| t.trending_date >= since)
            .collect();
        trends.sort_by(|a, b| b.crawled_at.cmp(&a.crawled_at));
        Ok(trends
            .into_iter()
            .take(limit)
            .map(|t| TrendSummary {
                keyword: t.keyword,
                region: t.region,
                traffic_volume: t.traffic_volume,
            })
            .collect())
    }

    async fn clear_posts(&self) -> Result<()> {
        self.check_writable()?;
        self.posts.lock().unwrap().clear();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StubFeed
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StubFeed {
    feeds: HashMap<String, Vec<FeedEntry>>,
}

impl StubFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_subreddit(mut self, subreddit: &str, entries: Vec<FeedEntry>) -> Self {
        self.feeds.insert(subreddit.to_string(), entries);
        self
    }
}

#[async_trait]
impl FeedSource for StubFeed {
    async fn hot_entries(&self, subreddit: &str) -> Result<Vec<FeedEntry>> {
        self.feeds
            .get(subreddit)
            .cloned()
            .ok_or_else(|| anyhow!("StubFeed: no feed for r/{subreddit}"))
    }
}

// ---------------------------------------------------------------------------
// StubChart
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StubChart {
    charts: HashMap<String, Vec<VideoRow>>,
}

impl StubChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_region(mut self, region: &str, videos: Vec<VideoRow>) -> Self {
        self.charts.insert(region.to_string(), videos);
        self
    }
}

#[async_trait]
impl VideoChart for StubChart {
    async fn most_popular(&self, region: &str, max_results: u32) -> Result<Vec<VideoRow>> {
        let videos = self
            .charts
            .get(region)
            .ok_or_else(|| anyhow!("StubChart: no chart for {region}"))?;
        Ok(videos.iter().take(max_results as usize).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// StubTrends
// ---------------------------------------------------------------------------

/// Timelines keyed by the comma-joined keyword group.
#[derive(Default)]
pub struct StubTrends {
    timelines: HashMap<String, InterestTimeline>,
    related: Option<Vec<(String, Vec<String>)>>,
}

impl StubTrends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register samples for a keyword group, one series per keyword.
    pub fn on_group(mut self, keywords: &[&str], samples: &[&[u32]]) -> Self {
        let series = keywords
            .iter()
            .zip(samples)
            .map(|(k, s)| (k.to_string(), s.to_vec()))
            .collect();
        self.timelines
            .insert(keywords.join(","), InterestTimeline::new(series));
        self
    }

    pub fn with_related(mut self, related: Vec<(String, Vec<String>)>) -> Self {
        self.related = Some(related);
        self
    }
}

#[async_trait]
impl TrendsSource for StubTrends {
    async fn interest_over_time(&self, keywords: &[&str], _geo: &str) -> Result<InterestTimeline> {
        self.timelines
            .get(&keywords.join(","))
            .cloned()
            .ok_or_else(|| anyhow!("StubTrends: no timeline for {}", keywords.join(",")))
    }

    async fn related_queries(
        &self,
        _keywords: &[&str],
        _geo: &str,
    ) -> Result<Vec<(String, Vec<String>)>> {
        self.related
            .clone()
            .ok_or_else(|| anyhow!("StubTrends: related queries not registered"))
    }
}

// ---------------------------------------------------------------------------
// ScriptedChat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl RecordedCall {
    /// Content of the last user message.
    pub fn user_prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ai_client::MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

pub struct ScriptedChat {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn chat(&self, messages: Vec<Message>, options: ChatOptions) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { messages, options });
        self.reply.clone().map_err(|e| anyhow!(e))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A feed entry with a Reddit permalink for `id`.
pub fn feed_entry(id: &str, title: &str, body_html: &str) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        link: format!("https://www.reddit.com/r/NewTubers/comments/{id}/slug/"),
        author: Some("/u/tester".to_string()),
        published: Some(Utc::now()),
        content_html: body_html.to_string(),
    }
}

/// Body text long and varied enough to pass validation.
pub fn good_body() -> String {
    "Quick question: my Shorts get 2-3K views, but long videos stall at 140. Why? Maybe it is the hook (first 5s) or weak CTAs; I edit in DaVinci & export at 4K/60fps."
        .to_string()
}

pub fn video(id: &str, region: &str, views: u64) -> VideoRow {
    VideoRow {
        video_id: id.to_string(),
        title: format!("video {id}"),
        channel_title: "channel".to_string(),
        category: "게임".to_string(),
        view_count: views,
        like_count: 0,
        comment_count: 0,
        region: region.to_string(),
        thumbnail_url: String::new(),
        trending_date: chrono::Local::now().date_naive(),
        crawled_at: Utc::now(),
    }
}
