// Trait abstractions for the crawl cycles.
//
// FeedSource, VideoChart and TrendsSource wrap the three public content APIs.
// RecordStore wraps the Supabase tables every cycle writes to and the analyzer
// reads back from.
//
// The `testing` module provides in-memory versions of all four so the cycles
// can be exercised without network access or a database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use infoclub_common::types::{
    PostRow, PostSummary, TrendKeywordRow, TrendSummary, VideoRow, VideoSummary, WeeklyReportRow,
};

use crate::sources::google_trends::InterestTimeline;

// ---------------------------------------------------------------------------
// FeedSource: subreddit RSS
// ---------------------------------------------------------------------------

/// One entry of a subreddit's "hot" feed, before cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
    /// Raw HTML body as it appears in the feed.
    pub content_html: String,
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the current "hot" listing of a subreddit.
    async fn hot_entries(&self, subreddit: &str) -> Result<Vec<FeedEntry>>;
}

// ---------------------------------------------------------------------------
// VideoChart: YouTube "most popular" chart
// ---------------------------------------------------------------------------

#[async_trait]
pub trait VideoChart: Send + Sync {
    /// Fetch up to `max_results` videos from a region's popularity chart.
    async fn most_popular(&self, region: &str, max_results: u32) -> Result<Vec<VideoRow>>;
}

// ---------------------------------------------------------------------------
// TrendsSource: Google Trends
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TrendsSource: Send + Sync {
    /// Interest-over-time samples for up to five keywords compared together.
    async fn interest_over_time(&self, keywords: &[&str], geo: &str) -> Result<InterestTimeline>;

    /// Top related queries per keyword, in rank order.
    async fn related_queries(
        &self,
        keywords: &[&str],
        geo: &str,
    ) -> Result<Vec<(String, Vec<String>)>>;
}

// ---------------------------------------------------------------------------
// RecordStore: Supabase tables
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or update a post keyed by `post_id`.
    async fn upsert_post(&self, post: &PostRow) -> Result<()>;

    /// Insert or update a video keyed by `video_id`.
    async fn upsert_video(&self, video: &VideoRow) -> Result<()>;

    /// Update the existing row for (keyword, trending_date, region) or insert a new one.
    async fn save_trend_keyword(&self, row: &TrendKeywordRow) -> Result<()>;

    async fn save_weekly_report(&self, report: &WeeklyReportRow) -> Result<()>;

    /// Posts crawled at or after `since`, newest first.
    async fn recent_posts(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<PostSummary>>;

    /// Videos trending on or after `since`, most viewed first.
    async fn recent_videos(&self, since: NaiveDate, limit: usize) -> Result<Vec<VideoSummary>>;

    /// Keywords trending on or after `since`, most recently crawled first.
    async fn recent_trends(&self, since: NaiveDate, limit: usize) -> Result<Vec<TrendSummary>>;

    /// Delete every stored post.
    async fn clear_posts(&self) -> Result<()>;
}
