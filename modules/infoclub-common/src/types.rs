use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// --- Table names and conflict keys ---

pub const POSTS_TABLE: &str = "posts";
pub const YOUTUBE_TRENDS_TABLE: &str = "youtube_trends";
pub const GOOGLE_TRENDS_TABLE: &str = "google_trends";
pub const WEEKLY_REPORTS_TABLE: &str = "weekly_reports";

pub const POST_CONFLICT_KEY: &str = "post_id";
pub const VIDEO_CONFLICT_KEY: &str = "video_id";

// --- Rows written by the crawlers ---

/// A validated Reddit post, keyed by `post_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRow {
    pub post_id: String,
    pub subreddit: String,
    pub title: String,
    pub content: String,
    pub url: String,
    pub author: String,
    pub upvotes: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub crawled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
}

/// One video from a regional "most popular" chart, keyed by `video_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRow {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub category: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub region: String,
    pub thumbnail_url: String,
    pub trending_date: NaiveDate,
    pub crawled_at: DateTime<Utc>,
}

/// Search interest for a keyword on a given day and region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendKeywordRow {
    pub keyword: String,
    pub region: String,
    pub traffic_volume: String,
    pub related_topics: String,
    pub trending_date: NaiveDate,
    pub crawled_at: DateTime<Utc>,
}

/// Generated weekly report. `hot_keywords` and `sources_summary` are JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReportRow {
    pub week_start: NaiveDate,
    pub report_content: String,
    pub hot_keywords: String,
    pub sources_summary: String,
    pub created_at: DateTime<Utc>,
}

// --- Projections read back for analysis ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub ai_insight: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub traffic_volume: String,
}

/// Counts stored alongside each weekly report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcesSummary {
    pub reddit_count: usize,
    pub youtube_count: usize,
    pub google_count: usize,
    pub analysis_date: DateTime<Utc>,
}
