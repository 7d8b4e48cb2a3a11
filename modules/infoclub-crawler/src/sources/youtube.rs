// YouTube Data API v3: regional "most popular" chart.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use infoclub_common::types::VideoRow;

use crate::traits::VideoChart;

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Korean display names for YouTube video category ids.
pub const CATEGORY_NAMES: &[(&str, &str)] = &[
    ("1", "영화/애니메이션"),
    ("2", "자동차"),
    ("10", "음악"),
    ("15", "동물"),
    ("17", "스포츠"),
    ("19", "여행/이벤트"),
    ("20", "게임"),
    ("22", "일상/블로그"),
    ("23", "코미디"),
    ("24", "엔터테인먼트"),
    ("25", "뉴스/정치"),
    ("26", "스타일"),
    ("27", "교육"),
    ("28", "과학/기술"),
    ("29", "비영리/사회운동"),
];

pub fn category_name(id: &str) -> String {
    CATEGORY_NAMES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("기타({id})"))
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    category_id: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// The API reports counts as decimal strings and omits hidden ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

fn parse_count(value: &Option<String>) -> u64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

impl VideoItem {
    fn into_row(self, region: &str, today: NaiveDate, now: DateTime<Utc>) -> VideoRow {
        let category_id = self.snippet.category_id.as_deref().unwrap_or("0");
        VideoRow {
            category: category_name(category_id),
            view_count: parse_count(&self.statistics.view_count),
            like_count: parse_count(&self.statistics.like_count),
            comment_count: parse_count(&self.statistics.comment_count),
            thumbnail_url: self
                .snippet
                .thumbnails
                .high
                .map(|t| t.url)
                .unwrap_or_default(),
            video_id: self.id,
            title: self.snippet.title,
            channel_title: self.snippet.channel_title,
            region: region.to_string(),
            trending_date: today,
            crawled_at: now,
        }
    }
}

/// Map a `videos.list` response body into rows for one region.
pub fn parse_chart(
    body: &str,
    region: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Vec<VideoRow>> {
    let response: VideoListResponse =
        serde_json::from_str(body).context("Failed to parse YouTube chart response")?;
    Ok(response
        .items
        .into_iter()
        .map(|item| item.into_row(region, today, now))
        .collect())
}

// --- Client ---

pub struct YoutubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YoutubeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl VideoChart for YoutubeClient {
    async fn most_popular(&self, region: &str, max_results: u32) -> Result<Vec<VideoRow>> {
        let max_results = max_results.to_string();
        let resp = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,statistics"),
                ("chart", "mostPopular"),
                ("regionCode", region),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("YouTube chart request failed")?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read YouTube response")?;
        if !status.is_success() {
            let preview: String = body.chars().take(200).collect();
            bail!("YouTube API error ({status}) for {region}: {preview}");
        }

        let videos = parse_chart(&body, region, Local::now().date_naive(), Utc::now())?;
        info!(region, videos = videos.len(), "youtube: chart fetched");
        Ok(videos)
    }
}
