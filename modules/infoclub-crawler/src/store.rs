use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use infoclub_common::types::{
    PostRow, PostSummary, TrendKeywordRow, TrendSummary, VideoRow, VideoSummary, WeeklyReportRow,
    GOOGLE_TRENDS_TABLE, POSTS_TABLE, POST_CONFLICT_KEY, VIDEO_CONFLICT_KEY,
    WEEKLY_REPORTS_TABLE, YOUTUBE_TRENDS_TABLE,
};
use infoclub_common::StorageCredentials;
use supabase_client::{Query, SupabaseClient};

use crate::traits::RecordStore;

/// `post_id` filter value no real post carries; PostgREST needs some filter on DELETE.
const CLEAR_ALL_SENTINEL: &str = "dummy_val";

/// Primary key of an existing row. Supabase tables use either bigint or uuid ids.
#[derive(Debug, Deserialize)]
struct RowId {
    id: serde_json::Value,
}

impl RowId {
    fn as_filter_value(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// [`RecordStore`] backed by the Supabase REST API.
pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub fn connect(credentials: &StorageCredentials) -> Self {
        Self::new(SupabaseClient::new(&credentials.url, credentials.key.clone()))
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn upsert_post(&self, post: &PostRow) -> Result<()> {
        self.client
            .upsert(POSTS_TABLE, Some(POST_CONFLICT_KEY), post)
            .await?;
        Ok(())
    }

    async fn upsert_video(&self, video: &VideoRow) -> Result<()> {
        self.client
            .upsert(YOUTUBE_TRENDS_TABLE, Some(VIDEO_CONFLICT_KEY), video)
            .await?;
        Ok(())
    }

    async fn save_trend_keyword(&self, row: &TrendKeywordRow) -> Result<()> {
        let lookup = Query::new()
            .select("id")
            .eq("keyword", &row.keyword)
            .eq("trending_date", row.trending_date)
            .eq("region", &row.region);
        let existing: Vec<RowId> = self.client.select(GOOGLE_TRENDS_TABLE, &lookup).await?;

        match existing.first() {
            Some(found) => {
                let filter = Query::new().eq("id", found.as_filter_value());
                self.client.update(GOOGLE_TRENDS_TABLE, &filter, row).await?;
                debug!(keyword = row.keyword.as_str(), "Updated trend keyword");
            }
            None => {
                self.client.insert(GOOGLE_TRENDS_TABLE, row).await?;
                debug!(keyword = row.keyword.as_str(), "Inserted trend keyword");
            }
        }
        Ok(())
    }

    async fn save_weekly_report(&self, report: &WeeklyReportRow) -> Result<()> {
        self.client.insert(WEEKLY_REPORTS_TABLE, report).await?;
        Ok(())
    }

    async fn recent_posts(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<PostSummary>> {
        let query = Query::new()
            .select("title,subreddit,ai_insight")
            .gte("crawled_at", since.to_rfc3339())
            .order_desc("crawled_at")
            .limit(limit);
        Ok(self.client.select(POSTS_TABLE, &query).await?)
    }

    async fn recent_videos(&self, since: NaiveDate, limit: usize) -> Result<Vec<VideoSummary>> {
        let query = Query::new()
            .select("title,channel_title,category,view_count,region")
            .gte("trending_date", since)
            .order_desc("view_count")
            .limit(limit);
        Ok(self.client.select(YOUTUBE_TRENDS_TABLE, &query).await?)
    }

    async fn recent_trends(&self, since: NaiveDate, limit: usize) -> Result<Vec<TrendSummary>> {
        let query = Query::new()
            .select("keyword,region,traffic_volume")
            .gte("trending_date", since)
            .order_desc("crawled_at")
            .limit(limit);
        Ok(self.client.select(GOOGLE_TRENDS_TABLE, &query).await?)
    }

    async fn clear_posts(&self) -> Result<()> {
        let filter = Query::new().neq(POST_CONFLICT_KEY, CLEAR_ALL_SENTINEL);
        self.client.delete(POSTS_TABLE, &filter).await?;
        Ok(())
    }
}
