use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::pipeline::stats::CrawlStats;
use crate::traits::{RecordStore, VideoChart};

pub const TARGET_REGIONS: &[&str] = &["KR", "US"];
pub const MAX_RESULTS_PER_REGION: u32 = 25;

/// Fetches every region's chart concurrently, then upserts the videos in region order.
pub struct YoutubeCrawler {
    chart: Box<dyn VideoChart>,
    store: Arc<dyn RecordStore>,
    regions: Vec<String>,
}

impl YoutubeCrawler {
    pub fn new(chart: Box<dyn VideoChart>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            chart,
            store,
            regions: TARGET_REGIONS.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn with_regions(mut self, regions: &[&str]) -> Self {
        self.regions = regions.iter().map(|r| r.to_string()).collect();
        self
    }

    pub async fn run(&self) -> CrawlStats {
        let mut stats = CrawlStats::new("YouTube");
        info!(regions = self.regions.len(), "YouTube crawl starting");

        let fetches = self
            .regions
            .iter()
            .map(|region| self.chart.most_popular(region, MAX_RESULTS_PER_REGION));
        let results = join_all(fetches).await;

        let mut videos = Vec::new();
        for (region, result) in self.regions.iter().zip(results) {
            match result {
                Ok(mut chart) => {
                    info!(region = region.as_str(), videos = chart.len(), "Fetched trending chart");
                    videos.append(&mut chart);
                }
                Err(e) => {
                    warn!(region = region.as_str(), error = %e, "Failed to fetch trending chart");
                    stats.fetch_failures += 1;
                }
            }
        }
        stats.items_fetched = videos.len() as u32;

        if videos.is_empty() {
            warn!("No trending videos collected");
            return stats;
        }

        for video in &videos {
            match self.store.upsert_video(video).await {
                Ok(()) => stats.items_stored += 1,
                Err(e) => {
                    warn!(video_id = video.video_id.as_str(), error = %e, "Failed to save video");
                    stats.store_failures += 1;
                }
            }
        }

        info!(stored = stats.items_stored, total = videos.len(), "YouTube crawl finished");
        stats
    }
}
