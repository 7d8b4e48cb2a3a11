use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{info, warn};

use infoclub_common::types::TrendKeywordRow;

use crate::pipeline::stats::CrawlStats;
use crate::sources::google_trends::{InterestTimeline, KeywordInterest};
use crate::traits::{RecordStore, TrendsSource};

/// Keyword groups compared together, one interest request per group.
pub const SEED_KEYWORDS: &[(&str, &[&str])] = &[
    ("콘텐츠 트렌드", &["유튜브 쇼츠", "브이로그", "먹방", "ASMR", "언박싱"]),
    ("플랫폼 트렌드", &["유튜브", "틱톡", "인스타 릴스", "트위치", "AI 영상"]),
    ("크리에이터 도구", &["영상 편집", "썸네일", "자막 생성", "AI 더빙", "SEO"]),
    ("인기 주제", &["게임", "K-POP", "여행 브이로그", "재테크", "자기계발"]),
];

/// Seeds whose related queries are stored as keywords of their own.
pub const RELATED_SEEDS: &[&str] = &["유튜브", "쇼츠", "AI"];

/// Related queries stored per seed.
const RELATED_PER_SEED: usize = 5;
const TARGET_GEO: &str = "KR";
const DEFAULT_GROUP_DELAY: Duration = Duration::from_secs(2);
const PREVIEW_ROWS: usize = 10;

pub struct TrendsCrawler {
    source: Box<dyn TrendsSource>,
    store: Arc<dyn RecordStore>,
    group_delay: Duration,
}

impl TrendsCrawler {
    pub fn new(source: Box<dyn TrendsSource>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            source,
            store,
            group_delay: DEFAULT_GROUP_DELAY,
        }
    }

    /// Pause between keyword groups.
    pub fn with_group_delay(mut self, delay: Duration) -> Self {
        self.group_delay = delay;
        self
    }

    pub async fn run(&self) -> CrawlStats {
        let mut stats = CrawlStats::new("Google Trends");
        let today = Local::now().date_naive();
        let now = Utc::now();
        let mut rows = Vec::new();

        for &(category, keywords) in SEED_KEYWORDS {
            info!(category, "Analyzing keyword group");
            match self.source.interest_over_time(keywords, TARGET_GEO).await {
                Ok(timeline) if timeline.is_empty() => {
                    warn!(category, "No interest data for keyword group");
                }
                Ok(timeline) => {
                    let group = interest_rows(category, keywords, &timeline, TARGET_GEO, today, now);
                    info!(category, keywords = group.len(), "Keyword group analyzed");
                    rows.extend(group);
                }
                Err(e) => {
                    warn!(category, error = %e, "Failed to fetch keyword interest");
                    stats.fetch_failures += 1;
                }
            }

            if !self.group_delay.is_zero() {
                tokio::time::sleep(self.group_delay).await;
            }
        }

        match self.source.related_queries(RELATED_SEEDS, TARGET_GEO).await {
            Ok(related) => rows.extend(related_rows(&related, TARGET_GEO, today, now)),
            Err(e) => {
                warn!(error = %e, "Failed to fetch related queries");
                stats.fetch_failures += 1;
            }
        }

        stats.items_fetched = rows.len() as u32;
        if rows.is_empty() {
            warn!("No trend keywords collected");
            return stats;
        }

        for row in &rows {
            match self.store.save_trend_keyword(row).await {
                Ok(()) => stats.items_stored += 1,
                Err(e) => {
                    warn!(keyword = row.keyword.as_str(), error = %e, "Failed to save trend keyword");
                    stats.store_failures += 1;
                }
            }
        }

        for row in rows.iter().take(PREVIEW_ROWS) {
            info!(keyword = row.keyword.as_str(), traffic = row.traffic_volume.as_str(), "Collected keyword");
        }
        info!(stored = stats.items_stored, total = rows.len(), "Google Trends crawl finished");
        stats
    }
}

/// One row per keyword that has samples in the timeline, in seed order.
pub fn interest_rows(
    category: &str,
    keywords: &[&str],
    timeline: &InterestTimeline,
    geo: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<TrendKeywordRow> {
    keywords
        .iter()
        .filter_map(|keyword| {
            let interest = KeywordInterest::from_samples(timeline.values(keyword)?)?;
            Some(TrendKeywordRow {
                keyword: keyword.to_string(),
                region: geo.to_string(),
                traffic_volume: interest.traffic_label(),
                related_topics: category.to_string(),
                trending_date: today,
                crawled_at: now,
            })
        })
        .collect()
}

/// The first few related queries of each seed, labelled with the seed.
pub fn related_rows(
    related: &[(String, Vec<String>)],
    geo: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<TrendKeywordRow> {
    related
        .iter()
        .flat_map(|(seed, queries)| {
            queries.iter().take(RELATED_PER_SEED).map(move |query| TrendKeywordRow {
                keyword: query.clone(),
                region: geo.to_string(),
                traffic_volume: format!("'{seed}' 관련 검색어"),
                related_topics: format!("{seed} 관련"),
                trending_date: today,
                crawled_at: now,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn interest_rows_skip_keywords_without_samples() {
        let timeline = InterestTimeline::new(vec![
            ("먹방".into(), vec![40, 50, 90]),
            ("ASMR".into(), vec![]),
        ]);

        let rows = interest_rows("콘텐츠 트렌드", &["먹방", "ASMR", "언박싱"], &timeline, "KR", day(), Utc::now());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].keyword, "먹방");
        assert_eq!(rows[0].traffic_volume, "📈 급상승 (현재:90, 평균:60, 최고:90)");
        assert_eq!(rows[0].related_topics, "콘텐츠 트렌드");
        assert_eq!(rows[0].region, "KR");
    }

    #[test]
    fn related_rows_keep_first_five_per_seed() {
        let related: Vec<(String, Vec<String>)> = vec![
            ("유튜브".to_string(), (0..10).map(|i| format!("q{i}")).collect()),
            ("AI".to_string(), vec!["ai 그림".to_string()]),
        ];

        let rows = related_rows(&related, "KR", day(), Utc::now());

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[4].keyword, "q4");
        assert_eq!(rows[0].traffic_volume, "'유튜브' 관련 검색어");
        assert_eq!(rows[0].related_topics, "유튜브 관련");
        assert_eq!(rows[5].related_topics, "AI 관련");
    }

    #[test]
    fn seed_groups_fit_one_request_each() {
        for &(_, keywords) in SEED_KEYWORDS {
            assert!(keywords.len() <= crate::sources::google_trends::MAX_KEYWORDS);
        }
    }
}
