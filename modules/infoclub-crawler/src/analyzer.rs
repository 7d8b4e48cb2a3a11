// Weekly cross-platform report.
//
// Reads the last week of stored posts, videos and trend keywords, asks the
// chat model for a fixed-format Korean report, pulls the HOT keyword list out
// of the reply and stores everything in `weekly_reports`.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use tracing::{info, warn};

use ai_client::{truncate_chars, ChatModel, ChatOptions, Message};
use infoclub_common::extract_hot_keywords;
use infoclub_common::types::{
    PostSummary, SourcesSummary, TrendSummary, VideoSummary, WeeklyReportRow,
};

use crate::traits::RecordStore;

const LOOKBACK_DAYS: i64 = 7;
const FETCH_LIMIT: usize = 50;
const REDDIT_PROMPT_ROWS: usize = 20;
const YOUTUBE_PROMPT_ROWS: usize = 20;
const GOOGLE_PROMPT_ROWS: usize = 30;
const EMPTY_SECTION: &str = "데이터 없음";
const REPORT_MAX_TOKENS: u32 = 1500;
const REPORT_TEMPERATURE: f32 = 0.7;
const PREVIEW_CHARS: usize = 800;

const SYSTEM_PROMPT: &str =
    "한국 유튜버를 위한 트렌드 분석가입니다. 데이터 기반으로 실행 가능한 인사이트를 제공합니다.";

const REPORT_FORMAT: &str = "\
아래 형식으로 리포트를 작성해주세요:

# 📊 이번 주 크리에이터 트렌드 리포트

## 🔥 HOT 키워드 TOP 5
(3개 플랫폼에서 공통적으로 나타나는 주제/키워드를 뽑아주세요)

## 📺 유튜브 콘텐츠 제안 3가지
(각 제안마다: 주제, 예상 타이틀, 왜 지금 만들어야 하는지)

## 🌏 해외 vs 한국 트렌드 비교
(미국에서는 뜨고 있지만 한국에서는 아직 안 다룬 주제가 있다면)

## ⚡ 이번 주 액션 아이템
(유튜버가 지금 당장 실행할 수 있는 구체적인 행동 3가지)";

/// One week of stored data from all three sources.
#[derive(Debug, Clone, Default)]
pub struct WeeklyData {
    pub posts: Vec<PostSummary>,
    pub videos: Vec<VideoSummary>,
    pub trends: Vec<TrendSummary>,
}

impl WeeklyData {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.videos.is_empty() && self.trends.is_empty()
    }
}

pub struct TrendAnalyzer {
    store: Arc<dyn RecordStore>,
    model: Arc<dyn ChatModel>,
}

impl TrendAnalyzer {
    pub fn new(store: Arc<dyn RecordStore>, model: Arc<dyn ChatModel>) -> Self {
        Self { store, model }
    }

    /// Run one analysis. `Ok(None)` when there is nothing to analyze.
    pub async fn run(&self) -> Result<Option<WeeklyReportRow>> {
        info!("Cross-platform trend analysis starting");
        let now = Utc::now();
        let today = Local::now().date_naive();

        let data = self.load_week(now, today).await;
        info!(
            reddit = data.posts.len(),
            youtube = data.videos.len(),
            google = data.trends.len(),
            "Loaded weekly data"
        );

        if data.is_empty() {
            warn!("No data to analyze, run the crawlers first");
            return Ok(None);
        }

        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_user_prompt(&data)),
        ];
        let report = self
            .model
            .chat(messages, ChatOptions::new(REPORT_MAX_TOKENS, REPORT_TEMPERATURE))
            .await
            .context("Weekly report generation failed")?;

        let row = build_report_row(report, &data, today, now)?;
        self.store
            .save_weekly_report(&row)
            .await
            .context("Failed to save weekly report")?;
        info!(week_start = %row.week_start, "Weekly report saved");
        info!("Report preview:\n{}", preview(&row.report_content));

        Ok(Some(row))
    }

    /// Read failures are logged and treated as an empty source.
    async fn load_week(&self, now: DateTime<Utc>, today: NaiveDate) -> WeeklyData {
        let since_day = today - Duration::days(LOOKBACK_DAYS);
        let posts = self
            .store
            .recent_posts(now - Duration::days(LOOKBACK_DAYS), FETCH_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load recent posts");
                Vec::new()
            });
        let videos = self
            .store
            .recent_videos(since_day, FETCH_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load recent videos");
                Vec::new()
            });
        let trends = self
            .store
            .recent_trends(since_day, FETCH_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load recent trend keywords");
                Vec::new()
            });

        WeeklyData {
            posts,
            videos,
            trends,
        }
    }
}

fn section<T>(items: &[T], limit: usize, line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    items
        .iter()
        .take(limit)
        .map(line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_user_prompt(data: &WeeklyData) -> String {
    let reddit = section(&data.posts, REDDIT_PROMPT_ROWS, |p| {
        format!("- [{}] {}", p.subreddit, p.title)
    });
    let youtube = section(&data.videos, YOUTUBE_PROMPT_ROWS, |v| {
        format!(
            "- [{}] {} ({}, 조회수: {})",
            v.category,
            v.title,
            v.channel_title,
            format_thousands(v.view_count)
        )
    });
    let google = section(&data.trends, GOOGLE_PROMPT_ROWS, |k| {
        format!("- {} ({}: {})", k.keyword, k.region, k.traffic_volume)
    });

    format!(
        "당신은 한국 유튜버를 위한 트렌드 분석 전문가입니다.
아래 3개 플랫폼에서 수집한 이번 주 데이터를 분석하여, 한국어로 주간 트렌드 리포트를 작성해주세요.

## 📌 Reddit 크리에이터 커뮤니티 핫 토픽
{reddit}

## 📌 YouTube 인기 동영상 (한국 + 미국)
{youtube}

## 📌 Google 검색 트렌드
{google}

---

{REPORT_FORMAT}"
    )
}

pub fn build_report_row(
    report: String,
    data: &WeeklyData,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<WeeklyReportRow> {
    let hot_keywords = extract_hot_keywords(&report);
    let summary = SourcesSummary {
        reddit_count: data.posts.len(),
        youtube_count: data.videos.len(),
        google_count: data.trends.len(),
        analysis_date: now,
    };

    Ok(WeeklyReportRow {
        week_start: week_start(today),
        report_content: report,
        hot_keywords: serde_json::to_string(&hot_keywords)?,
        sources_summary: serde_json::to_string(&summary)?,
        created_at: now,
    })
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// `1234567` → `1,234,567`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// First 800 characters of the report, with `...` when cut.
pub fn preview(report: &str) -> String {
    let head = truncate_chars(report, PREVIEW_CHARS);
    if head.len() < report.len() {
        format!("{head}...")
    } else {
        report.to_string()
    }
}
