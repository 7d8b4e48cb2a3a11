//! Weekly analysis against the in-memory store and a scripted chat model.

use std::sync::Arc;

use ai_client::ChatOptions;
use chrono::{Duration, Local, Utc};
use infoclub_common::types::{PostRow, TrendKeywordRow};
use infoclub_crawler::analyzer::{week_start, TrendAnalyzer};
use infoclub_crawler::testing::{video, MemoryStore, ScriptedChat};

const REPORT: &str = "\
# 📊 이번 주 크리에이터 트렌드 리포트

## 🔥 HOT 키워드 TOP 5
1. **AI 더빙**
2. **유튜브 쇼츠**
3. 재테크 브이로그

## 📺 유튜브 콘텐츠 제안 3가지
1. 주제: AI 더빙으로 해외 진출
";

fn post(id: &str, title: &str, days_ago: i64) -> PostRow {
    let crawled = Utc::now() - Duration::days(days_ago);
    PostRow {
        post_id: id.into(),
        subreddit: "NewTubers".into(),
        title: title.into(),
        content: "body".into(),
        url: format!("https://www.reddit.com/r/NewTubers/comments/{id}/x/"),
        author: "unknown".into(),
        upvotes: 0,
        comment_count: 0,
        created_at: crawled,
        crawled_at: crawled,
        ai_insight: None,
    }
}

fn trend(keyword: &str) -> TrendKeywordRow {
    TrendKeywordRow {
        keyword: keyword.into(),
        region: "KR".into(),
        traffic_volume: "→ 보합 (현재:50, 평균:50, 최고:60)".into(),
        related_topics: "콘텐츠 트렌드".into(),
        trending_date: Local::now().date_naive(),
        crawled_at: Utc::now(),
    }
}

#[tokio::test]
async fn saves_report_with_extracted_keywords() {
    let store = Arc::new(
        MemoryStore::new()
            .with_posts(vec![post("a", "Shorts vs long form", 1)])
            .with_videos(vec![video("v1", "KR", 1_234_567)])
            .with_trends(vec![trend("먹방")]),
    );
    let chat = Arc::new(ScriptedChat::replying(REPORT));

    let row = TrendAnalyzer::new(store.clone(), chat.clone())
        .run()
        .await
        .unwrap()
        .expect("report generated");

    assert_eq!(row.hot_keywords, r#"["AI 더빙","유튜브 쇼츠","재테크 브이로그"]"#);
    assert_eq!(row.report_content, REPORT);
    assert_eq!(row.week_start, week_start(Local::now().date_naive()));

    let summary: serde_json::Value = serde_json::from_str(&row.sources_summary).unwrap();
    assert_eq!(summary["reddit_count"], 1);
    assert_eq!(summary["youtube_count"], 1);
    assert_eq!(summary["google_count"], 1);

    assert_eq!(store.reports(), vec![row]);

    let calls = chat.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].options, ChatOptions::new(1500, 0.7));
    let prompt = calls[0].user_prompt();
    assert!(prompt.contains("- [NewTubers] Shorts vs long form"));
    assert!(prompt.contains("조회수: 1,234,567"));
    assert!(prompt.contains("- 먹방 (KR: → 보합 (현재:50, 평균:50, 최고:60))"));
}

#[tokio::test]
async fn nothing_to_analyze_skips_model_and_store() {
    let store = Arc::new(MemoryStore::new().with_posts(vec![post("old", "Last month", 30)]));
    let chat = Arc::new(ScriptedChat::replying(REPORT));

    let result = TrendAnalyzer::new(store.clone(), chat.clone())
        .run()
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(chat.calls().is_empty());
    assert!(store.reports().is_empty());
}

#[tokio::test]
async fn model_failure_is_an_error_and_saves_nothing() {
    let store = Arc::new(MemoryStore::new().with_trends(vec![trend("ASMR")]));
    let chat = Arc::new(ScriptedChat::failing("quota exceeded"));

    let result = TrendAnalyzer::new(store.clone(), chat).run().await;

    assert!(result.is_err());
    assert!(store.reports().is_empty());
}

#[tokio::test]
async fn report_without_hot_section_stores_empty_keyword_list() {
    let store = Arc::new(MemoryStore::new().with_trends(vec![trend("ASMR")]));
    let chat = Arc::new(ScriptedChat::replying("# 리포트\n## 📺 제안\n1. 브이로그"));

    let row = TrendAnalyzer::new(store, chat)
        .run()
        .await
        .unwrap()
        .expect("report generated");

    assert_eq!(row.hot_keywords, "[]");
}
