//! Crawl cycles against in-memory sources and store: no network, no database.

use std::sync::Arc;
use std::time::Duration;

use infoclub_crawler::insight::PostInsighter;
use infoclub_crawler::pipeline::google_trends::{RELATED_SEEDS, SEED_KEYWORDS};
use infoclub_crawler::pipeline::{RedditCrawler, TrendsCrawler, YoutubeCrawler};
use infoclub_crawler::testing::{
    feed_entry, good_body, video, MemoryStore, ScriptedChat, StubChart, StubFeed, StubTrends,
};

// ---------------------------------------------------------------------------
// Reddit
// ---------------------------------------------------------------------------

fn reddit(feed: StubFeed, store: Arc<MemoryStore>) -> RedditCrawler {
    RedditCrawler::new(Box::new(feed), store)
        .with_subreddits(&["NewTubers", "youtube"])
        .with_item_delay(Duration::ZERO)
}

#[tokio::test]
async fn reddit_stores_only_valid_posts() {
    let body = format!("<div class=\"md\"><p>{}</p></div>", good_body());
    let feed = StubFeed::new()
        .on_subreddit(
            "NewTubers",
            vec![
                feed_entry("aaa111", "Retention drop at 30s", &body),
                feed_entry("bbb222", "Too short", "<p>hi</p>"),
                feed_entry("ccc333", "Please subscribe to my channel", &body),
            ],
        )
        .on_subreddit("youtube", vec![feed_entry("ddd444", "Audio levels", &body)]);
    let store = Arc::new(MemoryStore::new());

    let stats = reddit(feed, store.clone()).run().await;

    let posts = store.posts();
    let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["aaa111", "ddd444"]);
    assert_eq!(posts[0].subreddit, "NewTubers");
    assert_eq!(posts[1].subreddit, "youtube");
    assert_eq!(posts[0].content, good_body());
    assert_eq!(posts[0].author, "/u/tester");
    assert_eq!(posts[0].ai_insight, None);

    assert_eq!(stats.items_fetched, 4);
    assert_eq!(stats.items_rejected, 2);
    assert_eq!(stats.items_stored, 2);
}

#[tokio::test]
async fn reddit_skips_unreachable_subreddits() {
    let feed = StubFeed::new().on_subreddit(
        "youtube",
        vec![feed_entry("ddd444", "Audio levels", &good_body())],
    );
    let store = Arc::new(MemoryStore::new());

    let stats = reddit(feed, store.clone()).run().await;

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(store.posts().len(), 1);
}

#[tokio::test]
async fn reddit_recrawl_overwrites_by_post_id() {
    let store = Arc::new(MemoryStore::new());
    for title in ["First title", "Edited title"] {
        let feed = StubFeed::new()
            .on_subreddit("NewTubers", vec![feed_entry("aaa111", title, &good_body())])
            .on_subreddit("youtube", vec![]);
        reddit(feed, store.clone()).run().await;
    }

    let posts = store.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Edited title");
}

#[tokio::test]
async fn reddit_attaches_insight_when_model_replies() {
    let feed = StubFeed::new()
        .on_subreddit("NewTubers", vec![feed_entry("aaa111", "Hook", &good_body())])
        .on_subreddit("youtube", vec![]);
    let store = Arc::new(MemoryStore::new());
    let chat = Arc::new(ScriptedChat::replying("📌 트렌드: 훅\n💡 활용법: 쇼츠\n🎯 액션: 테스트"));

    let stats = reddit(feed, store.clone())
        .with_insighter(PostInsighter::new(chat.clone()))
        .run()
        .await;

    assert_eq!(
        store.posts()[0].ai_insight.as_deref(),
        Some("📌 트렌드: 훅\n💡 활용법: 쇼츠\n🎯 액션: 테스트")
    );
    assert_eq!(stats.insights_generated, 1);
    assert!(chat.calls()[0].user_prompt().contains("서브레딧: r/NewTubers"));
}

#[tokio::test]
async fn reddit_keeps_post_when_insight_fails() {
    let feed = StubFeed::new()
        .on_subreddit("NewTubers", vec![feed_entry("aaa111", "Hook", &good_body())])
        .on_subreddit("youtube", vec![]);
    let store = Arc::new(MemoryStore::new());

    let stats = reddit(feed, store.clone())
        .with_insighter(PostInsighter::new(Arc::new(ScriptedChat::failing("500"))))
        .run()
        .await;

    assert_eq!(store.posts().len(), 1);
    assert_eq!(store.posts()[0].ai_insight, None);
    assert_eq!(stats.insights_generated, 0);
}

#[tokio::test]
async fn reddit_counts_store_failures_and_continues() {
    let feed = StubFeed::new()
        .on_subreddit(
            "NewTubers",
            vec![
                feed_entry("aaa111", "One", &good_body()),
                feed_entry("bbb222", "Two", &good_body()),
            ],
        )
        .on_subreddit("youtube", vec![]);
    let store = Arc::new(MemoryStore::failing_writes());

    let stats = reddit(feed, store).run().await;

    assert_eq!(stats.store_failures, 2);
    assert_eq!(stats.items_stored, 0);
}

// ---------------------------------------------------------------------------
// YouTube
// ---------------------------------------------------------------------------

#[tokio::test]
async fn youtube_stores_every_region() {
    let chart = StubChart::new()
        .on_region("KR", vec![video("kr1", "KR", 500), video("kr2", "KR", 100)])
        .on_region("US", vec![video("us1", "US", 9_000)]);
    let store = Arc::new(MemoryStore::new());

    let stats = YoutubeCrawler::new(Box::new(chart), store.clone()).run().await;

    let ids: Vec<String> = store.videos().into_iter().map(|v| v.video_id).collect();
    assert_eq!(ids, vec!["kr1", "kr2", "us1"]);
    assert_eq!(stats.items_stored, 3);
    assert_eq!(stats.fetch_failures, 0);
}

#[tokio::test]
async fn youtube_failed_region_does_not_block_others() {
    let chart = StubChart::new().on_region("US", vec![video("us1", "US", 9_000)]);
    let store = Arc::new(MemoryStore::new());

    let stats = YoutubeCrawler::new(Box::new(chart), store.clone()).run().await;

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(store.videos().len(), 1);
}

#[tokio::test]
async fn youtube_same_video_is_upserted_once() {
    let chart = StubChart::new()
        .on_region("KR", vec![video("same", "KR", 10)])
        .on_region("US", vec![video("same", "US", 20)]);
    let store = Arc::new(MemoryStore::new());

    YoutubeCrawler::new(Box::new(chart), store.clone()).run().await;

    let videos = store.videos();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].region, "US");
}

// ---------------------------------------------------------------------------
// Google Trends
// ---------------------------------------------------------------------------

fn trends(source: StubTrends, store: Arc<MemoryStore>) -> TrendsCrawler {
    TrendsCrawler::new(Box::new(source), store).with_group_delay(Duration::ZERO)
}

#[tokio::test]
async fn trends_store_interest_and_related_rows() {
    let (category, keywords) = SEED_KEYWORDS[0];
    let source = StubTrends::new()
        .on_group(keywords, &[&[10, 20, 90], &[50, 50, 50], &[60, 60, 20]])
        .with_related(vec![(
            RELATED_SEEDS[0].to_string(),
            (1..=8).map(|i| format!("유튜브 {i}")).collect(),
        )]);
    let store = Arc::new(MemoryStore::new());

    let stats = trends(source, store.clone()).run().await;

    let rows = store.trends();
    assert_eq!(rows.len(), 3 + 5);

    assert_eq!(rows[0].keyword, keywords[0]);
    assert_eq!(rows[0].traffic_volume, "📈 급상승 (현재:90, 평균:40, 최고:90)");
    assert_eq!(rows[0].related_topics, category);
    assert_eq!(rows[1].traffic_volume, "→ 보합 (현재:50, 평균:50, 최고:50)");
    assert_eq!(rows[2].traffic_volume, "📉 하락 (현재:20, 평균:46, 최고:60)");

    assert_eq!(rows[3].keyword, "유튜브 1");
    assert_eq!(rows[3].traffic_volume, "'유튜브' 관련 검색어");
    assert_eq!(rows[7].keyword, "유튜브 5");

    // The other three groups were not registered.
    assert_eq!(stats.fetch_failures, 3);
    assert_eq!(stats.items_stored, 8);
}

#[tokio::test]
async fn trends_same_day_rerun_updates_in_place() {
    let (_, keywords) = SEED_KEYWORDS[1];
    let store = Arc::new(MemoryStore::new());

    for latest in [10, 99] {
        // Only the first keyword of the group has samples.
        let source = StubTrends::new().on_group(keywords, &[&[50, 50, latest]]);
        trends(source, store.clone()).run().await;
    }

    let rows = store.trends();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].keyword, keywords[0]);
    assert!(rows[0].traffic_volume.starts_with("📈 급상승"));
}

#[tokio::test]
async fn trends_without_any_data_store_nothing() {
    let store = Arc::new(MemoryStore::new());

    let stats = trends(StubTrends::new(), store.clone()).run().await;

    assert!(store.trends().is_empty());
    assert_eq!(stats.items_fetched, 0);
    assert_eq!(stats.fetch_failures, SEED_KEYWORDS.len() as u32 + 1);
}
