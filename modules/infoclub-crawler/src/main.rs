use std::sync::Arc;

use ai_client::{ChatModel, OpenAi};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use infoclub_common::Config;
use infoclub_crawler::analyzer::TrendAnalyzer;
use infoclub_crawler::insight::PostInsighter;
use infoclub_crawler::pipeline::{RedditCrawler, TrendsCrawler, YoutubeCrawler};
use infoclub_crawler::sources::{GoogleTrendsClient, RedditFeed, YoutubeClient};
use infoclub_crawler::store::SupabaseStore;
use infoclub_crawler::traits::RecordStore;

#[derive(Parser)]
#[command(name = "infoclub")]
#[command(about = "Creator trend crawlers and weekly report generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl creator subreddits into `posts`
    Reddit {
        /// Skip per-post AI insights even when OPENAI_API_KEY is set
        #[arg(long)]
        no_insight: bool,
    },

    /// Crawl the KR and US "most popular" charts into `youtube_trends`
    Youtube,

    /// Collect Google Trends interest and related queries into `google_trends`
    Trends,

    /// Generate the weekly cross-platform report into `weekly_reports`
    Analyze,

    /// Run every crawler, then the weekly analysis
    All {
        #[arg(long)]
        no_insight: bool,
    },

    /// Delete every stored post
    ResetDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("infoclub=info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    config.log_redacted();

    let store: Arc<dyn RecordStore> = Arc::new(SupabaseStore::connect(&config.storage()?));

    match cli.command {
        Commands::Reddit { no_insight } => run_reddit(&config, store, no_insight).await,
        Commands::Youtube => run_youtube(&config, store).await,
        Commands::Trends => run_trends(store).await,
        Commands::Analyze => run_analysis(&config, store).await?,
        Commands::All { no_insight } => {
            run_reddit(&config, store.clone(), no_insight).await;
            run_youtube(&config, store.clone()).await;
            run_trends(store.clone()).await;
            run_analysis(&config, store).await?;
        }
        Commands::ResetDb => {
            info!("Clearing all posts");
            store.clear_posts().await?;
            info!("Posts cleared");
        }
    }

    Ok(())
}

fn chat_model(config: &Config) -> Option<Arc<dyn ChatModel>> {
    let key = config.openai_api_key.as_deref()?;
    Some(Arc::new(OpenAi::new(key, &config.openai_model)))
}

async fn run_reddit(config: &Config, store: Arc<dyn RecordStore>, no_insight: bool) {
    let mut crawler = RedditCrawler::new(Box::new(RedditFeed::new()), store);
    match chat_model(config) {
        Some(model) if !no_insight => {
            crawler = crawler.with_insighter(PostInsighter::new(model));
        }
        Some(_) => info!("AI insights disabled by flag"),
        None => warn!("OPENAI_API_KEY not set, skipping AI insights"),
    }

    let stats = crawler.run().await;
    info!("Reddit crawl complete. {stats}");
}

async fn run_youtube(config: &Config, store: Arc<dyn RecordStore>) {
    let Some(api_key) = config.youtube_api_key.as_deref() else {
        warn!("YOUTUBE_API_KEY not set, skipping YouTube crawl");
        return;
    };

    let crawler = YoutubeCrawler::new(Box::new(YoutubeClient::new(api_key)), store);
    let stats = crawler.run().await;
    info!("YouTube crawl complete. {stats}");
}

async fn run_trends(store: Arc<dyn RecordStore>) {
    let crawler = TrendsCrawler::new(Box::new(GoogleTrendsClient::new()), store);
    let stats = crawler.run().await;
    info!("Google Trends crawl complete. {stats}");
}

async fn run_analysis(config: &Config, store: Arc<dyn RecordStore>) -> Result<()> {
    let key = config.openai_key()?;
    let model: Arc<dyn ChatModel> = Arc::new(OpenAi::new(key, &config.openai_model));

    match TrendAnalyzer::new(store, model).run().await? {
        Some(report) => info!(
            week_start = %report.week_start,
            hot_keywords = report.hot_keywords.as_str(),
            "Weekly analysis complete"
        ),
        None => info!("Weekly analysis skipped, nothing to analyze"),
    }
    Ok(())
}
