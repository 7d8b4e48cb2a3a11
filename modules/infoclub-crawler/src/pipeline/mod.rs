pub mod google_trends;
pub mod reddit;
pub mod stats;
pub mod youtube;

pub use google_trends::TrendsCrawler;
pub use reddit::RedditCrawler;
pub use stats::CrawlStats;
pub use youtube::YoutubeCrawler;
