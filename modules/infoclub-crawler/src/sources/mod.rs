// Adapters for the three public content APIs.
//
// Each adapter owns its HTTP client and exposes a `with_base_url` constructor
// so integration tests can point it at a local mock server.

pub mod google_trends;
pub mod reddit;
pub mod youtube;

pub use google_trends::GoogleTrendsClient;
pub use reddit::RedditFeed;
pub use youtube::YoutubeClient;
