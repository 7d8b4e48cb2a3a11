pub mod config;
pub mod error;
pub mod quality;
pub mod report;
pub mod text;
pub mod types;

pub use config::{Config, StorageCredentials};
pub use error::InfoClubError;
pub use quality::{validate, CandidateItem, ValidationVerdict};
pub use report::extract_hot_keywords;
pub use text::{clean_html, parse_post_id};
pub use types::*;
