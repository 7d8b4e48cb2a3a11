use std::env;

use crate::error::InfoClubError;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Application configuration loaded from the environment (and `.env`, if present).
///
/// Every key is optional at load time; each command asks for what it needs via
/// [`Config::storage`] and friends so a missing YouTube key never blocks the
/// Reddit crawler.
#[derive(Debug, Clone, Default)]
pub struct Config {
    // Supabase
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,

    // AI
    pub openai_api_key: Option<String>,
    pub openai_model: String,

    // Sources
    pub youtube_api_key: Option<String>,
}

/// Project URL and service key for the Supabase REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub url: String,
    pub key: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            supabase_url: get("SUPABASE_URL"),
            supabase_key: get("SUPABASE_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            youtube_api_key: get("YOUTUBE_API_KEY"),
        }
    }

    pub fn storage(&self) -> Result<StorageCredentials, InfoClubError> {
        match (&self.supabase_url, &self.supabase_key) {
            (Some(url), Some(key)) => Ok(StorageCredentials {
                url: url.clone(),
                key: key.clone(),
            }),
            _ => Err(InfoClubError::Config(
                "SUPABASE_URL and SUPABASE_KEY must both be set".to_string(),
            )),
        }
    }

    pub fn openai_key(&self) -> Result<&str, InfoClubError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| InfoClubError::Config("OPENAI_API_KEY is not set".to_string()))
    }

    /// Log which keys are present without leaking their values.
    pub fn log_redacted(&self) {
        fn preview(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let head: String = v.chars().take(5).collect();
                    format!("{head}...({} chars)", v.chars().count())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SUPABASE_URL: {}", self.supabase_url.as_deref().unwrap_or("<not set>"));
        tracing::info!("  SUPABASE_KEY: {}", preview(&self.supabase_key));
        tracing::info!("  OPENAI_API_KEY: {}", preview(&self.openai_api_key));
        tracing::info!("  OPENAI_MODEL: {}", self.openai_model);
        tracing::info!("  YOUTUBE_API_KEY: {}", preview(&self.youtube_api_key));
    }
}
