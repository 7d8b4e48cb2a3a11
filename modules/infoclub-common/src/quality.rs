use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Bodies shorter than this many characters are rejected outright.
pub const MIN_CONTENT_LENGTH: usize = 150;

/// Minimum ratio of distinct characters to total characters.
pub const MIN_CHAR_DIVERSITY: f64 = 0.20;

/// Self-promotion phrases, matched against the lower-cased title in this order.
pub const SPAM_KEYWORDS: &[&str] = &[
    "check out my",
    "new video",
    "sub4sub",
    "watch my",
    "please subscribe",
    "channel review",
    "my first video",
];

const VALID: &str = "Valid";

/// A fetched text item, already unescaped and stripped of markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub title: String,
    pub body: String,
}

impl CandidateItem {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn validate(&self) -> ValidationVerdict {
        validate(&self.title, &self.body)
    }
}

/// Outcome of [`validate`]. `reason` is `"Valid"` on acceptance, otherwise the
/// first rule that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub accepted: bool,
    pub reason: String,
}

impl ValidationVerdict {
    fn accept() -> Self {
        Self {
            accepted: true,
            reason: VALID.to_string(),
        }
    }

    fn reject(reason: String) -> Self {
        Self {
            accepted: false,
            reason,
        }
    }
}

/// Decide whether a post body is real content worth keeping.
///
/// Rules run in order and the first failure wins:
/// 1. body shorter than [`MIN_CONTENT_LENGTH`] characters
/// 2. title contains a [`SPAM_KEYWORDS`] phrase (case-insensitive)
/// 3. distinct-character ratio below [`MIN_CHAR_DIVERSITY`]
///
/// Lengths are measured in characters, so Hangul counts the same as ASCII.
/// Whitespace is not special-cased.
pub fn validate(title: &str, body: &str) -> ValidationVerdict {
    let length = body.chars().count();
    if length < MIN_CONTENT_LENGTH {
        return ValidationVerdict::reject(format!("Too short ({length} chars)"));
    }

    let title_lower = title.to_lowercase();
    if let Some(keyword) = SPAM_KEYWORDS
        .iter()
        .find(|keyword| title_lower.contains(*keyword))
    {
        return ValidationVerdict::reject(format!("Spam keyword found: {keyword}"));
    }

    let distinct = body.chars().collect::<HashSet<char>>().len();
    let diversity = distinct as f64 / length as f64;
    if diversity < MIN_CHAR_DIVERSITY {
        return ValidationVerdict::reject(format!("Low character diversity ({diversity:.2})"));
    }

    ValidationVerdict::accept()
}
