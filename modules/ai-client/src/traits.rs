use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Message Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// Sampling Options
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatOptions {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self::new(1500, 0.7)
    }
}

// =============================================================================
// ChatModel Trait
// =============================================================================

/// A model that turns a conversation into one assistant reply.
///
/// The reply is returned trimmed. Implementations report transport and API
/// failures as errors; callers decide whether a missing reply is fatal.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, messages: Vec<Message>, options: ChatOptions) -> Result<String>;

    fn model(&self) -> &str;
}
