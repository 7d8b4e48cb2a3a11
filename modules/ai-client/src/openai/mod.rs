mod client;
pub(crate) mod types;

use crate::traits::{ChatModel, ChatOptions, Message};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use client::OpenAiClient;

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub(crate) fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// System + user prompt in, trimmed assistant reply out.
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
        options: ChatOptions,
    ) -> Result<String> {
        self.chat(vec![Message::system(system), Message::user(user)], options)
            .await
    }
}

// =============================================================================
// ChatModel Implementation
// =============================================================================

#[async_trait]
impl ChatModel for OpenAi {
    async fn chat(&self, messages: Vec<Message>, options: ChatOptions) -> Result<String> {
        let mut request = types::ChatRequest::new(&self.model)
            .messages(messages.into_iter().map(types::WireMessage::from));

        if types::uses_max_completion_tokens(&self.model) {
            request = request.max_completion_tokens(options.max_tokens);
        } else {
            request = request
                .max_tokens(options.max_tokens)
                .temperature(options.temperature);
        }

        let response = self.client().chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| anyhow!("No response from OpenAI"))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_new() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini");
        assert_eq!(ai.model, "gpt-4o-mini");
        assert_eq!(ai.api_key, "sk-test");
        assert_eq!(ai.base_url, None);
    }

    #[test]
    fn test_openai_with_base_url() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[tokio::test]
    async fn chat_returns_trimmed_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 300,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"  📌 트렌드: 쇼츠\n"}}]}"#,
            )
            .create_async()
            .await;

        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url(server.url());
        let reply = ai
            .chat_completion("system", "user", ChatOptions::new(300, 0.7))
            .await
            .unwrap();

        assert_eq!(reply, "📌 트렌드: 쇼츠");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chat_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url(server.url());
        let err = ai
            .chat_completion("system", "user", ChatOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn chat_errors_on_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url(server.url());
        let result = ai.chat_completion("system", "user", ChatOptions::default()).await;

        assert!(result.is_err());
    }
}
