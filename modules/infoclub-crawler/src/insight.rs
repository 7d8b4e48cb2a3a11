use std::sync::Arc;

use ai_client::{truncate_chars, ChatModel, ChatOptions, Message};
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "\
당신은 유튜브 크리에이터를 위한 트렌드 분석가입니다.
Reddit에서 화제가 된 글을 분석하여, 한국 유튜버가 활용할 수 있는 인사이트를 제공해주세요.
반드시 한국어로 답변하고, 아래 3줄 형식을 따라주세요:

📌 트렌드: (이 글이 왜 주목할 만한지 한 줄 요약)
💡 활용법: (유튜버가 이 트렌드를 어떻게 콘텐츠로 만들 수 있는지)
🎯 액션: (지금 바로 실행할 수 있는 구체적인 행동 하나)";

const MAX_BODY_CHARS: usize = 2000;
const INSIGHT_MAX_TOKENS: u32 = 300;
const INSIGHT_TEMPERATURE: f32 = 0.7;

/// Generates the three-line creator insight attached to stored posts.
pub struct PostInsighter {
    model: Arc<dyn ChatModel>,
}

impl PostInsighter {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// `None` on any model failure; the post is stored without an insight.
    pub async fn generate(&self, title: &str, content: &str, subreddit: &str) -> Option<String> {
        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(user_prompt(title, content, subreddit)),
        ];
        let options = ChatOptions::new(INSIGHT_MAX_TOKENS, INSIGHT_TEMPERATURE);

        match self.model.chat(messages, options).await {
            Ok(insight) if !insight.is_empty() => {
                info!(subreddit, "AI insight generated");
                Some(insight)
            }
            Ok(_) => {
                warn!(subreddit, "AI insight was empty");
                None
            }
            Err(e) => {
                warn!(subreddit, error = %e, "AI insight generation failed");
                None
            }
        }
    }
}

fn user_prompt(title: &str, content: &str, subreddit: &str) -> String {
    format!(
        "다음 Reddit 글을 분석해주세요:\n\n서브레딧: r/{subreddit}\n제목: {title}\n내용: {}",
        truncate_chars(content, MAX_BODY_CHARS)
    )
}
