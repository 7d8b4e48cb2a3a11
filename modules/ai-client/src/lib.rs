pub mod openai;
pub mod traits;
pub mod util;

pub use openai::OpenAi;
pub use traits::{ChatModel, ChatOptions, Message, MessageRole};
pub use util::truncate_chars;
