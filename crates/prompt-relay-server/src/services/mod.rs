pub mod conversation;
pub mod llm_service;

pub use conversation::ConversationStore;
pub use llm_service::{CompletionProvider, LlmService};
