mod settings;

pub use settings::{ConversationConfig, LlmConfig, ServerConfig, Settings, UploadConfig};
