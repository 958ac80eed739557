use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub uploads: UploadConfig,
    pub conversations: ConversationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub max_size_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConversationConfig {
    pub max_conversations: usize,
    pub max_messages: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("server.static_dir", "client")?
            .set_default("llm.api_key", "")?
            .set_default("llm.base_url", "https://api.openai.com")?
            .set_default("llm.model", "gpt-3.5-turbo")?
            .set_default("llm.timeout_seconds", 120)?
            .set_default("uploads.dir", "uploads")?
            .set_default("uploads.max_size_bytes", 10 * 1024 * 1024)?
            .set_default("conversations.max_conversations", 1024)?
            .set_default("conversations.max_messages", 200)?
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        // OPENAI_API_KEY and PORT are honored without the APP prefix.
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            settings.llm.api_key = api_key;
        }
        if let Ok(port) = std::env::var("PORT") {
            settings.server.port = port.parse()?;
        }

        Ok(settings)
    }
}
