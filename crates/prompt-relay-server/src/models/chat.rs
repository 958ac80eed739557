use serde::{Deserialize, Serialize};

// ===== REQUEST MODELS =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

fn default_model() -> String {
    "gpt".to_string()
}

// ===== DIALOGUE MODELS =====

/// Speaker of one dialogue turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation, as sent to the model provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let request: PromptRequest = serde_json::from_str(
            r#"{"prompt": "hello", "model": "chatgpt", "conversationId": "abc"}"#,
        )
        .unwrap();

        assert_eq!(request.prompt.as_deref(), Some("hello"));
        assert_eq!(request.model, "chatgpt");
        assert_eq!(request.conversation_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_model_defaults_to_gpt() {
        let request: PromptRequest =
            serde_json::from_str(r#"{"prompt": "hello", "conversationId": "abc"}"#).unwrap();
        assert_eq!(request.model, "gpt");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let message = ChatMessage::user("hi");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);

        let message = ChatMessage::assistant("hello");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hello"}"#);
    }
}
