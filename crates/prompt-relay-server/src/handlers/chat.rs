use crate::models::chat::{ChatMessage, PromptRequest};
use crate::services::{CompletionProvider, ConversationStore};
use crate::utils::error::ApiError;
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{debug, info};

/// `POST /get-prompt-result`
///
/// Appends the prompt to the conversation's log, replays the full history
/// to the model provider, appends the assistant reply, and returns the
/// reply text. The per-conversation lock is held across the provider call
/// so requests sharing an identifier serialize.
pub async fn prompt_result_handler(
    Extension(store): Extension<Arc<ConversationStore>>,
    Extension(provider): Extension<Arc<dyn CompletionProvider>>,
    Json(request): Json<PromptRequest>,
) -> Result<String, ApiError> {
    let prompt = request
        .prompt
        .filter(|prompt| !prompt.is_empty())
        .ok_or(ApiError::MissingPrompt)?;
    let conversation_id = request
        .conversation_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingConversationId)?;

    info!(
        conversation_id = %conversation_id,
        model = %request.model,
        prompt_len = prompt.len(),
        "Prompt request received"
    );

    let mut log = store.entry(&conversation_id).lock_owned().await;

    log.push(ChatMessage::user(prompt));

    // The user turn is appended before the model switch, so it stays in the
    // log even for an unsupported selector.
    if request.model != "chatgpt" {
        return Err(ApiError::UnsupportedModel(request.model));
    }

    // No rollback on failure: a failed provider call leaves the user turn
    // behind with no matching assistant turn.
    let reply = provider.complete(log.messages()).await?;
    log.push(ChatMessage::assistant(reply.clone()));

    debug!(
        conversation_id = %conversation_id,
        history_len = log.len(),
        "Assistant reply appended"
    );

    Ok(reply)
}
