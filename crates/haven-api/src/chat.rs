//! `/chat` — relay a conversation to the chat-completion collaborator with a
//! fixed system prompt.

use axum::{Json, extract::State};
use haven_core::store::SafetyStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{AppState, Integrations, body::JsonBody, error::ApiError};

pub const SYSTEM_PROMPT: &str = "You are a concise well-being assistant. Keep all responses \
                                 under 2-3 sentences. Be direct and practical.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role:    String,
  pub content: String,
}

impl ChatMessage {
  fn system() -> Self {
    ChatMessage { role: "system".into(), content: SYSTEM_PROMPT.into() }
  }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  model:    Option<&'a str>,
  messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChatMessage,
}

/// Send `messages`, prefixed with the system prompt, and return the reply.
pub async fn complete(
  integrations: &Integrations,
  messages: Vec<ChatMessage>,
) -> Result<String, ApiError> {
  let mut all = Vec::with_capacity(messages.len() + 1);
  all.push(ChatMessage::system());
  all.extend(messages);

  let payload = CompletionRequest { model: integrations.chat_model.as_deref(), messages: all };

  let mut request = integrations.http.post(&integrations.chat_url).json(&payload);
  if let Some(key) = &integrations.chat_api_key {
    request = request.bearer_auth(key);
  }

  let response = request.send().await.map_err(|e| {
    tracing::warn!(error = %e, "chat request failed");
    ApiError::Upstream("Chat service unavailable".into())
  })?;

  if !response.status().is_success() {
    tracing::warn!(status = %response.status(), "chat service refused request");
    return Err(ApiError::Upstream("Chat service unavailable".into()));
  }

  let completion: CompletionResponse = response.json().await.map_err(|e| {
    tracing::warn!(error = %e, "chat response did not decode");
    ApiError::Upstream("Invalid response from chat service".into())
  })?;

  completion
    .choices
    .into_iter()
    .next()
    .map(|c| c.message.content)
    .ok_or_else(|| ApiError::Upstream("Invalid response from chat service".into()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatBody {
  pub messages: Vec<ChatMessage>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<ChatBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  if body.messages.is_empty() {
    return Err(ApiError::BadRequest("Messages are required".into()));
  }
  let reply = complete(&state.integrations, body.messages).await?;
  Ok(Json(json!({ "ok": true, "reply": reply })))
}
