// src/handlers/chat.rs
use crate::error::ApiError;
use crate::models::chat::{ChatMessage, ChatTurn};
use crate::services::conversation_store::{derive_title, DEFAULT_TITLE};
use crate::services::extraction;
use crate::AppState;
use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, Extension, Path},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn chat_routes() -> Router {
    Router::new()
        .route("/chat/new", post(new_conversation))
        .route("/chat", get(list_conversations))
        .route("/chat/message", post(send_message))
        .route(
            "/chat/:conversation_id",
            get(get_conversation).delete(delete_conversation),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

async fn new_conversation(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let conversation = state.conversations.create().await;
    tracing::info!("Started new conversation: {}", conversation.id);

    Json(json!({
        "conversationId": conversation.id,
        "conversation": conversation,
    }))
}

async fn list_conversations(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let conversations = state.conversations.list().await;
    Json(json!({ "conversations": conversations }))
}

async fn get_conversation(
    Path(conversation_id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    match state.conversations.get(&conversation_id).await {
        Some(conversation) => Ok(Json(json!({ "conversation": conversation }))),
        None => Err(ApiError::NotFound("Conversation not found".to_string())),
    }
}

async fn delete_conversation(
    Path(conversation_id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Value> {
    let deleted = state.conversations.delete(&conversation_id).await;
    Json(json!({
        "success": deleted,
        "message": if deleted { "Conversation deleted" } else { "Conversation not found" },
    }))
}

/// One inbound user turn: text and/or uploaded file and/or URL.
struct MessageForm {
    conversation_id: Option<String>,
    message: String,
    url: Option<String>,
    upload: Option<(PathBuf, String)>,
}

async fn read_message_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<MessageForm, ApiError> {
    let mut form = MessageForm {
        conversation_id: None,
        message: String::new(),
        url: None,
        upload: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "conversationId" => {
                form.conversation_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(format!("Invalid field: {}", e)))?,
                );
            }
            "message" => {
                form.message = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Invalid field: {}", e)))?;
            }
            "url" => {
                let url = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Invalid field: {}", e)))?;
                if !url.trim().is_empty() {
                    form.url = Some(url);
                }
            }
            "file" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Invalid file upload: {}", e)))?;

                tokio::fs::create_dir_all(&state.upload_dir).await?;
                let stored_path = state
                    .upload_dir
                    .join(format!("{}_{}", Uuid::new_v4(), original_name));
                tokio::fs::write(&stored_path, &data).await?;

                tracing::debug!(
                    "Stored uploaded file {} ({} bytes) at {}",
                    original_name,
                    data.len(),
                    stored_path.display()
                );
                form.upload = Some((stored_path, original_name));
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    Ok(form)
}

/// Main chat endpoint: extends the conversation, calls the AI provider, and
/// returns the updated history.
async fn send_message(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = read_message_form(&state, multipart).await?;

    let conversation_id = form
        .conversation_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("conversationId is required".to_string()))?;

    let mut user_message = form.message;

    // Extraction failures never abort the turn; they degrade to marker text
    // inside the composed message.
    if let Some((path, original_name)) = &form.upload {
        let file_text = extraction::extract_file_text(path, original_name).await;
        user_message = if user_message.is_empty() {
            file_text
        } else {
            format!("{}\n\n[File attached]\n{}", user_message, file_text)
        };
    }

    if let Some(url) = &form.url {
        match extraction::fetch_url_text(&state.http_client, url).await {
            Ok(url_text) => {
                user_message = if user_message.is_empty() {
                    url_text
                } else {
                    format!("{}\n\n[URL content]\n{}", user_message, url_text)
                };
            }
            Err(e) => {
                tracing::error!("URL processing error: {}", e);
                let marker = format!("[Error fetching URL: {}]", e);
                user_message = if user_message.is_empty() {
                    marker
                } else {
                    format!("{}\n\n{}", user_message, marker)
                };
            }
        }
    }

    if user_message.trim().is_empty() {
        return Err(ApiError::Validation("Message cannot be empty".to_string()));
    }

    // Lazy-create: unknown ids materialize a fresh conversation under the
    // caller's id, seeded with the standard greeting.
    let conversation = match state.conversations.get(&conversation_id).await {
        Some(existing) => existing,
        None => {
            let title = if user_message.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                derive_title(&user_message)
            };
            state
                .conversations
                .insert_with_id(&conversation_id, &title)
                .await
        }
    };

    let prior_len = conversation.messages.len();

    let conversation = state
        .conversations
        .append(&conversation_id, ChatMessage::user(user_message.clone()))
        .await
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;

    // First real turn (only the greeting before this message) or still the
    // placeholder title: derive the title from what the user just sent.
    if prior_len == 1 || conversation.title == DEFAULT_TITLE {
        state
            .conversations
            .set_title(&conversation_id, derive_title(&user_message))
            .await;
    }

    let turns: Vec<ChatTurn> = conversation.messages.iter().map(ChatTurn::from).collect();

    let reply = match &state.llm {
        Some(llm) => llm.complete(&turns).await,
        None => Err(crate::llm::LlmError::Api {
            status: 503,
            body: "AI provider not configured".to_string(),
        }),
    };

    match reply {
        Ok(response) => {
            let conversation = state
                .conversations
                .append(&conversation_id, ChatMessage::assistant(response.clone()))
                .await
                .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;

            Ok(Json(json!({
                "success": true,
                "conversationId": conversation_id,
                "response": response,
                "conversation": conversation,
            })))
        }
        Err(e) => {
            tracing::error!("AI provider error for conversation {}: {}", conversation_id, e);

            // Keep the user-visible history balanced even on failure.
            state
                .conversations
                .append(&conversation_id, ChatMessage::assistant(FALLBACK_REPLY))
                .await;

            Err(ApiError::Upstream {
                details: e.to_string(),
            })
        }
    }
}
