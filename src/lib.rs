// lib.rs - exports the application modules and the router builder so the
// binary and the integration tests share one app construction path.
use axum::{response::Json, routing::get, Extension, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod gemini_client;
pub mod groq_client;
pub mod handlers;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod services;
pub mod smtp_client;

use services::conversation_store::ConversationStore;
use services::submission_store::SubmissionStore;

/// Shared state handed to every handler via Extension.
pub struct AppState {
    pub conversations: ConversationStore,
    pub submissions: SubmissionStore,
    pub llm: Option<Arc<dyn llm::LlmClient>>,
    pub mailer: Option<smtp_client::SmtpClient>,
    pub http_client: reqwest::Client,
    pub upload_dir: PathBuf,
}

/// Build the full application router with all routes and shared state.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(handlers::chat::chat_routes())
        .merge(handlers::summarize::summarize_routes())
        .merge(handlers::waitlist::waitlist_routes())
        .merge(handlers::contact::contact_routes())
        .layer(axum::middleware::from_fn(
            middleware::logging::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Nyx AI Backend is running" }))
}

async fn health() -> &'static str {
    "OK"
}
