// src/handlers/summarize.rs
use crate::error::ApiError;
use crate::models::chat::{ChatTurn, MessageRole};
use crate::services::extraction;
use crate::services::prompt_builder::{build_prompt, PromptOptions, Tool};
use crate::AppState;
use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, Extension},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn summarize_routes() -> Router {
    Router::new()
        .route("/summarize", post(summarize))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

struct SummarizeForm {
    text: String,
    url: Option<String>,
    upload: Option<(PathBuf, String)>,
    tool: Tool,
    options: PromptOptions,
}

async fn read_summarize_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<SummarizeForm, ApiError> {
    let mut form = SummarizeForm {
        text: String::new(),
        url: None,
        upload: None,
        tool: Tool::Summarize,
        options: PromptOptions::default(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let read_text = |e: axum::extract::multipart::MultipartError| {
            ApiError::Validation(format!("Invalid field: {}", e))
        };

        match name.as_str() {
            "text" => form.text = field.text().await.map_err(read_text)?,
            "url" => {
                let url = field.text().await.map_err(read_text)?;
                if !url.trim().is_empty() {
                    form.url = Some(url);
                }
            }
            "tool" => form.tool = Tool::parse(&field.text().await.map_err(read_text)?),
            "summaryType" => {
                let style = field.text().await.map_err(read_text)?;
                if !style.is_empty() {
                    form.options.summary_type = style;
                }
            }
            "summaryLength" => {
                let raw = field.text().await.map_err(read_text)?;
                // Accepted verbatim, including values outside [0, 100].
                if let Ok(length) = raw.trim().parse::<i64>() {
                    form.options.summary_length = length;
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
                form.upload = Some((stored_path, original_name));
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    Ok(form)
}

/// One-shot tool endpoint: gather content from text/file/URL, wrap it in the
/// selected tool's instruction template, and return the provider's output.
async fn summarize(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = read_summarize_form(&state, multipart).await?;

    let mut text = form.text;

    if let Some((path, original_name)) = &form.upload {
        let file_text = extraction::extract_file_text(path, original_name).await;
        text = if text.is_empty() {
            file_text
        } else {
            format!("{}\n{}", text, file_text)
        };
    }

    if let Some(url) = &form.url {
        match extraction::fetch_url_text(&state.http_client, url).await {
            Ok(url_text) => {
                text = if text.is_empty() {
                    url_text
                } else {
                    format!("{}\n{}", text, url_text)
                };
            }
            Err(e) => {
                tracing::error!("URL fetch error: {}", e);
                let marker = format!("[Could not fetch URL: {}]", e);
                text = if text.is_empty() {
                    marker
                } else {
                    format!("{}\n{}", text, marker)
                };
            }
        }
    }

    if text.trim().is_empty() {
        return Err(ApiError::Validation("No content provided".to_string()));
    }

    let prompt = build_prompt(&form.tool, &text, &form.options);
    tracing::debug!(
        tool = ?form.tool,
        prompt_len = prompt.len(),
        "dispatching tool prompt to AI provider"
    );

    let turns = vec![ChatTurn {
        role: MessageRole::User,
        content: prompt,
    }];

    let reply = match &state.llm {
        Some(llm) => llm.complete(&turns).await,
        None => Err(crate::llm::LlmError::Api {
            status: 503,
            body: "AI provider not configured".to_string(),
        }),
    };

    match reply {
        Ok(summary) => Ok(Json(json!({ "summary": summary }))),
        Err(e) => {
            tracing::error!("AI provider error during summarize: {}", e);
            Err(ApiError::Upstream {
                details: e.to_string(),
            })
        }
    }
}
