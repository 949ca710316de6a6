// src/handlers/waitlist.rs
use crate::error::ApiError;
use crate::services::submission_store::SubmissionError;
use crate::AppState;
use axum::{
    extract::Extension,
    response::{Html, Json},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn waitlist_routes() -> Router {
    Router::new().route("/waitlist", post(join_waitlist).get(waitlist_dashboard))
}

#[derive(Deserialize)]
struct WaitlistRequest {
    email: Option<String>,
    name: Option<String>,
}

async fn join_waitlist(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<WaitlistRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = request.email.unwrap_or_default();

    let (entry, position) = state
        .submissions
        .add_waitlist(&email, request.name.as_deref())
        .await
        .map_err(submission_error)?;

    tracing::info!("New waitlist signup: {} (#{})", entry.email, position);

    // Fire-and-forget notification emails; delivery failures are logged and
    // never affect the signup response.
    if let Some(mailer) = state.mailer.clone() {
        let welcome_entry = entry.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_waitlist_welcome(&welcome_entry.email, &welcome_entry.name, position)
                .await
            {
                tracing::error!("Failed to send welcome email to {}: {}", welcome_entry.email, e);
            }
            if let Err(e) = mailer
                .send_waitlist_notification(&welcome_entry.email, &welcome_entry.name, position)
                .await
            {
                tracing::error!("Failed to send signup notification: {}", e);
            }
        });
    } else {
        tracing::warn!("SMTP not configured; skipping waitlist emails");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Thanks for joining! Check your email for confirmation.",
    })))
}

async fn waitlist_dashboard(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let entries = state
        .submissions
        .list_waitlist()
        .await
        .map_err(submission_error)?;

    let rows: String = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "<tr><td><span class=\"badge\">{}</span></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                index + 1,
                entry.joined_at.format("%Y-%m-%d %H:%M:%S UTC"),
                entry.email,
                entry.name,
            )
        })
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Nyx AI - Waitlist Admin</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0a0a0f; color: #e0e0e0; padding: 40px 20px; }}
    .container {{ max-width: 1000px; margin: 0 auto; }}
    h1 {{ color: #667eea; margin-bottom: 20px; }}
    .stat-card {{ background: #1a1a2e; padding: 20px; border-radius: 10px; border: 1px solid #2a2a3e; display: inline-block; margin-bottom: 30px; }}
    .stat-number {{ font-size: 32px; font-weight: bold; color: #667eea; }}
    .stat-label {{ color: #888; margin-top: 5px; }}
    table {{ width: 100%; border-collapse: collapse; background: #1a1a2e; border-radius: 10px; overflow: hidden; border: 1px solid #2a2a3e; }}
    th {{ background: #16213e; color: #667eea; padding: 15px; text-align: left; }}
    td {{ padding: 12px 15px; border-bottom: 1px solid #2a2a3e; }}
    .badge {{ background: #667eea20; color: #667eea; padding: 4px 8px; border-radius: 4px; font-size: 12px; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>Nyx AI Waitlist Dashboard</h1>
    <div class="stat-card">
      <div class="stat-number">{count}</div>
      <div class="stat-label">Total Signups</div>
    </div>
    <table>
      <thead><tr><th>#</th><th>Date</th><th>Email</th><th>Name</th></tr></thead>
      <tbody>
{rows}      </tbody>
    </table>
  </div>
</body>
</html>"#,
        count = entries.len(),
        rows = rows,
    );

    Ok(Html(html))
}

pub(crate) fn submission_error(err: SubmissionError) -> ApiError {
    match err {
        SubmissionError::Validation(msg) => ApiError::Validation(msg),
        SubmissionError::Duplicate(msg) => ApiError::Duplicate(msg),
        SubmissionError::Io(e) => ApiError::Io(e),
        SubmissionError::Json(e) => {
            ApiError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }
    }
}
