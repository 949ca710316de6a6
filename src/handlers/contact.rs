// src/handlers/contact.rs
use crate::error::ApiError;
use crate::handlers::waitlist::submission_error;
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

pub fn contact_routes() -> Router {
    Router::new().route("/contact", post(submit_contact).get(contact_dashboard))
}

#[derive(Deserialize)]
struct ContactRequest {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
    phone: Option<String>,
    subject: Option<String>,
}

async fn submit_contact(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<Value>, ApiError> {
    let entry = state
        .submissions
        .add_contact(
            request.name.as_deref().unwrap_or(""),
            request.email.as_deref().unwrap_or(""),
            request.message.as_deref().unwrap_or(""),
            request.phone.as_deref(),
            request.subject.as_deref(),
        )
        .await
        .map_err(submission_error)?;

    tracing::info!("New contact message from {}", entry.email);

    if let Some(mailer) = state.mailer.clone() {
        tokio::spawn(async move {
            if let Err(e) = mailer.send_contact_notification(&entry).await {
                tracing::error!("Failed to send contact notification: {}", e);
            }
        });
    } else {
        tracing::warn!("SMTP not configured; skipping contact notification");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Thanks for reaching out! We'll get back to you soon.",
    })))
}

async fn contact_dashboard(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let entries = state
        .submissions
        .list_contacts()
        .await
        .map_err(submission_error)?;

    let rows: String = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "<tr><td><span class=\"badge\">{}</span></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                index + 1,
                entry.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
                entry.name,
                entry.email,
                entry.subject.as_deref().unwrap_or("-"),
                entry.message,
            )
        })
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Nyx AI - Contact Admin</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0a0a0f; color: #e0e0e0; padding: 40px 20px; }}
    .container {{ max-width: 1100px; margin: 0 auto; }}
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
    <h1>Nyx AI Contact Dashboard</h1>
    <div class="stat-card">
      <div class="stat-number">{count}</div>
      <div class="stat-label">Messages</div>
    </div>
    <table>
      <thead><tr><th>#</th><th>Date</th><th>Name</th><th>Email</th><th>Subject</th><th>Message</th></tr></thead>
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
