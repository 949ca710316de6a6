use std::path::PathBuf;
use std::sync::Arc;

use nyx_backend::services::conversation_store::ConversationStore;
use nyx_backend::services::submission_store::SubmissionStore;
use nyx_backend::{build_app, gemini_client, groq_client, llm, smtp_client, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize production-grade logging
    init_logging().expect("Failed to initialize logging");

    // Ensure uploads and data directories exist
    if let Err(e) = std::fs::create_dir_all("uploads") {
        tracing::warn!("Failed to create uploads directory: {}", e);
    } else {
        tracing::info!("Uploads directory ready");
    }

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!("Failed to create data directory: {}", e);
    } else {
        tracing::info!("Data directory ready");
    }

    // Pick the AI provider. Groq is the default; Gemini is opt-in via
    // DEFAULT_AI_PROVIDER=gemini.
    let provider = std::env::var("DEFAULT_AI_PROVIDER").unwrap_or_else(|_| "groq".to_string());
    let llm: Option<Arc<dyn llm::LlmClient>> = match provider.as_str() {
        "gemini" => match std::env::var("GEMINI_API_KEY").ok() {
            Some(api_key) if !api_key.is_empty() => {
                tracing::info!("Initializing Gemini AI client (2.5 Flash)...");
                Some(Arc::new(gemini_client::GeminiClient::new(api_key)))
            }
            _ => {
                tracing::warn!("GEMINI_API_KEY not found. AI features will be disabled.");
                None
            }
        },
        _ => match std::env::var("GROQ_API_KEY").ok() {
            Some(api_key) if !api_key.is_empty() => {
                tracing::info!("Initializing Groq AI client (llama-3.1-8b-instant)...");
                Some(Arc::new(groq_client::GroqClient::new(api_key)))
            }
            _ => {
                tracing::warn!("GROQ_API_KEY not found. AI features will be disabled.");
                None
            }
        },
    };

    // Initialize the SMTP client if credentials are provided
    let mailer = match (
        std::env::var("EMAIL_USER").ok(),
        std::env::var("EMAIL_PASS").ok(),
    ) {
        (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
            let relay =
                std::env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string());
            tracing::info!("Initializing SMTP client via {}...", relay);
            match smtp_client::SmtpClient::new(&relay, user, pass) {
                Ok(client) => {
                    // Connection check runs in the background so a slow SMTP
                    // handshake never delays startup.
                    let probe = client.clone();
                    tokio::spawn(async move {
                        if probe.verify().await {
                            tracing::info!("SMTP connection verified");
                        } else {
                            tracing::warn!("SMTP relay rejected the connection test");
                        }
                    });
                    Some(client)
                }
                Err(e) => {
                    tracing::error!("Failed to initialize SMTP client: {}", e);
                    None
                }
            }
        }
        _ => {
            tracing::warn!("EMAIL_USER/EMAIL_PASS not found. Email notifications disabled.");
            None
        }
    };

    let shared_state = Arc::new(AppState {
        conversations: ConversationStore::new(),
        submissions: SubmissionStore::new(PathBuf::from(&data_dir)),
        llm,
        mailer,
        http_client: reqwest::Client::new(),
        upload_dir: PathBuf::from("uploads"),
    });

    let app = build_app(shared_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind server port");
    tracing::info!("listening on {}", listener.local_addr().expect("local addr"));
    axum::serve(listener, app).await.expect("server error");
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,nyx_backend=trace,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,nyx_backend=info,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for production (easier for log aggregation)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Nyx AI backend starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );
    tracing::info!("Log level: {}", log_level);

    let groq_configured = std::env::var("GROQ_API_KEY").is_ok();
    let gemini_configured = std::env::var("GEMINI_API_KEY").is_ok();
    let email_configured =
        std::env::var("EMAIL_USER").is_ok() && std::env::var("EMAIL_PASS").is_ok();

    tracing::info!(
        "Configuration - Groq: {}, Gemini: {}, Email: {}",
        if groq_configured { "yes" } else { "no" },
        if gemini_configured { "yes" } else { "no" },
        if email_configured { "yes" } else { "no" }
    );

    Ok(())
}
