// src/services/extraction.rs
use std::path::Path;
use std::time::Duration;

use scraper::{Html, Selector};
use thiserror::Error;

const PDF_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const URL_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120 Safari/537.36";

/// Single error kind for the URL fetch path; the display message carries the
/// human-readable diagnosis (blocked, bad status, unreachable, empty page).
#[derive(Error, Debug)]
#[error("{0}")]
pub struct FetchError(pub String);

/// Extract plain text from an uploaded file, dispatching on extension.
///
/// Never errors: unreadable or unsupported files yield a marker string so a
/// chat turn can still proceed with the rest of its content. The uploaded
/// temp file is deleted on every exit path.
pub async fn extract_file_text(path: &Path, original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match ext.as_str() {
        "txt" => match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!("File extraction error for '{}': {}", original_name, e);
                format!("Error reading file: {}", e)
            }
        },
        "pdf" => extract_pdf_text(path, original_name).await,
        // Documented limitation, not an error.
        "docx" => "DOCX parsing coming soon".to_string(),
        other => format!("Unsupported file type: .{}", other),
    };

    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::error!("Error deleting temp file {}: {}", path.display(), e);
    }

    text
}

async fn extract_pdf_text(path: &Path, original_name: &str) -> String {
    let path = path.to_path_buf();
    let parsed = tokio::time::timeout(
        PDF_EXTRACTION_TIMEOUT,
        tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)),
    )
    .await;

    match parsed {
        Ok(Ok(Ok(text))) => text,
        Ok(Ok(Err(e))) => {
            tracing::error!("File extraction error for '{}': {}", original_name, e);
            format!("Error reading file: {}", e)
        }
        Ok(Err(join_err)) => {
            tracing::error!("PDF extraction task panicked for '{}': {}", original_name, join_err);
            format!("Error reading file: {}", join_err)
        }
        Err(_) => {
            tracing::error!("PDF extraction timed out for '{}'", original_name);
            "Error reading file: PDF extraction timed out".to_string()
        }
    }
}

/// Fetch a URL and return the visible text of the page body.
pub async fn fetch_url_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .header("User-Agent", BROWSER_USER_AGENT)
        .header("Accept", "text/html")
        .timeout(URL_FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|e| FetchError(format!("Unable to reach this URL: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        if matches!(status.as_u16(), 401 | 403 | 429) {
            return Err(FetchError(
                "This website blocks automated access. Please paste the text directly or try another link."
                    .to_string(),
            ));
        }
        return Err(FetchError(format!(
            "URL fetch failed with status code {}",
            status.as_u16()
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| FetchError(format!("Unable to reach this URL: {}", e)))?;

    let body_text = extract_body_text(&html);
    if body_text.is_empty() {
        return Err(FetchError("No text found on this page.".to_string()));
    }

    Ok(body_text)
}

// Sync helper: `scraper::Html` is not Send, so it must not live across an
// await point in the calling handler.
fn extract_body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").expect("static selector");

    let Some(body) = document.select(&body_selector).next() else {
        return String::new();
    };

    body.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn txt_file_is_read_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-1");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"lecture notes")
            .unwrap();

        let text = extract_file_text(&path, "notes.txt").await;
        assert_eq!(text, "lecture notes");
        assert!(!path.exists(), "temp file must be removed after extraction");
    }

    #[tokio::test]
    async fn unsupported_extension_yields_marker_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-2");
        std::fs::write(&path, b"binary").unwrap();

        let text = extract_file_text(&path, "slides.pptx").await;
        assert_eq!(text, "Unsupported file type: .pptx");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn docx_returns_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-3");
        std::fs::write(&path, b"zip bytes").unwrap();

        let text = extract_file_text(&path, "essay.docx").await;
        assert_eq!(text, "DOCX parsing coming soon");
    }

    #[tokio::test]
    async fn broken_pdf_yields_error_marker_not_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-4");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let text = extract_file_text(&path, "paper.pdf").await;
        assert!(text.starts_with("Error reading file:"), "got: {}", text);
        assert!(!path.exists());
    }

    #[test]
    fn body_text_is_extracted_and_trimmed() {
        let html = "<html><head><title>t</title></head><body><p> Hello </p><p>world</p></body></html>";
        assert_eq!(extract_body_text(html), "Hello world");
    }

    #[test]
    fn empty_body_yields_empty_string() {
        assert_eq!(extract_body_text("<html><body>   </body></html>"), "");
    }
}
