// src/services/submission_store.rs
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::submission::{ContactEntry, WaitlistEntry};

const DEFAULT_NAME: &str = "Future Nyx User";

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only flat-file log of waitlist signups and contact submissions.
///
/// Each mutation is a whole-array read-modify-write of the JSON file plus a
/// CSV append. There is no locking: near-simultaneous writers can lose an
/// update. Accepted for single-operator usage; see DESIGN.md before adding
/// concurrency here.
pub struct SubmissionStore {
    data_dir: PathBuf,
}

impl SubmissionStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn waitlist_json(&self) -> PathBuf {
        self.data_dir.join("waitlist.json")
    }

    fn waitlist_csv(&self) -> PathBuf {
        self.data_dir.join("waitlist.csv")
    }

    fn contact_json(&self) -> PathBuf {
        self.data_dir.join("contact.json")
    }

    fn contact_csv(&self) -> PathBuf {
        self.data_dir.join("contact.csv")
    }

    /// Add a waitlist signup. Returns the stored entry plus the new total
    /// count (used for the "your spot" email).
    pub async fn add_waitlist(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<(WaitlistEntry, usize), SubmissionError> {
        if email.is_empty() || !email.contains('@') {
            return Err(SubmissionError::Validation("Valid email required".to_string()));
        }

        tokio::fs::create_dir_all(&self.data_dir).await?;

        let mut entries: Vec<WaitlistEntry> = read_json_array(&self.waitlist_json()).await?;

        // Exact, case-sensitive match, as built.
        if entries.iter().any(|entry| entry.email == email) {
            return Err(SubmissionError::Duplicate(
                "Email already registered".to_string(),
            ));
        }

        let entry = WaitlistEntry {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_NAME)
                .to_string(),
            joined_at: Utc::now(),
        };

        entries.push(entry.clone());
        let count = entries.len();
        write_json_array(&self.waitlist_json(), &entries).await?;

        let csv_line = format!(
            "{},{},{}\n",
            entry.joined_at.to_rfc3339(),
            entry.email,
            entry.name
        );
        if let Err(e) = append_line(&self.waitlist_csv(), &csv_line).await {
            // The JSON array is the source of truth; the CSV mirror is
            // best-effort only.
            tracing::warn!("Failed to append waitlist CSV line: {}", e);
        }

        Ok((entry, count))
    }

    pub async fn add_contact(
        &self,
        name: &str,
        email: &str,
        message: &str,
        phone: Option<&str>,
        subject: Option<&str>,
    ) -> Result<ContactEntry, SubmissionError> {
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(SubmissionError::Validation(
                "Name, email, and message are required".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&self.data_dir).await?;

        let mut entries: Vec<ContactEntry> = read_json_array(&self.contact_json()).await?;

        let entry = ContactEntry {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            phone: phone.filter(|p| !p.is_empty()).map(str::to_string),
            subject: subject.filter(|s| !s.is_empty()).map(str::to_string),
            submitted_at: Utc::now(),
        };

        entries.push(entry.clone());
        write_json_array(&self.contact_json(), &entries).await?;

        let csv_line = format!(
            "{},{},{},{}\n",
            entry.submitted_at.to_rfc3339(),
            entry.email,
            entry.name,
            entry.subject.as_deref().unwrap_or("")
        );
        if let Err(e) = append_line(&self.contact_csv(), &csv_line).await {
            tracing::warn!("Failed to append contact CSV line: {}", e);
        }

        Ok(entry)
    }

    pub async fn list_waitlist(&self) -> Result<Vec<WaitlistEntry>, SubmissionError> {
        read_json_array(&self.waitlist_json()).await
    }

    pub async fn list_contacts(&self) -> Result<Vec<ContactEntry>, SubmissionError> {
        read_json_array(&self.contact_json()).await
    }
}

/// Missing file reads as an empty list; corrupted JSON is a hard error.
async fn read_json_array<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Vec<T>, SubmissionError> {
    match tokio::fs::read_to_string(path).await {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_json_array<T: serde::Serialize>(
    path: &Path,
    entries: &[T],
) -> Result<(), SubmissionError> {
    let json = serde_json::to_string_pretty(entries)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, SubmissionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_count_unchanged() {
        let (_dir, store) = test_store();

        let (first, count) = store.add_waitlist("a@b.com", Some("A")).await.unwrap();
        assert_eq!(first.email, "a@b.com");
        assert_eq!(count, 1);

        let err = store.add_waitlist("a@b.com", Some("A again")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Duplicate(_)));

        // Exactly one record persisted.
        assert_eq!(store.list_waitlist().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let (_dir, store) = test_store();

        for bad in ["", "not-an-email"] {
            let err = store.add_waitlist(bad, None).await.unwrap_err();
            assert!(matches!(err, SubmissionError::Validation(_)));
        }
        assert!(store.list_waitlist().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_name_gets_default() {
        let (_dir, store) = test_store();
        let (entry, _) = store.add_waitlist("x@y.com", None).await.unwrap();
        assert_eq!(entry.name, DEFAULT_NAME);
    }

    #[tokio::test]
    async fn contact_requires_name_email_and_message() {
        let (_dir, store) = test_store();

        let err = store
            .add_contact("Jo", "jo@example.com", "", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));
        assert!(store.list_contacts().await.unwrap().is_empty());

        let entry = store
            .add_contact("Jo", "jo@example.com", "hello", Some("555"), None)
            .await
            .unwrap();
        assert_eq!(entry.phone.as_deref(), Some("555"));
        assert_eq!(store.list_contacts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn csv_mirror_is_appended() {
        let (dir, store) = test_store();
        store.add_waitlist("a@b.com", Some("A")).await.unwrap();
        store.add_waitlist("c@d.com", Some("C")).await.unwrap();

        let csv = std::fs::read_to_string(dir.path().join("waitlist.csv")).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("a@b.com,A"));
    }
}
