// src/services/conversation_store.rs
use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::chat::{ChatMessage, Conversation};

pub const GREETING: &str = "Hi! I'm Nyx. How can I help you today?";
pub const DEFAULT_TITLE: &str = "New Conversation";
const TITLE_PREFIX_LEN: usize = 30;

/// In-process conversation storage scoped to the process lifetime. A restart
/// discards all state; callers own durability decisions, not this store.
///
/// Held inside `AppState` so tests can run against an isolated instance and
/// a durable backend can slot in behind the same interface later.
pub struct ConversationStore {
    inner: RwLock<HashMap<String, Conversation>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Create a conversation seeded with the assistant greeting so the
    /// message list is never empty. Never fails.
    pub async fn create(&self) -> Conversation {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![ChatMessage::assistant(GREETING)],
            created_at: now,
            updated_at: now,
        };

        let mut map = self.inner.write().await;
        map.insert(conversation.id.clone(), conversation.clone());
        conversation
    }

    pub async fn get(&self, id: &str) -> Option<Conversation> {
        self.inner.read().await.get(id).cloned()
    }

    /// All conversations, most recently active first.
    pub async fn list(&self) -> Vec<Conversation> {
        let map = self.inner.read().await;
        let mut conversations: Vec<Conversation> = map.values().cloned().collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        conversations
    }

    /// Materialize a conversation under a caller-chosen id (the lazy-create
    /// path of the message orchestrator). Seeded with the greeting like
    /// `create`, but the id and title come from the caller.
    pub async fn insert_with_id(&self, id: &str, title: &str) -> Conversation {
        let now = Utc::now();
        let conversation = Conversation {
            id: id.to_string(),
            title: title.to_string(),
            messages: vec![ChatMessage::assistant(GREETING)],
            created_at: now,
            updated_at: now,
        };

        let mut map = self.inner.write().await;
        map.insert(id.to_string(), conversation.clone());
        conversation
    }

    /// Append a message, refreshing `updated_at`. Returns the updated
    /// conversation, or `None` when the id is unknown.
    pub async fn append(&self, id: &str, message: ChatMessage) -> Option<Conversation> {
        let mut map = self.inner.write().await;
        let conversation = map.get_mut(id)?;
        conversation.messages.push(message);
        conversation.updated_at = Utc::now();
        Some(conversation.clone())
    }

    pub async fn set_title(&self, id: &str, title: String) {
        let mut map = self.inner.write().await;
        if let Some(conversation) = map.get_mut(id) {
            conversation.title = title;
        }
    }

    /// Remove a conversation. Idempotent; reports whether anything was
    /// actually removed.
    pub async fn delete(&self, id: &str) -> bool {
        self.inner.write().await.remove(id).is_some()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Title shown in the sidebar: a fixed prefix of the first real message.
pub fn derive_title(message: &str) -> String {
    let prefix: String = message.chars().take(TITLE_PREFIX_LEN).collect();
    if message.chars().count() > TITLE_PREFIX_LEN {
        format!("{}...", prefix)
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::MessageRole;

    #[tokio::test]
    async fn create_seeds_assistant_greeting() {
        let store = ConversationStore::new();
        let conversation = store.create().await;

        assert!(!conversation.messages.is_empty());
        assert_eq!(conversation.messages[0].role, MessageRole::Assistant);
        assert_eq!(conversation.messages[0].content, GREETING);
        assert_eq!(conversation.title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn list_orders_by_recency_and_append_moves_to_front() {
        let store = ConversationStore::new();
        let first = store.create().await;
        let second = store.create().await;

        // Appending to the older conversation must move it to the front.
        store.append(&first.id, ChatMessage::user("hello")).await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[tokio::test]
    async fn append_refreshes_updated_at() {
        let store = ConversationStore::new();
        let conversation = store.create().await;
        let before = conversation.updated_at;

        let updated = store
            .append(&conversation.id, ChatMessage::user("hi"))
            .await
            .unwrap();
        assert!(updated.updated_at >= before);
        assert_eq!(updated.messages.len(), 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = ConversationStore::new();
        let conversation = store.create().await;

        assert!(store.delete(&conversation.id).await);
        assert!(!store.delete(&conversation.id).await);
        assert!(store.get(&conversation.id).await.is_none());
    }

    #[test]
    fn derive_title_truncates_long_messages() {
        let long = "a".repeat(50);
        let title = derive_title(&long);
        assert_eq!(title, format!("{}...", "a".repeat(30)));

        assert_eq!(derive_title("hi"), "hi");
    }
}
