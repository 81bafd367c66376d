// ============================================================================
// Relay Infrastructure - In-memory Conversation Store
// File: crates/relay-infrastructure/src/store/memory.rs
// ============================================================================

use async_trait::async_trait;
use dashmap::DashMap;

use relay_core::domain::ConversationReference;
use relay_core::error::DomainError;
use relay_core::repositories::ConversationStore;

/// Process-local store. References live until the process exits.
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    references: DashMap<String, ConversationReference>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn put(
        &self,
        conversation_id: &str,
        reference: ConversationReference,
    ) -> Result<(), DomainError> {
        self.references.insert(conversation_id.to_string(), reference);
        Ok(())
    }

    async fn get(&self, conversation_id: &str) -> Result<Option<ConversationReference>, DomainError> {
        Ok(self.references.get(conversation_id).map(|r| r.value().clone()))
    }

    async fn remove(&self, conversation_id: &str) -> Result<Option<ConversationReference>, DomainError> {
        Ok(self.references.remove(conversation_id).map(|(_, r)| r))
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.references.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::domain::{ChannelAccount, ConversationAccount};
    use std::sync::Arc;

    fn reference(conversation_id: &str, service_url: &str) -> ConversationReference {
        ConversationReference {
            activity_id: None,
            user: None,
            bot: ChannelAccount { id: "28:bot".into(), ..Default::default() },
            conversation: ConversationAccount { id: conversation_id.into(), ..Default::default() },
            channel_id: "msteams".into(),
            locale: None,
            service_url: service_url.into(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryConversationStore::new();
        store.put("abc123", reference("abc123", "https://a/")).await.unwrap();

        let found = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(found.service_url, "https://a/");
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_put_overwrites() {
        let store = MemoryConversationStore::new();
        store.put("abc123", reference("abc123", "https://a/")).await.unwrap();
        store.put("abc123", reference("abc123", "https://b/")).await.unwrap();

        assert_eq!(store.get("abc123").await.unwrap().unwrap().service_url, "https://b/");
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryConversationStore::new();
        store.put("abc123", reference("abc123", "https://a/")).await.unwrap();

        assert!(store.remove("abc123").await.unwrap().is_some());
        assert!(store.get("abc123").await.unwrap().is_none());
        assert!(store.remove("abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_writers_on_distinct_ids() {
        let store = Arc::new(MemoryConversationStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("conv-{i}");
                store.put(&id, reference(&id, "https://a/")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await.unwrap(), 32);
    }
}
