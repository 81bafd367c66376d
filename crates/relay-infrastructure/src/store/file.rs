//! File-backed conversation store.
//!
//! Keeps every reference in memory and mirrors the whole map into a JSON
//! snapshot after each change, so stored conversations survive a restart.
//! The snapshot is written to a sibling temp file and renamed into place.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use relay_core::domain::ConversationReference;
use relay_core::error::DomainError;
use relay_core::repositories::ConversationStore;

type References = HashMap<String, ConversationReference>;

pub struct FileConversationStore {
    path: PathBuf,
    references: Mutex<References>,
}

impl FileConversationStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let references: References = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                DomainError::Store(format!("corrupt snapshot {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => References::new(),
            Err(e) => {
                return Err(DomainError::Store(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        info!(
            "Loaded {} conversation references from {}",
            references.len(),
            path.display()
        );
        Ok(Self {
            path,
            references: Mutex::new(references),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, references: &References) -> Result<(), DomainError> {
        let bytes = serde_json::to_vec_pretty(references)
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(format!(".{}.tmp", Uuid::new_v4()));
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| DomainError::Store(format!("cannot write {}: {}", tmp.display(), e)))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(DomainError::Store(format!(
                "cannot replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!("Wrote {} references to {}", references.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn put(
        &self,
        conversation_id: &str,
        reference: ConversationReference,
    ) -> Result<(), DomainError> {
        // Lock is held across the write so snapshots land in put order. Memory
        // only changes once the snapshot is on disk.
        let mut references = self.references.lock().await;
        let mut next = references.clone();
        next.insert(conversation_id.to_string(), reference);
        self.persist(&next).await?;
        *references = next;
        Ok(())
    }

    async fn get(&self, conversation_id: &str) -> Result<Option<ConversationReference>, DomainError> {
        Ok(self.references.lock().await.get(conversation_id).cloned())
    }

    async fn remove(&self, conversation_id: &str) -> Result<Option<ConversationReference>, DomainError> {
        let mut references = self.references.lock().await;
        if !references.contains_key(conversation_id) {
            return Ok(None);
        }

        let mut next = references.clone();
        let removed = next.remove(conversation_id);
        self.persist(&next).await?;
        *references = next;
        Ok(removed)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.references.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::domain::{ChannelAccount, ConversationAccount};
    use serde_json::json;
    use tempfile::TempDir;

    fn reference(conversation_id: &str, service_url: &str) -> ConversationReference {
        ConversationReference {
            activity_id: Some("act-1".into()),
            user: Some(ChannelAccount { id: "29:user".into(), ..Default::default() }),
            bot: ChannelAccount { id: "28:bot".into(), ..Default::default() },
            conversation: ConversationAccount { id: conversation_id.into(), ..Default::default() },
            channel_id: "msteams".into(),
            locale: Some("en-US".into()),
            service_url: service_url.into(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileConversationStore::open(dir.path().join("refs.json")).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_references_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.json");

        let store = FileConversationStore::open(&path).await.unwrap();
        store.put("abc123", reference("abc123", "https://a/")).await.unwrap();
        store.put("abc123", reference("abc123", "https://b/")).await.unwrap();
        store.put("def456", reference("def456", "https://a/")).await.unwrap();
        store.remove("def456").await.unwrap();
        drop(store);

        let reopened = FileConversationStore::open(&path).await.unwrap();
        assert_eq!(reopened.len().await.unwrap(), 1);
        assert_eq!(
            reopened.get("abc123").await.unwrap().unwrap().service_url,
            "https://b/"
        );
    }

    #[tokio::test]
    async fn test_seeded_snapshot_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.json");
        std::fs::write(
            &path,
            json!({
                "19:meeting_abc@thread.v2": {
                    "bot": { "id": "28:bot" },
                    "conversation": { "id": "19:meeting_abc@thread.v2", "isGroup": true },
                    "channelId": "msteams",
                    "serviceUrl": "https://smba.trafficmanager.net/amer/"
                }
            })
            .to_string(),
        )
        .unwrap();

        let store = FileConversationStore::open(&path).await.unwrap();
        let found = store.get("19:meeting_abc@thread.v2").await.unwrap().unwrap();
        assert_eq!(found.conversation.extra.get("isGroup"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileConversationStore::open(&path).await,
            Err(DomainError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_snapshot_write_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.json");
        let store = FileConversationStore::open(&path).await.unwrap();
        store.put("abc123", reference("abc123", "https://a/")).await.unwrap();

        // Replace the snapshot with a directory so the rename fails.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.put("def456", reference("def456", "https://a/")).await,
            Err(DomainError::Store(_))
        ));
        assert!(store.get("def456").await.unwrap().is_none());

        assert!(store.remove("abc123").await.is_err());
        assert!(store.get("abc123").await.unwrap().is_some());
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_location_rejects_put() {
        let dir = TempDir::new().unwrap();
        let store = FileConversationStore::open(dir.path().join("missing").join("refs.json"))
            .await
            .unwrap();

        assert!(store.put("abc123", reference("abc123", "https://a/")).await.is_err());
        assert!(store.get("abc123").await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = FileConversationStore::open(dir.path().join("refs.json")).await.unwrap();
        store.put("abc123", reference("abc123", "https://a/")).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
