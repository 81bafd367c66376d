//! Conversation reference store trait (port)
//!
//! Contract shared by every backing:
//! - `put` inserts or overwrites; the last completed write for an id wins.
//! - `get` after a completed `put` returns that put's reference, never an older one.
//! - There is no expiry and no capacity bound.

use async_trait::async_trait;

use crate::domain::ConversationReference;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn put(
        &self,
        conversation_id: &str,
        reference: ConversationReference,
    ) -> Result<(), DomainError>;

    async fn get(&self, conversation_id: &str) -> Result<Option<ConversationReference>, DomainError>;

    async fn remove(&self, conversation_id: &str)
        -> Result<Option<ConversationReference>, DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;
}
