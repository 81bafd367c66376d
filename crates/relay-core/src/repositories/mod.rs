//! Repository traits (ports)

pub mod conversation_repository;

pub use conversation_repository::ConversationStore;

#[cfg(test)]
pub use conversation_repository::MockConversationStore;
