//! Conversation reference store adapters

pub mod memory;
pub mod file;

pub use memory::MemoryConversationStore;
pub use file::FileConversationStore;
