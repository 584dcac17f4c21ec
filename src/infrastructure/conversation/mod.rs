//! Conversation persistence implementations

mod in_memory;

pub use in_memory::InMemoryConversationStore;
