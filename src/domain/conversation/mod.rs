//! Conversation history, summarization, and versioned workflow state

mod entity;
mod state;
mod store;

pub use entity::{Conversation, ConversationTurn, TurnRole};
pub use state::{ConversationConfig, ConversationSnapshot, ConversationState};
pub use store::ConversationStore;

#[cfg(test)]
pub use store::tests as store_tests;
