//! Session management: per-session conversation history and metadata.

pub mod in_memory;
pub mod traits;

pub use in_memory::{InMemoryConversationStore, MAX_HISTORY};
pub use traits::{ConversationStore, Message, Role, SessionMetadata};

use std::sync::Arc;

/// Create the default in-memory conversation store.
pub fn create_conversation_store(max_history: usize) -> Arc<dyn ConversationStore> {
    Arc::new(InMemoryConversationStore::with_max_history(max_history))
}
