//! Conversation storage traits and types for per-session chat history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a session's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        let content = content.into();
        match role {
            Role::System => Message::System(content),
            Role::User => Message::User(content),
            Role::Assistant => Message::Assistant(content),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Message::System(_) => Role::System,
            Message::User(_) => Role::User,
            Message::Assistant(_) => Role::Assistant,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(c) | Message::User(c) | Message::Assistant(c) => c,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Message::System(_))
    }
}

/// Bookkeeping kept alongside a session's messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Every append ever made, including messages later trimmed away.
    pub message_count: u64,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Volatile, per-session conversation history.
///
/// All operations are total: unknown sessions read as empty and clearing
/// one that does not exist is a no-op.
pub trait ConversationStore: Send + Sync {
    /// Append a message, creating the session on first use, then apply the
    /// retention window.
    fn append(&self, session_id: &str, role: Role, content: &str);

    /// The retained messages of a session, oldest first.
    fn read(&self, session_id: &str) -> Vec<Message>;

    /// Snapshot of the session's metadata, if the session exists.
    fn metadata(&self, session_id: &str) -> Option<SessionMetadata>;

    /// Human-readable statistics about a session.
    fn summarize(&self, session_id: &str) -> String;

    /// Drop both messages and metadata for a session.
    fn clear(&self, session_id: &str);

    /// The name of this store implementation.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_new_matches_role() {
        for role in [Role::System, Role::User, Role::Assistant] {
            let msg = Message::new(role, "hi");
            assert_eq!(msg.role(), role);
            assert_eq!(msg.content(), "hi");
        }
    }

    #[test]
    fn only_system_variant_is_system() {
        assert!(Message::System("rules".into()).is_system());
        assert!(!Message::User("rules".into()).is_system());
        assert!(!Message::Assistant("rules".into()).is_system());
    }

    #[test]
    fn message_serializes_with_role_tag() {
        let json = serde_json::to_string(&Message::User("hello".into())).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }
}
