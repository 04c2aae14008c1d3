//! In-memory conversation store implementation.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::traits::{ConversationStore, Message, Role, SessionMetadata};

/// Messages kept per session when no explicit limit is configured.
pub const MAX_HISTORY: usize = 30;

struct SessionState {
    messages: Vec<Message>,
    metadata: SessionMetadata,
    /// Set once the session has been cleared; writers holding a stale handle
    /// must look the session up again.
    retired: bool,
}

impl SessionState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            messages: Vec::new(),
            metadata: SessionMetadata {
                message_count: 0,
                started_at: now,
                last_activity: now,
            },
            retired: false,
        }
    }
}

/// An in-memory conversation store with one lock per session.
///
/// The outer map lock is only held long enough to find or create a session
/// handle, so appends to unrelated sessions never wait on each other.
pub struct InMemoryConversationStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<SessionState>>>>,
    max_history: usize,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::with_max_history(MAX_HISTORY)
    }

    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_history,
        }
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    fn slot_or_create(&self, session_id: &str) -> Arc<Mutex<SessionState>> {
        let mut sessions = self.sessions.lock();
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SessionState::new(Utc::now()))))
            .clone()
    }

    fn slot(&self, session_id: &str) -> Option<Arc<Mutex<SessionState>>> {
        self.sessions.lock().get(session_id).cloned()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim `messages` to at most `max_history` entries, keeping a leading
/// system message in front of the most recent tail.
pub(crate) fn apply_retention(messages: &mut Vec<Message>, max_history: usize) {
    if messages.len() <= max_history {
        return;
    }

    if messages.first().is_some_and(Message::is_system) {
        let tail_start = messages.len() - max_history.saturating_sub(1);
        messages.drain(1..tail_start);
    } else {
        let start = messages.len() - max_history;
        messages.drain(..start);
    }
}

pub(crate) fn render_summary(
    metadata: &SessionMetadata,
    history: &[Message],
    now: DateTime<Utc>,
) -> String {
    let minutes = (now - metadata.started_at).num_minutes();
    let duration = if minutes > 0 {
        format!("{minutes} minute(s)")
    } else {
        "less than a minute".to_string()
    };

    let user_msgs = history.iter().filter(|m| m.role() == Role::User).count();
    let ai_msgs = history
        .iter()
        .filter(|m| m.role() == Role::Assistant)
        .count();

    format!(
        "💬 Conversation Summary:\n\
         • Total messages: {}\n\
         • Your messages: {user_msgs}\n\
         • My responses: {ai_msgs}\n\
         • Duration: {duration}\n\
         • Memory: {} messages stored",
        metadata.message_count,
        history.len()
    )
}

impl ConversationStore for InMemoryConversationStore {
    fn append(&self, session_id: &str, role: Role, content: &str) {
        loop {
            let slot = self.slot_or_create(session_id);
            let mut state = slot.lock();
            if state.retired {
                continue;
            }

            state.messages.push(Message::new(role, content));
            state.metadata.message_count += 1;
            state.metadata.last_activity = Utc::now();
            apply_retention(&mut state.messages, self.max_history);
            return;
        }
    }

    fn read(&self, session_id: &str) -> Vec<Message> {
        self.slot(session_id)
            .map(|slot| slot.lock().messages.clone())
            .unwrap_or_default()
    }

    fn metadata(&self, session_id: &str) -> Option<SessionMetadata> {
        self.slot(session_id).map(|slot| slot.lock().metadata.clone())
    }

    fn summarize(&self, session_id: &str) -> String {
        let Some(slot) = self.slot(session_id) else {
            return "No conversation history".to_string();
        };
        let state = slot.lock();
        render_summary(&state.metadata, &state.messages, Utc::now())
    }

    fn clear(&self, session_id: &str) {
        let removed = self.sessions.lock().remove(session_id);
        if let Some(slot) = removed {
            slot.lock().retired = true;
        }
        tracing::info!(session = %session_id, "Cleared history for session");
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(n: usize) -> String {
        format!("message {n}")
    }

    #[test]
    fn append_creates_session_and_preserves_order() {
        let store = InMemoryConversationStore::new();
        store.append("s1", Role::User, "hello");
        store.append("s1", Role::Assistant, "hi there");

        let history = store.read("s1");
        assert_eq!(
            history,
            vec![
                Message::User("hello".into()),
                Message::Assistant("hi there".into())
            ]
        );
        let meta = store.metadata("s1").unwrap();
        assert_eq!(meta.message_count, 2);
        assert!(meta.last_activity >= meta.started_at);
    }

    #[test]
    fn read_unknown_session_is_empty() {
        let store = InMemoryConversationStore::new();
        assert!(store.read("nobody").is_empty());
        assert!(store.metadata("nobody").is_none());
    }

    #[test]
    fn trims_to_most_recent_window() {
        let store = InMemoryConversationStore::new();
        for i in 0..45 {
            store.append("s1", Role::User, &user(i));
        }

        let history = store.read("s1");
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].content(), "message 15");
        assert_eq!(history[MAX_HISTORY - 1].content(), "message 44");
        // Trimming never rewinds the total counter.
        assert_eq!(store.metadata("s1").unwrap().message_count, 45);
    }

    #[test]
    fn leading_system_message_survives_every_trim() {
        let store = InMemoryConversationStore::with_max_history(5);
        store.append("s1", Role::System, "rules");
        for i in 0..20 {
            store.append("s1", Role::User, &user(i));
            let history = store.read("s1");
            assert_eq!(history[0], Message::System("rules".into()));
            assert!(history.len() <= 5);
        }

        let history = store.read("s1");
        let tail: Vec<&str> = history[1..].iter().map(Message::content).collect();
        assert_eq!(
            tail,
            vec!["message 16", "message 17", "message 18", "message 19"]
        );
    }

    #[test]
    fn system_message_is_pinned_once_it_reaches_the_front() {
        let store = InMemoryConversationStore::with_max_history(3);
        store.append("s1", Role::User, "first");
        store.append("s1", Role::System, "late rules");
        store.append("s1", Role::User, "second");
        // "first" is trimmed normally, leaving the system message at index 0.
        store.append("s1", Role::User, "third");
        store.append("s1", Role::User, "fourth");

        assert_eq!(
            store.read("s1"),
            vec![
                Message::System("late rules".into()),
                Message::User("third".into()),
                Message::User("fourth".into()),
            ]
        );
    }

    #[test]
    fn retention_keeps_short_histories_intact() {
        let mut messages = vec![Message::System("s".into()), Message::User("u".into())];
        apply_retention(&mut messages, 30);
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn clear_then_summarize_reports_no_history() {
        let store = InMemoryConversationStore::new();
        store.append("s1", Role::User, "hello");
        store.clear("s1");

        assert!(store.read("s1").is_empty());
        assert_eq!(store.summarize("s1"), "No conversation history");
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn clear_unknown_session_is_noop() {
        let store = InMemoryConversationStore::new();
        store.clear("ghost");
        store.clear("ghost");
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn append_after_clear_starts_fresh_session() {
        let store = InMemoryConversationStore::new();
        store.append("s1", Role::User, "old");
        store.clear("s1");
        store.append("s1", Role::User, "new");

        assert_eq!(store.read("s1"), vec![Message::User("new".into())]);
        assert_eq!(store.metadata("s1").unwrap().message_count, 1);
    }

    #[test]
    fn sessions_are_isolated() {
        let store = InMemoryConversationStore::new();
        store.append("a", Role::User, "for a");
        store.append("b", Role::User, "for b");
        store.clear("a");

        assert!(store.read("a").is_empty());
        assert_eq!(store.read("b"), vec![Message::User("for b".into())]);
    }

    #[test]
    fn summarize_counts_roles_in_window() {
        let store = InMemoryConversationStore::new();
        store.append("s1", Role::User, "q1");
        store.append("s1", Role::Assistant, "a1");
        store.append("s1", Role::User, "q2");

        let summary = store.summarize("s1");
        assert!(summary.contains("Total messages: 3"));
        assert!(summary.contains("Your messages: 2"));
        assert!(summary.contains("My responses: 1"));
        assert!(summary.contains("Duration: less than a minute"));
        assert!(summary.contains("Memory: 3 messages stored"));
    }

    #[test]
    fn summary_reports_elapsed_minutes() {
        let now = Utc::now();
        let meta = SessionMetadata {
            message_count: 40,
            started_at: now - Duration::seconds(185),
            last_activity: now,
        };
        let summary = render_summary(&meta, &[Message::User("x".into())], now);
        assert!(summary.contains("Duration: 3 minute(s)"));
        assert!(summary.contains("Total messages: 40"));
        assert!(summary.contains("Memory: 1 messages stored"));
    }

    #[test]
    fn concurrent_appends_to_one_session_are_all_counted() {
        let store = Arc::new(InMemoryConversationStore::with_max_history(1000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.append("shared", Role::User, &format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.read("shared").len(), 400);
        assert_eq!(store.metadata("shared").unwrap().message_count, 400);
    }
}
