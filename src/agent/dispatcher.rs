use crate::agent::parser::parse_command;
use crate::providers::{sanitize_api_error, ChatMessage, Provider};
use crate::sessions::{ConversationStore, Message, Role};
use crate::tools::{ToolContext, ToolRegistry};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant with conversation memory and powerful tools.
You remember the context of our conversation and can reference previous messages.

When users ask questions, use the conversation history to provide contextual, relevant responses.
You have access to many tools - use them when appropriate to help users effectively.

Be friendly, helpful, and concise in your responses.";

/// Reply recorded and returned whenever the model call fails or times out.
pub const MODEL_ERROR_REPLY: &str =
    "I encountered an error processing your request. Please try again.";

pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(120);

/// Rejections raised at the transport boundary, before a turn starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InboundError {
    #[error("Message is empty")]
    Empty,
    #[error("Message is too long ({len} characters, limit is {max})")]
    TooLong { len: usize, max: usize },
}

/// Check inbound text before it is handed to [`Dispatcher::dispatch`].
pub fn validate_inbound(text: &str, max_chars: usize) -> Result<(), InboundError> {
    if text.trim().is_empty() {
        return Err(InboundError::Empty);
    }
    let len = text.chars().count();
    if len > max_chars {
        return Err(InboundError::TooLong {
            len,
            max: max_chars,
        });
    }
    Ok(())
}

/// How a turn was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    ToolHandled { tool: String, output: String },
    ModelReply { content: String },
    ModelFailed { content: String },
}

impl DispatchResult {
    pub fn reply(&self) -> &str {
        match self {
            Self::ToolHandled { output, .. } => output,
            Self::ModelReply { content } | Self::ModelFailed { content } => content,
        }
    }

    pub fn into_reply(self) -> String {
        match self {
            Self::ToolHandled { output, .. } => output,
            Self::ModelReply { content } | Self::ModelFailed { content } => content,
        }
    }
}

/// Routes each inbound message to a tool or to the model and records both
/// sides of the exchange in the conversation store.
///
/// Turns for the same session run one at a time in arrival order. Turns for
/// different sessions never wait on each other.
pub struct Dispatcher {
    provider: Arc<dyn Provider>,
    store: Arc<dyn ConversationStore>,
    registry: Arc<ToolRegistry>,
    model: String,
    temperature: f64,
    system_prompt: String,
    model_timeout: Duration,
    turn_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn ConversationStore>,
        registry: Arc<ToolRegistry>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            store,
            registry,
            model: model.into(),
            temperature,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Process one inbound message and return the reply text.
    pub async fn run(&self, session_id: &str, text: &str) -> String {
        self.dispatch(session_id, text).await.into_reply()
    }

    /// Process one inbound message. Never fails: model errors become
    /// [`DispatchResult::ModelFailed`] carrying [`MODEL_ERROR_REPLY`].
    pub async fn dispatch(&self, session_id: &str, text: &str) -> DispatchResult {
        let turn = self.turn_lock(session_id);
        let result = {
            let _guard = turn.lock().await;
            self.process(session_id, text).await
        };
        drop(turn);
        self.release_turn_lock(session_id);
        result
    }

    /// Drop all history for a session once any in-flight turn has finished.
    pub async fn clear(&self, session_id: &str) {
        let turn = self.turn_lock(session_id);
        {
            let _guard = turn.lock().await;
            self.store.clear(session_id);
        }
        drop(turn);
        self.release_turn_lock(session_id);
    }

    async fn process(&self, session_id: &str, text: &str) -> DispatchResult {
        self.store.append(session_id, Role::User, text);

        let (command, args) = parse_command(text);
        if let Some(tool) = self.registry.lookup(&command) {
            tracing::debug!(session = session_id, tool = tool.name(), "Routing to tool");
            let ctx = ToolContext {
                session_id,
                store: self.store.as_ref(),
            };
            let output = tool.execute(args, &ctx);
            self.store.append(session_id, Role::Assistant, &output);
            return DispatchResult::ToolHandled {
                tool: tool.name().to_string(),
                output,
            };
        }

        let messages = self.model_view(session_id);
        tracing::info!(
            session = session_id,
            history = messages.len(),
            model = %self.model,
            "Processing with model"
        );

        match self.invoke_model(&messages).await {
            Ok(content) => {
                self.store.append(session_id, Role::Assistant, &content);
                DispatchResult::ModelReply { content }
            }
            Err(e) => {
                let error = sanitize_api_error(&format!("{e:#}"));
                tracing::error!(session = session_id, error = %error, "Model invocation failed");
                self.store.append(session_id, Role::Assistant, MODEL_ERROR_REPLY);
                DispatchResult::ModelFailed {
                    content: MODEL_ERROR_REPLY.to_string(),
                }
            }
        }
    }

    /// Retained history with the system instruction in front when the
    /// session does not already start with one. Nothing is written back.
    fn model_view(&self, session_id: &str) -> Vec<ChatMessage> {
        let history = self.store.read(session_id);
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !history.first().is_some_and(Message::is_system) {
            messages.push(ChatMessage::system(self.system_prompt.as_str()));
        }
        messages.extend(history.iter().map(ChatMessage::from));
        messages
    }

    async fn invoke_model(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let call = self
            .provider
            .chat_with_history(messages, &self.model, self.temperature);
        match tokio::time::timeout(self.model_timeout, call).await {
            Ok(result) => result,
            Err(_) => anyhow::bail!(
                "{} did not respond within {}s",
                self.provider.name(),
                self.model_timeout.as_secs_f64()
            ),
        }
    }

    fn turn_lock(&self, session_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.turn_locks
            .lock()
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Forget the session's turn lock when no other turn holds or awaits it.
    fn release_turn_lock(&self, session_id: &str) {
        let mut locks = self.turn_locks.lock();
        if locks
            .get(session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(session_id);
        }
    }

    #[cfg(test)]
    fn turn_lock_count(&self) -> usize {
        self.turn_locks.lock().len()
    }
}
