use crate::agent::{validate_inbound, DispatchResult, Dispatcher, InboundError};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT: &str = "You: ";

/// Terminal channel: single-message mode and the interactive `You:` loop.
pub struct CliChannel {
    dispatcher: Arc<Dispatcher>,
    session_id: String,
    max_message_chars: usize,
}

impl CliChannel {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        session_id: impl Into<String>,
        max_message_chars: usize,
    ) -> Self {
        Self {
            dispatcher,
            session_id: session_id.into(),
            max_message_chars,
        }
    }

    /// Validate and dispatch one message.
    pub async fn send(&self, text: &str) -> Result<DispatchResult, InboundError> {
        validate_inbound(text, self.max_message_chars)?;
        Ok(self.dispatcher.dispatch(&self.session_id, text).await)
    }

    /// Read lines until EOF, `quit` or `exit`, printing each reply.
    pub async fn run_interactive<R, W>(&self, reader: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(
            out,
            "🟢 toolchat ({}) running - type 'quit' to exit, '/clear' to forget this conversation",
            self.dispatcher.model()
        )?;

        let mut lines = reader.lines();
        loop {
            write!(out, "\n{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
                break;
            }
            if input == "/clear" {
                self.dispatcher.clear(&self.session_id).await;
                writeln!(out, "[session cleared]")?;
                continue;
            }

            match self.send(input).await {
                Ok(result) => writeln!(out, "{}", render_reply(&result))?,
                Err(e) => writeln!(out, "⚠️ {e}")?,
            }
        }

        tracing::debug!(session = %self.session_id, "Interactive session ended");
        Ok(())
    }
}

/// Tool output is printed as-is; model replies get the `Assistant:` prefix.
pub fn render_reply(result: &DispatchResult) -> String {
    match result {
        DispatchResult::ToolHandled { output, .. } => output.clone(),
        DispatchResult::ModelReply { content } | DispatchResult::ModelFailed { content } => {
            format!("Assistant: {content}")
        }
    }
}
