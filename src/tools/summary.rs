use super::traits::{Tool, ToolCategory, ToolContext};

/// Reports statistics for the calling session.
pub struct SummaryTool;

impl Tool for SummaryTool {
    fn name(&self) -> &str {
        "summary"
    }

    fn aliases(&self) -> &[&str] {
        &["stats"]
    }

    fn usage(&self) -> &str {
        "summary"
    }

    fn description(&self) -> &str {
        "Conversation statistics"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Help
    }

    fn execute(&self, _args: &str, ctx: &ToolContext<'_>) -> String {
        ctx.store.summarize(ctx.session_id)
    }
}
