use serde::{Deserialize, Serialize};

use crate::sessions::ConversationStore;

/// Grouping used when listing tools in help output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolCategory {
    Math,
    TimeDate,
    Text,
    Utilities,
    Help,
}

impl ToolCategory {
    pub fn title(self) -> &'static str {
        match self {
            ToolCategory::Math => "Math & Numbers",
            ToolCategory::TimeDate => "Time & Date",
            ToolCategory::Text => "Text & Data",
            ToolCategory::Utilities => "Utilities",
            ToolCategory::Help => "Help",
        }
    }
}

/// Per-call inputs a tool may need beyond its argument string.
pub struct ToolContext<'a> {
    pub session_id: &'a str,
    pub store: &'a dyn ConversationStore,
}

/// Description of a tool for display and listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
    pub description: String,
    pub category: ToolCategory,
}

/// A deterministic command handler.
///
/// `execute` always produces a displayable string. Bad input yields a usage
/// or error message rather than a Rust error.
pub trait Tool: Send + Sync {
    /// Canonical command token (lowercase).
    fn name(&self) -> &str;

    /// Extra tokens routed to the same tool.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line usage, e.g. `dice [sides] [count]`.
    fn usage(&self) -> &str;

    fn description(&self) -> &str;

    fn category(&self) -> ToolCategory;

    fn execute(&self, args: &str, ctx: &ToolContext<'_>) -> String;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            aliases: self.aliases().iter().map(|a| (*a).to_string()).collect(),
            usage: self.usage().to_string(),
            description: self.description().to_string(),
            category: self.category(),
        }
    }
}
