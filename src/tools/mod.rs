//! Tool subsystem for deterministic command handlers.
//!
//! Each tool implements the [`Tool`] trait defined in [`traits`]: a canonical
//! command token, optional aliases, a usage line, and a synchronous `execute`
//! that turns the raw argument string into a reply. Tools never fail; bad
//! input produces a usage or error message.
//!
//! Tools are assembled into a [`ToolRegistry`] by [`default_registry`]. The
//! registry is immutable after construction and maps every token (canonical
//! name and aliases) to its tool.
//!
//! # Extension
//!
//! To add a new tool, implement [`Tool`] in a new submodule and register it in
//! [`default_tools`]. The help listing picks it up automatically.

pub mod calculator;
pub mod convert;
pub mod datetime;
pub mod help;
pub mod password;
pub mod random;
pub mod summary;
pub mod text;
pub mod traits;

pub use calculator::CalculatorTool;
pub use convert::ConvertTool;
pub use datetime::{DateTool, TimeTool};
pub use help::HelpTool;
pub use password::PasswordTool;
pub use random::{CoinTool, DiceTool, RandomTool};
pub use summary::SummaryTool;
pub use text::{CountTool, HelloTool, JsonTool, ReminderTool};
pub use traits::{Tool, ToolCategory, ToolContext, ToolSpec};

use std::collections::HashMap;

/// Static table from command token to tool.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry. When two tools claim the same token the first one
    /// registered keeps it.
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        let mut index = HashMap::new();
        for (position, tool) in tools.iter().enumerate() {
            let tokens = std::iter::once(tool.name()).chain(tool.aliases().iter().copied());
            for token in tokens {
                let token = token.to_ascii_lowercase();
                if index.contains_key(&token) {
                    tracing::warn!(
                        token = %token,
                        tool = tool.name(),
                        "Duplicate tool token ignored"
                    );
                    continue;
                }
                index.insert(token, position);
            }
        }
        Self { tools, index }
    }

    /// Find the tool registered for an already-lowercased command token.
    pub fn lookup(&self, token: &str) -> Option<&dyn Tool> {
        self.index.get(token).map(|&i| self.tools[i].as_ref())
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    /// Every routable token, sorted.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.index.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The built-in tools, excluding `help` which lists them.
pub fn default_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(CalculatorTool),
        Box::new(RandomTool),
        Box::new(DiceTool),
        Box::new(CoinTool),
        Box::new(TimeTool),
        Box::new(DateTool),
        Box::new(CountTool),
        Box::new(JsonTool),
        Box::new(ConvertTool),
        Box::new(PasswordTool),
        Box::new(HelloTool),
        Box::new(ReminderTool),
        Box::new(SummaryTool),
    ]
}

/// Create the full registry: built-in tools plus a help tool describing them.
pub fn default_registry() -> ToolRegistry {
    let mut tools = default_tools();
    let specs = tools.iter().map(|t| t.spec()).collect();
    tools.push(Box::new(HelpTool::new(specs)));
    ToolRegistry::new(tools)
}
