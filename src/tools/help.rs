use super::traits::{Tool, ToolCategory, ToolContext, ToolSpec};

const NAME: &str = "help";
const ALIASES: &[&str] = &["tools"];
const USAGE: &str = "help";
const DESCRIPTION: &str = "Show this message";

/// Lists every registered tool, grouped by category.
pub struct HelpTool {
    listing: String,
}

impl HelpTool {
    pub fn new(mut specs: Vec<ToolSpec>) -> Self {
        specs.push(ToolSpec {
            name: NAME.to_string(),
            aliases: ALIASES.iter().map(|a| (*a).to_string()).collect(),
            usage: USAGE.to_string(),
            description: DESCRIPTION.to_string(),
            category: ToolCategory::Help,
        });
        Self {
            listing: render_listing(specs),
        }
    }
}

fn render_listing(mut specs: Vec<ToolSpec>) -> String {
    // Stable sort keeps registration order inside each category.
    specs.sort_by_key(|s| s.category);

    let mut out = String::from("🛠️ Available Tools:");
    let mut current = None;
    for spec in &specs {
        if current != Some(spec.category) {
            out.push_str(&format!("\n\n**{}:**", spec.category.title()));
            current = Some(spec.category);
        }
        out.push_str(&format!("\n• {} - {}", spec.usage, spec.description));
        if !spec.aliases.is_empty() {
            out.push_str(&format!(" (also: {})", spec.aliases.join(", ")));
        }
    }
    out
}

impl Tool for HelpTool {
    fn name(&self) -> &str {
        NAME
    }

    fn aliases(&self) -> &[&str] {
        ALIASES
    }

    fn usage(&self) -> &str {
        USAGE
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Help
    }

    fn execute(&self, _args: &str, _ctx: &ToolContext<'_>) -> String {
        self.listing.clone()
    }
}
