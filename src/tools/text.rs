//! Text tools: greetings, word statistics, JSON formatting and reminders.

use rand::seq::SliceRandom;
use regex::Regex;
use std::sync::OnceLock;

use super::traits::{Tool, ToolCategory, ToolContext};

const MAX_NAME_CHARS: usize = 50;

pub fn say_hello(name: &str) -> String {
    let name: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
    if name.is_empty() {
        return "Hello! Please provide a name.".to_string();
    }

    let greetings = [
        format!("Hello {name}, nice to meet you! 👋"),
        format!("Hi {name}! How can I help you today?"),
        format!("Greetings {name}! Welcome!"),
        format!("Hey {name}! Great to see you here! 😊"),
    ];
    greetings
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

fn sentence_splitter() -> &'static Regex {
    static SPLITTER: OnceLock<Regex> = OnceLock::new();
    SPLITTER.get_or_init(|| Regex::new(r"[.!?]+").expect("static sentence pattern"))
}

pub fn word_counter(text: &str) -> String {
    if text.is_empty() {
        return "Please provide text to analyze".to_string();
    }

    let words = text.split_whitespace().count();
    let chars = text.chars().count();
    let chars_no_spaces = text.chars().filter(|c| *c != ' ').count();
    let lines = text.split('\n').count();
    let sentences = sentence_splitter()
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();

    format!(
        "📊 Text Statistics:\n\
         • Words: {words}\n\
         • Characters: {chars} (with spaces), {chars_no_spaces} (without spaces)\n\
         • Lines: {lines}\n\
         • Sentences: {sentences}"
    )
}

pub fn json_formatter(raw: &str) -> String {
    let parsed = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => value,
        Err(e) => return format!("❌ Invalid JSON: {e}"),
    };
    match serde_json::to_string_pretty(&parsed) {
        Ok(formatted) => format!("✅ Valid JSON:\n```json\n{formatted}\n```"),
        Err(e) => format!("❌ Invalid JSON: {e}"),
    }
}

pub fn reminder_format(task: &str) -> String {
    if task.is_empty() {
        return "Please specify a task for the reminder".to_string();
    }
    format!("⏰ Reminder noted: '{task}'\n(Note: This is a simulated reminder)")
}

pub struct HelloTool;

impl Tool for HelloTool {
    fn name(&self) -> &str {
        "hello"
    }

    fn aliases(&self) -> &[&str] {
        &["hi"]
    }

    fn usage(&self) -> &str {
        "hello [name]"
    }

    fn description(&self) -> &str {
        "Greeting"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Utilities
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        if args.is_empty() {
            return "Please provide a name".to_string();
        }
        say_hello(args)
    }
}

pub struct CountTool;

impl Tool for CountTool {
    fn name(&self) -> &str {
        "count"
    }

    fn usage(&self) -> &str {
        "count [text]"
    }

    fn description(&self) -> &str {
        "Word/character counter"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Text
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        if args.is_empty() {
            return "Provide text to count".to_string();
        }
        word_counter(args)
    }
}

pub struct JsonTool;

impl Tool for JsonTool {
    fn name(&self) -> &str {
        "json"
    }

    fn usage(&self) -> &str {
        "json [data]"
    }

    fn description(&self) -> &str {
        "Format/validate JSON"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Text
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        if args.is_empty() {
            return "Provide JSON to format".to_string();
        }
        json_formatter(args)
    }
}

pub struct ReminderTool;

impl Tool for ReminderTool {
    fn name(&self) -> &str {
        "reminder"
    }

    fn usage(&self) -> &str {
        "reminder [task]"
    }

    fn description(&self) -> &str {
        "Note a reminder (simulated)"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Utilities
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        if args.is_empty() {
            return "Specify a task".to_string();
        }
        reminder_format(args)
    }
}
