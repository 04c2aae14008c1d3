use rand::Rng;

use super::traits::{Tool, ToolCategory, ToolContext};

const LETTERS_AND_DIGITS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const DEFAULT_LENGTH: i64 = 12;

/// Draw `length` characters uniformly from the alphabet.
pub fn generate(length: usize, include_symbols: bool) -> String {
    let mut alphabet: Vec<char> = LETTERS_AND_DIGITS.chars().collect();
    if include_symbols {
        alphabet.extend(SYMBOLS.chars());
    }

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

pub fn password_generator(length: i64, include_symbols: bool) -> String {
    let length = match usize::try_from(length) {
        Ok(len) if (8..=32).contains(&len) => len,
        _ => return "Password length must be between 8 and 32 characters".to_string(),
    };

    let password = generate(length, include_symbols);
    format!("🔐 Generated password: `{password}`\n⚠️ Make sure to save this securely!")
}

pub fn handle_password(args: &str) -> String {
    let args = args.trim();
    if args.is_empty() {
        return password_generator(DEFAULT_LENGTH, true);
    }
    match args.parse::<i64>() {
        Ok(length) => password_generator(length, true),
        Err(_) => "Format: password [length]".to_string(),
    }
}

pub struct PasswordTool;

impl Tool for PasswordTool {
    fn name(&self) -> &str {
        "password"
    }

    fn aliases(&self) -> &[&str] {
        &["pwd"]
    }

    fn usage(&self) -> &str {
        "password [length]"
    }

    fn description(&self) -> &str {
        "Generate password"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Utilities
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        handle_password(args)
    }
}
