/// A parsed inbound message: lowercased command token plus the raw remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub command: &'a str,
    pub args: &'a str,
}

/// Split trimmed input on its first whitespace run.
///
/// Returns the first token lowercased and the rest unchanged (apart from the
/// outer trim). Empty input yields an empty command and empty args.
pub fn parse_command(input: &str) -> (String, &str) {
    let parsed = split_command(input);
    (parsed.command.to_lowercase(), parsed.args)
}

pub(crate) fn split_command(input: &str) -> ParsedCommand<'_> {
    let trimmed = input.trim();
    match trimmed.find(char::is_whitespace) {
        Some(at) => ParsedCommand {
            command: &trimmed[..at],
            args: trimmed[at..].trim_start(),
        },
        None => ParsedCommand {
            command: trimmed,
            args: "",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_command() {
        assert_eq!(parse_command(""), (String::new(), ""));
        assert_eq!(parse_command("   \t\n"), (String::new(), ""));
    }

    #[test]
    fn trims_and_splits_on_first_whitespace() {
        assert_eq!(parse_command("  calc 2+2  "), ("calc".to_string(), "2+2"));
        assert_eq!(
            parse_command("convert 10 km mi"),
            ("convert".to_string(), "10 km mi")
        );
    }

    #[test]
    fn single_token_has_empty_args() {
        assert_eq!(parse_command("coin"), ("coin".to_string(), ""));
    }

    #[test]
    fn command_is_lowercased_args_are_not() {
        assert_eq!(
            parse_command("HELLO World"),
            ("hello".to_string(), "World")
        );
    }

    #[test]
    fn whitespace_run_is_collapsed_before_args_only() {
        assert_eq!(
            parse_command("count \t  one  two"),
            ("count".to_string(), "one  two")
        );
    }

    #[test]
    fn split_exposes_original_case() {
        let parsed = split_command("Calc 1 + 1");
        assert_eq!(parsed.command, "Calc");
        assert_eq!(parsed.args, "1 + 1");
    }
}
