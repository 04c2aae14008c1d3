//! Two-operand arithmetic: `calc 12 * 4`.

use regex::Regex;
use std::sync::OnceLock;

use super::traits::{Tool, ToolCategory, ToolContext};

const USAGE: &str = "Format: calc [num1] [+/-/*/÷/^/%] [num2]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

impl Operation {
    fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
            Operation::Power => "^",
            Operation::Modulo => "mod",
        }
    }
}

/// Patterns tried in priority order; the first that matches anywhere wins.
fn patterns() -> &'static [(Regex, Operation)] {
    static PATTERNS: OnceLock<Vec<(Regex, Operation)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"([0-9]+\.?[0-9]*)\s*\+\s*([0-9]+\.?[0-9]*)", Operation::Add),
            (r"([0-9]+\.?[0-9]*)\s*-\s*([0-9]+\.?[0-9]*)", Operation::Subtract),
            (r"([0-9]+\.?[0-9]*)\s*\*\s*([0-9]+\.?[0-9]*)", Operation::Multiply),
            (r"([0-9]+\.?[0-9]*)\s*/\s*([0-9]+\.?[0-9]*)", Operation::Divide),
            (r"([0-9]+\.?[0-9]*)\s*\^\s*([0-9]+\.?[0-9]*)", Operation::Power),
            (r"([0-9]+\.?[0-9]*)\s*%\s*([0-9]+\.?[0-9]*)", Operation::Modulo),
        ]
        .into_iter()
        .map(|(pattern, op)| (Regex::new(pattern).expect("static calculator pattern"), op))
        .collect()
    })
}

/// Find the first recognized `<num> <op> <num>` expression in `args`.
///
/// Operands are ASCII digits only. A match whose operands fail to parse
/// falls through to the next pattern.
pub fn parse_expression(args: &str) -> Option<(f64, Operation, f64)> {
    for (regex, op) in patterns() {
        let Some(caps) = regex.captures(args) else {
            continue;
        };
        if let (Ok(a), Ok(b)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            return Some((a, *op, b));
        }
    }
    None
}

pub fn calculate(a: f64, b: f64, op: Operation) -> String {
    let result = match op {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide | Operation::Modulo if b == 0.0 => {
            return "Error: Cannot divide by zero".to_string();
        }
        Operation::Divide => a / b,
        Operation::Power => a.powf(b),
        Operation::Modulo => a % b,
    };
    if !result.is_finite() {
        return "Calculation error: result is out of range".to_string();
    }
    format!("{a} {} {b} = {result}", op.symbol())
}

pub struct CalculatorTool;

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calc"
    }

    fn aliases(&self) -> &[&str] {
        &["calculate"]
    }

    fn usage(&self) -> &str {
        "calc [num1] [+/-/*/÷/^/%] [num2]"
    }

    fn description(&self) -> &str {
        "Calculate"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Math
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        match parse_expression(args) {
            Some((a, op, b)) => calculate(a, b, op),
            None => USAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::InMemoryConversationStore;

    fn run(args: &str) -> String {
        let store = InMemoryConversationStore::new();
        let ctx = ToolContext {
            session_id: "calc-test",
            store: &store,
        };
        CalculatorTool.execute(args, &ctx)
    }

    #[test]
    fn adds_two_numbers() {
        assert_eq!(run("2 + 3"), "2 + 3 = 5");
    }

    #[test]
    fn whitespace_is_optional() {
        assert_eq!(run("2+2"), "2 + 2 = 4");
        assert_eq!(run("7*6"), "7 × 6 = 42");
    }

    #[test]
    fn handles_fractional_operands() {
        assert_eq!(run("1.5 * 2"), "1.5 × 2 = 3");
        assert_eq!(run("10 / 4"), "10 ÷ 4 = 2.5");
    }

    #[test]
    fn power_and_modulo() {
        assert_eq!(run("2 ^ 10"), "2 ^ 10 = 1024");
        assert_eq!(run("10 % 3"), "10 mod 3 = 1");
    }

    #[test]
    fn division_by_zero_is_an_error_string() {
        assert_eq!(run("10 / 0"), "Error: Cannot divide by zero");
        assert_eq!(run("10 % 0"), "Error: Cannot divide by zero");
    }

    #[test]
    fn overflowing_result_is_a_calculation_error() {
        assert_eq!(run("10 ^ 400"), "Calculation error: result is out of range");
    }

    #[test]
    fn non_ascii_digits_are_not_operands() {
        assert_eq!(run("٣ + 4"), USAGE);
        assert_eq!(run("٣ + 4 and 2 * 3"), "2 × 3 = 6");
    }

    #[test]
    fn searches_inside_surrounding_text() {
        assert_eq!(run("please compute 2+2 for me"), "2 + 2 = 4");
    }

    #[test]
    fn earlier_operator_wins_over_position() {
        // Addition is tried before subtraction even though '-' appears first.
        assert_eq!(run("10 - 2 + 3"), "2 + 3 = 5");
    }

    #[test]
    fn negative_numbers_are_not_recognized_as_signed() {
        // "-3" has no sign support: the digits after the minus form the operand.
        assert_eq!(run("-3 * 2"), "3 × 2 = 6");
    }

    #[test]
    fn unrecognized_input_returns_usage() {
        assert_eq!(run("two plus three"), USAGE);
        assert_eq!(run(""), USAGE);
    }
}
