//! Randomness tools: coin flips, dice and bounded random numbers.

use rand::Rng;

use super::traits::{Tool, ToolCategory, ToolContext};

pub fn coin_flip() -> String {
    let result = if rand::thread_rng().gen_bool(0.5) {
        "Heads"
    } else {
        "Tails"
    };
    format!("🪙 Coin flip result: **{result}**")
}

/// Roll `count` dice with `sides` faces.
pub fn roll_dice(sides: i64, count: i64) -> Result<Vec<i64>, String> {
    if !(2..=100).contains(&sides) {
        return Err("Dice must have between 2 and 100 sides".to_string());
    }
    if !(1..=10).contains(&count) {
        return Err("Can roll between 1 and 10 dice at once".to_string());
    }

    let mut rng = rand::thread_rng();
    Ok((0..count).map(|_| rng.gen_range(1..=sides)).collect())
}

pub fn dice_roll(sides: i64, count: i64) -> String {
    let rolls = match roll_dice(sides, count) {
        Ok(rolls) => rolls,
        Err(message) => return message,
    };

    if let [single] = rolls.as_slice() {
        return format!("🎲 Rolled 1d{sides}: **{single}**");
    }

    let total: i64 = rolls.iter().sum();
    let listed = rolls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("🎲 Rolled {count}d{sides}: [{listed}] = **{total}**")
}

pub fn random_number(min: i64, max: i64) -> String {
    if min >= max {
        return "Minimum must be less than maximum".to_string();
    }
    let num = rand::thread_rng().gen_range(min..=max);
    format!("🎲 Random number between {min} and {max}: **{num}**")
}

fn parse_ints(parts: &[&str]) -> Option<Vec<i64>> {
    parts.iter().map(|p| p.parse::<i64>().ok()).collect()
}

pub fn handle_dice(args: &str) -> String {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() > 2 {
        return "Format: dice [sides] [count]".to_string();
    }
    match parse_ints(&parts).as_deref() {
        Some([]) => dice_roll(6, 1),
        Some([sides]) => dice_roll(*sides, 1),
        Some([sides, count]) => dice_roll(*sides, *count),
        _ => "Please provide valid numbers".to_string(),
    }
}

pub fn handle_random(args: &str) -> String {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.len() {
        0 => random_number(1, 100),
        2 => match parse_ints(&parts).as_deref() {
            Some([min, max]) => random_number(*min, *max),
            _ => "Please provide valid numbers".to_string(),
        },
        _ => "Format: random [min] [max]".to_string(),
    }
}

pub struct CoinTool;

impl Tool for CoinTool {
    fn name(&self) -> &str {
        "coin"
    }

    fn aliases(&self) -> &[&str] {
        &["flip"]
    }

    fn usage(&self) -> &str {
        "coin"
    }

    fn description(&self) -> &str {
        "Flip a coin"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Math
    }

    fn execute(&self, _args: &str, _ctx: &ToolContext<'_>) -> String {
        coin_flip()
    }
}

pub struct DiceTool;

impl Tool for DiceTool {
    fn name(&self) -> &str {
        "dice"
    }

    fn aliases(&self) -> &[&str] {
        &["roll"]
    }

    fn usage(&self) -> &str {
        "dice [sides] [count]"
    }

    fn description(&self) -> &str {
        "Roll dice"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Math
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        handle_dice(args)
    }
}

pub struct RandomTool;

impl Tool for RandomTool {
    fn name(&self) -> &str {
        "random"
    }

    fn usage(&self) -> &str {
        "random [min] [max]"
    }

    fn description(&self) -> &str {
        "Random number"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Math
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        handle_random(args)
    }
}
