//! Clock and calendar tools.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};

use super::traits::{Tool, ToolCategory, ToolContext};

const DATE_FORMAT: &str = "%A, %B %d, %Y";

fn render_time<Tz: TimeZone>(now: &DateTime<Tz>, label: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "🕐 {label} Time: {}\n📅 Date: {}",
        now.format("%I:%M:%S %p"),
        now.format(DATE_FORMAT)
    )
}

pub fn get_time(timezone: &str) -> String {
    if timezone.trim().eq_ignore_ascii_case("utc") {
        render_time(&Utc::now(), "UTC")
    } else {
        render_time(&Local::now(), "Local")
    }
}

/// Describe the date `days_offset` days away from `today`.
pub fn describe_date<Tz: TimeZone>(today: DateTime<Tz>, days_offset: i64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(target) = TimeDelta::try_days(days_offset)
        .and_then(|delta| today.checked_add_signed(delta))
    else {
        return "Error getting date: offset out of range".to_string();
    };
    let date = target.format(DATE_FORMAT);

    match days_offset {
        0 => format!("📅 Today: {date}"),
        1 => format!("📅 Tomorrow: {date}"),
        -1 => format!("📅 Yesterday: {date}"),
        n if n > 0 => format!("📅 {n} days from now: {date}"),
        n => format!("📅 {} days ago: {date}", n.unsigned_abs()),
    }
}

pub fn handle_date(args: &str) -> String {
    let args = args.trim();
    if args.is_empty() {
        return describe_date(Local::now(), 0);
    }
    match args.parse::<i64>() {
        Ok(offset) => describe_date(Local::now(), offset),
        Err(_) => "Format: date [offset_days]".to_string(),
    }
}

pub struct TimeTool;

impl Tool for TimeTool {
    fn name(&self) -> &str {
        "time"
    }

    fn usage(&self) -> &str {
        "time [local|utc]"
    }

    fn description(&self) -> &str {
        "Current time"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::TimeDate
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        get_time(if args.is_empty() { "local" } else { args })
    }
}

pub struct DateTool;

impl Tool for DateTool {
    fn name(&self) -> &str {
        "date"
    }

    fn usage(&self) -> &str {
        "date [offset]"
    }

    fn description(&self) -> &str {
        "Get date (±N days)"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::TimeDate
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        handle_date(args)
    }
}
