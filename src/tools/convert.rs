//! Unit conversion between temperature scales and length units.

use super::traits::{Tool, ToolCategory, ToolContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Temperature {
    Celsius,
    Fahrenheit,
    Kelvin,
}

fn temperature_unit(unit: &str) -> Option<Temperature> {
    match unit {
        "c" | "celsius" => Some(Temperature::Celsius),
        "f" | "fahrenheit" => Some(Temperature::Fahrenheit),
        "k" | "kelvin" => Some(Temperature::Kelvin),
        _ => None,
    }
}

/// Meters per unit.
fn length_factor(unit: &str) -> Option<f64> {
    let factor = match unit {
        "m" | "meter" | "meters" => 1.0,
        "km" | "kilometer" | "kilometers" => 1000.0,
        "cm" | "centimeter" | "centimeters" => 0.01,
        "mm" | "millimeter" | "millimeters" => 0.001,
        "mi" | "mile" | "miles" => 1609.34,
        "ft" | "foot" | "feet" => 0.3048,
        "in" | "inch" | "inches" => 0.0254,
        "yd" | "yard" | "yards" => 0.9144,
        _ => return None,
    };
    Some(factor)
}

fn convert_temperature(
    value: f64,
    from: Temperature,
    to: Temperature,
) -> Option<(f64, &'static str, &'static str)> {
    use Temperature::{Celsius, Fahrenheit, Kelvin};
    match (from, to) {
        (Celsius, Fahrenheit) => Some((value * 9.0 / 5.0 + 32.0, "°C", "°F")),
        (Fahrenheit, Celsius) => Some(((value - 32.0) * 5.0 / 9.0, "°F", "°C")),
        (Celsius, Kelvin) => Some((value + 273.15, "°C", "K")),
        (Kelvin, Celsius) => Some((value - 273.15, "K", "°C")),
        _ => None,
    }
}

pub fn unit_converter(value: f64, from_unit: &str, to_unit: &str) -> String {
    let from = from_unit.to_lowercase();
    let to = to_unit.to_lowercase();

    if let (Some(f), Some(t)) = (temperature_unit(&from), temperature_unit(&to)) {
        if let Some((result, from_sym, to_sym)) = convert_temperature(value, f, t) {
            return format!("🌡️ {value}{from_sym} = {result:.2}{to_sym}");
        }
    }

    if let (Some(f), Some(t)) = (length_factor(&from), length_factor(&to)) {
        let result = value * f / t;
        return format!("📏 {value} {from_unit} = {result:.4} {to_unit}");
    }

    format!("Conversion from {from_unit} to {to_unit} not supported yet")
}

pub fn handle_convert(args: &str) -> String {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [value, from_unit, to_unit] = parts.as_slice() else {
        return "Format: convert [value] [from_unit] [to_unit]".to_string();
    };
    match value.parse::<f64>() {
        Ok(value) => unit_converter(value, from_unit, to_unit),
        Err(_) => "Please provide a valid number for the value".to_string(),
    }
}

pub struct ConvertTool;

impl Tool for ConvertTool {
    fn name(&self) -> &str {
        "convert"
    }

    fn usage(&self) -> &str {
        "convert [value] [from] [to]"
    }

    fn description(&self) -> &str {
        "Unit converter"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Utilities
    }

    fn execute(&self, args: &str, _ctx: &ToolContext<'_>) -> String {
        handle_convert(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_point_in_fahrenheit() {
        assert_eq!(unit_converter(0.0, "celsius", "fahrenheit"), "🌡️ 0°C = 32.00°F");
    }

    #[test]
    fn boiling_point_in_kelvin() {
        assert_eq!(unit_converter(100.0, "celsius", "kelvin"), "🌡️ 100°C = 373.15K");
    }

    #[test]
    fn temperature_aliases_and_case() {
        assert_eq!(unit_converter(212.0, "F", "C"), "🌡️ 212°F = 100.00°C");
        assert_eq!(unit_converter(0.0, "K", "Celsius"), "🌡️ 0K = -273.15°C");
    }

    #[test]
    fn fahrenheit_to_kelvin_is_not_supported() {
        assert_eq!(
            unit_converter(50.0, "fahrenheit", "kelvin"),
            "Conversion from fahrenheit to kelvin not supported yet"
        );
    }

    #[test]
    fn length_uses_meter_table() {
        assert_eq!(unit_converter(1.0, "km", "m"), "📏 1 km = 1000.0000 m");
        assert_eq!(unit_converter(12.0, "inches", "ft"), "📏 12 inches = 1.0000 ft");
        assert_eq!(unit_converter(1.0, "Mile", "KM"), "📏 1 Mile = 1.6093 KM");
    }

    #[test]
    fn mixed_dimensions_are_not_supported() {
        assert_eq!(
            unit_converter(3.0, "celsius", "meters"),
            "Conversion from celsius to meters not supported yet"
        );
    }

    #[test]
    fn convert_requires_three_tokens() {
        assert_eq!(handle_convert("5 km"), "Format: convert [value] [from_unit] [to_unit]");
        assert_eq!(handle_convert(""), "Format: convert [value] [from_unit] [to_unit]");
        assert_eq!(
            handle_convert("five km m"),
            "Please provide a valid number for the value"
        );
        assert_eq!(handle_convert("2.5 m cm"), "📏 2.5 m = 250.0000 cm");
    }
}
