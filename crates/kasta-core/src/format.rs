//! Scalar formatters turning raw attribute values into display text
//!
//! Every formatter accepts `Option<&Value>` so that an absent attribute and
//! an explicit JSON `null` degrade the same way: to [`SENTINEL`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text shown for missing or undecodable values
pub const SENTINEL: &str = "-";

/// Coerce a raw JSON value to a number.
///
/// Numbers pass through, numeric strings are parsed after trimming and
/// booleans map to 0/1. Everything else is non-numeric.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Coerce and require an integral value
pub fn coerce_integer(value: &Value) -> Option<i64> {
    coerce_number(value).and_then(|n| {
        if n.fract() == 0.0 && n.abs() < 9.0e15 {
            Some(n as i64)
        } else {
            None
        }
    })
}

fn present(raw: Option<&Value>) -> Option<&Value> {
    raw.filter(|v| !v.is_null())
}

/// Render a number without a trailing `.0` when it is integral
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Render a raw value for diagnostics (`Unknown (7)`)
pub(crate) fn format_raw(value: &Value) -> String {
    match value {
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `0` → `Off`, `1` → `On`, anything else → `-`
pub fn power(raw: Option<&Value>) -> String {
    match present(raw).and_then(coerce_integer) {
        Some(0) => "Off".to_string(),
        Some(1) => "On".to_string(),
        _ => SENTINEL.to_string(),
    }
}

/// Byte level `0..=255` scaled to a whole percentage
pub fn percent(raw: Option<&Value>) -> String {
    match present(raw).and_then(coerce_number) {
        Some(n) if (0.0..=255.0).contains(&n) => {
            format!("{}%", (n / 255.0 * 100.0).round() as i64)
        }
        _ => SENTINEL.to_string(),
    }
}

/// Delay expressed in minutes
pub fn minutes(raw: Option<&Value>) -> String {
    match present(raw).and_then(coerce_number) {
        Some(n) => format!("{} min", format_number(n)),
        None => SENTINEL.to_string(),
    }
}

/// Fixed-point tenths of a degree (`215` → `21.5°C`)
pub fn tenths_celsius(raw: Option<&Value>) -> String {
    match present(raw).and_then(coerce_number) {
        Some(n) => format!("{:.1}°C", n * 0.1),
        None => SENTINEL.to_string(),
    }
}

/// Coarse backlight brightness tier over `0..=30`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackLightLevel {
    Low,
    Medium,
    High,
}

impl BackLightLevel {
    pub const MAX: i64 = 30;

    /// Tier for a raw level, `None` outside `0..=30`
    pub fn from_raw(level: i64) -> Option<Self> {
        match level {
            0..=5 => Some(Self::Low),
            6..=15 => Some(Self::Medium),
            16..=30 => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for BackLightLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn backlight(raw: Option<&Value>) -> String {
    present(raw)
        .and_then(coerce_integer)
        .and_then(BackLightLevel::from_raw)
        .map(|tier| tier.label().to_string())
        .unwrap_or_else(|| SENTINEL.to_string())
}

/// Format an RGB triplet as `#rrggbb`.
///
/// Channels are clamped to `0..=255` and rounded. If any channel is missing
/// the result is black.
pub fn rgb_to_hex(r: Option<f64>, g: Option<f64>, b: Option<f64>) -> String {
    let (Some(r), Some(g), Some(b)) = (r, g, b) else {
        return "#000000".to_string();
    };
    let channel = |c: f64| c.clamp(0.0, 255.0).round() as u8;
    format!("#{}", hex::encode([channel(r), channel(g), channel(b)]))
}

/// Colour attribute given as `[r, g, b]` or `{"r": .., "g": .., "b": ..}`
pub fn rgb(raw: Option<&Value>) -> String {
    let channel = |v: Option<&Value>| present(v).and_then(coerce_number);
    match present(raw) {
        Some(Value::Array(items)) => {
            rgb_to_hex(channel(items.first()), channel(items.get(1)), channel(items.get(2)))
        }
        Some(Value::Object(map)) => {
            rgb_to_hex(channel(map.get("r")), channel(map.get("g")), channel(map.get("b")))
        }
        Some(_) => SENTINEL.to_string(),
        None => "#000000".to_string(),
    }
}

/// Label of a Select option. Values outside `options` keep the raw value
/// in the output so the bad code can still be diagnosed.
pub fn option_label(raw: Option<&Value>, options: &[i64], labels: &[String]) -> String {
    let Some(value) = present(raw) else {
        return SENTINEL.to_string();
    };
    coerce_integer(value)
        .and_then(|code| options.iter().position(|o| *o == code))
        .and_then(|idx| labels.get(idx))
        .cloned()
        .unwrap_or_else(|| format!("Unknown ({})", format_raw(value)))
}

/// Number with an optional unit suffix
pub fn plain(raw: Option<&Value>, unit: Option<&str>) -> String {
    match (present(raw).and_then(coerce_number), unit) {
        (Some(n), Some(unit)) => format!("{} {}", format_number(n), unit),
        (Some(n), None) => format_number(n),
        (None, _) => SENTINEL.to_string(),
    }
}

pub fn text(raw: Option<&Value>) -> String {
    match present(raw) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) | None => SENTINEL.to_string(),
        Some(other) => format_raw(other),
    }
}
