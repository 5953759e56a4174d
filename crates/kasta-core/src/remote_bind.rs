//! Remote bindings: a physical input or button bound to a device, group or
//! scene, with an optional timed state change.
//!
//! The valid `hole` (input position) range differs per device family, so
//! it is always supplied by the owning schema as a [`HoleRange`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Inclusive range of valid input positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleRange {
    pub min: i64,
    pub max: i64,
}

impl HoleRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Touch panel buttons are numbered from 1
    pub const fn touch_panel(buttons: i64) -> Self {
        Self::new(1, buttons)
    }

    /// Six-input modules number their inputs from 0
    pub const fn six_input() -> Self {
        Self::new(0, 5)
    }

    pub fn contains(&self, hole: i64) -> bool {
        (self.min..=self.max).contains(&hole)
    }
}

/// Number of buttons encoded in a model name: its trailing digits.
/// Models without a count are single-button.
pub fn button_count(model: &str) -> i64 {
    let stem = model.trim_end_matches(|c: char| c.is_ascii_digit());
    model[stem.len()..]
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// One binding as stored in a device's attribute payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBindEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<i64>,
    pub bind_type: i64,
    pub bind_id: i64,
    #[serde(default)]
    pub hour: i64,
    #[serde(default)]
    pub min: i64,
    #[serde(default)]
    pub state: i64,
    #[serde(default)]
    pub enable: i64,
    #[serde(default)]
    pub has_timer: i64,
    pub hole: i64,
    #[serde(default)]
    pub bind_channel: i64,
}

/// What a binding points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindTarget {
    Device,
    Group,
    Scene,
    Unknown(i64),
}

impl BindTarget {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Device,
            1 => Self::Group,
            2 => Self::Scene,
            other => Self::Unknown(other),
        }
    }
}

impl std::fmt::Display for BindTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device => write!(f, "Device"),
            Self::Group => write!(f, "Group"),
            Self::Scene => write!(f, "Scene"),
            Self::Unknown(code) => write!(f, "Unknown ({code})"),
        }
    }
}

/// Display-ready form of a [`RemoteBindEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBinding {
    pub hole: i64,
    pub input: Option<String>,
    pub target: String,
    pub target_id: i64,
    /// `HH:MM`, present even when the timer is off
    pub time: String,
    pub state: String,
    pub enable: String,
    /// Whether `time` and `state` describe an active schedule
    pub has_timer: bool,
    pub channel: i64,
}

fn check_flag(name: &str, value: i64, errors: &mut Vec<ValidationError>) {
    if !(0..=1).contains(&value) {
        errors.push(ValidationError::not_an_option(name, &[0, 1]));
    }
}

fn check_range(name: &str, value: i64, min: i64, max: i64, errors: &mut Vec<ValidationError>) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::out_of_range(name, min as f64, max as f64));
    }
}

pub fn validate_binding(entry: &RemoteBindEntry, holes: HoleRange) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(input_type) = entry.input_type {
        check_flag("inputType", input_type, &mut errors);
    }
    if entry.bind_id < 0 {
        errors.push(ValidationError::BelowMin {
            name: "bindId".to_string(),
            min: 0.0,
        });
    }
    check_range("hour", entry.hour, 0, 23, &mut errors);
    check_range("min", entry.min, 0, 59, &mut errors);
    check_flag("state", entry.state, &mut errors);
    check_flag("enable", entry.enable, &mut errors);
    check_flag("hasTimer", entry.has_timer, &mut errors);
    check_range("hole", entry.hole, holes.min, holes.max, &mut errors);
    check_flag("bindChannel", entry.bind_channel, &mut errors);
    errors
}

pub fn decode_binding(entry: &RemoteBindEntry) -> DisplayBinding {
    let on_off = match entry.state {
        0 => "Off",
        1 => "On",
        _ => crate::format::SENTINEL,
    };
    let enable = match entry.enable {
        0 => "Disabled",
        1 => "Enabled",
        _ => crate::format::SENTINEL,
    };
    let input = entry.input_type.map(|t| match t {
        0 => "Momentary".to_string(),
        1 => "Toggle".to_string(),
        other => format!("Unknown ({other})"),
    });

    DisplayBinding {
        hole: entry.hole,
        input,
        target: BindTarget::from_code(entry.bind_type).to_string(),
        target_id: entry.bind_id,
        time: format!("{:02}:{:02}", entry.hour, entry.min),
        state: on_off.to_string(),
        enable: enable.to_string(),
        has_timer: entry.has_timer == 1,
        channel: entry.bind_channel,
    }
}

/// Short count text for a binding list: `-`, `1 binding`, `3 bindings`
pub fn describe_bindings(count: usize) -> String {
    match count {
        0 => crate::format::SENTINEL.to_string(),
        1 => "1 binding".to_string(),
        n => format!("{n} bindings"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> RemoteBindEntry {
        RemoteBindEntry {
            input_type: None,
            bind_type: 1,
            bind_id: 42,
            hour: 7,
            min: 5,
            state: 1,
            enable: 1,
            has_timer: 1,
            hole: 2,
            bind_channel: 0,
        }
    }

    #[test]
    fn test_valid_binding() {
        assert!(validate_binding(&entry(), HoleRange::touch_panel(4)).is_empty());
    }

    #[test]
    fn test_hole_base_differs_per_family() {
        let mut bind = entry();
        bind.hole = 0;
        assert_eq!(
            validate_binding(&bind, HoleRange::touch_panel(4))[0].to_string(),
            "hole must be between 1 and 4"
        );
        assert!(validate_binding(&bind, HoleRange::six_input()).is_empty());

        bind.hole = 6;
        assert_eq!(validate_binding(&bind, HoleRange::six_input()).len(), 1);
    }

    #[test]
    fn test_time_and_flags_checked() {
        let mut bind = entry();
        bind.hour = 24;
        bind.min = 60;
        bind.state = 2;
        bind.has_timer = -1;
        let messages: Vec<String> = validate_binding(&bind, HoleRange::touch_panel(4))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "hour must be between 0 and 23",
                "min must be between 0 and 59",
                "state must be one of 0,1",
                "hasTimer must be one of 0,1",
            ]
        );
    }

    #[test]
    fn test_decode_binding() {
        let display = decode_binding(&entry());
        assert_eq!(display.target, "Group");
        assert_eq!(display.target_id, 42);
        assert_eq!(display.time, "07:05");
        assert_eq!(display.state, "On");
        assert_eq!(display.enable, "Enabled");
        assert!(display.has_timer);
    }

    #[test]
    fn test_decode_without_timer_still_has_time() {
        let mut bind = entry();
        bind.has_timer = 0;
        bind.state = 0;
        bind.enable = 0;
        bind.bind_type = 9;
        bind.input_type = Some(1);
        let display = decode_binding(&bind);
        assert!(!display.has_timer);
        assert_eq!(display.time, "07:05");
        assert_eq!(display.state, "Off");
        assert_eq!(display.enable, "Disabled");
        assert_eq!(display.target, "Unknown (9)");
        assert_eq!(display.input.as_deref(), Some("Toggle"));
    }

    #[test]
    fn test_deserialize_wire_entry() {
        let json = r#"{"bindType":2,"bindId":7,"hour":23,"min":59,"state":0,
                       "enable":1,"hasTimer":0,"hole":1,"bindChannel":1}"#;
        let bind: RemoteBindEntry = serde_json::from_str(json).unwrap();
        assert_eq!(bind.bind_type, 2);
        assert_eq!(bind.input_type, None);
        assert!(validate_binding(&bind, HoleRange::touch_panel(2)).is_empty());
    }

    #[test]
    fn test_button_count() {
        assert_eq!(button_count("PANEL_TOUCH_4"), 4);
        assert_eq!(button_count("KT-TP12"), 12);
        assert_eq!(button_count("PANEL_TOUCH"), 1);
    }
}
