//! Socket-relay error log
//!
//! Error types form a sparse set of codes: `0x00`, `0x01` and `0x50..=0x52`.
//! Any other integer can appear on the wire and is reported as invalid
//! rather than rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Known socket error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SocketErrorType {
    LowEnergy = 0x00,
    ThresholdWarning = 0x01,
    ConfigError = 0x50,
    AlertEnabled = 0x51,
    AlertDisabled = 0x52,
}

impl SocketErrorType {
    pub const ALL: [SocketErrorType; 5] = [
        Self::LowEnergy,
        Self::ThresholdWarning,
        Self::ConfigError,
        Self::AlertEnabled,
        Self::AlertDisabled,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn code(&self) -> i64 {
        i64::from(*self as u8)
    }

    /// Valid codes in ascending order
    pub fn codes() -> Vec<i64> {
        Self::ALL.iter().map(Self::code).collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LowEnergy => "Low Energy",
            Self::ThresholdWarning => "Threshold Warning",
            Self::ConfigError => "Config Error",
            Self::AlertEnabled => "Alert Enabled",
            Self::AlertDisabled => "Alert Disabled",
        }
    }
}

impl std::fmt::Display for SocketErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:02X})", self.label(), *self as u8)
    }
}

/// One entry of a socket relay's error log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketError {
    pub error_type: i64,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub channel: i64,
    /// When the relay reported the error, if it said
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SocketError {
    pub fn new(error_type: i64, value: i64, channel: i64) -> Self {
        Self {
            error_type,
            value,
            channel,
            timestamp: None,
        }
    }

    pub fn kind(&self) -> Option<SocketErrorType> {
        SocketErrorType::from_code(self.error_type)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.kind().is_none() {
            errors.push(ValidationError::not_an_option(
                "errorType",
                &SocketErrorType::codes(),
            ));
        }
        if !(0..=1).contains(&self.channel) {
            errors.push(ValidationError::not_an_option("channel", &[0, 1]));
        }
        errors
    }
}

/// Label for a relay error code, e.g. `Config Error (0x50)`
pub fn decode_error_type(code: i64) -> String {
    match SocketErrorType::from_code(code) {
        Some(kind) => kind.to_string(),
        None => format!("Invalid Error Type ({code})"),
    }
}

pub fn channel_label(channel: i64) -> String {
    match channel {
        0 => "Left".to_string(),
        1 => "Right".to_string(),
        n => format!("Channel {n}"),
    }
}

/// Error count on one relay channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCount {
    pub channel: i64,
    pub label: String,
    pub count: usize,
}

/// Condensed view of an error log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSummary {
    pub has_errors: bool,
    pub summary: String,
    /// Counts in order of first appearance
    pub channels: Vec<ChannelCount>,
    /// Last entry of the log as supplied, not the newest by timestamp
    pub latest_error: Option<SocketError>,
}

pub fn summarize_errors(errors: &[SocketError]) -> ErrorSummary {
    if errors.is_empty() {
        return ErrorSummary {
            has_errors: false,
            summary: "No Errors".to_string(),
            channels: Vec::new(),
            latest_error: None,
        };
    }

    let mut channels: Vec<ChannelCount> = Vec::new();
    for error in errors {
        match channels.iter_mut().find(|c| c.channel == error.channel) {
            Some(entry) => entry.count += 1,
            None => channels.push(ChannelCount {
                channel: error.channel,
                label: channel_label(error.channel),
                count: 1,
            }),
        }
    }

    let summary = channels
        .iter()
        .map(|c| format!("{}: {}", c.label, c.count))
        .collect::<Vec<_>>()
        .join(", ");

    ErrorSummary {
        has_errors: true,
        summary,
        channels,
        latest_error: errors.last().cloned(),
    }
}
