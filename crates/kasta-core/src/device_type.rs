//! The closed set of device type codes and their attribute tables

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::attribute::{AttributeSpec, Format};
use crate::error::SchemaError;
use crate::format::BackLightLevel;
use crate::remote_bind::{button_count, HoleRange};
use crate::schema::DeviceTypeSchema;

/// Every hardware family the backend can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum DeviceType {
    /// First-generation dimmer, kept for older installations
    Dimmer,
    LightDimmer,
    LightSwitch,
    LightRgb,
    LightCct,
    FanController,
    CurtainMotor,
    ThermostatAc,
    GatewayHub,
    SocketRelay,
    SocketSingle,
    PanelTouch2,
    PanelTouch4,
    PanelTouch6,
    ModuleInput6,
    ModuleOutput4,
    RemoteControl,
    SensorMotion,
    SensorDoor,
}

impl DeviceType {
    pub const ALL: [DeviceType; 19] = [
        Self::Dimmer,
        Self::LightDimmer,
        Self::LightSwitch,
        Self::LightRgb,
        Self::LightCct,
        Self::FanController,
        Self::CurtainMotor,
        Self::ThermostatAc,
        Self::GatewayHub,
        Self::SocketRelay,
        Self::SocketSingle,
        Self::PanelTouch2,
        Self::PanelTouch4,
        Self::PanelTouch6,
        Self::ModuleInput6,
        Self::ModuleOutput4,
        Self::RemoteControl,
        Self::SensorMotion,
        Self::SensorDoor,
    ];

    /// Wire code as reported by the device-management backend
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dimmer => "DIMMER",
            Self::LightDimmer => "LIGHT_DIMMER",
            Self::LightSwitch => "LIGHT_SWITCH",
            Self::LightRgb => "LIGHT_RGB",
            Self::LightCct => "LIGHT_CCT",
            Self::FanController => "FAN_CONTROLLER",
            Self::CurtainMotor => "CURTAIN_MOTOR",
            Self::ThermostatAc => "THERMOSTAT_AC",
            Self::GatewayHub => "GATEWAY_HUB",
            Self::SocketRelay => "SOCKET_RELAY",
            Self::SocketSingle => "SOCKET_SINGLE",
            Self::PanelTouch2 => "PANEL_TOUCH_2",
            Self::PanelTouch4 => "PANEL_TOUCH_4",
            Self::PanelTouch6 => "PANEL_TOUCH_6",
            Self::ModuleInput6 => "MODULE_INPUT_6",
            Self::ModuleOutput4 => "MODULE_OUTPUT_4",
            Self::RemoteControl => "REMOTE_CONTROL",
            Self::SensorMotion => "SENSOR_MOTION",
            Self::SensorDoor => "SENSOR_DOOR",
        }
    }

    /// Prefix before the first `_`, or `OTHER` for single-word codes
    pub fn category(&self) -> &'static str {
        category_of(self.code())
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Dimmer => "Legacy leading-edge dimmer",
            Self::LightDimmer => "Trailing-edge dimmer with backlit keypad",
            Self::LightSwitch => "On/off light switch",
            Self::LightRgb => "RGB colour light controller",
            Self::LightCct => "Tunable white light controller",
            Self::FanController => "Ceiling fan speed controller",
            Self::CurtainMotor => "Curtain and blind motor",
            Self::ThermostatAc => "Air-conditioning thermostat",
            Self::GatewayHub => "Network gateway",
            Self::SocketRelay => "Two-way socket relay with energy monitoring",
            Self::SocketSingle => "Single socket with energy metering",
            Self::PanelTouch2 => "Two-button touch panel",
            Self::PanelTouch4 => "Four-button touch panel",
            Self::PanelTouch6 => "Six-button touch panel",
            Self::ModuleInput6 => "Six-input dry-contact module",
            Self::ModuleOutput4 => "Four-channel relay output module",
            Self::RemoteControl => "Battery remote control",
            Self::SensorMotion => "Motion and light sensor",
            Self::SensorDoor => "Door and window contact sensor",
        }
    }

    /// Build the schema for this type from the static tables
    pub fn schema(&self) -> DeviceTypeSchema {
        let attributes = match self {
            Self::Dimmer => vec![power(), level()],
            Self::LightDimmer => vec![
                power(),
                level(),
                AttributeSpec::number("minLevel", 0.0, 255.0, Format::Percent)
                    .describe("Lowest level the dimmer will drive the load to"),
                AttributeSpec::number("fadeTime", 0.0, 60.0, unit("s")),
                delay_off(),
                backlight(),
            ],
            Self::LightSwitch => vec![power(), delay_off(), backlight()],
            Self::LightRgb => vec![
                power(),
                level(),
                AttributeSpec::custom("color", Format::Rgb).describe("Colour as [r, g, b]"),
            ],
            Self::LightCct => vec![
                power(),
                level(),
                AttributeSpec::number("colorTemp", 2700.0, 6500.0, unit("K")),
            ],
            Self::FanController => vec![
                power(),
                AttributeSpec::select("speed", &[0, 1, 2, 3], &["Off", "Low", "Medium", "High"]),
                delay_off(),
                backlight(),
            ],
            Self::CurtainMotor => vec![
                AttributeSpec::number("position", 0.0, 100.0, unit("%"))
                    .describe("Opening, 0 fully closed"),
                AttributeSpec::select("direction", &[0, 1], &["Normal", "Reversed"]),
            ],
            Self::ThermostatAc => vec![
                power(),
                AttributeSpec::select("mode", &[0, 1, 2, 3, 4], &["Auto", "Cool", "Heat", "Dry", "Fan"]),
                AttributeSpec::number("setTemp", 160.0, 320.0, Format::Tenths)
                    .describe("Target temperature in tenths of a degree"),
                AttributeSpec::measurement("roomTemp", Format::Tenths),
                AttributeSpec::select("fanSpeed", &[0, 1, 2, 3], &["Auto", "Low", "Medium", "High"]),
                backlight(),
            ],
            Self::GatewayHub => vec![
                AttributeSpec::custom("connection", Format::Connection)
                    .with_range(0.0, 15.0)
                    .read_only()
                    .describe("Uplink bitmask: WiFi, Ethernet, Internet, Kasta Cloud"),
                AttributeSpec::text("firmware").read_only(),
                AttributeSpec::text("ssid"),
                AttributeSpec::text("mac").read_only().internal(),
            ],
            Self::SocketRelay => vec![
                AttributeSpec::power("powerLeft"),
                AttributeSpec::power("powerRight"),
                threshold(),
                AttributeSpec::array("errors", Format::SocketErrors)
                    .read_only()
                    .describe("Error log, oldest first"),
            ],
            Self::SocketSingle => vec![
                power(),
                threshold(),
                AttributeSpec::measurement("energy", unit("Wh")),
            ],
            Self::PanelTouch2 | Self::PanelTouch4 | Self::PanelTouch6 => vec![
                backlight(),
                binds(HoleRange::touch_panel(button_count(self.code()))),
            ],
            Self::ModuleInput6 => vec![
                AttributeSpec::number("debounce", 0.0, 1000.0, unit("ms")),
                binds(HoleRange::six_input()),
            ],
            Self::ModuleOutput4 => vec![
                AttributeSpec::power("power1"),
                AttributeSpec::power("power2"),
                AttributeSpec::power("power3"),
                AttributeSpec::power("power4"),
                delay_off(),
            ],
            Self::RemoteControl => vec![battery(), binds(HoleRange::touch_panel(4))],
            Self::SensorMotion => vec![
                AttributeSpec::select("occupancy", &[0, 1], &["Clear", "Detected"]).read_only(),
                AttributeSpec::select("sensitivity", &[0, 1, 2], &["Low", "Medium", "High"]),
                AttributeSpec::measurement("lux", unit("lx")),
            ],
            Self::SensorDoor => vec![
                AttributeSpec::select("contact", &[0, 1], &["Closed", "Open"]).read_only(),
                battery(),
            ],
        };
        DeviceTypeSchema::new(*self, self.description(), attributes)
    }
}

pub(crate) fn category_of(type_code: &str) -> &str {
    match type_code.split_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => prefix,
        _ => "OTHER",
    }
}

fn unit(unit: &str) -> Format {
    Format::Plain {
        unit: Some(unit.to_string()),
    }
}

fn power() -> AttributeSpec {
    AttributeSpec::power("power")
}

fn level() -> AttributeSpec {
    AttributeSpec::number("level", 0.0, 255.0, Format::Percent)
}

fn delay_off() -> AttributeSpec {
    AttributeSpec::number("delayOff", 0.0, 1440.0, Format::Minutes)
        .describe("Switch off after this many minutes, 0 disables")
}

fn backlight() -> AttributeSpec {
    AttributeSpec::number("backLight", 0.0, BackLightLevel::MAX as f64, Format::Backlight)
}

fn threshold() -> AttributeSpec {
    AttributeSpec::number("threshold", 0.0, 3500.0, unit("W"))
        .describe("Load above which a threshold warning is raised")
}

fn battery() -> AttributeSpec {
    AttributeSpec::measurement("battery", unit("%")).with_range(0.0, 100.0)
}

fn binds(holes: HoleRange) -> AttributeSpec {
    AttributeSpec::array("binds", Format::RemoteBinds { holes })
        .describe("Input bindings to devices, groups and scenes")
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for DeviceType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchemaError::UnknownType(s.to_string()))
    }
}

impl From<DeviceType> for &'static str {
    fn from(value: DeviceType) -> Self {
        value.code()
    }
}

impl TryFrom<String> for DeviceType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for device_type in DeviceType::ALL {
            assert_eq!(device_type.code().parse::<DeviceType>().unwrap(), device_type);
        }
        assert_eq!("socket_relay".parse::<DeviceType>().unwrap(), DeviceType::SocketRelay);
        assert!("TOASTER".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_category_prefix() {
        assert_eq!(DeviceType::SocketRelay.category(), "SOCKET");
        assert_eq!(DeviceType::PanelTouch4.category(), "PANEL");
        assert_eq!(DeviceType::Dimmer.category(), "OTHER");
        assert_eq!(category_of("_HIDDEN"), "OTHER");
    }

    #[test]
    fn test_every_builtin_schema_is_well_formed() {
        for device_type in DeviceType::ALL {
            let schema = device_type.schema();
            assert!(schema.check().is_ok(), "{device_type}: {:?}", schema.check());
            assert!(!schema.attributes().is_empty(), "{device_type} has no attributes");
        }
    }

    #[test]
    fn test_panel_holes_follow_model_name() {
        assert_eq!(DeviceType::PanelTouch2.schema().hole_range("binds"), Some(HoleRange::new(1, 2)));
        assert_eq!(DeviceType::PanelTouch6.schema().hole_range("binds"), Some(HoleRange::new(1, 6)));
    }

    #[test]
    fn test_serde_uses_wire_code() {
        let json = serde_json::to_string(&DeviceType::FanController).unwrap();
        assert_eq!(json, "\"FAN_CONTROLLER\"");
        let parsed: DeviceType = serde_json::from_str("\"GATEWAY_HUB\"").unwrap();
        assert_eq!(parsed, DeviceType::GatewayHub);
    }
}
