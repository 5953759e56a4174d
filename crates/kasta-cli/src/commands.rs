//! Command implementations. Each returns the text to print so the
//! formatting can be tested without a terminal.

use anyhow::{Context, Result};
use kasta_core::catalog::{filter, group_by_category, reconcile};
use kasta_core::connection::{decode_connection_details, decode_connection_state};
use kasta_core::socket_error::decode_error_type;
use kasta_core::{rgb_to_hex, AttributeKind, SchemaRegistry};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::config::{Config, OutputFormat};

/// Text to print and whether the command succeeded
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }
}

fn to_json(value: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

/// Read a JSON object of raw attributes from a file, or stdin when no path
pub fn read_attributes(path: Option<&Path>) -> Result<Map<String, Value>> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_attributes(&content)
}

pub fn parse_attributes(content: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(content).context("Attributes must be a JSON object")
}

pub fn types(
    registry: &SchemaRegistry,
    search: Option<&str>,
    by_category: bool,
    format: OutputFormat,
) -> Result<Outcome> {
    let catalog = filter(&registry.descriptors(), search.unwrap_or(""));
    debug!(matches = catalog.len(), "Filtered catalogue");

    if by_category {
        let groups = group_by_category(&catalog);
        if format == OutputFormat::Json {
            return Ok(Outcome::ok(to_json(&groups)?));
        }
        let mut out = String::new();
        for (category, members) in &groups {
            out.push_str(&format!("{category}\n"));
            for d in members {
                out.push_str(&format!("  {:<16} {}\n", d.type_code, d.description));
            }
        }
        return Ok(Outcome::ok(out));
    }

    if format == OutputFormat::Json {
        return Ok(Outcome::ok(to_json(&catalog)?));
    }
    let out = catalog
        .iter()
        .map(|d| format!("{:<16} {}\n", d.type_code, d.description))
        .collect();
    Ok(Outcome::ok(out))
}

pub fn describe(
    registry: &SchemaRegistry,
    type_code: &str,
    include_internal: bool,
    format: OutputFormat,
) -> Result<Outcome> {
    let schema = registry.lookup(type_code)?;
    let attributes = schema.describe(include_internal);

    if format == OutputFormat::Json {
        return Ok(Outcome::ok(to_json(&json!({
            "typeCode": schema.type_code(),
            "category": schema.category(),
            "description": schema.description(),
            "attributes": attributes,
        }))?));
    }

    let mut out = format!(
        "{} ({})\n{}\n",
        schema.type_code(),
        schema.category(),
        schema.description()
    );
    for spec in attributes {
        let constraint = match spec.kind {
            AttributeKind::Select => format!(
                "one of {}",
                spec.options
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            _ => match (spec.min, spec.max) {
                (Some(min), Some(max)) => format!("{min}..={max}"),
                (Some(min), None) => format!(">= {min}"),
                (None, Some(max)) => format!("<= {max}"),
                (None, None) => String::new(),
            },
        };
        let flag = if spec.is_read_only { " [read-only]" } else { "" };
        out.push_str(&format!(
            "  {:<12} {:<7} {}{}\n",
            spec.name,
            format!("{:?}", spec.kind).to_lowercase(),
            constraint,
            flag
        ));
    }
    Ok(Outcome::ok(out))
}

pub fn decode(
    registry: &SchemaRegistry,
    type_code: &str,
    attrs: &Map<String, Value>,
    format: OutputFormat,
) -> Result<Outcome> {
    let schema = registry.lookup(type_code)?;
    let decoded = schema.decode_all(attrs);

    if format == OutputFormat::Json {
        let map: BTreeMap<_, _> = decoded.into_iter().collect();
        return Ok(Outcome::ok(to_json(&map)?));
    }

    let mut out = String::new();
    for (name, text) in &decoded {
        out.push_str(&format!("{name}: {text}\n"));
        for row in schema.decode_bindings(name, attrs.get(name)) {
            let timer = if row.has_timer {
                format!(" at {} -> {}", row.time, row.state)
            } else {
                String::new()
            };
            out.push_str(&format!(
                "  #{} {} {} ({}){}\n",
                row.hole, row.target, row.target_id, row.enable, timer
            ));
        }
    }
    Ok(Outcome::ok(out))
}

pub fn validate(
    registry: &SchemaRegistry,
    type_code: &str,
    attrs: &Map<String, Value>,
    format: OutputFormat,
) -> Result<Outcome> {
    let schema = registry.lookup(type_code)?;
    let messages: Vec<String> = schema
        .validate(attrs)
        .iter()
        .map(ToString::to_string)
        .collect();
    let success = messages.is_empty();

    let output = if format == OutputFormat::Json {
        to_json(&json!({ "valid": success, "errors": messages }))?
    } else if success {
        "valid\n".to_string()
    } else {
        messages.iter().map(|m| format!("{m}\n")).collect()
    };
    Ok(Outcome { output, success })
}

pub fn supported(
    registry: &SchemaRegistry,
    config: &Config,
    format: OutputFormat,
) -> Result<Outcome> {
    let flat = config.supported_types();
    let view = reconcile(&registry.descriptors(), &flat);

    if format == OutputFormat::Json {
        return Ok(Outcome::ok(to_json(&json!({
            "groups": flat,
            "reconciliation": view,
        }))?));
    }

    let mut out = String::new();
    for (group, codes) in &flat {
        out.push_str(&format!("{group}: {}\n", codes.join(", ")));
    }
    let codes = |list: &[kasta_core::DeviceTypeDescriptor]| {
        list.iter()
            .map(|d| d.type_code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.push_str(&format!("supported: {}\n", codes(&view.supported)));
    out.push_str(&format!("unsupported: {}\n", codes(&view.unsupported)));
    if !view.unknown.is_empty() {
        out.push_str(&format!("unknown: {}\n", view.unknown.join(", ")));
    }
    Ok(Outcome::ok(out))
}

pub fn connection(value: Option<i64>, format: OutputFormat) -> Result<Outcome> {
    let text = decode_connection_state(value);
    if format == OutputFormat::Json {
        return Ok(Outcome::ok(to_json(&json!({
            "state": text,
            "details": decode_connection_details(value),
        }))?));
    }
    Ok(Outcome::ok(format!("{text}\n")))
}

pub fn error_type(code: i64) -> Outcome {
    Outcome::ok(format!("{}\n", decode_error_type(code)))
}

pub fn rgb(r: f64, g: f64, b: f64) -> Outcome {
    Outcome::ok(format!("{}\n", rgb_to_hex(Some(r), Some(g), Some(b))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builtin()
    }

    #[test]
    fn test_decode_text_output() {
        let attrs = parse_attributes(r#"{"power": 1, "level": 128, "speed": 2}"#).unwrap();
        let outcome = decode(&registry(), "DIMMER", &attrs, OutputFormat::Text).unwrap();
        assert_eq!(outcome.output, "power: On\nlevel: 50%\n");
    }

    #[test]
    fn test_decode_lists_bindings() {
        let attrs = parse_attributes(
            r#"{"binds": [{"bindType": 1, "bindId": 4, "hour": 22, "min": 0,
                           "state": 0, "enable": 1, "hasTimer": 1, "hole": 2}]}"#,
        )
        .unwrap();
        let outcome = decode(&registry(), "PANEL_TOUCH_2", &attrs, OutputFormat::Text).unwrap();
        assert_eq!(
            outcome.output,
            "binds: 1 binding\n  #2 Group 4 (Enabled) at 22:00 -> Off\n"
        );
    }

    #[test]
    fn test_validate_reports_failure() {
        let attrs = parse_attributes(r#"{"setTemp": 400}"#).unwrap();
        let outcome = validate(&registry(), "THERMOSTAT_AC", &attrs, OutputFormat::Text).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.output, "setTemp must be between 160 and 320\n");
    }

    #[test]
    fn test_validate_json() {
        let attrs = parse_attributes(r#"{"power": 1}"#).unwrap();
        let outcome = validate(&registry(), "LIGHT_SWITCH", &attrs, OutputFormat::Json).unwrap();
        assert!(outcome.success);
        let value: Value = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(value["valid"], true);
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        assert!(describe(&registry(), "TOASTER", false, OutputFormat::Text).is_err());
    }

    #[test]
    fn test_types_search() {
        let outcome = types(&registry(), Some("socket"), false, OutputFormat::Text).unwrap();
        assert_eq!(outcome.output.lines().count(), 2);
        assert!(outcome.output.starts_with("SOCKET_RELAY"));
    }

    #[test]
    fn test_supported_view() {
        let config: Config = toml::from_str(
            r#"
[supported]
Lighting = ["LIGHT_DIMMER", "LIGHT_HALO"]
"#,
        )
        .unwrap();
        let outcome = supported(&registry(), &config, OutputFormat::Text).unwrap();
        assert!(outcome.output.contains("supported: LIGHT_DIMMER\n"));
        assert!(outcome.output.contains("unknown: LIGHT_HALO\n"));
    }

    #[test]
    fn test_stand_alone_codecs() {
        assert_eq!(connection(Some(5), OutputFormat::Text).unwrap().output, "Connected (WiFi, Internet)\n");
        assert_eq!(connection(None, OutputFormat::Text).unwrap().output, "Unknown\n");
        assert_eq!(error_type(82).output, "Alert Disabled (0x52)\n");
        assert_eq!(rgb(255.0, 0.0, 128.0).output, "#ff0080\n");
    }
}
