//! Device type schemas: validation and display decoding of attribute payloads

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::attribute::{AttributeKind, AttributeSpec, Format};
use crate::connection::decode_connection_state;
use crate::device_type::DeviceType;
use crate::error::{SchemaError, ValidationError};
use crate::format::{self, coerce_integer, coerce_number, format_raw, SENTINEL};
use crate::remote_bind::{
    decode_binding, describe_bindings, validate_binding, DisplayBinding, HoleRange,
    RemoteBindEntry,
};
use crate::socket_error::{summarize_errors, ErrorSummary, SocketError};

/// The shape of one device type: its attributes in declaration order.
///
/// Schemas hold no per-device state and are never modified once built.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceTypeSchema {
    device_type: DeviceType,
    description: String,
    attributes: Vec<AttributeSpec>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl DeviceTypeSchema {
    pub fn new(device_type: DeviceType, description: &str, attributes: Vec<AttributeSpec>) -> Self {
        let index = attributes
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.clone(), i))
            .collect();
        Self {
            device_type,
            description: description.to_string(),
            attributes,
            index,
        }
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn type_code(&self) -> &'static str {
        self.device_type.code()
    }

    pub fn category(&self) -> &'static str {
        self.device_type.category()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    /// Attributes for listing; internal ones only on request
    pub fn describe(&self, include_internal: bool) -> Vec<&AttributeSpec> {
        self.attributes
            .iter()
            .filter(|spec| include_internal || !spec.is_internal)
            .collect()
    }

    /// Check every attribute declaration and reject duplicate names
    pub fn check(&self) -> Result<(), SchemaError> {
        let invalid = |attribute: &str, reason: String| SchemaError::InvalidSpec {
            type_code: self.type_code().to_string(),
            attribute: attribute.to_string(),
            reason,
        };
        if self.index.len() != self.attributes.len() {
            return Err(invalid("*", "duplicate attribute name".to_string()));
        }
        for spec in &self.attributes {
            spec.check().map_err(|reason| invalid(&spec.name, reason))?;
        }
        Ok(())
    }

    /// Validate the declared attributes present in `attrs`.
    ///
    /// Missing and `null` attributes are not errors, undeclared ones are
    /// ignored. Never fails; an empty list means the payload is valid.
    pub fn validate(&self, attrs: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (name, value) in attrs {
            let Some(spec) = self.attribute(name) else {
                debug!(type_code = self.type_code(), attribute = %name, "Ignoring undeclared attribute");
                continue;
            };
            if value.is_null() {
                continue;
            }
            validate_value(spec, value, &mut errors);
        }
        errors
    }

    /// Render one raw attribute value for display. Unknown attributes,
    /// missing values and undecodable values all come back as `-`.
    pub fn decode(&self, name: &str, raw: Option<&Value>) -> String {
        let Some(spec) = self.attribute(name) else {
            debug!(type_code = self.type_code(), attribute = %name, "Decode of undeclared attribute");
            return SENTINEL.to_string();
        };
        decode_value(spec, raw)
    }

    /// Decode every declared attribute present in `attrs`, in declaration order
    pub fn decode_all(&self, attrs: &Map<String, Value>) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .filter_map(|spec| {
                attrs
                    .get(&spec.name)
                    .map(|raw| (spec.name.clone(), decode_value(spec, Some(raw))))
            })
            .collect()
    }

    /// Input positions accepted by a remote-binding attribute
    pub fn hole_range(&self, name: &str) -> Option<HoleRange> {
        match self.attribute(name)?.format {
            Format::RemoteBinds { holes } => Some(holes),
            _ => None,
        }
    }

    /// Per-binding display rows of a remote-binding attribute.
    /// Entries that do not parse are skipped, whereas `decode` shows `-`
    /// for the whole array when any entry is malformed.
    pub fn decode_bindings(&self, name: &str, raw: Option<&Value>) -> Vec<DisplayBinding> {
        if self.hole_range(name).is_none() {
            return Vec::new();
        }
        parse_entries::<RemoteBindEntry>(raw)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| decode_binding(&entry))
            .collect()
    }

    /// Channel summary of a socket error log attribute
    pub fn error_summary(&self, name: &str, raw: Option<&Value>) -> Option<ErrorSummary> {
        if self.attribute(name)?.format != Format::SocketErrors {
            return None;
        }
        let errors: Vec<SocketError> = parse_entries::<SocketError>(raw)?
            .into_iter()
            .flatten()
            .collect();
        Some(summarize_errors(&errors))
    }
}

/// Parse each element of an array value, keeping per-element failures
fn parse_entries<T: serde::de::DeserializeOwned>(
    raw: Option<&Value>,
) -> Option<Vec<Option<T>>> {
    match raw {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
        ),
        _ => None,
    }
}

fn validate_value(spec: &AttributeSpec, value: &Value, errors: &mut Vec<ValidationError>) {
    let name = spec.name.as_str();
    match spec.kind {
        AttributeKind::Select => {
            let is_option = coerce_number(value)
                .is_some_and(|n| spec.options.iter().any(|&o| o as f64 == n));
            if !is_option {
                errors.push(ValidationError::not_an_option(name, &spec.options));
            }
        }
        AttributeKind::Number => match coerce_number(value) {
            Some(n) => check_bounds(spec, n, errors),
            None => errors.push(ValidationError::NotANumber {
                name: name.to_string(),
            }),
        },
        AttributeKind::Text => {
            if !value.is_string() {
                errors.push(ValidationError::NotText {
                    name: name.to_string(),
                });
            }
        }
        AttributeKind::Array => validate_array(spec, value, errors),
        AttributeKind::Custom => match spec.format {
            Format::Rgb => validate_rgb(name, value, errors),
            Format::Connection => match coerce_integer(value) {
                Some(n) => check_bounds(spec, n as f64, errors),
                None => errors.push(ValidationError::NotANumber {
                    name: name.to_string(),
                }),
            },
            _ => match coerce_number(value) {
                Some(n) => check_bounds(spec, n, errors),
                None => errors.push(ValidationError::NotANumber {
                    name: name.to_string(),
                }),
            },
        },
    }
}

fn check_bounds(spec: &AttributeSpec, n: f64, errors: &mut Vec<ValidationError>) {
    let name = spec.name.clone();
    match (spec.min, spec.max) {
        (Some(min), Some(max)) if n < min || n > max => {
            errors.push(ValidationError::OutOfRange { name, min, max });
        }
        (Some(min), None) if n < min => errors.push(ValidationError::BelowMin { name, min }),
        (None, Some(max)) if n > max => errors.push(ValidationError::AboveMax { name, max }),
        _ => {}
    }
}

fn validate_array(spec: &AttributeSpec, value: &Value, errors: &mut Vec<ValidationError>) {
    let name = spec.name.as_str();
    let Value::Array(items) = value else {
        errors.push(ValidationError::NotAnArray {
            name: name.to_string(),
        });
        return;
    };

    for (index, item) in items.iter().enumerate() {
        let entry_errors = match &spec.format {
            Format::RemoteBinds { holes } => {
                serde_json::from_value::<RemoteBindEntry>(item.clone())
                    .map(|entry| validate_binding(&entry, *holes))
            }
            Format::SocketErrors => {
                serde_json::from_value::<SocketError>(item.clone()).map(|entry| entry.validate())
            }
            _ => Ok(Vec::new()),
        };
        match entry_errors {
            Ok(list) => errors.extend(list.into_iter().map(|e| e.in_entry(name, index))),
            Err(err) => errors.push(ValidationError::MalformedEntry {
                name: name.to_string(),
                index,
                reason: err.to_string(),
            }),
        }
    }
}

fn validate_rgb(name: &str, value: &Value, errors: &mut Vec<ValidationError>) {
    let channels: [(&str, Option<&Value>); 3] = match value {
        Value::Array(items) => [("r", items.first()), ("g", items.get(1)), ("b", items.get(2))],
        Value::Object(map) => [("r", map.get("r")), ("g", map.get("g")), ("b", map.get("b"))],
        _ => {
            errors.push(ValidationError::NotAnArray {
                name: name.to_string(),
            });
            return;
        }
    };
    for (channel, raw) in channels {
        let field = format!("{name}.{channel}");
        match raw.and_then(coerce_number) {
            Some(n) if (0.0..=255.0).contains(&n) => {}
            Some(_) => errors.push(ValidationError::out_of_range(&field, 0.0, 255.0)),
            None => errors.push(ValidationError::NotANumber { name: field }),
        }
    }
}

fn decode_value(spec: &AttributeSpec, raw: Option<&Value>) -> String {
    let raw = raw.filter(|v| !v.is_null());
    match &spec.format {
        Format::Power => format::power(raw),
        Format::Percent => format::percent(raw),
        Format::Minutes => format::minutes(raw),
        Format::Tenths => format::tenths_celsius(raw),
        Format::Backlight => format::backlight(raw),
        Format::Rgb => format::rgb(raw),
        Format::Label => format::option_label(raw, &spec.options, &spec.option_labels),
        Format::Plain { unit } => format::plain(raw, unit.as_deref()),
        Format::Text => format::text(raw),
        Format::Connection => match raw {
            None => decode_connection_state(None),
            Some(value) => match coerce_integer(value) {
                Some(state) => decode_connection_state(Some(state)),
                None => format!("Unknown ({})", format_raw(value)),
            },
        },
        Format::SocketErrors => match parse_entries::<SocketError>(raw) {
            Some(entries) if entries.iter().all(Option::is_some) => {
                let errors: Vec<SocketError> = entries.into_iter().flatten().collect();
                summarize_errors(&errors).summary
            }
            _ => SENTINEL.to_string(),
        },
        Format::RemoteBinds { .. } => match parse_entries::<RemoteBindEntry>(raw) {
            Some(entries) if entries.iter().all(Option::is_some) => describe_bindings(entries.len()),
            _ => SENTINEL.to_string(),
        },
    }
}
