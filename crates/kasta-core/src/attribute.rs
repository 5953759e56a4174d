//! Attribute specifications: the shape of one field of a device type

use serde::{Deserialize, Serialize};

use crate::remote_bind::HoleRange;

/// Broad value kind of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// One of a fixed set of integer codes
    Select,
    /// Numeric value, optionally bounded
    Number,
    Text,
    /// List of structured entries decoded by a sub-codec
    Array,
    /// Composite value with its own codec (colour, bitmask)
    Custom,
}

/// How a raw attribute value is rendered for display.
///
/// Each attribute has exactly one formatter; composite formats carry the
/// parameters their codec needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Format {
    /// `0/1` as `Off/On`
    Power,
    /// Byte level as a whole percentage
    Percent,
    /// Delay in minutes
    Minutes,
    /// Fixed-point tenths of a degree Celsius
    Tenths,
    /// Low / Medium / High tier over `0..=30`
    Backlight,
    /// RGB triplet as `#rrggbb`
    Rgb,
    /// Option label of a Select attribute
    Label,
    /// Raw number with an optional unit
    Plain { unit: Option<String> },
    Text,
    /// Gateway connectivity bitmask
    Connection,
    /// Socket relay error log, summarised per channel
    SocketErrors,
    /// Remote bindings with the input positions valid for this device
    RemoteBinds { holes: HoleRange },
}

/// Declaration of one attribute of a device type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSpec {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub is_read_only: bool,
    /// Hidden from ordinary listings
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub format: Format,
}

impl AttributeSpec {
    fn new(name: &str, kind: AttributeKind, format: Format) -> Self {
        Self {
            name: name.to_string(),
            kind,
            options: Vec::new(),
            option_labels: Vec::new(),
            min: None,
            max: None,
            is_read_only: false,
            is_internal: false,
            description: String::new(),
            format,
        }
    }

    /// Select attribute rendered through its option labels
    pub fn select(name: &str, options: &[i64], labels: &[&str]) -> Self {
        let mut spec = Self::new(name, AttributeKind::Select, Format::Label);
        spec.options = options.to_vec();
        spec.option_labels = labels.iter().map(|l| l.to_string()).collect();
        spec
    }

    /// `0/1` power switch
    pub fn power(name: &str) -> Self {
        let mut spec = Self::new(name, AttributeKind::Select, Format::Power);
        spec.options = vec![0, 1];
        spec
    }

    pub fn number(name: &str, min: f64, max: f64, format: Format) -> Self {
        let mut spec = Self::new(name, AttributeKind::Number, format);
        spec.min = Some(min);
        spec.max = Some(max);
        spec
    }

    /// Number without bounds, typically a read-only measurement
    pub fn measurement(name: &str, format: Format) -> Self {
        Self::new(name, AttributeKind::Number, format).read_only()
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, AttributeKind::Text, Format::Text)
    }

    pub fn array(name: &str, format: Format) -> Self {
        Self::new(name, AttributeKind::Array, format)
    }

    pub fn custom(name: &str, format: Format) -> Self {
        Self::new(name, AttributeKind::Custom, format)
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn internal(mut self) -> Self {
        self.is_internal = true;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Check the declaration invariants: Select needs options (and a label
    /// per option when labelled), bounds must be ordered.
    pub fn check(&self) -> Result<(), String> {
        if self.kind == AttributeKind::Select {
            if self.options.is_empty() {
                return Err("select attribute without options".to_string());
            }
            if !self.option_labels.is_empty() && self.option_labels.len() != self.options.len() {
                return Err(format!(
                    "{} labels for {} options",
                    self.option_labels.len(),
                    self.options.len()
                ));
            }
        }
        if self.format == Format::Label && self.option_labels.is_empty() {
            return Err("label format without option labels".to_string());
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("min {min} exceeds max {max}"));
            }
        }
        if let Format::RemoteBinds { holes } = &self.format {
            if holes.min > holes.max {
                return Err(format!("hole range {}..{} is empty", holes.min, holes.max));
            }
        }
        Ok(())
    }
}
