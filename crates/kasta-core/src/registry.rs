//! Schema registry - maps device type codes to their schemas
//!
//! The registry is built once and read concurrently afterwards; nothing in
//! it changes after construction.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::catalog::DeviceTypeDescriptor;
use crate::device_type::DeviceType;
use crate::error::SchemaError;
use crate::schema::DeviceTypeSchema;

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    /// Schemas in registration order
    schemas: Vec<DeviceTypeSchema>,
    /// Type code -> position in `schemas`
    index: HashMap<&'static str, usize>,
}

impl SchemaRegistry {
    /// Registry of every built-in device type
    pub fn builtin() -> Self {
        let schemas: Vec<DeviceTypeSchema> =
            DeviceType::ALL.iter().map(DeviceType::schema).collect();
        let index = schemas
            .iter()
            .enumerate()
            .map(|(i, schema)| (schema.type_code(), i))
            .collect();
        debug!(types = schemas.len(), "Built schema registry");
        Self { schemas, index }
    }

    /// Build from an explicit set of schemas, checking each declaration
    pub fn from_schemas(
        schemas: impl IntoIterator<Item = DeviceTypeSchema>,
    ) -> Result<Self, SchemaError> {
        let mut registry = Self {
            schemas: Vec::new(),
            index: HashMap::new(),
        };
        for schema in schemas {
            if let Err(err) = schema.check() {
                warn!(type_code = schema.type_code(), error = %err, "Rejecting schema");
                return Err(err);
            }
            let code = schema.type_code();
            if registry.index.contains_key(code) {
                return Err(SchemaError::DuplicateType(code.to_string()));
            }
            registry.index.insert(code, registry.schemas.len());
            registry.schemas.push(schema);
        }
        debug!(types = registry.schemas.len(), "Built schema registry");
        Ok(registry)
    }

    /// Find the schema for a type code.
    ///
    /// Exact codes match first, then a case-insensitive comparison.
    pub fn lookup(&self, type_code: &str) -> Result<&DeviceTypeSchema, SchemaError> {
        let position = self.index.get(type_code).copied().or_else(|| {
            self.schemas
                .iter()
                .position(|s| s.type_code().eq_ignore_ascii_case(type_code.trim()))
        });
        match position {
            Some(i) => Ok(&self.schemas[i]),
            None => {
                debug!(type_code, "No schema for device type");
                Err(SchemaError::UnknownType(type_code.to_string()))
            }
        }
    }

    pub fn get(&self, device_type: DeviceType) -> Option<&DeviceTypeSchema> {
        self.index
            .get(device_type.code())
            .map(|&i| &self.schemas[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceTypeSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Catalogue entries for the aggregator views
    pub fn descriptors(&self) -> Vec<DeviceTypeDescriptor> {
        self.schemas
            .iter()
            .map(|s| DeviceTypeDescriptor::new(s.type_code(), s.description()))
            .collect()
    }

    /// Schemas grouped by category, categories sorted
    pub fn by_category(&self) -> BTreeMap<&'static str, Vec<&DeviceTypeSchema>> {
        let mut groups: BTreeMap<&'static str, Vec<&DeviceTypeSchema>> = BTreeMap::new();
        for schema in &self.schemas {
            groups.entry(schema.category()).or_default().push(schema);
        }
        groups
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeKind, AttributeSpec};
    use serde_json::{json, Map, Value};

    fn single(name: &str, value: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(name.to_string(), value);
        map
    }

    #[test]
    fn test_lookup() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.len(), DeviceType::ALL.len());
        assert_eq!(registry.lookup("SOCKET_RELAY").unwrap().device_type(), DeviceType::SocketRelay);
        assert_eq!(registry.lookup("fan_controller").unwrap().type_code(), "FAN_CONTROLLER");
        assert_eq!(
            registry.lookup("TOASTER").unwrap_err(),
            SchemaError::UnknownType("TOASTER".to_string())
        );
    }

    #[test]
    fn test_from_schemas_rejects_duplicates() {
        let result = SchemaRegistry::from_schemas([
            DeviceType::Dimmer.schema(),
            DeviceType::Dimmer.schema(),
        ]);
        assert_eq!(result.unwrap_err(), SchemaError::DuplicateType("DIMMER".to_string()));
    }

    #[test]
    fn test_from_schemas_rejects_bad_spec() {
        let mut bad = AttributeSpec::power("power");
        bad.options.clear();
        let schema = DeviceTypeSchema::new(DeviceType::Dimmer, "broken", vec![bad]);
        assert!(matches!(
            SchemaRegistry::from_schemas([schema]),
            Err(SchemaError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_builtin_passes_checked_construction() {
        let checked = SchemaRegistry::from_schemas(DeviceType::ALL.iter().map(DeviceType::schema));
        assert_eq!(checked.unwrap().len(), DeviceType::ALL.len());
    }

    #[test]
    fn test_by_category() {
        let registry = SchemaRegistry::builtin();
        let groups = registry.by_category();
        assert_eq!(groups["PANEL"].len(), 3);
        assert_eq!(groups["OTHER"][0].type_code(), "DIMMER");
    }

    #[test]
    fn test_every_select_option_validates() {
        let registry = SchemaRegistry::builtin();
        for schema in registry.iter() {
            for spec in schema.attributes() {
                if spec.kind != AttributeKind::Select {
                    continue;
                }
                for option in &spec.options {
                    let errors = schema.validate(&single(&spec.name, json!(option)));
                    assert!(errors.is_empty(), "{}.{} = {option}", schema.type_code(), spec.name);
                }
            }
        }
    }

    #[test]
    fn test_every_number_bound_is_inclusive() {
        let registry = SchemaRegistry::builtin();
        for schema in registry.iter() {
            for spec in schema.attributes() {
                if spec.kind != AttributeKind::Number {
                    continue;
                }
                let (Some(min), Some(max)) = (spec.min, spec.max) else {
                    continue;
                };
                let label = format!("{}.{}", schema.type_code(), spec.name);
                for ok in [min, max] {
                    assert!(schema.validate(&single(&spec.name, json!(ok))).is_empty(), "{label}");
                }
                for bad in [min - 1.0, max + 1.0] {
                    let errors = schema.validate(&single(&spec.name, json!(bad)));
                    assert_eq!(errors.len(), 1, "{label} = {bad}");
                    assert_eq!(errors[0].attribute(), spec.name);
                }
            }
        }
    }

    #[test]
    fn test_percentage_levels() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("DIMMER").unwrap();
        assert_eq!(schema.decode("level", Some(&json!(0))), "0%");
        assert_eq!(schema.decode("level", Some(&json!(255))), "100%");
        assert_eq!(schema.decode("level", Some(&json!(128))), "50%");
    }
}
