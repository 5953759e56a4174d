//! Catalogue views: category grouping, search and the project-supported subset

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use crate::device_type::category_of;

/// Catalogue row for one device type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeDescriptor {
    pub type_code: String,
    #[serde(default)]
    pub description: String,
}

impl DeviceTypeDescriptor {
    pub fn new(type_code: &str, description: &str) -> Self {
        Self {
            type_code: type_code.to_string(),
            description: description.to_string(),
        }
    }

    pub fn category(&self) -> &str {
        category_of(&self.type_code)
    }
}

/// Group descriptors by the prefix of their type code
pub fn group_by_category(
    all_types: &[DeviceTypeDescriptor],
) -> BTreeMap<String, Vec<DeviceTypeDescriptor>> {
    let mut groups: BTreeMap<String, Vec<DeviceTypeDescriptor>> = BTreeMap::new();
    for descriptor in all_types {
        groups
            .entry(descriptor.category().to_string())
            .or_default()
            .push(descriptor.clone());
    }
    groups
}

/// One value of a supported-type table: a plain list, or a single level of
/// named sub-lists (`"PowerPoint Type" = { "Single-Way" = [...] }`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupportedEntry<T> {
    List(Vec<T>),
    Nested(BTreeMap<String, Vec<T>>),
}

/// Flatten nested sub-types to `"{Type} - {SubType}"` keys.
/// Lists landing on the same key are concatenated.
pub fn flatten_supported_types<T: Clone>(
    nested: &BTreeMap<String, SupportedEntry<T>>,
) -> BTreeMap<String, Vec<T>> {
    let mut flat: BTreeMap<String, Vec<T>> = BTreeMap::new();
    let mut add = |key: String, items: &[T]| {
        if flat.contains_key(&key) {
            warn!(key = %key, "Supported type group defined twice, merging lists");
        }
        flat.entry(key).or_default().extend_from_slice(items);
    };
    for (key, entry) in nested {
        match entry {
            SupportedEntry::List(items) => add(key.clone(), items),
            SupportedEntry::Nested(subtypes) => {
                for (subtype, items) in subtypes {
                    add(format!("{key} - {subtype}"), items);
                }
            }
        }
    }
    flat
}

/// Case-insensitive substring search over code and description.
/// A blank term matches everything.
pub fn filter(catalog: &[DeviceTypeDescriptor], term: &str) -> Vec<DeviceTypeDescriptor> {
    let needle = term.trim().to_lowercase();
    catalog
        .iter()
        .filter(|d| {
            needle.is_empty()
                || d.type_code.to_lowercase().contains(&needle)
                || d.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// The catalogue split by what a project supports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub supported: Vec<DeviceTypeDescriptor>,
    pub unsupported: Vec<DeviceTypeDescriptor>,
    /// Supported codes with no catalogue entry, first-seen order
    pub unknown: Vec<String>,
}

pub fn reconcile(
    catalog: &[DeviceTypeDescriptor],
    supported: &BTreeMap<String, Vec<String>>,
) -> Reconciliation {
    let wanted: HashSet<String> = supported
        .values()
        .flatten()
        .map(|code| code.to_uppercase())
        .collect();
    let known: HashSet<String> = catalog.iter().map(|d| d.type_code.to_uppercase()).collect();

    let (supported_types, unsupported): (Vec<_>, Vec<_>) = catalog
        .iter()
        .cloned()
        .partition(|d| wanted.contains(&d.type_code.to_uppercase()));

    let mut seen = HashSet::new();
    let unknown = supported
        .values()
        .flatten()
        .filter(|code| !known.contains(&code.to_uppercase()))
        .filter(|code| seen.insert(code.to_uppercase()))
        .cloned()
        .collect();

    Reconciliation {
        supported: supported_types,
        unsupported,
        unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<DeviceTypeDescriptor> {
        vec![
            DeviceTypeDescriptor::new("LIGHT_DIMMER", "Trailing-edge dimmer"),
            DeviceTypeDescriptor::new("LIGHT_SWITCH", "On/off switch"),
            DeviceTypeDescriptor::new("SOCKET_RELAY", "Two-way socket relay"),
            DeviceTypeDescriptor::new("DIMMER", "Legacy dimmer"),
        ]
    }

    #[test]
    fn test_group_by_category() {
        let groups = group_by_category(&catalog());
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["LIGHT", "OTHER", "SOCKET"]);
        assert_eq!(groups["LIGHT"].len(), 2);
        assert_eq!(groups["OTHER"][0].type_code, "DIMMER");
    }

    #[test]
    fn test_flatten_one_level() {
        let nested: BTreeMap<String, SupportedEntry<i32>> =
            serde_json::from_str(r#"{"A": [1, 2], "B": {"X": [3], "Y": [4]}}"#).unwrap();
        let flat = flatten_supported_types(&nested);

        let expected: BTreeMap<String, Vec<i32>> = [
            ("A".to_string(), vec![1, 2]),
            ("B - X".to_string(), vec![3]),
            ("B - Y".to_string(), vec![4]),
        ]
        .into_iter()
        .collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_flatten_merges_colliding_keys() {
        let nested: BTreeMap<String, SupportedEntry<i32>> =
            serde_json::from_str(r#"{"A - X": [1], "A": {"X": [2]}}"#).unwrap();
        let flat = flatten_supported_types(&nested);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["A - X"], vec![2, 1]);
    }

    #[test]
    fn test_deeper_nesting_does_not_parse() {
        let result: Result<BTreeMap<String, SupportedEntry<i32>>, _> =
            serde_json::from_str(r#"{"A": {"X": {"Deep": [1]}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_filter() {
        let found = filter(&catalog(), "dimmer");
        assert_eq!(found.len(), 2);
        let found = filter(&catalog(), "RELAY");
        assert_eq!(found[0].type_code, "SOCKET_RELAY");
        let found = filter(&catalog(), "on/OFF");
        assert_eq!(found[0].type_code, "LIGHT_SWITCH");
        assert_eq!(filter(&catalog(), "  ").len(), 4);
        assert!(filter(&catalog(), "thermostat").is_empty());
    }

    #[test]
    fn test_reconcile() {
        let supported: BTreeMap<String, Vec<String>> = [
            ("Lights".to_string(), vec!["LIGHT_DIMMER".to_string(), "light_switch".to_string()]),
            (
                "PowerPoint Type - Two-Way".to_string(),
                vec!["SOCKET_DUAL".to_string(), "SOCKET_DUAL".to_string()],
            ),
        ]
        .into_iter()
        .collect();

        let view = reconcile(&catalog(), &supported);
        let codes = |list: &[DeviceTypeDescriptor]| {
            list.iter().map(|d| d.type_code.clone()).collect::<Vec<_>>()
        };
        assert_eq!(codes(&view.supported), vec!["LIGHT_DIMMER", "LIGHT_SWITCH"]);
        assert_eq!(codes(&view.unsupported), vec!["SOCKET_RELAY", "DIMMER"]);
        assert_eq!(view.unknown, vec!["SOCKET_DUAL"]);
    }
}
