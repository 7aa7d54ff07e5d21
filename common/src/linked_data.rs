//! Schema-free view over JSON-LD index card metadata.
//!
//! Every property of a node is a list, even when the vocabulary says it is
//! single valued. Entries are either literals (`{"@value": ...}`) or nodes
//! (`{"@id": ..., other properties...}`). Nothing here fails on missing or
//! oddly shaped data: unknown shapes are skipped and absent properties read
//! as empty lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;


#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyBag {
    pub id: Option<String>,
    pub types: Vec<String>,
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Literal { value: String, language: Option<String> },
    /// Reference to another node; the bag holds whatever the index inlined,
    /// which may be nothing but the IRI.
    Reference(PropertyBag),
}

impl PropertyValue {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            PropertyValue::Literal { value, .. } => Some(value),
            PropertyValue::Reference(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&PropertyBag> {
        match self {
            PropertyValue::Literal { .. } => None,
            PropertyValue::Reference(node) => Some(node),
        }
    }

    pub fn iri(&self) -> Option<&str> {
        self.as_node().and_then(|node| node.id.as_deref())
    }

    fn from_json(value: &Value) -> Option<PropertyValue> {
        match value {
            Value::Object(map) => {
                if let Some(literal) = map.get("@value") {
                    return Some(PropertyValue::Literal {
                        value: literal_to_string(literal)?,
                        language: map.get("@language").and_then(Value::as_str).map(str::to_string),
                    });
                }
                Some(PropertyValue::Reference(PropertyBag::from_json(value)))
            }
            // compacted documents sometimes inline plain values
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(PropertyValue::Literal {
                value: literal_to_string(value)?,
                language: None,
            }),
            Value::Null | Value::Array(_) => None,
        }
    }
}

fn literal_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl PropertyBag {
    /// Reads a node out of arbitrary JSON. Anything that is not an object
    /// becomes an empty bag.
    pub fn from_json(value: &Value) -> PropertyBag {
        let Value::Object(map) = value else {
            return PropertyBag::default();
        };
        let mut bag = PropertyBag::default();
        for (key, raw) in map {
            match key.as_str() {
                "@id" => bag.id = raw.as_str().map(str::to_string),
                "@type" => bag.types = string_list(raw),
                _ => {
                    let entries: Vec<PropertyValue> = match raw {
                        Value::Array(items) => items.iter().filter_map(PropertyValue::from_json).collect(),
                        other => PropertyValue::from_json(other).into_iter().collect(),
                    };
                    bag.properties.insert(key.clone(), entries);
                }
            }
        }
        bag
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// All entries of a property; absent properties read as empty.
    pub fn values_of(&self, property: &str) -> &[PropertyValue] {
        self.properties.get(property).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_value_of(&self, property: &str) -> Option<&PropertyValue> {
        self.values_of(property).first()
    }

    pub fn first_literal(&self, property: &str) -> Option<&str> {
        self.first_value_of(property).and_then(PropertyValue::as_literal)
    }

    pub fn first_node(&self, property: &str) -> Option<&PropertyBag> {
        self.first_value_of(property).and_then(PropertyValue::as_node)
    }

    pub fn nodes_of(&self, property: &str) -> impl Iterator<Item = &PropertyBag> {
        self.values_of(property).iter().filter_map(PropertyValue::as_node)
    }

    pub fn literals_of(&self, property: &str) -> impl Iterator<Item = &str> {
        self.values_of(property).iter().filter_map(PropertyValue::as_literal)
    }

    /// IRIs naming what this node is: its `@type` list followed by the
    /// `resourceType` references the index attaches to cards.
    pub fn type_iris(&self) -> impl Iterator<Item = &str> {
        self.types
            .iter()
            .map(String::as_str)
            .chain(self.values_of("resourceType").iter().filter_map(|v| v.iri().or_else(|| v.as_literal())))
    }
}

impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(PropertyBag::from_json(&value))
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().filter_map(|i| i.as_str().map(str::to_string)).collect(),
        _ => vec![],
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_literals_and_nested_nodes() {
        let bag = PropertyBag::from_json(&json!({
            "@id": "https://osf.io/abcde",
            "@type": ["https://osf.io/vocab/2022/Project"],
            "title": [{"@value": "Soil survey", "@language": "en"}],
            "creator": [{
                "@id": "https://osf.io/user1",
                "name": [{"@value": "Ada"}],
            }],
            "rights": [{"@id": "https://creativecommons.org/licenses/by/4.0/"}],
        }));

        assert_eq!(bag.id.as_deref(), Some("https://osf.io/abcde"));
        assert_eq!(bag.types, vec!["https://osf.io/vocab/2022/Project".to_string()]);
        assert_eq!(bag.first_literal("title"), Some("Soil survey"));

        let creator = bag.first_node("creator").unwrap();
        assert_eq!(creator.id.as_deref(), Some("https://osf.io/user1"));
        assert_eq!(creator.first_literal("name"), Some("Ada"));

        let rights = bag.first_value_of("rights").unwrap();
        assert_eq!(rights.iri(), Some("https://creativecommons.org/licenses/by/4.0/"));
        assert!(rights.as_node().unwrap().properties.is_empty());
    }

    #[test]
    fn missing_and_malformed_data_reads_as_absent() {
        let bag = PropertyBag::from_json(&json!({
            "title": [],
            "description": "bare string",
            "dateCreated": [null, [1, 2], {"@value": "2023-01-01"}],
        }));

        assert_eq!(bag.first_value_of("title"), None);
        assert_eq!(bag.first_literal("missing"), None);
        assert!(bag.values_of("missing").is_empty());
        assert_eq!(bag.first_literal("description"), Some("bare string"));
        assert_eq!(bag.first_literal("dateCreated"), Some("2023-01-01"));
        assert_eq!(bag.first_node("dateCreated"), None);

        assert_eq!(PropertyBag::from_json(&json!(null)), PropertyBag::default());
        assert_eq!(PropertyBag::from_json(&json!([1, 2])), PropertyBag::default());
    }

    #[test]
    fn type_iris_include_resource_type_references() {
        let bag: PropertyBag = serde_json::from_value(json!({
            "@type": "https://osf.io/vocab/2022/Registration",
            "resourceType": [{"@id": "Project"}, {"@value": "File"}],
        }))
        .unwrap();
        assert_eq!(
            bag.type_iris().collect::<Vec<_>>(),
            vec!["https://osf.io/vocab/2022/Registration", "Project", "File"]
        );
    }

    #[test]
    fn non_string_literals_are_stringified() {
        let bag = PropertyBag::from_json(&json!({
            "storageByteCount": [{"@value": 1024}],
            "isWithdrawn": [{"@value": true}],
        }));
        assert_eq!(bag.first_literal("storageByteCount"), Some("1024"));
        assert_eq!(bag.first_literal("isWithdrawn"), Some("true"));
    }
}
