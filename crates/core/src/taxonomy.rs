// crates/core/src/taxonomy.rs
//! Taxonomy types and normalization.
//!
//! A taxonomy is a set of named classification fields, each with an enumerated
//! set of permitted values and human-readable descriptions. Callers supply it
//! either as a flat tag list (one implicit field) or as a structured
//! multi-field mapping; both shapes collapse to the one [`Taxonomy`] type here
//! so nothing downstream ever branches on input shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TaxonomyError;

/// One classification field: a description plus the permitted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyField {
    #[serde(default)]
    pub description: String,
    pub values: BTreeMap<String, String>,
}

/// A normalized taxonomy: field name → field definition.
///
/// Backed by a `BTreeMap` so field and value iteration order is deterministic
/// and re-normalizing the same input serializes byte-identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    fields: BTreeMap<String, TaxonomyField>,
}

impl Taxonomy {
    /// Build a single-field taxonomy from a flat tag list.
    ///
    /// Each tag becomes a value whose description is a templated sentence
    /// referencing the tag and the field name. Duplicate tags collapse to one
    /// value; empty tags and an empty list are validation errors.
    pub fn from_tags(
        field_name: &str,
        description: &str,
        tags: &[String],
    ) -> Result<Self, TaxonomyError> {
        if field_name.trim().is_empty() {
            return Err(TaxonomyError::EmptyFieldName);
        }
        if tags.is_empty() {
            return Err(TaxonomyError::EmptyTagList);
        }

        let mut values = BTreeMap::new();
        for tag in tags {
            let tag = tag.trim();
            if tag.is_empty() {
                return Err(TaxonomyError::EmptyTag);
            }
            values.insert(
                tag.to_string(),
                format!("Text that belongs to the '{tag}' category of the '{field_name}' field."),
            );
        }

        let description = if description.trim().is_empty() {
            format!("The '{field_name}' category assigned to the text.")
        } else {
            description.to_string()
        };

        let mut fields = BTreeMap::new();
        fields.insert(
            field_name.to_string(),
            TaxonomyField {
                description,
                values,
            },
        );
        Ok(Self { fields })
    }

    /// Build a taxonomy from an already-structured multi-field mapping.
    ///
    /// A field with no values is a validation error.
    pub fn from_fields(
        fields: BTreeMap<String, TaxonomyField>,
    ) -> Result<Self, TaxonomyError> {
        if fields.is_empty() {
            return Err(TaxonomyError::NoFields);
        }
        for (name, field) in &fields {
            if name.trim().is_empty() {
                return Err(TaxonomyError::EmptyFieldName);
            }
            if field.values.is_empty() {
                return Err(TaxonomyError::NoValues {
                    field: name.clone(),
                });
            }
            if field.values.keys().any(|v| v.trim().is_empty()) {
                return Err(TaxonomyError::EmptyTag);
            }
        }
        Ok(Self { fields })
    }

    /// Field names in deterministic (sorted) order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over fields in deterministic (sorted) order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TaxonomyField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, field: &str) -> Option<&TaxonomyField> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A single-field taxonomy flattens to bare column suffixes.
    pub fn is_single_field(&self) -> bool {
        self.fields.len() == 1
    }

    /// True if `value` is a declared value of `field`.
    pub fn contains_value(&self, field: &str, value: &str) -> bool {
        self.fields
            .get(field)
            .is_some_and(|f| f.values.contains_key(value))
    }
}

/// Taxonomy as supplied by a caller — flat tag list or structured mapping.
///
/// Deserialized untagged so tool callers can pass either JSON shape to the
/// same parameter. A structured field missing its `values` key fails
/// deserialization and is reported at the tool boundary, never raised.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaxonomySpec {
    Flat(Vec<String>),
    Structured(BTreeMap<String, TaxonomyField>),
}

impl TaxonomySpec {
    /// Normalize into a [`Taxonomy`]. `field_name` only applies to the flat
    /// form, where it names the single implicit field.
    pub fn into_taxonomy(self, field_name: &str) -> Result<Taxonomy, TaxonomyError> {
        match self {
            Self::Flat(tags) => Taxonomy::from_tags(field_name, "", &tags),
            Self::Structured(fields) => Taxonomy::from_fields(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_tags_builds_single_field() {
        let tax = Taxonomy::from_tags("topic", "", &tags(&["sports", "politics"])).unwrap();
        assert_eq!(tax.len(), 1);
        assert!(tax.is_single_field());

        let field = tax.get("topic").unwrap();
        assert_eq!(field.values.len(), 2);
        let desc = &field.values["sports"];
        assert!(desc.contains("sports"));
        assert!(desc.contains("topic"));
    }

    #[test]
    fn test_from_tags_deduplicates() {
        let tax = Taxonomy::from_tags("topic", "", &tags(&["a", "b", "a"])).unwrap();
        assert_eq!(tax.get("topic").unwrap().values.len(), 2);
    }

    #[test]
    fn test_from_tags_rejects_empty_inputs() {
        assert_eq!(
            Taxonomy::from_tags("topic", "", &[]),
            Err(TaxonomyError::EmptyTagList)
        );
        assert_eq!(
            Taxonomy::from_tags("topic", "", &tags(&["ok", "  "])),
            Err(TaxonomyError::EmptyTag)
        );
        assert_eq!(
            Taxonomy::from_tags("", "", &tags(&["ok"])),
            Err(TaxonomyError::EmptyFieldName)
        );
    }

    #[test]
    fn test_from_tags_idempotent_serialization() {
        // Same input twice — byte-identical serialized taxonomy, regardless of
        // tag order in the input list.
        let a = Taxonomy::from_tags("topic", "", &tags(&["x", "y", "z"])).unwrap();
        let b = Taxonomy::from_tags("topic", "", &tags(&["z", "y", "x"])).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_from_fields_rejects_empty_values() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "sentiment".to_string(),
            TaxonomyField {
                description: "Overall sentiment".to_string(),
                values: BTreeMap::new(),
            },
        );
        assert_eq!(
            Taxonomy::from_fields(fields),
            Err(TaxonomyError::NoValues {
                field: "sentiment".to_string()
            })
        );
    }

    #[test]
    fn test_spec_deserializes_both_shapes() {
        let flat: TaxonomySpec = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert!(matches!(flat, TaxonomySpec::Flat(_)));

        let structured: TaxonomySpec = serde_json::from_str(
            r#"{"sentiment": {"description": "d", "values": {"pos": "good", "neg": "bad"}}}"#,
        )
        .unwrap();
        assert!(matches!(structured, TaxonomySpec::Structured(_)));

        let tax = structured.into_taxonomy("ignored").unwrap();
        assert!(tax.contains_value("sentiment", "pos"));
        assert!(!tax.contains_value("sentiment", "meh"));
    }

    #[test]
    fn test_spec_rejects_missing_values_key() {
        let result: Result<TaxonomySpec, _> =
            serde_json::from_str(r#"{"sentiment": {"description": "d"}}"#);
        assert!(result.is_err());
    }
}
