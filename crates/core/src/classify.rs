// crates/core/src/classify.rs
//! Structured per-row classification result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Confidence level reported by the model for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Classification of one row against one taxonomy field.
///
/// When `error` is set, `value` and `confidence` are unreliable and the row is
/// routed to the error report instead of the primary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldClassification {
    pub value: String,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl FieldClassification {
    /// A field-level error result (out-of-vocabulary value, missing field in
    /// the model response, ...).
    pub fn error(code: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            confidence: Confidence::Low,
            thinking: None,
            reflection: None,
            error: Some(code.into()),
            error_details: Some(details.into()),
        }
    }
}

/// Classification of one row: field name → field result.
///
/// `BTreeMap` keeps field iteration aligned with the taxonomy's deterministic
/// field order.
pub type RowClassification = BTreeMap<String, FieldClassification>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_round_trip() {
        for (variant, s) in [
            (Confidence::High, "\"high\""),
            (Confidence::Medium, "\"medium\""),
            (Confidence::Low, "\"low\""),
        ] {
            assert_eq!(serde_json::to_string(&variant).unwrap(), s);
        }
        assert_eq!(Confidence::parse("medium"), Some(Confidence::Medium));
        assert_eq!(Confidence::parse("certain"), None);
    }

    #[test]
    fn test_field_classification_deserialize_minimal() {
        let json = r#"{"value": "sports", "confidence": "high"}"#;
        let fc: FieldClassification = serde_json::from_str(json).unwrap();
        assert_eq!(fc.value, "sports");
        assert_eq!(fc.confidence, Confidence::High);
        assert!(fc.thinking.is_none());
        assert!(fc.error.is_none());
    }

    #[test]
    fn test_field_classification_error_ctor() {
        let fc = FieldClassification::error("invalid_value", "'foo' not in taxonomy");
        assert_eq!(fc.error.as_deref(), Some("invalid_value"));
        assert!(fc.error_details.as_deref().unwrap().contains("foo"));
    }
}
