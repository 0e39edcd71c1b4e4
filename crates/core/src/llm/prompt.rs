// crates/core/src/llm/prompt.rs
//! Prompt rendering and response coercion shared by all provider adapters.

use serde_json::Value;

use super::types::LlmError;
use crate::classify::{FieldClassification, RowClassification};
use crate::taxonomy::Taxonomy;

/// Render the system prompt describing the taxonomy and the required JSON
/// response shape.
pub fn build_system_prompt(taxonomy: &Taxonomy, include_details: bool) -> String {
    let mut out = String::from(
        "You are a text classification expert. Your task is to analyze text and \
         classify it against the taxonomy below.\n",
    );

    for (name, field) in taxonomy.fields() {
        out.push_str(&format!("\nField '{name}': {}\n", field.description));
        for (value, desc) in &field.values {
            out.push_str(&format!("- {value}: {desc}\n"));
        }
    }

    out.push_str(
        "\nRules:\n\
         - For every field, choose exactly one value from that field's list\n\
         - Only use values from the provided lists\n\
         - Report your confidence for each field: high, medium, or low\n",
    );
    if include_details {
        out.push_str(
            "- For every field include 'thinking' (brief reasoning before \
             choosing) and 'reflection' (brief check of the choice)\n",
        );
    }

    let detail_keys = if include_details {
        r#", "thinking": "...", "reflection": "...""#
    } else {
        ""
    };
    out.push_str("\nRespond with ONLY a JSON object, no other text, of this exact shape:\n{");
    for (i, name) in taxonomy.field_names().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!(
            r#""{name}": {{"value": "...", "confidence": "high|medium|low"{detail_keys}}}"#
        ));
    }
    out.push('}');
    out
}

/// Render the per-row user prompt.
pub fn build_user_prompt(text: &str) -> String {
    format!("Analyze and classify the following text:\n\n{text}")
}

/// Coerce a model reply into a [`RowClassification`].
///
/// Accepts a raw JSON object, JSON wrapped in prose or markdown fences, and —
/// for single-field taxonomies — a bare `{value, confidence}` object without
/// the field key. Per-field problems (missing field, malformed entry) become
/// per-field error results; only an entirely unparseable reply is a row-level
/// error.
pub fn parse_row_classification(
    content: &str,
    fields: &[String],
) -> Result<RowClassification, LlmError> {
    let value: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => extract_json_from_text(content).ok_or_else(|| {
            LlmError::ParseFailed(format!(
                "no JSON object found in model reply: {}",
                truncate_chars(content, 200)
            ))
        })?,
    };

    let Value::Object(mut obj) = value else {
        return Err(LlmError::InvalidFormat(
            "model reply is not a JSON object".to_string(),
        ));
    };

    // Single-field taxonomy: tolerate a bare {value, ...} reply by keying it
    // under the sole field name.
    if fields.len() == 1 && obj.contains_key("value") && !obj.contains_key(&fields[0]) {
        let inner = Value::Object(std::mem::take(&mut obj));
        obj.insert(fields[0].clone(), inner);
    }

    let mut row = RowClassification::new();
    for field in fields {
        match obj.remove(field) {
            Some(entry) => match serde_json::from_value::<FieldClassification>(entry) {
                Ok(fc) => {
                    row.insert(field.clone(), fc);
                }
                Err(e) => {
                    row.insert(
                        field.clone(),
                        FieldClassification::error(
                            "invalid_format",
                            format!("field '{field}' entry malformed: {e}"),
                        ),
                    );
                }
            },
            None => {
                row.insert(
                    field.clone(),
                    FieldClassification::error(
                        "missing_field",
                        format!("model reply has no entry for field '{field}'"),
                    ),
                );
            }
        }
    }
    Ok(row)
}

/// Validate every returned value against the taxonomy's declared vocabulary,
/// downgrading out-of-vocabulary values to per-field errors.
pub fn enforce_vocabulary(taxonomy: &Taxonomy, row: &mut RowClassification) {
    for (field, fc) in row.iter_mut() {
        if fc.error.is_none() && !taxonomy.contains_value(field, &fc.value) {
            *fc = FieldClassification::error(
                "invalid_value",
                format!("'{}' is not a declared value of field '{field}'", fc.value),
            );
        }
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary. Model
/// replies are arbitrary UTF-8, so byte slicing is not safe here.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// Extract the first balanced JSON object `{...}` from a text string.
/// Handles replies that wrap JSON in markdown or explanation text.
fn extract_json_from_text(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let mut depth = 0;
    let mut end = None;
    for (i, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + i + 1);
                    break;
                }
            }
            _ => {}
        }
    }
    serde_json::from_str(&text[start..end?]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Confidence;

    fn taxonomy() -> Taxonomy {
        Taxonomy::from_tags(
            "topic",
            "",
            &["sports".to_string(), "politics".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_system_prompt_lists_fields_and_values() {
        let prompt = build_system_prompt(&taxonomy(), false);
        assert!(prompt.contains("Field 'topic'"));
        assert!(prompt.contains("- sports:"));
        assert!(prompt.contains("- politics:"));
        assert!(prompt.contains(r#""topic": {"value""#));
        assert!(!prompt.contains("thinking"));
    }

    #[test]
    fn test_system_prompt_details_adds_thinking_and_reflection() {
        let prompt = build_system_prompt(&taxonomy(), true);
        assert!(prompt.contains("thinking"));
        assert!(prompt.contains("reflection"));
    }

    #[test]
    fn test_user_prompt_wraps_text() {
        let prompt = build_user_prompt("hello world");
        assert!(prompt.ends_with("hello world"));
    }

    #[test]
    fn test_parse_keyed_reply() {
        let fields = vec!["topic".to_string()];
        let row = parse_row_classification(
            r#"{"topic": {"value": "sports", "confidence": "high"}}"#,
            &fields,
        )
        .unwrap();
        assert_eq!(row["topic"].value, "sports");
        assert_eq!(row["topic"].confidence, Confidence::High);
    }

    #[test]
    fn test_parse_bare_single_field_reply() {
        let fields = vec!["topic".to_string()];
        let row =
            parse_row_classification(r#"{"value": "sports", "confidence": "low"}"#, &fields)
                .unwrap();
        assert_eq!(row["topic"].value, "sports");
        assert_eq!(row["topic"].confidence, Confidence::Low);
    }

    #[test]
    fn test_parse_reply_wrapped_in_prose() {
        let fields = vec!["topic".to_string()];
        let content = "Sure! Here is the classification:\n```json\n\
                       {\"topic\": {\"value\": \"politics\", \"confidence\": \"medium\"}}\n```";
        let row = parse_row_classification(content, &fields).unwrap();
        assert_eq!(row["topic"].value, "politics");
    }

    #[test]
    fn test_parse_missing_field_becomes_field_error() {
        let fields = vec!["topic".to_string(), "sentiment".to_string()];
        let row = parse_row_classification(
            r#"{"topic": {"value": "sports", "confidence": "high"}}"#,
            &fields,
        )
        .unwrap();
        assert!(row["topic"].error.is_none());
        assert_eq!(row["sentiment"].error.as_deref(), Some("missing_field"));
    }

    #[test]
    fn test_parse_no_json_is_row_error() {
        let fields = vec!["topic".to_string()];
        let err = parse_row_classification("I cannot classify this.", &fields).unwrap_err();
        assert!(matches!(err, LlmError::ParseFailed(_)));
    }

    #[test]
    fn test_parse_long_non_ascii_reply_is_row_error() {
        // A refusal longer than the truncation window whose cut point lands
        // mid-codepoint must still produce a ParseFailed, not a panic.
        let fields = vec!["topic".to_string()];
        let content = format!("{}ééééé", "x".repeat(199));
        let err = parse_row_classification(&content, &fields).unwrap_err();
        assert!(matches!(err, LlmError::ParseFailed(_)));
    }

    #[test]
    fn test_enforce_vocabulary_flags_unknown_value() {
        let tax = taxonomy();
        let fields = vec!["topic".to_string()];
        let mut row = parse_row_classification(
            r#"{"topic": {"value": "cooking", "confidence": "high"}}"#,
            &fields,
        )
        .unwrap();
        enforce_vocabulary(&tax, &mut row);
        assert_eq!(row["topic"].error.as_deref(), Some("invalid_value"));
        assert!(row["topic"]
            .error_details
            .as_deref()
            .unwrap()
            .contains("cooking"));
    }
}
