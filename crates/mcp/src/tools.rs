// crates/mcp/src/tools.rs
//! Tool catalog for tools/list.

use serde_json::json;

use crate::protocol::Tool;

/// All tools exposed by this server.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "tag_csv".into(),
            description: "Tag all rows in a CSV file against a taxonomy using parallel LLM \
                          inference. Returns tagged data or writes it to output_path."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "csv_path": {
                        "type": "string",
                        "description": "Path to the CSV file to tag"
                    },
                    "taxonomy": {
                        "description": "Either a flat list of tag names, or a mapping of \
                                        field name to {description, values: {value: description}}",
                        "oneOf": [
                            {"type": "array", "items": {"type": "string"}},
                            {"type": "object"}
                        ]
                    },
                    "field_name": {
                        "type": "string",
                        "default": "tags",
                        "description": "Field name for the flat taxonomy form"
                    },
                    "text_column": {
                        "type": "string",
                        "default": "text",
                        "description": "Name of the column containing text to analyze"
                    },
                    "provider": {
                        "type": "string",
                        "enum": ["claude", "openai", "gemini", "groq"],
                        "default": "claude",
                        "description": "LLM provider"
                    },
                    "model": {
                        "type": "string",
                        "description": "Model identifier (provider default when omitted)"
                    },
                    "api_key": {
                        "type": "string",
                        "description": "API key (falls back to the provider's environment variable)"
                    },
                    "output_path": {
                        "type": "string",
                        "description": "Where to save the tagged CSV; omitted returns the data inline"
                    },
                    "include_details": {
                        "type": "boolean",
                        "default": false,
                        "description": "Include per-field thinking and reflection columns"
                    }
                },
                "required": ["csv_path", "taxonomy"]
            }),
        },
        Tool {
            name: "preview_csv".into(),
            description: "Preview the first few rows of a CSV file to understand its structure."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "csv_path": {
                        "type": "string",
                        "description": "Path to the CSV file"
                    },
                    "rows": {
                        "type": "integer",
                        "default": 5,
                        "description": "Number of rows to preview"
                    }
                },
                "required": ["csv_path"]
            }),
        },
        Tool {
            name: "get_tagging_info".into(),
            description: "Get information about this server and the supported providers.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}
