//! JSON schema builders for MCP tools.

use crate::processing::{Format, PipelineSettings};
use serde_json::{Map, Value, json};

/// Build the schema describing the `process-document` tool input.
pub(crate) fn process_document_input_schema(settings: &PipelineSettings) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "documentId".into(),
        integer_schema("Caller-assigned identifier used to poll status", 0),
    );
    properties.insert(
        "filePath".into(),
        string_schema("Path of the document on the server's filesystem"),
    );

    let mut option_properties = Map::new();
    option_properties.insert(
        "maxLength".into(),
        integer_with_default(
            "Summary bound in characters",
            settings.summary_max_length,
        ),
    );
    option_properties.insert(
        "maxKeywords".into(),
        integer_with_default("Number of keywords to return", settings.max_keywords),
    );
    option_properties.insert(
        "previewChars".into(),
        integer_with_default(
            "Characters of extracted text echoed in the result",
            settings.preview_chars,
        ),
    );
    let mut options_schema = Map::new();
    options_schema.insert("type".into(), Value::String("object".into()));
    options_schema.insert(
        "description".into(),
        Value::String("Optional per-run overrides; unknown keys are ignored".into()),
    );
    options_schema.insert("properties".into(), Value::Object(option_properties));
    properties.insert("options".into(), Value::Object(options_schema));

    let mut schema = finalize_object_schema(properties, &["documentId", "filePath"]);
    schema.insert(
        "examples".into(),
        Value::Array(vec![json!({
            "documentId": 42,
            "filePath": "/srv/uploads/tesis.pdf",
            "options": { "maxLength": 300 }
        })]),
    );
    schema
}

/// Build the schema describing the `get-status` tool input.
pub(crate) fn get_status_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "documentId".into(),
        integer_schema("Identifier supplied to process-document", 0),
    );
    finalize_object_schema(properties, &["documentId"])
}

/// Build the schema describing the `extract-text` tool input.
pub(crate) fn extract_text_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "filePath".into(),
        string_schema("Path of the document on the server's filesystem"),
    );

    let mut hint_schema = Map::new();
    hint_schema.insert("type".into(), Value::String("string".into()));
    hint_schema.insert(
        "description".into(),
        Value::String("Optional format hint; the file extension takes precedence".into()),
    );
    hint_schema.insert(
        "examples".into(),
        Value::Array(
            Format::RECOGNIZED
                .iter()
                .flat_map(|format| format.extensions())
                .map(|&extension| Value::String(extension.into()))
                .collect(),
        ),
    );
    properties.insert("documentType".into(), Value::Object(hint_schema));

    finalize_object_schema(properties, &["filePath"])
}

/// Build the schema describing the `summarize` tool input.
pub(crate) fn summarize_input_schema(settings: &PipelineSettings) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("text".into(), string_schema("Text to summarize"));
    properties.insert(
        "maxLength".into(),
        integer_with_default("Summary bound in characters", settings.summary_max_length),
    );
    finalize_object_schema(properties, &["text"])
}

/// Schema representing an empty object (used for parameterless tools).
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn integer_schema(description: &str, minimum: u64) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("integer".into()));
    schema.insert("description".into(), Value::String(description.into()));
    schema.insert("minimum".into(), Value::Number(minimum.into()));
    Value::Object(schema)
}

fn integer_with_default(description: &str, default: usize) -> Value {
    let mut schema = integer_schema(description, 1);
    if let Value::Object(map) = &mut schema {
        map.insert(
            "default".into(),
            Value::Number(serde_json::Number::from(default as u64)),
        );
    }
    schema
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}
