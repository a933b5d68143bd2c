//! Paragraph text from OOXML word-processing packages.

use docx_rs::read_docx;
use serde_json::Value;
use std::path::Path;

use super::{ExtractionError, ExtractionOutcome};

/// Parse the package with docx-rs and emit one line per body paragraph.
///
/// Paragraphs nested in tables are not part of the body sequence and are skipped.
pub(super) fn extract(path: &Path) -> ExtractionOutcome {
    let bytes = std::fs::read(path)?;
    let document = read_docx(&bytes).map_err(|err| ExtractionError::Docx(err.to_string()))?;
    let tree: Value = serde_json::from_str(&document.json())
        .map_err(|err| ExtractionError::Docx(format!("unreadable document tree: {err}")))?;
    Ok(body_paragraphs(&tree).join("\n").trim().to_string())
}

fn body_paragraphs(tree: &Value) -> Vec<String> {
    tree.pointer("/document/children")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|child| child["type"] == "paragraph")
        .map(|paragraph| {
            let mut text = String::new();
            collect_runs(&paragraph["data"], &mut text);
            text
        })
        .collect()
}

fn collect_runs(container: &Value, text: &mut String) {
    for child in container["children"].as_array().into_iter().flatten() {
        match child["type"].as_str() {
            Some("run") => collect_run_text(&child["data"], text),
            // tracked insertions and links wrap ordinary runs
            Some("hyperlink" | "insert") => collect_runs(&child["data"], text),
            _ => {}
        }
    }
}

fn collect_run_text(run: &Value, text: &mut String) {
    for child in run["children"].as_array().into_iter().flatten() {
        match child["type"].as_str() {
            Some("text") => {
                if let Some(content) = child["data"]["text"].as_str() {
                    text.push_str(content);
                }
            }
            Some("tab") => text.push('\t'),
            Some("break") => text.push('\n'),
            _ => {}
        }
    }
}
