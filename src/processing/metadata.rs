//! Structural statistics about an extracted document.

use std::path::Path;

use super::types::Metadata;

/// Compute statistics from `text` and the on-disk attributes of `path`.
///
/// Fails when the file can no longer be stat'ed, e.g. it was removed after extraction.
pub async fn generate(text: &str, path: &Path) -> std::io::Result<Metadata> {
    let stat = tokio::fs::metadata(path).await?;
    Ok(from_parts(text, path, stat.len()))
}

pub(crate) fn from_parts(text: &str, path: &Path, file_size_bytes: u64) -> Metadata {
    Metadata {
        file_size_bytes,
        word_count: text.split_whitespace().count(),
        character_count: text.chars().count(),
        line_count: text.split('\n').count(),
        file_extension: path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
