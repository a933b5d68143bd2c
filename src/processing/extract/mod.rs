//! Format-dispatched text extraction.
//!
//! The file extension decides the handler; a caller-supplied format hint is only logged when it
//! disagrees. Unrecognized extensions are read as plain text rather than rejected. Handler
//! failures come back as [`ExtractionError`] values and never panic past this boundary.

mod docx;
mod pdf;
mod spreadsheet;
mod text;

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Result of running the extractor over one file.
pub type ExtractionOutcome = Result<String, ExtractionError>;

/// Format-specific decode failures.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The PDF could not be parsed or a page could not be decoded.
    #[error("Error reading PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    /// The Word document is not a readable OOXML package.
    #[error("Error reading DOCX: {0}")]
    Docx(String),
    /// The workbook could not be opened or a sheet could not be read.
    #[error("Error reading spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    /// The file could not be read from disk.
    #[error("Error reading file: {0}")]
    Io(#[from] std::io::Error),
}

/// Closed set of container formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Document Format.
    Pdf,
    /// Word documents (`.docx`, and legacy `.doc` routed to the same handler).
    Docx,
    /// Excel workbooks (`.xlsx`, `.xls`).
    Spreadsheet,
    /// Plain text.
    Text,
    /// Anything else; read as plain text.
    Unknown,
}

impl Format {
    /// Classify a path by its extension, ignoring case.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Classify a bare extension (with or without the leading dot).
    pub fn from_extension(extension: &str) -> Self {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Docx,
            "xls" | "xlsx" => Self::Spreadsheet,
            "txt" => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Formats with a dedicated handler, in display order.
    pub const RECOGNIZED: [Format; 4] = [Self::Pdf, Self::Docx, Self::Spreadsheet, Self::Text];

    /// Extensions routed to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Docx => &["doc", "docx"],
            Self::Spreadsheet => &["xls", "xlsx"],
            Self::Text => &["txt"],
            Self::Unknown => &[],
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Spreadsheet => "spreadsheet",
            Self::Text => "text",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Extract raw text from `path`.
///
/// `format_hint` never overrides the extension; a mismatch is logged and ignored.
pub fn extract(path: &Path, format_hint: Option<&str>) -> ExtractionOutcome {
    let format = Format::from_path(path);
    if let Some(hint) = format_hint {
        let hinted = Format::from_extension(hint);
        if hinted != format {
            tracing::debug!(
                path = %path.display(),
                hint,
                %format,
                "Ignoring format hint that disagrees with the file extension"
            );
        }
    }

    let outcome = match format {
        Format::Pdf => pdf::extract(path),
        Format::Docx => docx::extract(path),
        Format::Spreadsheet => spreadsheet::extract(path),
        Format::Text | Format::Unknown => text::extract(path),
    };

    match &outcome {
        Ok(text) => tracing::debug!(
            path = %path.display(),
            %format,
            characters = text.chars().count(),
            "Extracted text"
        ),
        Err(error) => tracing::warn!(
            path = %path.display(),
            %format,
            %error,
            "Text extraction failed"
        ),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        assert_eq!(Format::from_path(Path::new("report.PDF")), Format::Pdf);
        assert_eq!(Format::from_path(Path::new("notes.DocX")), Format::Docx);
        assert_eq!(Format::from_path(Path::new("legacy.doc")), Format::Docx);
        assert_eq!(Format::from_path(Path::new("grades.Xls")), Format::Spreadsheet);
        assert_eq!(Format::from_path(Path::new("readme.txt")), Format::Text);
    }

    #[test]
    fn unrecognized_or_missing_extension_is_unknown() {
        assert_eq!(Format::from_path(Path::new("data.csv")), Format::Unknown);
        assert_eq!(Format::from_path(Path::new("Makefile")), Format::Unknown);
        assert_eq!(Format::from_path(&PathBuf::from("archive.tar.gz")), Format::Unknown);
    }

    #[test]
    fn unknown_formats_are_read_as_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Heading\nbody").expect("write");
        assert_eq!(extract(&path, None).expect("text"), "# Heading\nbody");
    }

    #[test]
    fn hint_does_not_override_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "just text").expect("write");
        assert_eq!(extract(&path, Some("pdf")).expect("text"), "just text");
    }

    #[test]
    fn corrupt_pdf_is_a_failure_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").expect("write");
        let error = extract(&path, None).expect_err("decode failure");
        assert!(matches!(error, ExtractionError::Pdf(_)));
        assert!(error.to_string().starts_with("Error reading PDF"));
    }
}
