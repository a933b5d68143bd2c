use lopdf::Document;
use std::path::Path;

use super::ExtractionOutcome;

/// Concatenate the text of every page in page order, one page per line.
pub(super) fn extract(path: &Path) -> ExtractionOutcome {
    let document = Document::load(path)?;
    let pages = document
        .get_pages()
        .keys()
        .map(|page_number| document.extract_text(&[*page_number]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join_pages(&pages))
}

/// lopdf closes every text object with a newline, so each page is trimmed before joining.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim_end_matches(['\r', '\n']))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}
