use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

use super::ExtractionOutcome;

const SHEET_HEADER: &str = "Hoja:";
const CELL_SEPARATOR: &str = " | ";

/// Render every sheet as a header line followed by one ` | `-joined line per non-blank row.
///
/// Rows are rendered from column A even though calamine trims the range to the first used
/// column; the skipped leading cells come out as empty strings.
pub(super) fn extract(path: &Path) -> ExtractionOutcome {
    let mut workbook = open_workbook_auto(path)?;
    let mut text = String::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let leading_columns = range.start().map_or(0, |(_, column)| column as usize);
        text.push_str(&format!("{SHEET_HEADER} {name}\n"));
        for row in range.rows() {
            if let Some(line) = render_row(row, leading_columns) {
                text.push_str(&line);
                text.push('\n');
            }
        }
        text.push('\n');
    }
    Ok(text.trim().to_string())
}

fn render_row(row: &[Data], leading_columns: usize) -> Option<String> {
    let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
    if cells.iter().all(|cell| cell.trim().is_empty()) {
        return None;
    }
    let padded: Vec<String> = std::iter::repeat_n(String::new(), leading_columns)
        .chain(cells)
        .collect();
    Some(padded.join(CELL_SEPARATOR))
}
