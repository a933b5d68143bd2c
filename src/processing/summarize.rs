//! Deterministic extractive summaries.

/// Default character bound applied when callers do not supply one.
pub const DEFAULT_MAX_LENGTH: usize = 200;

const SENTENCE_DELIMITER: &str = ". ";
const ELLIPSIS: &str = "...";

/// Build a summary of at most roughly `max_length` characters from leading sentences.
///
/// Text that already fits is returned unchanged. Otherwise sentences (split on `". "`) are
/// appended in order until the next one would overflow the bound; that sentence and the rest
/// are dropped. When not even the first sentence fits, the first `max_length` characters are
/// returned with `...` appended. Lengths are measured in characters.
pub fn summarize(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let mut summary = String::new();
    let mut summary_chars = 0usize;
    for sentence in text.split(SENTENCE_DELIMITER) {
        let sentence_chars = sentence.chars().count();
        if summary_chars + sentence_chars > max_length {
            break;
        }
        summary.push_str(sentence);
        summary.push_str(SENTENCE_DELIMITER);
        summary_chars += sentence_chars + SENTENCE_DELIMITER.len();
    }

    if summary.is_empty() {
        summary = text.chars().take(max_length).collect();
        summary.push_str(ELLIPSIS);
    }

    summary.trim_end().to_string()
}
