//! Frequency-ranked keyword candidates.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Default number of keywords returned per document.
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

const MIN_KEYWORD_CHARS: usize = 4;
const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '!', '?', '"', ';', '(', ')', '[', ']', '{', '}'];

/// Common Spanish function words excluded from keyword candidates.
const STOP_WORDS: &[&str] = &[
    "el", "la", "de", "que", "y", "a", "en", "un", "es", "se", "no", "te", "lo", "le", "da", "su",
    "por", "son", "con", "para", "al", "del", "los", "las", "una", "como", "pero", "sus", "han",
    "me", "si", "sin", "sobre", "este", "ya", "entre", "cuando", "todo", "esta", "ser", "dos",
    "también", "fue", "había", "era", "muy",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Return up to `max_keywords` tokens ordered by descending frequency.
///
/// Tokens are lower-cased, split on whitespace, and stripped of surrounding punctuation. Tokens
/// of three characters or fewer and stop words are discarded. Ties keep first-seen order.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for token in lowered.split_whitespace() {
        let word = token.trim_matches(STRIPPED_PUNCTUATION);
        if word.chars().count() < MIN_KEYWORD_CHARS || STOP_WORD_SET.contains(word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            first_seen.push(word);
        }
        *count += 1;
    }

    // `sort_by` is stable, so equal counts stay in first-seen order.
    first_seen.sort_by(|left, right| counts[right].cmp(&counts[left]));
    first_seen
        .into_iter()
        .take(max_keywords)
        .map(str::to_string)
        .collect()
}
