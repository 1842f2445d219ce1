//! Normalization and lossless word-boundary chunking.

/// Collapse all whitespace runs to single spaces and cap pathological
/// inputs. The cap cuts at a character boundary, never mid-codepoint.
pub fn normalize(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    collapsed.chars().take(max_chars).collect()
}

/// Split into segments of at most `max_words` words, on whitespace
/// boundaries only. Joining the segments with single spaces reproduces the
/// normalized input exactly; nothing is dropped or split mid-word.
pub fn chunk_by_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    words
        .chunks(max_words.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}
