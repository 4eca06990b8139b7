/// Collapses every whitespace run into a single space and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String { text.split_whitespace().collect::<Vec<_>>().join(" ") }

/// Number of UTF-8 characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize { text.chars().count() }

/// Returns the slice of `text` between the character indices `start` and
/// `end`. Indices past the end are clamped.
#[must_use]
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_index = |char_index: usize| {
        text.char_indices()
            .nth(char_index)
            .map_or(text.len(), |(index, _)| index)
    };

    let start = byte_index(start);
    let end = byte_index(end).max(start);

    &text[start..end]
}
