//! Instructions for hosts that apply changes through their own
//! "search a range, then edit or style it" primitives instead of inserting
//! markup. Search strings are capped because host search APIs reject long
//! needles.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    types::{
        change_record::ChangeRecord,
        fragment::NativeFormatInstruction,
        text_format::FormatSpan,
    },
    utils::whitespace::{char_len, char_slice},
};

/// A range of the anchor's text expressed as "the `occurrence`-th match of
/// `search_text`".
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAnchor {
    pub search_text: String,
    /// Zero-based index among the non-overlapping matches of `search_text`.
    pub occurrence: usize,
}

impl SearchAnchor {
    /// Anchors the characters `offset..offset + length` of `text`, keeping
    /// at most `max_len` characters and cutting on a word boundary.
    ///
    /// A zero-length range cannot be searched for, so it anchors to the word
    /// ending right before `offset`, or the word starting at `offset` when
    /// nothing precedes it.
    #[must_use]
    pub fn new(text: &str, offset: usize, length: usize, max_len: usize) -> Option<Self> {
        let (start, end) = if length == 0 {
            word_around(text, offset)?
        } else {
            (offset, offset + length)
        };

        let search_text = cap_on_word_boundary(char_slice(text, start, end), max_len);
        if search_text.trim().is_empty() {
            return None;
        }

        Some(Self {
            occurrence: occurrence_before(text, search_text, start),
            search_text: search_text.to_owned(),
        })
    }

    /// Anchors the original text a change record touches.
    #[must_use]
    pub fn for_record(original: &str, record: &ChangeRecord, max_len: usize) -> Option<Self> {
        Self::new(original, record.offset, record.length, max_len)
    }
}

/// The `(start, end)` character range of the word next to a cursor.
fn word_around(text: &str, offset: usize) -> Option<(usize, usize)> {
    let chars = text.chars().collect::<Vec<_>>();
    let offset = offset.min(chars.len());

    let before_end = chars[..offset].iter().rposition(|c| !c.is_whitespace());
    if let Some(last) = before_end {
        let start = chars[..last]
            .iter()
            .rposition(|c| c.is_whitespace())
            .map_or(0, |index| index + 1);
        return Some((start, last + 1));
    }

    let start = offset + chars[offset..].iter().position(|c| !c.is_whitespace())?;
    let end = chars[start..]
        .iter()
        .position(|c| c.is_whitespace())
        .map_or(chars.len(), |length| start + length);
    Some((start, end))
}

fn cap_on_word_boundary(text: &str, max_len: usize) -> &str {
    if char_len(text) <= max_len {
        return text;
    }

    let capped = char_slice(text, 0, max_len);
    match capped.rfind(char::is_whitespace) {
        Some(index) if index > 0 => capped[..index].trim_end(),
        _ => capped,
    }
}

/// How many non-overlapping matches of `needle` start before the character
/// index `before`.
fn occurrence_before(text: &str, needle: &str, before: usize) -> usize {
    let byte_limit = text
        .char_indices()
        .nth(before)
        .map_or(text.len(), |(index, _)| index);

    text.match_indices(needle)
        .take_while(|(index, _)| *index < byte_limit)
        .count()
}

/// Turns format spans over `text` into native styling instructions. Spans
/// longer than `max_len` are split into several consecutive instructions so
/// that the whole range still gets styled.
#[must_use]
pub fn format_instructions(text: &str, spans: &[FormatSpan], max_len: usize) -> Vec<NativeFormatInstruction> {
    let mut instructions = Vec::new();

    for span in spans {
        let mut start = span.offset;

        while start < span.end() {
            let Some(anchor) = SearchAnchor::new(text, start, span.end() - start, max_len) else {
                break;
            };

            let consumed = char_len(&anchor.search_text);
            instructions.push(NativeFormatInstruction {
                search_text: anchor.search_text,
                occurrence: anchor.occurrence,
                format: span.format,
            });

            // Skip the consumed text and the whitespace after it.
            start += consumed;
            start += char_slice(text, start, span.end())
                .chars()
                .take_while(|c| c.is_whitespace())
                .count();
        }
    }

    instructions
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::types::text_format::TextFormat;

    #[test]
    fn test_simple_anchor() {
        let anchor = SearchAnchor::new("The NROFR clause", 4, 5, 80).unwrap();

        assert_eq!(anchor.search_text, "NROFR");
        assert_eq!(anchor.occurrence, 0);
    }

    #[test]
    fn test_repeated_text_counts_occurrences() {
        let anchor = SearchAnchor::new("rent and rent and rent", 18, 4, 80).unwrap();

        assert_eq!(anchor.search_text, "rent");
        assert_eq!(anchor.occurrence, 2);
    }

    #[test_case("Pay the rent", 8, "the" ; "after a word")]
    #[test_case("Pay the rent", 7, "the" ; "at the end of a word")]
    #[test_case("Pay the rent", 0, "Pay" ; "at the start")]
    #[test_case("Pay the rent", 12, "rent" ; "at the end")]
    fn test_insertion_anchors(text: &str, offset: usize, expected: &str) {
        assert_eq!(SearchAnchor::new(text, offset, 0, 80).unwrap().search_text, expected);
    }

    #[test]
    fn test_empty_text_has_no_anchor() {
        assert_eq!(SearchAnchor::new("", 0, 0, 80), None);
        assert_eq!(SearchAnchor::new("   ", 1, 0, 80), None);
    }

    #[test]
    fn test_long_ranges_are_capped_on_word_boundary() {
        let text = "alpha beta gamma delta";
        let anchor = SearchAnchor::new(text, 0, char_len(text), 13).unwrap();

        assert_eq!(anchor.search_text, "alpha beta");
    }

    #[test]
    fn test_record_anchor() {
        let record = ChangeRecord::insert(9, "full ");
        let anchor = SearchAnchor::for_record("Pay the  rent", &record, 80).unwrap();

        assert_eq!(anchor.search_text, "the");
    }

    #[test]
    fn test_long_spans_are_split() {
        let text = "alpha beta gamma delta";
        let spans = [FormatSpan::new(0, char_len(text), TextFormat::BOLD)];

        let instructions = format_instructions(text, &spans, 11);

        assert_eq!(
            instructions
                .iter()
                .map(|instruction| instruction.search_text.as_str())
                .collect::<Vec<_>>(),
            vec!["alpha beta", "gamma delta"]
        );
        assert!(instructions.iter().all(|instruction| instruction.format == TextFormat::BOLD));
    }

    #[test]
    fn test_unicode_occurrence() {
        let spans = [FormatSpan::new(13, 6, TextFormat::ITALIC)];
        let instructions = format_instructions("Straße, über Straße", &spans, 80);

        assert_eq!(instructions, vec![NativeFormatInstruction {
            search_text: "Straße".to_owned(),
            occurrence: 1,
            format: TextFormat::ITALIC,
        }]);
    }
}
