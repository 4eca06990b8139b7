use log::trace;

use crate::{
    markdown::emphasis::parse_inline,
    types::text_format::FormatSpan,
    utils::whitespace::collapse_whitespace,
};

/// Outcome of comparing a proposal against its original text while ignoring
/// emphasis markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingClassification {
    /// The proposal says the same thing as the original and only adds,
    /// removes, or moves emphasis.
    pub is_formatting_only: bool,

    /// Spans over the marker-free proposal. Empty unless
    /// `is_formatting_only` holds.
    pub spans: Vec<FormatSpan>,

    /// The proposal with its markers removed.
    pub clean_text: String,
}

/// Decides whether `proposed` differs from `original` only in emphasis.
///
/// Both texts are compared after stripping markers from the proposal and
/// collapsing whitespace runs on both sides, so a proposal that merely
/// re-wraps the original still counts as formatting-only (with no spans).
///
/// ```
/// use redline_text::classify;
///
/// let classification = classify(
///     "The Tenant shall pay rent.",
///     "The **Tenant** shall pay rent.",
/// );
/// assert!(classification.is_formatting_only);
/// assert_eq!(classification.spans.len(), 1);
/// ```
#[must_use]
pub fn classify(original: &str, proposed: &str) -> FormattingClassification {
    let parsed = parse_inline(proposed);
    let is_formatting_only = collapse_whitespace(&parsed.text) == collapse_whitespace(original);

    trace!(
        "Formatting-only: {is_formatting_only} ({} spans found)",
        parsed.spans.len()
    );

    FormattingClassification {
        is_formatting_only,
        spans: if is_formatting_only {
            parsed.spans
        } else {
            Vec::new()
        },
        clean_text: parsed.text,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::types::text_format::TextFormat;

    #[test]
    fn test_bold_only() {
        let classification = classify("The Tenant shall pay.", "The **Tenant** shall pay.");

        assert!(classification.is_formatting_only);
        assert_eq!(classification.spans, vec![FormatSpan::new(4, 6, TextFormat::BOLD)]);
        assert_eq!(classification.clean_text, "The Tenant shall pay.");
    }

    #[test]
    fn test_wording_change_has_no_spans() {
        let classification = classify("The Tenant shall pay.", "The **Landlord** shall pay.");

        assert!(!classification.is_formatting_only);
        assert!(classification.spans.is_empty());
    }

    #[test_case("one  two", "one two" ; "collapsed spaces")]
    #[test_case("one\ntwo", "one two" ; "newline")]
    #[test_case("one two", " one two " ; "padding")]
    fn test_whitespace_is_ignored(original: &str, proposed: &str) {
        assert!(classify(original, proposed).is_formatting_only);
    }

    #[test]
    fn test_identical_text_has_no_spans() {
        let classification = classify("Notice", "Notice");

        assert!(classification.is_formatting_only);
        assert!(classification.spans.is_empty());
    }

    #[test]
    fn test_bold_italic_single_span() {
        let classification = classify("Notice period", "***Notice*** period");

        assert_eq!(classification.spans, vec![FormatSpan::new(0, 6, TextFormat::BOLD_ITALIC)]);
    }
}
