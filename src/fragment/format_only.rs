use crate::{
    errors::ReconcileError,
    fragment::{markup::MarkupWriter, native::format_instructions, validate::validate_markup},
    markdown::{classifier::FormattingClassification, emphasis::InlineText},
    policy::ReconcilePolicy,
    types::{
        fragment::{Fragment, Strategy},
        text_format::FormatSpan,
    },
};

/// Character indices of the non-whitespace characters of `text`.
fn visible_positions(text: &str) -> Vec<usize> {
    text.chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(index, _)| index)
        .collect()
}

/// Moves spans computed over `clean` onto `original`. Both texts must have
/// the same non-whitespace characters; only their whitespace may differ.
fn remap_spans(clean: &str, original: &str, spans: &[FormatSpan]) -> Vec<FormatSpan> {
    if clean == original {
        return spans.to_vec();
    }

    let clean_positions = visible_positions(clean);
    let original_positions = visible_positions(original);

    spans
        .iter()
        .filter_map(|span| {
            let first = clean_positions.partition_point(|position| *position < span.offset);
            let last = clean_positions.partition_point(|position| *position < span.end());
            if first >= last {
                return None;
            }

            let start = *original_positions.get(first)?;
            let end = *original_positions.get(last - 1)? + 1;
            Some(FormatSpan::new(start, end - start, span.format))
        })
        .collect()
}

/// Builds a `FormatOnly` fragment restyling the anchor's unchanged text.
///
/// The markup re-renders the original text with the new emphasis and the
/// native instructions describe the same styling as range searches. No
/// tracked change is ever produced since no text changes.
///
/// # Errors
///
/// `NotApplicable` when the classification is not formatting-only or has
/// no span to apply.
pub(crate) fn build_format_only(
    writer: &MarkupWriter<'_>,
    original: &str,
    classification: &FormattingClassification,
    policy: &ReconcilePolicy,
) -> Result<Fragment, ReconcileError> {
    if !classification.is_formatting_only {
        return Err(ReconcileError::not_applicable(
            Strategy::FormatOnly,
            "the proposal changes more than emphasis",
        ));
    }

    let spans = remap_spans(&classification.clean_text, original, &classification.spans);
    if spans.is_empty() {
        return Err(ReconcileError::not_applicable(Strategy::FormatOnly, "no emphasis to apply"));
    }

    let styled = InlineText::from_parts(original, spans);
    let mut markup = String::new();
    writer.inline_runs(&mut markup, &styled, 0..styled.len());
    validate_markup(&markup)?;

    Ok(Fragment {
        native_instructions: format_instructions(original, &styled.spans, policy.max_search_len),
        plain_text: Some(styled.text),
        format_hints: styled.spans,
        ..Fragment::with_markup(Strategy::FormatOnly, markup)
    })
}
