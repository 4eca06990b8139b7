use log::debug;

use crate::{
    errors::ReconcileError,
    fragment::{markup::MarkupWriter, validate::validate_markup},
    markdown::emphasis::InlineText,
    policy::ReconcilePolicy,
    types::{
        change_record::{ChangeRecord, apply_records},
        fragment::{Fragment, Strategy},
    },
    utils::whitespace::{char_len, char_slice},
    word_diff::diff,
};

/// Writes the runs of `original` patched by `records` into `out`.
///
/// Unchanged stretches and inserted text take their formatting from the
/// matching position of `proposed`, whose stripped text the records produce.
/// Deleted text is written as tracked deletions when tracking.
pub(crate) fn write_patched_runs(
    writer: &mut MarkupWriter<'_>,
    out: &mut String,
    original: &str,
    proposed: &InlineText,
    records: &[ChangeRecord],
) {
    let mut original_cursor = 0;
    let mut proposed_cursor = 0;

    for record in records {
        let unchanged = record.offset - original_cursor;
        writer.inline_runs(out, proposed, proposed_cursor..proposed_cursor + unchanged);
        proposed_cursor += unchanged;

        writer.deletion(out, &record.old_text);

        let inserted = record.new_text_length();
        let mut runs = String::new();
        writer.inline_runs(&mut runs, proposed, proposed_cursor..proposed_cursor + inserted);
        writer.insertion(out, &runs);
        proposed_cursor += inserted;

        original_cursor = record.end();
    }

    let remaining = char_len(original).saturating_sub(original_cursor);
    writer.inline_runs(out, proposed, proposed_cursor..proposed_cursor + remaining);
}

/// Writes `old` rewritten into `proposed`, redlining only the words that
/// changed. Falls back to deleting `old` and inserting `proposed` as a whole
/// when the word diff cannot reproduce the proposal.
pub(crate) fn write_rewrite(
    writer: &mut MarkupWriter<'_>,
    out: &mut String,
    old: &str,
    proposed: &InlineText,
    policy: &ReconcilePolicy,
) {
    let records = diff(old, &proposed.text, policy);

    if apply_records(old, &records).is_ok_and(|produced| produced == proposed.text) {
        write_patched_runs(writer, out, old, proposed, &records);
    } else {
        debug!("Word diff of `{old}` does not reproduce the proposal, replacing it whole");
        writer.deletion(out, old);
        let mut runs = String::new();
        writer.inline_runs(&mut runs, proposed, 0..proposed.len());
        writer.insertion(out, &runs);
    }
}

/// Builds a `TextPatch` fragment: the anchor's text with every record
/// rendered as a tracked deletion and insertion.
///
/// The records must turn `original` into the stripped text of `proposed`,
/// otherwise the patch is rejected. The fragment lists the records from the
/// highest offset to the lowest, the order in which a host applying them
/// one at a time keeps earlier offsets valid.
///
/// # Errors
///
/// * `NoChangesDetected` if there are no records although the texts differ.
/// * `PatchMismatch` (or a record error) if the records do not reproduce the
///   proposal.
/// * A markup error if the rendered runs fail validation.
pub(crate) fn build_text_patch(
    writer: &mut MarkupWriter<'_>,
    original: &str,
    proposed: &InlineText,
    records: &[ChangeRecord],
) -> Result<Fragment, ReconcileError> {
    if records.is_empty() {
        return if original == proposed.text {
            Err(ReconcileError::not_applicable(Strategy::TextPatch, "the texts are identical"))
        } else {
            Err(ReconcileError::NoChangesDetected)
        };
    }

    let produced = apply_records(original, records)?;
    if produced != proposed.text {
        return Err(ReconcileError::PatchMismatch {
            expected: proposed.text.clone(),
            produced,
        });
    }

    let mut markup = String::new();
    write_patched_runs(writer, &mut markup, original, proposed, records);
    validate_markup(&markup)?;

    let mut records = records.to_vec();
    records.sort_by_key(|record| std::cmp::Reverse(record.offset));

    Ok(Fragment {
        plain_text: Some(proposed.text.clone()),
        format_hints: proposed.spans.clone(),
        records,
        ..Fragment::with_markup(Strategy::TextPatch, markup)
    })
}

/// The text of `original` that `record` leaves untouched right before it,
/// handy when reporting a record in logs.
pub(crate) fn describe_record(original: &str, record: &ChangeRecord) -> String {
    let context_start = record.offset.saturating_sub(10);
    format!("…{}{record}", char_slice(original, context_start, record.offset))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        fragment::options::BuildOptions,
        markdown::emphasis::parse_inline,
        types::structural_context::RunFormatting,
    };

    fn options() -> BuildOptions {
        BuildOptions::default().at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    fn patch(original: &str, proposed: &str, options: &BuildOptions) -> Result<Fragment, ReconcileError> {
        let base = RunFormatting::default();
        let mut writer = MarkupWriter::new(&base, options);
        let proposed = parse_inline(proposed);
        let records = diff(original, &proposed.text, &ReconcilePolicy::default());

        build_text_patch(&mut writer, original, &proposed, &records)
    }

    #[test]
    fn test_acronym_replacement() {
        let fragment = patch("The NROFR clause applies.", "The ROFN clause applies.", &options()).unwrap();

        assert_eq!(fragment.strategy_used, Some(Strategy::TextPatch));
        assert_eq!(fragment.records, vec![ChangeRecord::replace(4, "NROFR", "ROFN")]);
        assert_snapshot!(
            fragment.markup,
            @r#"<w:r><w:t xml:space="preserve">The </w:t></w:r><w:del w:id="1" w:author="Unattributed" w:date="2024-01-02T03:04:05Z"><w:r><w:delText xml:space="preserve">NROFR</w:delText></w:r></w:del><w:ins w:id="2" w:author="Unattributed" w:date="2024-01-02T03:04:05Z"><w:r><w:t xml:space="preserve">ROFN</w:t></w:r></w:ins><w:r><w:t xml:space="preserve"> clause applies.</w:t></w:r>"#
        );
    }

    #[test]
    fn test_inserted_word_keeps_emphasis() {
        let fragment = patch(
            "Tenant shall pay rent.",
            "Tenant shall **promptly** pay rent.",
            &options(),
        )
        .unwrap();

        assert!(fragment.markup.contains(
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">promptly</w:t></w:r>"#
        ));
        assert_eq!(fragment.plain_text.as_deref(), Some("Tenant shall promptly pay rent."));
    }

    #[test]
    fn test_records_are_listed_highest_offset_first() {
        let fragment = patch(
            "Delivery is due within thirty days of the order being confirmed by the buyer.",
            "Shipment is due within thirty days of the order being confirmed by the seller.",
            &options(),
        )
        .unwrap();

        let offsets = fragment.records.iter().map(|record| record.offset).collect::<Vec<_>>();
        assert_eq!(offsets.len(), 2);
        assert!(offsets[0] > offsets[1]);
    }

    #[test]
    fn test_untracked_patch_has_no_revisions() {
        let fragment = patch("Pay the rent.", "Pay the full rent.", &options().untracked()).unwrap();

        assert!(!fragment.markup.contains("<w:ins"));
        assert!(!fragment.markup.contains("<w:del"));
        assert!(fragment.markup.contains("full"));
    }

    #[test]
    fn test_mismatched_records_are_rejected() {
        let base = RunFormatting::default();
        let mut writer = MarkupWriter::new(&base, &options());
        let proposed = parse_inline("Something else entirely");
        let records = vec![ChangeRecord::replace(0, "Old", "New")];

        assert!(matches!(
            build_text_patch(&mut writer, "Old text", &proposed, &records),
            Err(ReconcileError::PatchMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_records_are_rejected() {
        let base = RunFormatting::default();
        let mut writer = MarkupWriter::new(&base, &options());
        let proposed = parse_inline("New text");

        assert_eq!(
            build_text_patch(&mut writer, "Old text", &proposed, &[]),
            Err(ReconcileError::NoChangesDetected)
        );
    }

    #[test]
    fn test_rewrite_redlines_changed_words_only() {
        let base = RunFormatting::default();
        let mut writer = MarkupWriter::new(&base, &options());
        let mut out = String::new();

        write_rewrite(
            &mut writer,
            &mut out,
            "Pay the rent monthly",
            &parse_inline("Pay the rent weekly"),
            &ReconcilePolicy::default(),
        );

        assert!(out.contains(r#"<w:delText xml:space="preserve">monthly</w:delText>"#));
        assert!(out.contains(r#"<w:t xml:space="preserve">Pay the rent </w:t>"#));
    }

    #[test]
    fn test_describe_record() {
        let record = ChangeRecord::replace(4, "NROFR", "ROFN");

        assert_eq!(
            describe_record("The NROFR clause", &record),
            "…The <replace 'NROFR' with 'ROFN' at 4>"
        );
    }
}
