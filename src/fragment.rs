//! Rendering of reconciliation results as WordprocessingML fragments.

mod format_only;
mod full_text;
mod list_fragment;
mod markup;
pub mod native;
pub mod options;
mod table_fragment;
mod text_patch;
pub mod validate;

pub(crate) use text_patch::describe_record;

use crate::{
    errors::ReconcileError,
    fragment::{markup::MarkupWriter, options::BuildOptions},
    markdown::{classifier::FormattingClassification, emphasis::InlineText},
    policy::ReconcilePolicy,
    structure::{list_parser::ListModel, table_parser::TableModel},
    types::{
        change_record::ChangeRecord,
        fragment::{Fragment, Strategy},
        structural_context::StructuralContext,
    },
};

/// Everything a single strategy needs to build its fragment. `original` is
/// always the anchor's current plain text.
#[derive(Debug, Clone, Copy)]
pub enum FragmentPayload<'a> {
    TextPatch {
        original: &'a str,
        proposed: &'a InlineText,
        records: &'a [ChangeRecord],
    },
    FormatOnly {
        original: &'a str,
        classification: &'a FormattingClassification,
    },
    List {
        original: &'a str,
        model: &'a ListModel,
    },
    Table {
        original: &'a str,
        model: &'a TableModel,
    },
    FullText {
        original: &'a str,
        proposed: &'a str,
    },
}

impl FragmentPayload<'_> {
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            FragmentPayload::TextPatch { .. } => Strategy::TextPatch,
            FragmentPayload::FormatOnly { .. } => Strategy::FormatOnly,
            FragmentPayload::List { .. } => Strategy::ListFragment,
            FragmentPayload::Table { .. } => Strategy::TableFragment,
            FragmentPayload::FullText { .. } => Strategy::FullTextReplace,
        }
    }
}

/// Builds the fragment for one strategy.
///
/// Every run starts from the anchor's run formatting found in `context`, and
/// every tracked change carries the author and date of `options`.
///
/// # Errors
///
/// `NotApplicable` when the strategy cannot express the change, or any
/// error of the strategy's own validation. The router treats every error as
/// a reason to try the next strategy.
pub fn build(
    payload: FragmentPayload<'_>,
    context: &StructuralContext,
    options: &BuildOptions,
    policy: &ReconcilePolicy,
) -> Result<Fragment, ReconcileError> {
    let mut writer = MarkupWriter::new(&context.run_formatting, options);

    match payload {
        FragmentPayload::TextPatch {
            original,
            proposed,
            records,
        } => text_patch::build_text_patch(&mut writer, original, proposed, records),
        FragmentPayload::FormatOnly {
            original,
            classification,
        } => format_only::build_format_only(&writer, original, classification, policy),
        FragmentPayload::List { original, model } => {
            list_fragment::build_list_fragment(&mut writer, original, model, context, policy)
        }
        FragmentPayload::Table { original, model } => {
            table_fragment::build_table_fragment(&mut writer, original, model, context, policy)
        }
        FragmentPayload::FullText { original, proposed } => {
            full_text::build_full_text(&mut writer, original, proposed, policy)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        markdown::emphasis::parse_inline,
        types::structural_context::RunFormatting,
        word_diff::diff,
    };

    #[test]
    fn test_runs_inherit_anchor_formatting() {
        let policy = ReconcilePolicy::default();
        let options = BuildOptions::default().at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let context = StructuralContext::default().with_run_formatting(RunFormatting {
            font_name: Some("Garamond".to_owned()),
            font_size_half_points: Some(24),
            ..RunFormatting::default()
        });

        let proposed = parse_inline("Pay the full rent");
        let records = diff("Pay the rent", &proposed.text, &policy);
        let payload = FragmentPayload::TextPatch {
            original: "Pay the rent",
            proposed: &proposed,
            records: &records,
        };

        assert_eq!(payload.strategy(), Strategy::TextPatch);

        let fragment = build(payload, &context, &options, &policy).unwrap();
        assert!(fragment.markup.contains(r#"w:ascii="Garamond""#));
        assert!(fragment.markup.contains(r#"<w:sz w:val="24"/>"#));
    }
}
