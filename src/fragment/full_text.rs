use log::debug;

use crate::{
    errors::ReconcileError,
    fragment::{
        markup::{MarkupWriter, ParagraphMark, ParagraphProperties},
        validate::validate_markup,
    },
    markdown::{
        blocks::{Block, BlockKind, split_blocks},
        emphasis::{InlineText, parse_inline},
        preprocess::preprocess,
    },
    policy::ReconcilePolicy,
    types::{
        fragment::{Fragment, Strategy},
        text_format::{FormatSpan, TextFormat},
    },
    utils::whitespace::char_len,
};

/// Paragraph properties and styled text of one markdown block.
fn render_block(block: &Block, policy: &ReconcilePolicy) -> (ParagraphProperties, InlineText) {
    match block.kind {
        BlockKind::Heading(level) => (
            ParagraphProperties::styled(format!("Heading{level}")),
            parse_inline(&block.text),
        ),
        BlockKind::Quote => (ParagraphProperties::styled("Quote"), parse_inline(&block.text)),
        BlockKind::Code => {
            let length = char_len(&block.text);
            let spans = (length > 0)
                .then(|| FormatSpan::new(0, length, TextFormat::CODE))
                .into_iter()
                .collect();
            (ParagraphProperties::default(), InlineText::from_parts(block.text.as_str(), spans))
        }
        BlockKind::Rule => (
            ParagraphProperties {
                bottom_border: true,
                ..ParagraphProperties::default()
            },
            InlineText::default(),
        ),
        BlockKind::Paragraph => {
            // Lists and table rows that ended up here keep a readable shape.
            let flattened = preprocess(&block.text, policy);
            (
                ParagraphProperties::default(),
                InlineText::from_parts(flattened.clean_text, flattened.format_hints),
            )
        }
    }
}

/// Builds a `FullTextReplace` fragment: the original text deleted as a whole
/// and the proposal inserted as new paragraphs, one per markdown block.
///
/// This is the strategy of last resort and accepts any input, but an anchor
/// whose text is empty and whose proposal renders to nothing has no change
/// to express.
///
/// # Errors
///
/// * `NotApplicable` when both the original and the proposal are blank.
/// * A markup error if the rendered paragraphs fail validation.
pub(crate) fn build_full_text(
    writer: &mut MarkupWriter<'_>,
    original: &str,
    proposed: &str,
    policy: &ReconcilePolicy,
) -> Result<Fragment, ReconcileError> {
    let blocks = split_blocks(proposed);
    let original = original.trim();

    if blocks.is_empty() && original.is_empty() {
        return Err(ReconcileError::not_applicable(
            Strategy::FullTextReplace,
            "there is nothing to replace",
        ));
    }

    let mut markup = String::new();

    if !original.is_empty() && writer.is_tracking() {
        let mut content = String::new();
        writer.deletion(&mut content, original);
        writer.paragraph(&mut markup, &ParagraphProperties::default(), ParagraphMark::Deleted, &content);
    }

    debug!("Rendering {} blocks as replacement", blocks.len());
    for block in &blocks {
        let (properties, inline) = render_block(block, policy);

        let mut runs = String::new();
        writer.inline_runs(&mut runs, &inline, 0..inline.len());
        let mut content = String::new();
        writer.insertion(&mut content, &runs);

        writer.paragraph(&mut markup, &properties, ParagraphMark::Inserted, &content);
    }

    validate_markup(&markup)?;

    let flattened = preprocess(proposed, policy);

    Ok(Fragment {
        plain_text: Some(flattened.clean_text),
        format_hints: flattened.format_hints,
        ..Fragment::with_markup(Strategy::FullTextReplace, markup)
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{fragment::options::BuildOptions, types::structural_context::RunFormatting};

    fn options() -> BuildOptions {
        BuildOptions::default().at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    fn build(original: &str, proposed: &str, options: &BuildOptions) -> Result<Fragment, ReconcileError> {
        let base = RunFormatting::default();
        let mut writer = MarkupWriter::new(&base, options);

        build_full_text(&mut writer, original, proposed, &ReconcilePolicy::default())
    }

    #[test]
    fn test_replacement_snapshot() {
        let fragment = build("Old clause.", "New *clause*.", &options()).unwrap();

        assert_snapshot!(
            fragment.markup,
            @r#"<w:p><w:pPr><w:rPr><w:del w:id="2" w:author="Unattributed" w:date="2024-01-02T03:04:05Z"/></w:rPr></w:pPr><w:del w:id="1" w:author="Unattributed" w:date="2024-01-02T03:04:05Z"><w:r><w:delText xml:space="preserve">Old clause.</w:delText></w:r></w:del></w:p><w:p><w:pPr><w:rPr><w:ins w:id="4" w:author="Unattributed" w:date="2024-01-02T03:04:05Z"/></w:rPr></w:pPr><w:ins w:id="3" w:author="Unattributed" w:date="2024-01-02T03:04:05Z"><w:r><w:t xml:space="preserve">New </w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t xml:space="preserve">clause</w:t></w:r><w:r><w:t xml:space="preserve">.</w:t></w:r></w:ins></w:p>"#
        );
    }

    #[test]
    fn test_blocks_get_paragraph_styles() {
        let fragment = build(
            "",
            "# Terms\n\nBody text.\n\n> A note\n\n---\n\n```\nlet x = 1;\n```",
            &options(),
        )
        .unwrap();

        assert_eq!(fragment.strategy_used, Some(Strategy::FullTextReplace));
        assert!(fragment.markup.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(fragment.markup.contains(r#"<w:pStyle w:val="Quote"/>"#));
        assert!(fragment.markup.contains("<w:pBdr>"));
        assert!(fragment.markup.contains(r#"w:ascii="Consolas""#));
        assert!(!fragment.markup.contains("<w:del"));
        assert_eq!(
            fragment.plain_text.as_deref(),
            Some("Terms\n\nBody text.\n\nA note\n\n\nlet x = 1;")
        );
    }

    #[test]
    fn test_untracked_replacement() {
        let fragment = build("Old text", "New text", &options().untracked()).unwrap();

        assert_eq!(fragment.markup, r#"<w:p><w:r><w:t xml:space="preserve">New text</w:t></w:r></w:p>"#);
    }

    #[test]
    fn test_deleting_everything() {
        let fragment = build("Old text", "", &options()).unwrap();

        assert!(fragment.markup.contains(">Old text</w:delText>"));
        assert_eq!(fragment.plain_text.as_deref(), Some(""));
    }

    #[test]
    fn test_nothing_to_replace() {
        assert!(matches!(
            build("  ", "\n", &options()),
            Err(ReconcileError::NotApplicable { .. })
        ));
    }
}
