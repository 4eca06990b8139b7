#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    markdown::{
        blocks::{BlockLine, match_block_line},
        emphasis::parse_inline,
    },
    policy::ReconcilePolicy,
    structure::{
        list_parser::{NumberStyle, match_list_line},
        table_parser::{is_separator_row, is_table_row, split_cells},
    },
    types::text_format::{FormatSpan, TextFormat},
    utils::whitespace::char_len,
};

/// Markdown flattened to plain text, for anchors that may only receive text
/// plus character-range formatting.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreprocessedText {
    pub clean_text: String,
    /// Formatting to apply to ranges of `clean_text`, in character offsets.
    pub format_hints: Vec<FormatSpan>,
}

impl PreprocessedText {
    fn push_line(&mut self, line: &str, spans: impl IntoIterator<Item = FormatSpan>) {
        if !self.clean_text.is_empty() {
            self.clean_text.push('\n');
        }

        let offset = char_len(&self.clean_text);
        self.clean_text.push_str(line);
        self.format_hints
            .extend(spans.into_iter().map(|span| span.with_shifted_offset(offset)));
    }

    /// Appends `prefix` unformatted followed by `text` with its inline
    /// emphasis turned into hints.
    fn push_inline(&mut self, prefix: &str, text: &str, line_format: Option<TextFormat>) {
        let parsed = parse_inline(text);
        let prefix_length = char_len(prefix);

        let line_span = line_format
            .filter(|_| !parsed.is_empty())
            .map(|format| FormatSpan::new(prefix_length, parsed.len(), format));

        let spans = line_span.into_iter().chain(
            parsed
                .spans
                .iter()
                .map(|span| span.with_shifted_offset(prefix_length)),
        );

        self.push_line(&format!("{prefix}{}", parsed.text), spans.collect::<Vec<_>>());
    }
}

/// Flattens markdown into plain text plus formatting hints.
///
/// Headings lose their `#` markers and become bold, list items keep a
/// visible label (`•` for bullets, the literal marker otherwise) indented
/// with one tab per level, table rows become tab-separated cells without
/// separator rows, quote markers and code fences are dropped and fenced code
/// is hinted as code. Inline emphasis is stripped everywhere else.
///
/// ```
/// use redline_text::{ReconcilePolicy, TextFormat, preprocess};
///
/// let text = preprocess("# Fees\n- **Late** fee", &ReconcilePolicy::default());
/// assert_eq!(text.clean_text, "Fees\n• Late fee");
/// assert_eq!(text.format_hints[0].format, TextFormat::BOLD);
/// ```
#[must_use]
pub fn preprocess(content: &str, policy: &ReconcilePolicy) -> PreprocessedText {
    let mut output = PreprocessedText::default();
    let mut in_fence = false;

    let lines = content
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .collect::<Vec<_>>();
    let last_content_line = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |index| index + 1);

    for line in &lines[..last_content_line] {
        if in_fence {
            if matches!(match_block_line(line), Some(BlockLine::Fence)) {
                in_fence = false;
            } else {
                let length = char_len(line);
                output.push_line(line, (length > 0).then(|| FormatSpan::new(0, length, TextFormat::CODE)));
            }
            continue;
        }

        if is_table_row(line) {
            if !is_separator_row(line) {
                output.push_inline("", &split_cells(line).join("\t"), None);
            }
            continue;
        }

        match match_block_line(line) {
            Some(BlockLine::Heading { text, .. }) => output.push_inline("", text, Some(TextFormat::BOLD)),
            Some(BlockLine::Quote(text)) => output.push_inline("", text, None),
            Some(BlockLine::Fence) => in_fence = true,
            Some(BlockLine::Rule) => {}
            None => match match_list_line(line, policy) {
                Some(list_line) => {
                    let indent = "\t".repeat(list_line.level);
                    let label = if NumberStyle::of_marker(list_line.marker) == NumberStyle::Bullet {
                        "•"
                    } else {
                        list_line.marker
                    };
                    output.push_inline(&format!("{indent}{label} "), list_line.text, None);
                }
                None => output.push_inline("", line.trim(), None),
            },
        }
    }

    output
}
