use std::{fmt::Write, ops::Range};

use quick_xml::escape::escape;

use crate::{
    consts::{CODE_FONT, LIST_HANGING_TWIPS, LIST_INDENT_STEP_TWIPS},
    fragment::options::BuildOptions,
    markdown::emphasis::InlineText,
    types::{structural_context::RunFormatting, text_format::TextFormat},
    utils::whitespace::char_slice,
};

/// Whether a paragraph mark is itself a tracked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParagraphMark {
    Unchanged,
    Inserted,
    Deleted,
}

/// Paragraph properties the builders need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParagraphProperties {
    pub style: Option<String>,
    /// `(numId, ilvl)` of a numbered paragraph.
    pub numbering: Option<(u32, usize)>,
    /// Indentation in list levels for paragraphs without numbering.
    pub indent_level: Option<usize>,
    pub bottom_border: bool,
}

impl ParagraphProperties {
    pub fn styled(style: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            ..Self::default()
        }
    }

    pub fn numbered(num_id: u32, level: usize) -> Self {
        Self {
            numbering: Some((num_id, level)),
            ..Self::default()
        }
    }
}

/// Revision metadata shared by every tracked change of one fragment.
#[derive(Debug)]
struct Revision {
    author: String,
    date: String,
}

/// Writes WordprocessingML runs, paragraphs and tracked changes.
///
/// Every run starts from the formatting of the anchor's surrounding run.
/// When tracking is disabled insertions are written as plain content and
/// deletions are dropped.
#[derive(Debug)]
pub(crate) struct MarkupWriter<'a> {
    base: &'a RunFormatting,
    revision: Option<Revision>,
    next_id: u32,
}

impl<'a> MarkupWriter<'a> {
    pub fn new(base: &'a RunFormatting, options: &BuildOptions) -> Self {
        let revision = options.generate_tracked_changes.then(|| Revision {
            author: escape(options.author.as_str()).into_owned(),
            date: options.revision_date(),
        });

        Self {
            base,
            revision,
            next_id: 1,
        }
    }

    pub fn is_tracking(&self) -> bool { self.revision.is_some() }

    fn revision_attributes(&mut self) -> String {
        let Some(revision) = &self.revision else {
            return String::new();
        };

        let id = self.next_id;
        self.next_id += 1;

        format!(r#" w:id="{id}" w:author="{}" w:date="{}""#, revision.author, revision.date)
    }

    pub fn run_properties(&self, format: TextFormat) -> String {
        let mut properties = String::new();

        let font = if format.code {
            Some(CODE_FONT)
        } else {
            self.base.font_name.as_deref()
        };
        if let Some(font) = font {
            let font = escape(font);
            let _ = write!(properties, r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#);
        }
        if self.base.bold || format.bold {
            properties.push_str("<w:b/>");
        }
        if self.base.italic || format.italic {
            properties.push_str("<w:i/>");
        }
        if format.strikethrough {
            properties.push_str("<w:strike/>");
        }
        if let Some(size) = self.base.font_size_half_points {
            let _ = write!(properties, r#"<w:sz w:val="{size}"/>"#);
        }
        if format.underline {
            properties.push_str(r#"<w:u w:val="single"/>"#);
        }

        if properties.is_empty() {
            properties
        } else {
            format!("<w:rPr>{properties}</w:rPr>")
        }
    }

    fn write_run(&self, out: &mut String, text: &str, format: TextFormat, text_element: &str) {
        if text.is_empty() {
            return;
        }

        let _ = write!(out, "<w:r>{}", self.run_properties(format));

        let mut pending = String::new();
        let flush = |out: &mut String, pending: &mut String| {
            if !pending.is_empty() {
                let _ = write!(
                    out,
                    r#"<{text_element} xml:space="preserve">{}</{text_element}>"#,
                    escape(pending.as_str())
                );
                pending.clear();
            }
        };

        for c in text.chars() {
            match c {
                '\n' => {
                    flush(out, &mut pending);
                    out.push_str("<w:br/>");
                }
                '\t' => {
                    flush(out, &mut pending);
                    out.push_str("<w:tab/>");
                }
                _ => pending.push(c),
            }
        }
        flush(out, &mut pending);

        out.push_str("</w:r>");
    }

    /// A run of unchanged or untracked text.
    pub fn run(&self, out: &mut String, text: &str, format: TextFormat) { self.write_run(out, text, format, "w:t"); }

    /// Runs covering the `range` (in characters) of `inline`, split wherever
    /// the formatting changes.
    pub fn inline_runs(&self, out: &mut String, inline: &InlineText, range: Range<usize>) {
        let mut start = range.start;

        while start < range.end {
            let format = inline.format_at(start);
            let end = (start + 1..range.end)
                .find(|index| inline.format_at(*index) != format)
                .unwrap_or(range.end);

            self.run(out, char_slice(&inline.text, start, end), format);
            start = end;
        }
    }

    /// Wraps already rendered runs into a tracked insertion.
    pub fn insertion(&mut self, out: &mut String, runs: &str) {
        if runs.is_empty() {
            return;
        }

        if self.is_tracking() {
            let attributes = self.revision_attributes();
            let _ = write!(out, "<w:ins{attributes}>{runs}</w:ins>");
        } else {
            out.push_str(runs);
        }
    }

    /// A tracked deletion of `text`. Writes nothing when not tracking.
    pub fn deletion(&mut self, out: &mut String, text: &str) {
        if text.is_empty() || !self.is_tracking() {
            return;
        }

        let attributes = self.revision_attributes();
        let _ = write!(out, "<w:del{attributes}>");
        self.write_run(out, text, TextFormat::PLAIN, "w:delText");
        out.push_str("</w:del>");
    }

    fn mark_properties(&mut self, mark: ParagraphMark) -> String {
        match (mark, self.is_tracking()) {
            (ParagraphMark::Inserted, true) => format!("<w:rPr><w:ins{}/></w:rPr>", self.revision_attributes()),
            (ParagraphMark::Deleted, true) => format!("<w:rPr><w:del{}/></w:rPr>", self.revision_attributes()),
            _ => String::new(),
        }
    }

    /// A paragraph holding `content`, which must be rendered runs.
    pub fn paragraph(&mut self, out: &mut String, properties: &ParagraphProperties, mark: ParagraphMark, content: &str) {
        let mut inner = String::new();

        if let Some(style) = &properties.style {
            let _ = write!(inner, r#"<w:pStyle w:val="{}"/>"#, escape(style.as_str()));
        }
        if let Some((num_id, level)) = properties.numbering {
            let _ = write!(inner, r#"<w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="{num_id}"/></w:numPr>"#);
        }
        if properties.bottom_border {
            inner.push_str(r#"<w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr>"#);
        }
        if let Some(level) = properties.indent_level {
            let left = LIST_INDENT_STEP_TWIPS * (u32::try_from(level).unwrap_or(0) + 1);
            let _ = write!(inner, r#"<w:ind w:left="{left}" w:hanging="{LIST_HANGING_TWIPS}"/>"#);
        }
        inner.push_str(&self.mark_properties(mark));

        out.push_str("<w:p>");
        if !inner.is_empty() {
            let _ = write!(out, "<w:pPr>{inner}</w:pPr>");
        }
        out.push_str(content);
        out.push_str("</w:p>");
    }

    /// `w:trPr` marking a whole table row as inserted or deleted.
    pub fn row_properties(&mut self, mark: ParagraphMark, is_header: bool) -> String {
        let mut inner = String::new();

        if is_header {
            inner.push_str("<w:tblHeader/>");
        }
        if self.is_tracking() {
            match mark {
                ParagraphMark::Inserted => {
                    let _ = write!(inner, "<w:ins{}/>", self.revision_attributes());
                }
                ParagraphMark::Deleted => {
                    let _ = write!(inner, "<w:del{}/>", self.revision_attributes());
                }
                ParagraphMark::Unchanged => {}
            }
        }

        if inner.is_empty() {
            inner
        } else {
            format!("<w:trPr>{inner}</w:trPr>")
        }
    }
}
