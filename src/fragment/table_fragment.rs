use std::fmt::Write;

use log::debug;

use crate::{
    errors::ReconcileError,
    fragment::{
        list_fragment::document_order,
        markup::{MarkupWriter, ParagraphMark, ParagraphProperties},
        text_patch::write_rewrite,
        validate::validate_markup,
    },
    markdown::emphasis::{InlineText, parse_inline},
    policy::ReconcilePolicy,
    structure::{
        reconciliation_plan::{PlannedStep, ReconciliationPlan},
        table_parser::{TableModel, parse_table},
    },
    types::{
        fragment::{Fragment, Strategy, StructuralEdit},
        structural_context::StructuralContext,
        text_format::{FormatSpan, TextFormat},
    },
};

/// Usable width of a letter page with one inch margins, in twips.
const TABLE_WIDTH_TWIPS: usize = 9360;

/// A proposed cell, emboldened when it belongs to the header row.
fn proposed_cell(text: &str, is_header: bool) -> InlineText {
    let inline = parse_inline(text);
    if !is_header || inline.is_empty() {
        return inline;
    }

    let mut spans = vec![FormatSpan::new(0, inline.len(), TextFormat::BOLD)];
    spans.extend(inline.spans);
    InlineText::from_parts(inline.text, spans)
}

#[derive(Debug)]
struct TableWriter<'w, 'a> {
    writer: &'w mut MarkupWriter<'a>,
    column_width: usize,
}

impl TableWriter<'_, '_> {
    fn cell(&mut self, out: &mut String, content: &str) {
        let mut paragraph = String::new();
        self.writer.paragraph(
            &mut paragraph,
            &ParagraphProperties::default(),
            ParagraphMark::Unchanged,
            content,
        );

        let _ = write!(
            out,
            r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>{paragraph}</w:tc>"#,
            self.column_width
        );
    }

    fn row(&mut self, mark: ParagraphMark, is_header: bool, cells: &str) -> String {
        let properties = self.writer.row_properties(mark, is_header);
        format!("<w:tr>{properties}{cells}</w:tr>")
    }

    /// Rewrites the proposed cells over the existing ones. Existing cells past
    /// the proposed columns stay in the row as tracked deletions.
    fn rewritten_row(
        &mut self,
        existing: &[String],
        proposed: &[InlineText],
        is_header: bool,
        policy: &ReconcilePolicy,
    ) -> String {
        let mut cells = String::new();

        for (column, cell) in proposed.iter().enumerate() {
            let old = existing.get(column).map_or("", String::as_str);
            let mut runs = String::new();
            write_rewrite(self.writer, &mut runs, old, cell, policy);
            self.cell(&mut cells, &runs);
        }

        if self.writer.is_tracking() {
            for cell in existing.iter().skip(proposed.len()) {
                let mut content = String::new();
                self.writer.deletion(&mut content, cell);
                self.cell(&mut cells, &content);
            }
        }

        self.row(ParagraphMark::Unchanged, is_header, &cells)
    }

    fn appended_row(&mut self, proposed: &[InlineText], is_header: bool) -> String {
        let mut cells = String::new();

        for cell in proposed {
            let mut runs = String::new();
            self.writer.inline_runs(&mut runs, cell, 0..cell.len());
            let mut content = String::new();
            self.writer.insertion(&mut content, &runs);
            self.cell(&mut cells, &content);
        }

        self.row(ParagraphMark::Inserted, is_header, &cells)
    }

    fn deleted_row(&mut self, existing: &[String], is_header: bool) -> String {
        if !self.writer.is_tracking() {
            return String::new();
        }

        let mut cells = String::new();
        for cell in existing {
            let mut content = String::new();
            self.writer.deletion(&mut content, cell);
            self.cell(&mut cells, &content);
        }

        self.row(ParagraphMark::Deleted, is_header, &cells)
    }
}

/// Builds a `TableFragment` replacing the anchor with `model`.
///
/// When the anchor already holds a table its rows are reconciled the way
/// list items are: rewritten cell by cell, then appended, then deleted from
/// the bottom up. Any other existing text is deleted as a paragraph in front
/// of the new table. The header row repeats on every page and is bold.
///
/// # Errors
///
/// * `NotApplicable` for tables without columns and anchors inside nested
///   tables.
/// * A markup error if the rendered table fails validation.
pub(crate) fn build_table_fragment(
    writer: &mut MarkupWriter<'_>,
    original: &str,
    model: &TableModel,
    context: &StructuralContext,
    policy: &ReconcilePolicy,
) -> Result<Fragment, ReconcileError> {
    if model.num_cols == 0 {
        return Err(ReconcileError::not_applicable(Strategy::TableFragment, "the table has no columns"));
    }
    if !context.accepts_structural_markup() {
        return Err(ReconcileError::not_applicable(
            Strategy::TableFragment,
            "tables cannot be nested this deep",
        ));
    }

    let existing_table = parse_table(original);
    let existing = existing_table
        .as_ref()
        .map(|table| table.all_rows().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    let proposed = model
        .all_rows()
        .enumerate()
        .map(|(index, row)| row.iter().map(|cell| proposed_cell(cell, index == 0)).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut markup = String::new();
    if existing_table.is_none() && !original.trim().is_empty() && writer.is_tracking() {
        debug!("Replacing non-tabular text with a {}x{} table", model.num_rows, model.num_cols);
        let mut content = String::new();
        writer.deletion(&mut content, original.trim());
        writer.paragraph(&mut markup, &ParagraphProperties::default(), ParagraphMark::Deleted, &content);
    }

    let reconciliation = ReconciliationPlan::new(existing.len(), proposed.len());
    debug!("Reconciling table rows: {reconciliation:?}");

    // Removed columns keep their grid slot while their deletions are pending.
    let grid_columns = match &existing_table {
        Some(table) if writer.is_tracking() => table.num_cols.max(model.num_cols),
        _ => model.num_cols,
    };
    if grid_columns > model.num_cols {
        debug!("Deleting {} trailing column(s)", grid_columns - model.num_cols);
    }

    let mut table = TableWriter {
        writer,
        column_width: TABLE_WIDTH_TWIPS / grid_columns,
    };

    let mut edits = Vec::new();
    for step in reconciliation.steps() {
        edits.push(match step {
            PlannedStep::Rewrite(index) => StructuralEdit::Rewrite {
                index,
                markup: table.rewritten_row(&existing[index], &proposed[index], index == 0, policy),
            },
            PlannedStep::Append(index) => StructuralEdit::Append {
                index,
                markup: table.appended_row(&proposed[index], index == 0),
            },
            PlannedStep::Delete(index) => StructuralEdit::Delete {
                index,
                markup: table.deleted_row(&existing[index], index == 0),
            },
        });
    }

    markup.push_str(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid>"#);
    for _ in 0..grid_columns {
        let _ = write!(markup, r#"<w:gridCol w:w="{}"/>"#, table.column_width);
    }
    markup.push_str("</w:tblGrid>");
    markup.push_str(&document_order(&edits));
    markup.push_str("</w:tbl>");

    validate_markup(&markup)?;

    Ok(Fragment {
        plain_text: Some(
            proposed
                .iter()
                .map(|row| row.iter().map(|cell| cell.text.as_str()).collect::<Vec<_>>().join("\t"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        structural_edits: edits,
        ..Fragment::with_markup(Strategy::TableFragment, markup)
    })
}
