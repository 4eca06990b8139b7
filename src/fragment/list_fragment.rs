use log::debug;

use crate::{
    consts::MAX_LIST_LEVEL,
    errors::ReconcileError,
    fragment::{
        markup::{MarkupWriter, ParagraphMark, ParagraphProperties},
        text_patch::write_rewrite,
        validate::validate_markup,
    },
    markdown::emphasis::{InlineText, parse_inline},
    policy::ReconcilePolicy,
    structure::{
        list_parser::{ListItem, ListItemKind, ListModel, parse_list},
        numbering::{NumberingPlan, derive_numbering_plan},
        reconciliation_plan::{PlannedStep, ReconciliationPlan},
    },
    types::{
        fragment::{Fragment, Strategy, StructuralEdit},
        structural_context::StructuralContext,
    },
};

/// The items the anchor currently holds. A list keeps its parsed items;
/// any other text counts one item per non-blank line.
fn existing_items(original: &str, policy: &ReconcilePolicy) -> Vec<ListItem> {
    if original.trim().is_empty() {
        return Vec::new();
    }

    parse_list(original, policy).map_or_else(
        || {
            original
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| ListItem {
                    text: line.trim().to_owned(),
                    level: 0,
                    kind: ListItemKind::Item,
                })
                .collect()
        },
        |model| model.items,
    )
}

fn item_properties(plan: &NumberingPlan, kind: ListItemKind, level: usize) -> ParagraphProperties {
    match kind {
        ListItemKind::Item => ParagraphProperties::numbered(plan.num_id, level),
        ListItemKind::Text => ParagraphProperties {
            indent_level: Some(level),
            ..ParagraphProperties::default()
        },
    }
}

/// Builds a `ListFragment` replacing the anchor's items with `model`.
///
/// Existing items are reconciled in three phases: the first
/// `min(existing, proposed)` items are rewritten in place with only their
/// changed words redlined, surplus proposed items are appended as inserted
/// paragraphs, and surplus existing items are deleted from the last one
/// backwards. The markup lists the resulting paragraphs in document order
/// while `structural_edits` lists them in execution order.
///
/// # Errors
///
/// * `NotApplicable` for empty lists and anchors inside nested tables.
/// * A markup error if the rendered paragraphs fail validation.
pub(crate) fn build_list_fragment(
    writer: &mut MarkupWriter<'_>,
    original: &str,
    model: &ListModel,
    context: &StructuralContext,
    policy: &ReconcilePolicy,
) -> Result<Fragment, ReconcileError> {
    if model.is_empty() {
        return Err(ReconcileError::not_applicable(Strategy::ListFragment, "the list has no items"));
    }
    if !context.accepts_structural_markup() {
        return Err(ReconcileError::not_applicable(
            Strategy::ListFragment,
            "the anchor only accepts plain text",
        ));
    }

    let plan = derive_numbering_plan(context, model, policy);
    let existing = existing_items(original, policy);
    let base_level = context.existing_numbering().map_or(0, |(_, level)| level);
    let proposed = model
        .items
        .iter()
        .map(|item| parse_inline(&item.text))
        .collect::<Vec<InlineText>>();

    let reconciliation = ReconciliationPlan::new(existing.len(), proposed.len());
    debug!(
        "Reconciling {} existing with {} proposed list items: {reconciliation:?}",
        existing.len(),
        proposed.len()
    );

    let mut edits = Vec::new();
    for step in reconciliation.steps() {
        let mut paragraph = String::new();

        let edit = match step {
            PlannedStep::Rewrite(index) => {
                let mut runs = String::new();
                write_rewrite(writer, &mut runs, &existing[index].text, &proposed[index], policy);
                let properties = item_properties(&plan, model.items[index].kind, plan.levels[index]);
                writer.paragraph(&mut paragraph, &properties, ParagraphMark::Unchanged, &runs);
                StructuralEdit::Rewrite {
                    index,
                    markup: paragraph,
                }
            }
            PlannedStep::Append(index) => {
                let mut runs = String::new();
                writer.inline_runs(&mut runs, &proposed[index], 0..proposed[index].len());
                let mut content = String::new();
                writer.insertion(&mut content, &runs);
                let properties = item_properties(&plan, model.items[index].kind, plan.levels[index]);
                writer.paragraph(&mut paragraph, &properties, ParagraphMark::Inserted, &content);
                StructuralEdit::Append {
                    index,
                    markup: paragraph,
                }
            }
            PlannedStep::Delete(index) => {
                if writer.is_tracking() {
                    let item = &existing[index];
                    let mut content = String::new();
                    writer.deletion(&mut content, &item.text);
                    let level = (item.level + base_level).min(MAX_LIST_LEVEL);
                    let properties = item_properties(&plan, item.kind, level);
                    writer.paragraph(&mut paragraph, &properties, ParagraphMark::Deleted, &content);
                }
                StructuralEdit::Delete {
                    index,
                    markup: paragraph,
                }
            }
        };

        edits.push(edit);
    }

    let markup = document_order(&edits);
    validate_markup(&markup)?;

    Ok(Fragment {
        numbering_markup: plan.definition.as_ref().map(|definition| definition.to_markup()),
        plain_text: Some(
            proposed
                .iter()
                .map(|item| item.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        structural_edits: edits,
        ..Fragment::with_markup(Strategy::ListFragment, markup)
    })
}

/// Concatenates the markup of `edits` in the order the paragraphs end up in
/// the document: rewritten and appended entries by index, followed by the
/// deleted entries that trail them.
pub(crate) fn document_order(edits: &[StructuralEdit]) -> String {
    let mut kept = edits
        .iter()
        .filter(|edit| !matches!(edit, StructuralEdit::Delete { .. }))
        .collect::<Vec<_>>();
    kept.sort_by_key(|edit| edit.index());

    let mut deleted = edits
        .iter()
        .filter(|edit| matches!(edit, StructuralEdit::Delete { .. }))
        .collect::<Vec<_>>();
    deleted.sort_by_key(|edit| edit.index());

    kept.into_iter()
        .chain(deleted)
        .map(|edit| match edit {
            StructuralEdit::Rewrite { markup, .. }
            | StructuralEdit::Append { markup, .. }
            | StructuralEdit::Delete { markup, .. } => markup.as_str(),
        })
        .collect()
}
