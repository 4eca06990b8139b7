use std::fmt::Write;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    consts::{LIST_HANGING_TWIPS, LIST_INDENT_STEP_TWIPS, MAX_LIST_LEVEL},
    policy::ReconcilePolicy,
    structure::list_parser::{ListModel, NumberStyle},
    types::structural_context::StructuralContext,
};

/// A numbering rule plus the instance binding a list to it, for styles the
/// host cannot be assumed to define.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingDefinition {
    pub abstract_num_id: u32,
    pub num_id: u32,
    pub style: NumberStyle,
    pub start: u32,
}

impl NumberingDefinition {
    /// Level text of `level`, e.g. `%1.` or `%1.%2.%3.` for outlines.
    #[must_use]
    pub fn level_text(&self, level: usize) -> String {
        match self.style {
            NumberStyle::Bullet => "•".to_owned(),
            NumberStyle::Outline => (1..=level + 1).fold(String::new(), |mut text, index| {
                let _ = write!(text, "%{index}.");
                text
            }),
            _ => format!("%{}.", level + 1),
        }
    }

    /// `w:abstractNum` followed by the `w:num` instance, ready to be merged
    /// into the host's numbering part.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let multi_level_type = if self.style == NumberStyle::Outline {
            "multilevel"
        } else {
            "hybridMultilevel"
        };

        let mut markup = format!(
            r#"<w:abstractNum w:abstractNumId="{}"><w:multiLevelType w:val="{multi_level_type}"/>"#,
            self.abstract_num_id
        );

        for level in 0..=MAX_LIST_LEVEL {
            let start = if level == 0 { self.start } else { 1 };
            let indent = LIST_INDENT_STEP_TWIPS * (u32::try_from(level).unwrap_or(0) + 1);

            let _ = write!(
                markup,
                r#"<w:lvl w:ilvl="{level}"><w:start w:val="{start}"/><w:numFmt w:val="{}"/><w:lvlText w:val="{}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{indent}" w:hanging="{LIST_HANGING_TWIPS}"/></w:pPr></w:lvl>"#,
                self.style.num_fmt(),
                self.level_text(level),
            );
        }

        let _ = write!(
            markup,
            r#"</w:abstractNum><w:num w:numId="{}"><w:abstractNumId w:val="{}"/></w:num>"#,
            self.num_id, self.abstract_num_id
        );

        markup
    }
}

/// Numbering every item of a list should receive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingPlan {
    pub num_id: u32,

    /// Effective `w:ilvl` of every item, in item order.
    pub levels: Vec<usize>,

    /// Present when `num_id` refers to a definition minted for this list.
    pub definition: Option<NumberingDefinition>,

    /// The items continue the list the anchor already belongs to.
    pub continues_existing: bool,
}

fn custom_style_index(style: NumberStyle) -> u32 {
    match style {
        NumberStyle::Bullet => 0,
        NumberStyle::Decimal => 1,
        NumberStyle::LowerLetter => 2,
        NumberStyle::UpperLetter => 3,
        NumberStyle::LowerRoman => 4,
        NumberStyle::UpperRoman => 5,
        NumberStyle::Outline => 6,
    }
}

/// Decides which numbering a parsed list is rendered with.
///
/// An anchor that already belongs to a list keeps that list's numbering id,
/// and every item is shifted by the anchor's nesting level, so sub-edits of
/// a list never start a new, visually disconnected sequence. Otherwise plain
/// bullets and decimal lists starting at 1 use the host's built-in
/// definitions, and every other style gets a complete custom definition.
#[must_use]
pub fn derive_numbering_plan(
    context: &StructuralContext,
    model: &ListModel,
    policy: &ReconcilePolicy,
) -> NumberingPlan {
    let base_level = context.existing_numbering().map_or(0, |(_, level)| level);
    let levels = model
        .items
        .iter()
        .map(|item| (item.level + base_level).min(MAX_LIST_LEVEL))
        .collect();

    if let Some((num_id, _)) = context.existing_numbering() {
        debug!("Continuing existing numbering {num_id} from level {base_level}");
        return NumberingPlan {
            num_id,
            levels,
            definition: None,
            continues_existing: true,
        };
    }

    let style = model.number_style;
    let num_id = match style {
        NumberStyle::Bullet => policy.bullet_numbering_id,
        NumberStyle::Decimal if model.start == 1 => policy.decimal_numbering_id,
        _ => policy.custom_numbering_base + custom_style_index(style),
    };

    let definition = (!style.is_built_in() || (style == NumberStyle::Decimal && model.start != 1))
        .then(|| {
            debug!("Minting numbering definition {num_id} for {style:?} starting at {}", model.start);
            NumberingDefinition {
                abstract_num_id: num_id,
                num_id,
                style,
                start: model.start,
            }
        });

    NumberingPlan {
        num_id,
        levels,
        definition,
        continues_existing: false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::structure::list_parser::parse_list;

    fn plan(content: &str, context: &StructuralContext) -> NumberingPlan {
        let policy = ReconcilePolicy::default();
        let model = parse_list(content, &policy).unwrap();
        derive_numbering_plan(context, &model, &policy)
    }

    #[test]
    fn test_existing_list_is_continued() {
        let plan = plan("- a\n    - b", &StructuralContext::list_item(7, 1));

        assert_eq!(plan.num_id, 7);
        assert_eq!(plan.levels, vec![1, 2]);
        assert!(plan.continues_existing);
        assert_eq!(plan.definition, None);
    }

    #[test]
    fn test_levels_are_clamped() {
        let plan = plan("- a\n    - b", &StructuralContext::list_item(7, 8));

        assert_eq!(plan.levels, vec![8, 8]);
    }

    #[test]
    fn test_built_in_bullets() {
        let plan = plan("- a\n- b", &StructuralContext::default());

        assert_eq!(plan.num_id, 1);
        assert_eq!(plan.definition, None);
        assert!(!plan.continues_existing);
    }

    #[test]
    fn test_built_in_decimal() {
        let plan = plan("1. a\n2. b", &StructuralContext::default());

        assert_eq!(plan.num_id, 2);
        assert_eq!(plan.definition, None);
    }

    #[test]
    fn test_decimal_with_custom_start() {
        let plan = plan("4. a\n5. b", &StructuralContext::default());
        let definition = plan.definition.unwrap();

        assert_eq!(definition.start, 4);
        assert_eq!(definition.style, NumberStyle::Decimal);
        assert_eq!(plan.num_id, definition.num_id);
    }

    #[test]
    fn test_letters_mint_a_definition() {
        let plan = plan("a. first\nb. second", &StructuralContext::default());
        let definition = plan.definition.unwrap();

        assert_eq!(plan.num_id, 1002);
        assert_eq!(definition.style, NumberStyle::LowerLetter);

        let markup = definition.to_markup();
        assert!(markup.starts_with(r#"<w:abstractNum w:abstractNumId="1002">"#));
        assert!(markup.contains(r#"<w:numFmt w:val="lowerLetter"/>"#));
        assert!(markup.ends_with(r#"<w:num w:numId="1002"><w:abstractNumId w:val="1002"/></w:num>"#));
        assert_eq!(markup.matches("<w:lvl ").count(), MAX_LIST_LEVEL + 1);
    }

    #[test]
    fn test_outline_level_text() {
        let definition = NumberingDefinition {
            abstract_num_id: 1,
            num_id: 1,
            style: NumberStyle::Outline,
            start: 1,
        };

        assert_eq!(definition.level_text(0), "%1.");
        assert_eq!(definition.level_text(2), "%1.%2.%3.");
    }

    #[test]
    fn test_existing_numbering_wins_over_style() {
        let plan = plan("i. first\nii. second", &StructuralContext::list_item(3, 0));

        assert_eq!(plan.num_id, 3);
        assert_eq!(plan.definition, None);
    }
}
