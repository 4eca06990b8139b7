#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Character formatting of the run surrounding the anchor. Every run the
/// engine emits starts from this so that inserted text blends in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunFormatting {
    pub font_name: Option<String>,
    /// Font size in half-points, the unit WordprocessingML uses.
    pub font_size_half_points: Option<u32>,
    pub bold: bool,
    pub italic: bool,
}

/// Best-effort structural metadata extracted by the host for the anchor.
/// Missing metadata means "no existing structure", never an error.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct StructuralContext {
    pub is_list_item: bool,
    pub numbering_id: Option<u32>,
    pub nesting_level: Option<usize>,
    pub is_table_cell: bool,
    /// The anchor is a cell of a table that itself sits inside a table cell.
    pub is_nested_table: bool,
    pub run_formatting: RunFormatting,
}

impl StructuralContext {
    #[must_use]
    pub fn list_item(numbering_id: u32, nesting_level: usize) -> Self {
        Self {
            is_list_item: true,
            numbering_id: Some(numbering_id),
            nesting_level: Some(nesting_level),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_run_formatting(mut self, run_formatting: RunFormatting) -> Self {
        self.run_formatting = run_formatting;
        self
    }

    /// Numbering of the list the anchor already belongs to, if the host
    /// managed to extract it.
    #[must_use]
    pub fn existing_numbering(&self) -> Option<(u32, usize)> {
        match (self.is_list_item, self.numbering_id) {
            (true, Some(id)) => Some((id, self.nesting_level.unwrap_or(0))),
            _ => None,
        }
    }

    /// Whether lists and tables may be inserted as markup at this anchor.
    /// Cells of nested tables are re-rendered unpredictably by the host, so
    /// they only receive plain text plus range formatting.
    #[must_use]
    pub fn accepts_structural_markup(&self) -> bool { !(self.is_table_cell && self.is_nested_table) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_numbering_requires_list_item() {
        let context = StructuralContext {
            numbering_id: Some(5),
            ..StructuralContext::default()
        };
        assert_eq!(context.existing_numbering(), None);

        assert_eq!(StructuralContext::list_item(5, 2).existing_numbering(), Some((5, 2)));
    }

    #[test]
    fn test_missing_level_defaults_to_zero() {
        let context = StructuralContext {
            is_list_item: true,
            numbering_id: Some(3),
            ..StructuralContext::default()
        };
        assert_eq!(context.existing_numbering(), Some((3, 0)));
    }

    #[test]
    fn test_nested_table_cells_reject_markup() {
        let plain_cell = StructuralContext {
            is_table_cell: true,
            ..StructuralContext::default()
        };
        assert!(plain_cell.accepts_structural_markup());

        let nested_cell = StructuralContext {
            is_table_cell: true,
            is_nested_table: true,
            ..StructuralContext::default()
        };
        assert!(!nested_cell.accepts_structural_markup());
    }
}
