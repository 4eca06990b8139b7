use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{
    change_record::ChangeRecord,
    text_format::{FormatSpan, TextFormat},
};

/// The way a change ended up being expressed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    TextPatch,
    FormatOnly,
    ListFragment,
    TableFragment,
    FullTextReplace,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::TextPatch => write!(f, "TextPatch"),
            Strategy::FormatOnly => write!(f, "FormatOnly"),
            Strategy::ListFragment => write!(f, "ListFragment"),
            Strategy::TableFragment => write!(f, "TableFragment"),
            Strategy::FullTextReplace => write!(f, "FullTextReplace"),
        }
    }
}

/// Instruction for the host's native "search a range, then style it"
/// primitive. `occurrence` is the zero-based index of the match to style when
/// `search_text` appears several times in the anchor.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeFormatInstruction {
    pub search_text: String,
    pub occurrence: usize,
    pub format: TextFormat,
}

/// One step of a list or table reconciliation. Steps are emitted in the
/// order the host has to execute them: every `Rewrite` first, then every
/// `Append`, then the `Delete`s from the last item towards the first.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralEdit {
    /// Replace the content of the existing item at `index`.
    Rewrite { index: usize, markup: String },
    /// Insert a new item so that it ends up at `index`.
    Append { index: usize, markup: String },
    /// Remove the existing item at `index`.
    Delete { index: usize, markup: String },
}

impl StructuralEdit {
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            StructuralEdit::Rewrite { index, .. }
            | StructuralEdit::Append { index, .. }
            | StructuralEdit::Delete { index, .. } => *index,
        }
    }
}

/// The only output of the engine, created fresh for every change request.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub has_changes: bool,
    pub strategy_used: Option<Strategy>,

    /// WordprocessingML to insert in place of the anchor's content: inline
    /// runs for `TextPatch` and `FormatOnly`, block content otherwise.
    pub markup: String,

    /// `w:abstractNum` and `w:num` definitions the markup refers to, when a
    /// list needs numbering the host is not guaranteed to have.
    pub numbering_markup: Option<String>,

    /// The host should apply the change through its native text and range
    /// formatting primitives instead of inserting `markup`.
    pub uses_native_api_fallback: bool,

    /// Markdown-stripped text for the native path.
    pub plain_text: Option<String>,
    pub format_hints: Vec<FormatSpan>,
    pub native_instructions: Vec<NativeFormatInstruction>,

    pub records: Vec<ChangeRecord>,
    pub structural_edits: Vec<StructuralEdit>,
}

impl Fragment {
    /// A fragment describing that nothing needs to change.
    #[must_use]
    pub fn unchanged() -> Self { Self::default() }

    #[must_use]
    pub(crate) fn with_markup(strategy: Strategy, markup: String) -> Self {
        Self {
            has_changes: true,
            strategy_used: Some(strategy),
            markup,
            ..Self::default()
        }
    }
}
