#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::structural_context::StructuralContext;

/// A single proposed edit to one anchor of the live document.
///
/// `original_text` is the plain text of the anchor as captured by the host,
/// `proposed_content` is the replacement suggested by the model and may
/// contain lightweight markdown (emphasis, lists, tables, headings).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeRequest {
    pub anchor_id: String,
    pub original_text: String,
    pub proposed_content: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub context: StructuralContext,

    /// The user's instruction that led to this change, only used for logging.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instruction: Option<String>,
}

impl ChangeRequest {
    #[must_use]
    pub fn new(
        anchor_id: impl Into<String>,
        original_text: impl Into<String>,
        proposed_content: impl Into<String>,
    ) -> Self {
        Self {
            anchor_id: anchor_id.into(),
            original_text: original_text.into(),
            proposed_content: proposed_content.into(),
            context: StructuralContext::default(),
            instruction: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: StructuralContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }
}
