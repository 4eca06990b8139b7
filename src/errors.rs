use thiserror::Error;

use crate::types::fragment::Strategy;

/// Everything that can make a single reconciliation strategy fail. These
/// errors never leave the router; they only decide which strategy is tried
/// next.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    /// A change record references a range that exceeds the original text
    #[error(
        "Invalid change record: attempting to access {requested} characters starting at \
         position {position}, but original text only has {available} characters remaining"
    )]
    LengthExceedsOriginal {
        /// The position where the record starts
        position: usize,
        /// The number of characters requested
        requested: usize,
        /// The number of characters available from the position
        available: usize,
    },

    #[error("Change record starting at {position} overlaps the previous record")]
    OverlappingRecords { position: usize },

    #[error("{strategy} does not apply: {reason}")]
    NotApplicable {
        strategy: Strategy,
        reason: &'static str,
    },

    #[error("The word diff produced no change records even though the texts differ")]
    NoChangesDetected,

    #[error("Applying the change records produced `{produced}` instead of `{expected}`")]
    PatchMismatch { expected: String, produced: String },

    #[error("Generated markup is not well-formed: {0}")]
    InvalidMarkup(String),

    #[error("Generated markup leaves {open} element(s) unclosed")]
    UnbalancedMarkup { open: usize },

    #[error("Generated markup violates the tracked-change schema: {0}")]
    SchemaViolation(String),

    #[cfg(feature = "serde")]
    #[error("Failed to parse reconciliation policy: {0}")]
    InvalidPolicy(String),
}

impl ReconcileError {
    pub(crate) fn not_applicable(strategy: Strategy, reason: &'static str) -> Self {
        ReconcileError::NotApplicable { strategy, reason }
    }
}
