//! Reconciles LLM-proposed edits with the live text of a word-processing
//! document.
//!
//! A proposal arrives as lightweight markdown targeting one anchor (a
//! paragraph, run or table cell). [`reconcile_change`] decides how to express
//! it with the fewest, most readable tracked changes: a word-level patch,
//! a formatting-only restyle, a reconciled list or table, or a whole
//! replacement as the last resort. The result is a [`Fragment`] of
//! WordprocessingML plus everything a host needs to apply it natively.
//!
//! ```
//! use redline_text::{ChangeRequest, Reconciler, Strategy};
//!
//! let reconciler = Reconciler::default();
//! let fragment = reconciler.reconcile(&ChangeRequest::new(
//!     "p7",
//!     "Tenant shall pay rent.",
//!     "Tenant shall pay **rent**.",
//! ));
//!
//! assert_eq!(fragment.strategy_used, Some(Strategy::FormatOnly));
//! ```

mod consts;
mod diffs;
mod errors;
mod fragment;
mod markdown;
mod policy;
mod router;
mod structure;
mod tokenizer;
mod types;
mod utils;
mod word_diff;

pub use errors::ReconcileError;
pub use fragment::{
    FragmentPayload, build,
    native::{SearchAnchor, format_instructions},
    options::BuildOptions,
    validate::validate_markup,
};
pub use markdown::{
    blocks::{Block, BlockKind, has_block_markup, split_blocks},
    classifier::{FormattingClassification, classify},
    emphasis::{InlineText, parse_inline},
    preprocess::{PreprocessedText, preprocess},
};
pub use policy::ReconcilePolicy;
pub use router::{Reconciler, reconcile_change};
pub use structure::{
    list_parser::{ListItem, ListItemKind, ListModel, ListType, NumberStyle, parse_list},
    numbering::{NumberingDefinition, NumberingPlan, derive_numbering_plan},
    reconciliation_plan::{PlannedStep, ReconciliationPlan},
    table_parser::{TableModel, parse_table},
};
pub use types::{
    change_record::{ChangeKind, ChangeRecord, apply_records},
    change_request::ChangeRequest,
    fragment::{Fragment, NativeFormatInstruction, Strategy, StructuralEdit},
    structural_context::{RunFormatting, StructuralContext},
    text_format::{FormatSpan, TextFormat},
};
pub use word_diff::{coalesce_records, diff};

#[cfg(feature = "wasm")]
pub mod wasm;
