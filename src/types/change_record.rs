use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{errors::ReconcileError, utils::string_builder::StringBuilder};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Replace,
    Insert,
    Delete,
}

/// A single word-level edit of the original text. `offset` and `length`
/// address the original text in UTF-8 characters; `old_text` is the addressed
/// slice kept around for rendering deletions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub offset: usize,
    pub length: usize,
    pub old_text: String,
    pub new_text: String,
}

impl ChangeRecord {
    #[must_use]
    pub fn replace(offset: usize, old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        let old_text = old_text.into();
        Self {
            kind: ChangeKind::Replace,
            offset,
            length: old_text.chars().count(),
            old_text,
            new_text: new_text.into(),
        }
    }

    #[must_use]
    pub fn insert(offset: usize, new_text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Insert,
            offset,
            length: 0,
            old_text: String::new(),
            new_text: new_text.into(),
        }
    }

    #[must_use]
    pub fn delete(offset: usize, old_text: impl Into<String>) -> Self {
        let old_text = old_text.into();
        Self {
            kind: ChangeKind::Delete,
            offset,
            length: old_text.chars().count(),
            old_text,
            new_text: String::new(),
        }
    }

    /// First original character index after the record.
    #[must_use]
    pub fn end(&self) -> usize { self.offset + self.length }

    #[must_use]
    pub fn new_text_length(&self) -> usize { self.new_text.chars().count() }

    /// Merges `self` with a later record, folding the untouched original text
    /// between them into both the deleted and the inserted side. The result
    /// is always a `Replace`.
    #[must_use]
    pub fn coalesce(self, next: ChangeRecord, gap_text: &str) -> ChangeRecord {
        debug_assert!(
            self.end() + gap_text.chars().count() == next.offset,
            "The gap text must exactly cover the original text between the records"
        );

        ChangeRecord::replace(
            self.offset,
            self.old_text + gap_text + &next.old_text,
            self.new_text + gap_text + &next.new_text,
        )
    }
}

impl Display for ChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ChangeKind::Replace => write!(
                f,
                "<replace '{}' with '{}' at {}>",
                self.old_text.replace('\n', "\\n"),
                self.new_text.replace('\n', "\\n"),
                self.offset
            ),
            ChangeKind::Insert => write!(
                f,
                "<insert '{}' at {}>",
                self.new_text.replace('\n', "\\n"),
                self.offset
            ),
            ChangeKind::Delete => write!(
                f,
                "<delete '{}' at {}>",
                self.old_text.replace('\n', "\\n"),
                self.offset
            ),
        }
    }
}

/// Applies non-overlapping `records` (in ascending offset order) to
/// `original` and returns the edited text.
///
/// # Errors
///
/// Fails if a record reaches past the end of `original` or overlaps the
/// previous one.
pub fn apply_records(original: &str, records: &[ChangeRecord]) -> Result<String, ReconcileError> {
    let original_length = original.chars().count();
    let mut builder = StringBuilder::new(original);
    let mut cursor = 0;

    for record in records {
        if record.offset < cursor {
            return Err(ReconcileError::OverlappingRecords {
                position: record.offset,
            });
        }

        if record.end() > original_length {
            return Err(ReconcileError::LengthExceedsOriginal {
                position: record.offset,
                requested: record.length,
                available: original_length.saturating_sub(record.offset),
            });
        }

        builder.retain(record.offset - cursor);
        builder.delete(record.length);
        builder.insert(&record.new_text);
        cursor = record.end();
    }

    builder.retain(original_length - cursor);

    Ok(builder.take())
}
