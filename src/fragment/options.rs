use chrono::{DateTime, SecondsFormat, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_AUTHOR;

/// How fragments are rendered.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Author recorded on every tracked change.
    pub author: String,

    /// Emit insertions and deletions as tracked changes. When disabled the
    /// proposal is applied directly.
    pub generate_tracked_changes: bool,

    /// Date recorded on tracked changes, the build time when unset.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_owned(),
            generate_tracked_changes: true,
            timestamp: None,
        }
    }
}

impl BuildOptions {
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn untracked(mut self) -> Self {
        self.generate_tracked_changes = false;
        self
    }

    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The `w:date` value of tracked changes, e.g. `2024-05-01T09:30:00Z`.
    pub(crate) fn revision_date(&self) -> String {
        self.timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
