#[cfg(feature = "serde")]
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::errors::ReconcileError;
use crate::consts::{
    DEFAULT_BULLET_NUMBERING_ID, DEFAULT_COALESCE_PROXIMITY, DEFAULT_COALESCE_SHORTNESS,
    DEFAULT_CUSTOM_NUMBERING_BASE, DEFAULT_DECIMAL_NUMBERING_ID, DEFAULT_INDENT_WIDTH,
    DEFAULT_MAX_SEARCH_LEN,
};

/// Tunable constants of the reconciliation engine.
///
/// The defaults match the word-processing host the engine was built against:
/// four spaces per list level and an 80 character limit on range searches.
/// Other hosts may need different values, which is why they are not
/// hard-coded.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePolicy {
    #[cfg_attr(feature = "serde", serde(default = "default_indent_width"))]
    pub indent_width: usize,

    #[cfg_attr(feature = "serde", serde(default = "default_coalesce_proximity"))]
    pub coalesce_proximity: usize,

    #[cfg_attr(feature = "serde", serde(default = "default_coalesce_shortness"))]
    pub coalesce_shortness: usize,

    #[cfg_attr(feature = "serde", serde(default = "default_max_search_len"))]
    pub max_search_len: usize,

    #[cfg_attr(feature = "serde", serde(default = "default_bullet_numbering_id"))]
    pub bullet_numbering_id: u32,

    #[cfg_attr(feature = "serde", serde(default = "default_decimal_numbering_id"))]
    pub decimal_numbering_id: u32,

    #[cfg_attr(feature = "serde", serde(default = "default_custom_numbering_base"))]
    pub custom_numbering_base: u32,
}

#[cfg(feature = "serde")]
fn default_indent_width() -> usize {
    debug!("Using default indent width: {DEFAULT_INDENT_WIDTH}");
    DEFAULT_INDENT_WIDTH
}

#[cfg(feature = "serde")]
fn default_coalesce_proximity() -> usize {
    debug!("Using default coalesce proximity: {DEFAULT_COALESCE_PROXIMITY}");
    DEFAULT_COALESCE_PROXIMITY
}

#[cfg(feature = "serde")]
fn default_coalesce_shortness() -> usize {
    debug!("Using default coalesce shortness: {DEFAULT_COALESCE_SHORTNESS}");
    DEFAULT_COALESCE_SHORTNESS
}

#[cfg(feature = "serde")]
fn default_max_search_len() -> usize {
    debug!("Using default max search length: {DEFAULT_MAX_SEARCH_LEN}");
    DEFAULT_MAX_SEARCH_LEN
}

#[cfg(feature = "serde")]
fn default_bullet_numbering_id() -> u32 {
    debug!("Using default bullet numbering id: {DEFAULT_BULLET_NUMBERING_ID}");
    DEFAULT_BULLET_NUMBERING_ID
}

#[cfg(feature = "serde")]
fn default_decimal_numbering_id() -> u32 {
    debug!("Using default decimal numbering id: {DEFAULT_DECIMAL_NUMBERING_ID}");
    DEFAULT_DECIMAL_NUMBERING_ID
}

#[cfg(feature = "serde")]
fn default_custom_numbering_base() -> u32 {
    debug!("Using default custom numbering base: {DEFAULT_CUSTOM_NUMBERING_BASE}");
    DEFAULT_CUSTOM_NUMBERING_BASE
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            coalesce_proximity: DEFAULT_COALESCE_PROXIMITY,
            coalesce_shortness: DEFAULT_COALESCE_SHORTNESS,
            max_search_len: DEFAULT_MAX_SEARCH_LEN,
            bullet_numbering_id: DEFAULT_BULLET_NUMBERING_ID,
            decimal_numbering_id: DEFAULT_DECIMAL_NUMBERING_ID,
            custom_numbering_base: DEFAULT_CUSTOM_NUMBERING_BASE,
        }
    }
}

impl ReconcilePolicy {
    /// Parse a policy from YAML. Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidPolicy` if the document is not valid
    /// YAML or a value has the wrong type.
    #[cfg(feature = "serde")]
    pub fn from_yaml_str(contents: &str) -> Result<Self, ReconcileError> {
        serde_yaml::from_str(contents).map_err(|error| ReconcileError::InvalidPolicy(error.to_string()))
    }

    /// Number of nesting levels represented by `leading_whitespace`.
    #[must_use]
    pub fn nesting_level(&self, leading_whitespace: &str) -> usize {
        let width = self.indent_width.max(1);
        let columns: usize = leading_whitespace
            .chars()
            .map(|c| if c == '\t' { width } else { 1 })
            .sum();

        columns / width
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("", 0 ; "no indent")]
    #[test_case("   ", 0 ; "three spaces")]
    #[test_case("    ", 1 ; "four spaces")]
    #[test_case("       ", 1 ; "seven spaces")]
    #[test_case("        ", 2 ; "eight spaces")]
    #[test_case("\t", 1 ; "tab")]
    #[test_case("\t    ", 2 ; "tab and spaces")]
    fn test_nesting_level(whitespace: &str, expected: usize) {
        assert_eq!(ReconcilePolicy::default().nesting_level(whitespace), expected);
    }

    #[test]
    fn test_custom_indent_width() {
        let policy = ReconcilePolicy {
            indent_width: 2,
            ..ReconcilePolicy::default()
        };

        assert_eq!(policy.nesting_level("    "), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_yaml_uses_defaults() {
        let policy = ReconcilePolicy::from_yaml_str("indentWidth: 2\nmaxSearchLen: 255\n").unwrap();

        assert_eq!(policy.indent_width, 2);
        assert_eq!(policy.max_search_len, 255);
        assert_eq!(policy.coalesce_proximity, DEFAULT_COALESCE_PROXIMITY);
    }

    #[test]
    fn test_default_is_built_from_constants() {
        let policy = ReconcilePolicy::default();

        assert_eq!(policy.indent_width, 4);
        assert_eq!(policy.coalesce_proximity, 15);
        assert_eq!(policy.coalesce_shortness, 20);
        assert_eq!(policy.max_search_len, 80);
        assert_eq!((policy.bullet_numbering_id, policy.decimal_numbering_id), (1, 2));
        assert_eq!(policy.custom_numbering_base, 1000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_empty_yaml_matches_default() {
        assert_eq!(ReconcilePolicy::from_yaml_str("{}").unwrap(), ReconcilePolicy::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            ReconcilePolicy::from_yaml_str("indentWidth: [1, 2]"),
            Err(ReconcileError::InvalidPolicy(_))
        ));
    }
}
