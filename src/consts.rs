/// Leading spaces that make up one list nesting level. A tab counts as one
/// full level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Change records closer than this many characters are candidates for
/// coalescing.
pub const DEFAULT_COALESCE_PROXIMITY: usize = 15;

/// A change record side shorter than this many characters is considered a
/// micro-edit worth coalescing.
pub const DEFAULT_COALESCE_SHORTNESS: usize = 20;

/// Longest search string the host's range-search primitive accepts.
pub const DEFAULT_MAX_SEARCH_LEN: usize = 80;

pub const DEFAULT_BULLET_NUMBERING_ID: u32 = 1;
pub const DEFAULT_DECIMAL_NUMBERING_ID: u32 = 2;
pub const DEFAULT_CUSTOM_NUMBERING_BASE: u32 = 1000;

pub const DEFAULT_AUTHOR: &str = "Unattributed";

/// WordprocessingML supports nine list levels, `0..=8`.
pub const MAX_LIST_LEVEL: usize = 8;

/// Indentation of one list level in twentieths of a point.
pub const LIST_INDENT_STEP_TWIPS: u32 = 720;
pub const LIST_HANGING_TWIPS: u32 = 360;

pub const CODE_FONT: &str = "Consolas";
