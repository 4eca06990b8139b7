use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Character-level emphasis expressible with markdown markers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct TextFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

impl TextFormat {
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        underline: false,
        strikethrough: false,
        code: false,
    };
    pub const BOLD: Self = Self {
        bold: true,
        ..Self::PLAIN
    };
    pub const ITALIC: Self = Self {
        italic: true,
        ..Self::PLAIN
    };
    pub const BOLD_ITALIC: Self = Self {
        bold: true,
        italic: true,
        ..Self::PLAIN
    };
    pub const UNDERLINE: Self = Self {
        underline: true,
        ..Self::PLAIN
    };
    pub const STRIKETHROUGH: Self = Self {
        strikethrough: true,
        ..Self::PLAIN
    };
    pub const CODE: Self = Self {
        code: true,
        ..Self::PLAIN
    };

    /// Combines two formats, e.g. italic text inside a bold span.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
            code: self.code || other.code,
        }
    }

    #[must_use]
    pub fn is_plain(&self) -> bool { *self == Self::PLAIN }
}

impl Display for TextFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            (self.bold, "bold"),
            (self.italic, "italic"),
            (self.underline, "underline"),
            (self.strikethrough, "strikethrough"),
            (self.code, "code"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect::<Vec<_>>();

        if names.is_empty() {
            write!(f, "plain")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

/// A formatted range of the markdown-stripped text. Offsets and lengths are
/// counted in UTF-8 characters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpan {
    pub offset: usize,
    pub length: usize,
    pub format: TextFormat,
}

impl FormatSpan {
    #[must_use]
    pub fn new(offset: usize, length: usize, format: TextFormat) -> Self {
        Self {
            offset,
            length,
            format,
        }
    }

    #[must_use]
    pub fn end(&self) -> usize { self.offset + self.length }

    #[must_use]
    pub fn with_shifted_offset(self, shift: usize) -> Self {
        Self {
            offset: self.offset + shift,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_union() {
        assert_eq!(TextFormat::BOLD.union(TextFormat::ITALIC), TextFormat::BOLD_ITALIC);
        assert_eq!(TextFormat::PLAIN.union(TextFormat::CODE), TextFormat::CODE);
        assert!(TextFormat::PLAIN.union(TextFormat::PLAIN).is_plain());
    }

    #[test]
    fn test_display() {
        assert_eq!(TextFormat::PLAIN.to_string(), "plain");
        assert_eq!(TextFormat::BOLD_ITALIC.to_string(), "bold+italic");
        assert_eq!(
            TextFormat::UNDERLINE.union(TextFormat::STRIKETHROUGH).to_string(),
            "underline+strikethrough"
        );
    }
}
