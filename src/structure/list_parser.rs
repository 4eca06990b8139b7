use std::sync::LazyLock;

use log::trace;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{markdown::blocks::match_block_line, policy::ReconcilePolicy};

/// Unified marker grammar: bullets, dotted multi-level numbering, plain
/// numbers, roman numerals and single letters, each followed by whitespace.
static LIST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>[ \t]*)(?P<marker>[-*•+]|\d+(?:\.\d+)+\.?|\d+[.)]|[ivxlcdm]{2,}[.)]|[IVXLCDM]{2,}[.)]|[a-zA-Z][.)])[ \t]+(?P<text>\S.*)$",
    )
    .expect("list marker pattern is valid")
});

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListType {
    Numbered,
    Bullet,
}

/// How the items of a list are labelled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberStyle {
    Bullet,
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
    /// Dotted multi-level numbering such as `1.2.3.`
    Outline,
}

impl NumberStyle {
    /// Infers the style from a literal marker such as `-`, `3.`, `b)` or
    /// `iv.`. A lone `i` or `I` is read as a roman numeral.
    #[must_use]
    pub fn of_marker(marker: &str) -> Self {
        let label = marker.trim_end_matches(['.', ')']);

        if matches!(label, "-" | "*" | "•" | "+") {
            return NumberStyle::Bullet;
        }

        if label.chars().all(|c| c.is_ascii_digit()) {
            return NumberStyle::Decimal;
        }

        if label.contains('.') {
            return NumberStyle::Outline;
        }

        let is_lower = label.chars().all(|c| c.is_ascii_lowercase());
        let is_roman = label.len() > 1 || matches!(label, "i" | "I");

        match (is_roman, is_lower) {
            (true, true) => NumberStyle::LowerRoman,
            (true, false) => NumberStyle::UpperRoman,
            (false, true) => NumberStyle::LowerLetter,
            (false, false) => NumberStyle::UpperLetter,
        }
    }

    /// Whether the host is guaranteed to have a numbering definition for
    /// this style.
    #[must_use]
    pub fn is_built_in(self) -> bool { matches!(self, NumberStyle::Bullet | NumberStyle::Decimal) }

    /// The `w:numFmt` value of the style.
    #[must_use]
    pub fn num_fmt(self) -> &'static str {
        match self {
            NumberStyle::Bullet => "bullet",
            NumberStyle::Decimal | NumberStyle::Outline => "decimal",
            NumberStyle::LowerLetter => "lowerLetter",
            NumberStyle::UpperLetter => "upperLetter",
            NumberStyle::LowerRoman => "lowerRoman",
            NumberStyle::UpperRoman => "upperRoman",
        }
    }

    /// The value a marker of this style stands for, e.g. 3 for `c)` or 4
    /// for `iv.`. Outline markers report their first component.
    #[must_use]
    pub fn marker_value(self, marker: &str) -> Option<u32> {
        let label = marker.trim_end_matches(['.', ')']);

        match self {
            NumberStyle::Bullet => None,
            NumberStyle::Decimal => label.parse().ok(),
            NumberStyle::Outline => label.split('.').next()?.parse().ok(),
            NumberStyle::LowerLetter | NumberStyle::UpperLetter => {
                let c = label.chars().next()?.to_ascii_lowercase();
                Some(u32::from(c) - u32::from('a') + 1)
            }
            NumberStyle::LowerRoman | NumberStyle::UpperRoman => roman_value(label),
        }
    }
}

fn roman_value(label: &str) -> Option<u32> {
    let digits = label
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            'i' => Some(1),
            'v' => Some(5),
            'x' => Some(10),
            'l' => Some(50),
            'c' => Some(100),
            'd' => Some(500),
            'm' => Some(1000),
            _ => None,
        })
        .collect::<Option<Vec<u32>>>()?;

    let mut total = 0;
    for (index, digit) in digits.iter().enumerate() {
        match digits.get(index + 1) {
            Some(next) if next > digit => total -= i64::from(*digit),
            _ => total += i64::from(*digit),
        }
    }

    u32::try_from(total).ok().filter(|value| *value > 0)
}

/// Whether a parsed line carried a list marker.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItemKind {
    Item,
    /// An unmarked line kept so that line counts survive reconciliation.
    Text,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Item content without its marker. Inline emphasis is left in place.
    pub text: String,
    pub level: usize,
    pub kind: ListItemKind,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListModel {
    pub list_type: ListType,
    pub number_style: NumberStyle,
    /// Value of the first numbered marker, 1 for bullet lists.
    pub start: u32,
    pub items: Vec<ListItem>,
}

impl ListModel {
    #[must_use]
    pub fn len(&self) -> usize { self.items.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

/// A single line that matched the marker grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListLine<'a> {
    pub level: usize,
    pub marker: &'a str,
    pub text: &'a str,
}

pub(crate) fn match_list_line<'a>(line: &'a str, policy: &ReconcilePolicy) -> Option<ListLine<'a>> {
    let captures = LIST_LINE.captures(line)?;

    Some(ListLine {
        level: policy.nesting_level(captures.name("indent")?.as_str()),
        marker: captures.name("marker")?.as_str(),
        text: captures.name("text")?.as_str().trim_end(),
    })
}

/// Parses markdown list syntax into a [`ListModel`].
///
/// Every non-blank line becomes an item. Lines without a marker are kept as
/// [`ListItemKind::Text`] items. The content is only considered a list when
/// at least one line is marked and marked lines are not outnumbered by
/// unmarked ones, and never when a line is a heading, a rule, a quote or a
/// code fence. Nesting level is the number of leading indent widths
/// (four columns by default, a tab counting as one width), measured from the
/// least indented line so that an indented snippet still starts at level 0.
///
/// ```
/// use redline_text::{ReconcilePolicy, parse_list};
///
/// let list = parse_list("    - a\n        - b", &ReconcilePolicy::default()).unwrap();
/// let levels = list.items.iter().map(|item| item.level).collect::<Vec<_>>();
/// assert_eq!(levels, vec![0, 1]);
/// ```
#[must_use]
pub fn parse_list(content: &str, policy: &ReconcilePolicy) -> Option<ListModel> {
    let mut items = Vec::new();
    let mut first_marker = None;
    let mut marked = 0_usize;

    for line in content.lines().filter(|line| !line.trim().is_empty()) {
        if match_block_line(line).is_some() {
            trace!("Block markup rules out a list: {line}");
            return None;
        }

        if let Some(list_line) = match_list_line(line, policy) {
            marked += 1;
            first_marker.get_or_insert(list_line.marker);
            items.push(ListItem {
                text: list_line.text.to_owned(),
                level: list_line.level,
                kind: ListItemKind::Item,
            });
        } else {
            let indent = &line[..line.len() - line.trim_start().len()];
            items.push(ListItem {
                text: line.trim().to_owned(),
                level: policy.nesting_level(indent),
                kind: ListItemKind::Text,
            });
        }
    }

    let first_marker = first_marker?;
    if marked < items.len() - marked {
        trace!("Only {marked} of {} lines carry a list marker", items.len());
        return None;
    }

    let base_level = items.iter().map(|item| item.level).min().unwrap_or(0);
    for item in &mut items {
        item.level -= base_level;
    }

    let number_style = NumberStyle::of_marker(first_marker);

    Some(ListModel {
        list_type: if number_style == NumberStyle::Bullet {
            ListType::Bullet
        } else {
            ListType::Numbered
        },
        number_style,
        start: number_style.marker_value(first_marker).unwrap_or(1),
        items,
    })
}
