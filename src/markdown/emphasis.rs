use crate::types::text_format::{FormatSpan, TextFormat};

/// An emphasis delimiter of the inline grammar.
#[derive(Debug)]
struct Marker {
    delimiter: &'static str,
    format: TextFormat,
    /// `_`-based markers only count at word boundaries so that identifiers
    /// like `snake_case_name` are left alone.
    needs_word_boundary: bool,
}

/// The inline grammar in precedence order: when several delimiters start at
/// the same position, the first one that has a matching closing delimiter
/// wins. Bold-italic therefore shadows bold, which shadows italic.
const MARKERS: [Marker; 9] = [
    Marker {
        delimiter: "***",
        format: TextFormat::BOLD_ITALIC,
        needs_word_boundary: false,
    },
    Marker {
        delimiter: "___",
        format: TextFormat::BOLD_ITALIC,
        needs_word_boundary: true,
    },
    Marker {
        delimiter: "**",
        format: TextFormat::BOLD,
        needs_word_boundary: false,
    },
    Marker {
        delimiter: "__",
        format: TextFormat::BOLD,
        needs_word_boundary: true,
    },
    Marker {
        delimiter: "*",
        format: TextFormat::ITALIC,
        needs_word_boundary: false,
    },
    Marker {
        delimiter: "_",
        format: TextFormat::ITALIC,
        needs_word_boundary: true,
    },
    Marker {
        delimiter: "~~",
        format: TextFormat::STRIKETHROUGH,
        needs_word_boundary: false,
    },
    Marker {
        delimiter: "++",
        format: TextFormat::UNDERLINE,
        needs_word_boundary: false,
    },
    Marker {
        delimiter: "`",
        format: TextFormat::CODE,
        needs_word_boundary: false,
    },
];

fn is_marker_char(c: char) -> bool { matches!(c, '*' | '_' | '~' | '+' | '`' | '\\') }

/// Text with its emphasis markers removed, plus the formatting the markers
/// described. Span offsets address `text` in UTF-8 characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineText {
    pub text: String,
    pub spans: Vec<FormatSpan>,
    length: usize,
}

impl InlineText {
    /// Plain text with spans that were computed elsewhere.
    #[must_use]
    pub fn from_parts(text: impl Into<String>, spans: Vec<FormatSpan>) -> Self {
        let text = text.into();
        Self {
            length: text.chars().count(),
            text,
            spans,
        }
    }

    fn push(&mut self, c: char) {
        self.text.push(c);
        self.length += 1;
    }

    fn push_all(&mut self, chars: &[char]) {
        for c in chars {
            self.push(*c);
        }
    }

    /// Number of characters in `text`.
    #[must_use]
    pub fn len(&self) -> usize { self.length }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.length == 0 }

    /// Whether any emphasis marker was found.
    #[must_use]
    pub fn has_formatting(&self) -> bool { !self.spans.is_empty() }

    /// The formatting in effect at every character, innermost span winning.
    #[must_use]
    pub fn format_at(&self, index: usize) -> TextFormat {
        self.spans
            .iter()
            .filter(|span| span.offset <= index && index < span.end())
            .fold(TextFormat::PLAIN, |format, span| format.union(span.format))
    }

    /// Splits the text into maximal runs of identical formatting.
    #[must_use]
    pub fn runs(&self) -> Vec<(String, TextFormat)> {
        let mut runs: Vec<(String, TextFormat)> = Vec::new();

        for (index, c) in self.text.chars().enumerate() {
            let format = self.format_at(index);
            match runs.last_mut() {
                Some((text, last_format)) if *last_format == format => text.push(c),
                _ => runs.push((c.to_string(), format)),
            }
        }

        runs
    }
}

/// Length of the run of `c` starting at `index`.
fn run_length(chars: &[char], index: usize, c: char) -> usize {
    chars[index..].iter().take_while(|other| **other == c).count()
}

fn starts_with(chars: &[char], index: usize, delimiter: &str) -> bool {
    let mut position = index;
    for expected in delimiter.chars() {
        if chars.get(position) != Some(&expected) {
            return false;
        }
        position += 1;
    }
    true
}

fn is_word_char(c: Option<&char>) -> bool { c.is_some_and(|c| c.is_alphanumeric()) }

fn is_punctuation(c: Option<&char>) -> bool { c.is_some_and(|c| c.is_ascii_punctuation()) }

fn is_blank(c: Option<&char>) -> bool { c.is_none_or(|c| c.is_whitespace()) }

/// How a run of delimiter characters sits between its neighbours.
#[derive(Debug, Clone, Copy)]
struct Flanking {
    opens: bool,
    closes: bool,
}

impl Flanking {
    fn of_run(chars: &[char], start: usize, length: usize, marker: &Marker) -> Self {
        let before = start.checked_sub(1).and_then(|i| chars.get(i));
        let after = chars.get(start + length);

        let mut opens =
            !is_blank(after) && (!is_punctuation(after) || is_blank(before) || is_punctuation(before));
        let mut closes =
            !is_blank(before) && (!is_punctuation(before) || is_blank(after) || is_punctuation(after));

        if marker.needs_word_boundary {
            opens &= !is_word_char(before);
            closes &= !is_word_char(after);
        }

        Self { opens, closes }
    }
}

/// Finds the index of the delimiter closing `marker` opened at `open`.
///
/// The enclosed content must be non-empty and must not start with
/// whitespace. Runs of the same delimiter character inside the content open
/// and close nested emphasis: a closing run first pays off the nested
/// openers, innermost first, and whatever is left closes `marker` when it is
/// at least as long as the delimiter. `**a *b***` therefore closes the
/// italic with the first `*` of the final run and the bold with the rest.
fn find_closing(chars: &[char], open: usize, marker: &Marker) -> Option<usize> {
    let delimiter_char = marker.delimiter.chars().next()?;
    let delimiter_length = marker.delimiter.chars().count();
    let content_start = open + delimiter_length;

    if chars.get(content_start).is_none_or(|c| c.is_whitespace()) {
        return None;
    }

    if marker.needs_word_boundary && is_word_char(open.checked_sub(1).and_then(|i| chars.get(i))) {
        return None;
    }

    let nests = marker.format != TextFormat::CODE;
    let mut nested_openers: Vec<usize> = Vec::new();
    let mut index = content_start;

    while index < chars.len() {
        if chars[index] == '\\' && nests {
            index += 2;
            continue;
        }

        if chars[index] != delimiter_char {
            index += 1;
            continue;
        }

        let run = run_length(chars, index, delimiter_char);
        if !nests {
            if run == delimiter_length {
                return Some(index);
            }
            index += run;
            continue;
        }

        let flanking = Flanking::of_run(chars, index, run, marker);
        let mut remaining = run;

        if flanking.closes && index > content_start {
            while remaining > 0 {
                let Some(opener) = nested_openers.last_mut() else {
                    break;
                };

                let used = remaining.min(*opener);
                *opener -= used;
                remaining -= used;
                if *opener == 0 {
                    nested_openers.pop();
                }
            }

            if nested_openers.is_empty() && remaining >= delimiter_length {
                return Some(index + run - remaining);
            }
        } else if flanking.opens {
            nested_openers.push(run);
        }

        index += run;
    }

    None
}

fn scan(chars: &[char], inherited: TextFormat, output: &mut InlineText) {
    let mut index = 0;

    'outer: while index < chars.len() {
        let c = chars[index];

        if c == '\\' && chars.get(index + 1).is_some_and(|next| is_marker_char(*next)) {
            output.push(chars[index + 1]);
            index += 2;
            continue;
        }

        if is_marker_char(c) {
            for marker in &MARKERS {
                if !starts_with(chars, index, marker.delimiter) {
                    continue;
                }

                if let Some(close) = find_closing(chars, index, marker) {
                    let delimiter_length = marker.delimiter.chars().count();
                    let content = &chars[index + delimiter_length..close];
                    let format = inherited.union(marker.format);
                    let start = output.len();

                    if marker.format.code {
                        output.push_all(content);
                    } else {
                        scan(content, format, output);
                    }

                    output
                        .spans
                        .push(FormatSpan::new(start, output.len() - start, format));

                    index = close + delimiter_length;
                    continue 'outer;
                }
            }

            // An unmatched run of marker characters is literal text.
            let run = run_length(chars, index, c);
            output.push_all(&chars[index..index + run]);
            index += run;
            continue;
        }

        output.push(c);
        index += 1;
    }
}

/// Strips inline emphasis markers from `source` with a recursive-descent scan
/// over a fixed delimiter grammar:
///
/// | markup                   | format        |
/// |--------------------------|---------------|
/// | `***x***`, `___x___`     | bold + italic |
/// | `**x**`, `__x__`         | bold          |
/// | `*x*`, `_x_`             | italic        |
/// | `~~x~~`                  | strikethrough |
/// | `++x++`                  | underline     |
/// | `` `x` ``                | code          |
///
/// One span is reported per matched delimiter pair. Nested pairs report the
/// combined format of everything enclosing them. Backslash-escaped marker
/// characters and unmatched delimiters are kept as literal text, and nothing
/// inside a code span is interpreted.
///
/// ```
/// use redline_text::{TextFormat, parse_inline};
///
/// let parsed = parse_inline("Tenant shall **promptly** pay");
/// assert_eq!(parsed.text, "Tenant shall promptly pay");
/// assert_eq!(parsed.spans[0].offset, 13);
/// assert_eq!(parsed.spans[0].format, TextFormat::BOLD);
/// ```
#[must_use]
pub fn parse_inline(source: &str) -> InlineText {
    let chars = source.chars().collect::<Vec<_>>();
    let mut output = InlineText {
        text: String::with_capacity(source.len()),
        ..InlineText::default()
    };

    scan(&chars, TextFormat::PLAIN, &mut output);

    output
        .spans
        .sort_by_key(|span| (span.offset, std::cmp::Reverse(span.length)));

    output
}
