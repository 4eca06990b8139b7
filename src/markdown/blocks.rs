use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?P<hashes>#{1,6})[ \t]+(?P<text>.*?)(?:[ \t]+#+)?[ \t]*$").expect("heading pattern is valid")
});
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").expect("rule pattern is valid")
});
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}>[ \t]?(?P<text>.*)$").expect("quote pattern is valid"));
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}(?:```|~~~)").expect("fence pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// ATX heading of level 1 to 6.
    Heading(u8),
    Rule,
    Quote,
    Code,
}

/// A paragraph-level piece of markdown. `text` still carries inline
/// emphasis, except for code blocks whose text is verbatim. Lines of one
/// block are separated by `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A line that is block markup on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockLine<'a> {
    Heading { level: u8, text: &'a str },
    Rule,
    Quote(&'a str),
    Fence,
}

pub(crate) fn match_block_line(line: &str) -> Option<BlockLine<'_>> {
    if let Some(captures) = HEADING.captures(line) {
        let level = u8::try_from(captures.name("hashes")?.as_str().len()).ok()?;
        return Some(BlockLine::Heading {
            level,
            text: captures.name("text")?.as_str(),
        });
    }

    if FENCE.is_match(line) {
        return Some(BlockLine::Fence);
    }

    if RULE.is_match(line) {
        return Some(BlockLine::Rule);
    }

    QUOTE
        .captures(line)
        .and_then(|captures| captures.name("text"))
        .map(|text| BlockLine::Quote(text.as_str()))
}

/// Lines collected for the block currently being read.
#[derive(Debug)]
struct PendingBlock<'a> {
    kind: BlockKind,
    lines: Vec<&'a str>,
}

#[derive(Debug, Default)]
struct BlockSplitter<'a> {
    blocks: Vec<Block>,
    pending: Option<PendingBlock<'a>>,
}

impl<'a> BlockSplitter<'a> {
    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.blocks.push(Block::new(pending.kind, pending.lines.join("\n")));
        }
    }

    fn push_line(&mut self, kind: BlockKind, line: &'a str) {
        match &mut self.pending {
            Some(pending) if pending.kind == kind => pending.lines.push(line),
            _ => {
                self.flush();
                self.pending = Some(PendingBlock {
                    kind,
                    lines: vec![line],
                });
            }
        }
    }

    fn push_block(&mut self, block: Block) {
        self.flush();
        self.blocks.push(block);
    }
}

/// Splits markdown into blocks. Headings and rules always stand alone,
/// consecutive quote lines form one block, fenced code is kept verbatim and
/// blank lines separate paragraphs.
#[must_use]
pub fn split_blocks(content: &str) -> Vec<Block> {
    let mut splitter = BlockSplitter::default();
    let mut in_fence = false;

    for line in content.lines() {
        if in_fence {
            if FENCE.is_match(line) {
                in_fence = false;
                splitter.flush();
            } else {
                splitter.push_line(BlockKind::Code, line);
            }
            continue;
        }

        match match_block_line(line) {
            Some(BlockLine::Heading { level, text }) => splitter.push_block(Block::new(BlockKind::Heading(level), text)),
            Some(BlockLine::Rule) => splitter.push_block(Block::new(BlockKind::Rule, "")),
            Some(BlockLine::Fence) => {
                splitter.flush();
                in_fence = true;
            }
            Some(BlockLine::Quote(text)) => splitter.push_line(BlockKind::Quote, text),
            None if line.trim().is_empty() => splitter.flush(),
            None => splitter.push_line(BlockKind::Paragraph, line.trim_end()),
        }
    }

    splitter.flush();
    splitter.blocks
}

/// Whether `content` contains block structure that cannot be expressed as a
/// word-level patch of a single paragraph: headings, rules, quotes, code
/// fences, or several blank-line separated paragraphs.
#[must_use]
pub fn has_block_markup(content: &str) -> bool {
    let mut paragraphs = 0;
    let mut in_paragraph = false;

    for line in content.lines() {
        if match_block_line(line).is_some() {
            return true;
        }

        let is_blank = line.trim().is_empty();
        if !is_blank && !in_paragraph {
            paragraphs += 1;
        }
        in_paragraph = !is_blank;
    }

    paragraphs > 1
}
