//! Word wrapping for help texts
//!
//! Help is wrapped before it reaches a [`FormattedWriter`](crate::domain::ports::FormattedWriter),
//! writers only add comment prefixes and headings.
//!
//! Text is split into paragraphs at blank lines. Inside a paragraph,
//! consecutive lines are joined and rewrapped, except for list items
//! (`- ` or `* `) which start a new line with a hanging indent, and
//! indented lines which are kept as they are.

use textwrap::{Options, WordSeparator, WordSplitter, WrapAlgorithm};
use unicode_width::UnicodeWidthStr;

/// Width of help texts, leaves room for the comment prefix in an 80 column terminal
pub const DEFAULT_WIDTH: usize = 78;

const SECTION_INDENT: usize = 2;

#[derive(Debug, Clone)]
enum Block {
    Text { indent: usize, text: String },
    Item { indent: usize, bullet: String, text: String },
    Heading { indent: usize, text: String },
}

/// Collects text, list items and sections and renders them wrapped to a width
#[derive(Debug, Clone)]
pub struct HelpFormatter {
    width: usize,
    indent: usize,
    blocks: Vec<Block>,
}

impl Default for HelpFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl HelpFormatter {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            indent: 0,
            blocks: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn add_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.blocks.push(Block::Text {
            indent: self.indent,
            text: strip_indentation(text),
        });
    }

    /// A paragraph starting with `bullet`, continuation lines are indented by its width
    pub fn add_item(&mut self, bullet: &str, text: &str) {
        self.blocks.push(Block::Item {
            indent: self.indent,
            bullet: bullet.to_string(),
            text: strip_indentation(text),
        });
    }

    /// Start a section, everything until [`add_end_section`](Self::add_end_section) is indented
    pub fn add_start_section(&mut self, heading: &str) {
        self.blocks.push(Block::Heading {
            indent: self.indent,
            text: format!("{heading}:"),
        });
        self.indent += SECTION_INDENT;
    }

    pub fn add_end_section(&mut self) {
        self.indent = self.indent.saturating_sub(SECTION_INDENT);
    }

    /// Render everything added so far, ends with a newline unless empty
    pub fn format_help(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut prev: Option<&Block> = None;
        for block in &self.blocks {
            let separate = match (prev, block) {
                (None, _) => false,
                (Some(Block::Heading { .. }), _) => false,
                (Some(Block::Item { .. }), Block::Item { .. }) => false,
                _ => true,
            };
            if separate {
                lines.push(String::new());
            }
            match block {
                Block::Text { indent, text } => {
                    lines.extend(fill_text(text, self.width, *indent));
                }
                Block::Item { indent, bullet, text } => {
                    let first = format!("{}{}", " ".repeat(*indent), bullet);
                    let rest = " ".repeat(indent + bullet.width());
                    lines.extend(wrap_lines(&join_paragraph(text), self.width, &first, &rest));
                }
                Block::Heading { indent, text } => {
                    lines.push(format!("{}{}", " ".repeat(*indent), text));
                }
            }
            prev = Some(block);
        }

        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Wrap a standalone text without adding it to this formatter
    pub fn format_text(&self, text: &str) -> String {
        let mut out = fill_text(&strip_indentation(text), self.width, 0).join("\n");
        out.push('\n');
        out
    }

    /// Wrap a standalone list item without adding it to this formatter
    pub fn format_item(&self, bullet: &str, text: &str) -> String {
        let rest = " ".repeat(bullet.width());
        let mut out = wrap_lines(&join_paragraph(&strip_indentation(text)), self.width, bullet, &rest).join("\n");
        out.push('\n');
        out
    }
}

/// Remove the indentation common to all non-blank lines and surrounding blank lines
pub(crate) fn strip_indentation(text: &str) -> String {
    textwrap::dedent(text).trim_matches('\n').to_string()
}

fn is_list_item(line: &str) -> bool {
    line.starts_with("- ") || line.starts_with("* ")
}

fn fill_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    let mut out = Vec::new();
    for (i, paragraph) in text.split("\n\n").enumerate() {
        if i > 0 {
            out.push(String::new());
        }
        for unit in paragraph_units(paragraph) {
            match unit {
                Unit::Verbatim(line) => out.push(format!("{pad}{line}")),
                Unit::Flow(line) => {
                    let (first, rest) = if is_list_item(&line) {
                        (pad.clone(), format!("{pad}  "))
                    } else {
                        (pad.clone(), pad.clone())
                    };
                    out.extend(wrap_lines(&line, width, &first, &rest));
                }
            }
        }
    }
    out
}

enum Unit {
    Flow(String),
    Verbatim(String),
}

fn paragraph_units(paragraph: &str) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    for line in paragraph.lines() {
        if line.starts_with(char::is_whitespace) {
            units.push(Unit::Verbatim(line.trim_end().to_string()));
            continue;
        }
        match units.last_mut() {
            Some(Unit::Flow(prev)) if !is_list_item(line) && !prev.ends_with('\\') => {
                prev.push(' ');
                prev.push_str(line.trim());
            }
            _ => units.push(Unit::Flow(line.trim().to_string())),
        }
    }
    units
}

fn join_paragraph(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy word wrap at spaces. Words longer than the available width get a line of their own.
fn wrap_lines(text: &str, width: usize, first_indent: &str, indent: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![first_indent.trim_end().to_string()];
    }
    let options = Options::new(width)
        .initial_indent(first_indent)
        .subsequent_indent(indent)
        .break_words(false)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .wrap_algorithm(WrapAlgorithm::FirstFit);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect()
}
