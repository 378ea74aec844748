//! Formatting rules shared by output strategies
//!
//! Each rule is a small pure function over one line of text. Strategies combine
//! them with the document state to lay out the compiled output.

use crate::proze::config::{CompileOptions, ParagraphMode};
use crate::proze::state::DocumentState;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum width of a line in plain text output, in characters
pub const MAX_LINE_WIDTH: usize = 80;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// The parts of the document state that decide a paragraph's first character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParagraphContext {
    pub is_first_paragraph: bool,
    /// The previous line was blank or structural markup
    pub starts_paragraph: bool,
    pub is_chapter: bool,
    pub is_section: bool,
}

impl ParagraphContext {
    pub fn from_state(state: &DocumentState) -> Self {
        Self {
            is_first_paragraph: state.is_first_paragraph(),
            starts_paragraph: state.starts_paragraph(),
            is_chapter: state.is_chapter(),
            is_section: state.is_section(),
        }
    }
}

/// Formatting rules configured by the compile options
#[derive(Debug, Clone)]
pub struct Rules {
    options: CompileOptions,
}

impl Rules {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Characters to insert at the beginning of a paragraph line.
    ///
    /// Empty unless the line starts a paragraph in prose mode. The first
    /// paragraph of a chapter, section or title is only indented when the
    /// matching `tabFirst` option is set.
    pub fn first_character(&self, context: ParagraphContext) -> String {
        let paragraph = &self.options.paragraph;
        if paragraph.mode != ParagraphMode::Prose || !context.starts_paragraph {
            return String::new();
        }

        let add_indent = if context.is_first_paragraph {
            if context.is_chapter {
                paragraph.tab_first.chapter
            } else if context.is_section {
                paragraph.tab_first.section
            } else {
                paragraph.tab_first.title
            }
        } else {
            true
        };

        if add_indent {
            paragraph.indent.as_text()
        } else {
            String::new()
        }
    }
}

/// Trim a line and collapse every internal whitespace run to a single space.
pub fn clean_whitespace(line: &str) -> String {
    WHITESPACE_REGEX.replace_all(line.trim(), " ").into_owned()
}

/// Remove bold (`__`) and italic (`*`) markers.
pub fn strip_emphasis(line: &str) -> String {
    line.replace("__", "").replace('*', "")
}

/// Split a line into physical lines no longer than `width` characters.
///
/// Breaks on the last space or hyphen that fits. A space used as a break is
/// dropped, a hyphen stays at the end of its line. A run without either is cut
/// at exactly `width`.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut rest: Vec<char> = line.chars().collect();

    while rest.len() > width {
        // (end of this line, start of the next)
        let (end, next) = (1..=width)
            .rev()
            .find_map(|i| match rest[i] {
                ' ' => Some((i, i + 1)),
                '-' if i < width => Some((i + 1, i + 1)),
                _ => None,
            })
            .unwrap_or((width, width));

        lines.push(rest[..end].iter().collect());
        rest.drain(..next);
    }

    lines.push(rest.into_iter().collect());
    lines
}
