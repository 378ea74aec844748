//! Document state tracking
//!
//!     The state tracker follows a manuscript line by line and records the
//!     structural and typographic context the formatter needs: which line kinds
//!     came before, whether a chapter or section is open, whether the current
//!     line starts the first paragraph after a structural tag, whether bold or
//!     italics wrap over from earlier lines, and how deep the current block
//!     quote is indented.
//!
//!     It is fed raw lines (before comments are scrubbed) through `update`, and
//!     `reset` must be called at the start of every file. A new state watches
//!     for a first paragraph, a reset one only starts watching after the next
//!     structural tag.
//!
//! Algorithm
//!
//!     1. Record the outgoing line's classification as `previous`.
//!     2. A blank line (only whitespace) ends any emphasis and carries nothing
//!        else forward.
//!     3. A non-blank line is tested for structural markup, but only directly
//!        after a blank line or another markup line. Markup updates the
//!        chapter/section scope and, except for `Author:`, arms first-paragraph
//!        detection.
//!     4. Any other line is prose. It consumes an armed first-paragraph flag,
//!        toggles bold/italics on an odd count of `__`/`*`, and at paragraph
//!        boundaries adjusts the block-quote indentation.
use crate::proze::markup::MarkupToken;
use once_cell::sync::Lazy;
use regex::Regex;

/// Leading whitespace run of a line, as long as it is not followed by a hyphen
static LEADING_INDENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s+)[^\s-]").expect("leading indent regex is valid"));

const BOLD_MARKER: &str = "__";
const ITALICS_MARKER: &str = "*";

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Markup(MarkupToken),
    Prose,
}

/// Classification of the line before the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousLineInfo {
    pub is_blank: bool,
    pub is_structural_markup: bool,
}

impl Default for PreviousLineInfo {
    fn default() -> Self {
        Self {
            is_blank: true,
            is_structural_markup: false,
        }
    }
}

/// The structural scope a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Before any chapter or section, or after a title/author tag
    #[default]
    Document,
    Chapter,
    Section,
}

impl Scope {
    fn after(token: MarkupToken) -> Self {
        if token.is_chapter() {
            Scope::Chapter
        } else if token.is_section() {
            Scope::Section
        } else {
            Scope::Document
        }
    }
}

/// Snapshot of the markup-related state of the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkupState {
    pub is_chapter: bool,
    pub is_section: bool,
    pub is_markup_line: bool,
    pub token: Option<MarkupToken>,
}

/// First-paragraph detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstParagraph {
    /// The next prose line is not special
    Idle,
    /// The next prose line opens the first paragraph
    Armed,
    /// The current line opens the first paragraph
    Current,
}

/// Block-quote indentation, one stack entry per quote level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BlockQuote {
    stack: Vec<String>,
}

impl BlockQuote {
    fn level(&self) -> usize {
        self.stack.len()
    }

    fn top_len(&self) -> usize {
        self.stack.last().map_or(0, |indent| indent.chars().count())
    }

    /// Adjust the level for a prose line that opens a paragraph
    fn update(&mut self, line: &str) {
        let Some(indent) = LEADING_INDENT_REGEX
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            self.stack.clear();
            return;
        };

        let len = indent.chars().count();
        match len.cmp(&self.top_len()) {
            std::cmp::Ordering::Greater => self.stack.push(indent.to_string()),
            std::cmp::Ordering::Less => {
                self.stack.pop();
            }
            std::cmp::Ordering::Equal => {}
        }
    }
}

/// Tracks structural and typographic context across the lines of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    line: LineKind,
    previous: PreviousLineInfo,
    scope: Scope,
    first_paragraph: FirstParagraph,
    is_bold: bool,
    is_italics: bool,
    block_quote: BlockQuote,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentState {
    pub fn new() -> Self {
        Self {
            line: LineKind::Blank,
            previous: PreviousLineInfo::default(),
            scope: Scope::Document,
            // The start of a document behaves like a fresh structural tag
            first_paragraph: FirstParagraph::Armed,
            is_bold: false,
            is_italics: false,
            block_quote: BlockQuote::default(),
        }
    }

    /// Restore the state a new file starts in.
    ///
    /// First-paragraph detection is left disarmed: a file that continues the
    /// previous file's chapter carries on with ordinary paragraphs.
    pub fn reset(&mut self) {
        *self = Self::new();
        self.first_paragraph = FirstParagraph::Idle;
    }

    /// Treat the next prose line as the first paragraph of the document.
    pub fn arm_first_paragraph(&mut self) {
        self.first_paragraph = FirstParagraph::Armed;
    }

    /// Update the state with the next raw line of the file.
    pub fn update(&mut self, raw_line: &str) {
        let lowercase = raw_line.to_lowercase();

        self.previous = PreviousLineInfo {
            is_blank: self.is_blank(),
            is_structural_markup: self.is_markup_line(),
        };
        if self.first_paragraph == FirstParagraph::Current {
            self.first_paragraph = FirstParagraph::Idle;
        }

        if lowercase.trim().is_empty() {
            self.line = LineKind::Blank;
            self.is_bold = false;
            self.is_italics = false;
            return;
        }

        let may_be_markup = self.previous.is_blank || self.previous.is_structural_markup;
        let token = if may_be_markup {
            MarkupToken::detect(&lowercase)
        } else {
            None
        };

        match token {
            Some(token) => {
                self.line = LineKind::Markup(token);
                self.scope = Scope::after(token);
                if token.arms_first_paragraph() {
                    self.first_paragraph = FirstParagraph::Armed;
                }
            }
            None => {
                self.line = LineKind::Prose;
                if self.first_paragraph == FirstParagraph::Armed {
                    self.first_paragraph = FirstParagraph::Current;
                }
                if lowercase.matches(BOLD_MARKER).count() % 2 == 1 {
                    self.is_bold = !self.is_bold;
                }
                if lowercase.matches(ITALICS_MARKER).count() % 2 == 1 {
                    self.is_italics = !self.is_italics;
                }
                // Block quotes are only recognised at paragraph boundaries
                if self.previous.is_blank {
                    self.block_quote.update(raw_line);
                }
            }
        }
    }

    pub fn line_kind(&self) -> LineKind {
        self.line
    }

    pub fn previous(&self) -> PreviousLineInfo {
        self.previous
    }

    pub fn is_blank(&self) -> bool {
        self.line == LineKind::Blank
    }

    pub fn is_markup_line(&self) -> bool {
        matches!(self.line, LineKind::Markup(_))
    }

    /// The structural token declared by the current line
    pub fn token(&self) -> Option<MarkupToken> {
        match self.line {
            LineKind::Markup(token) => Some(token),
            _ => None,
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_chapter(&self) -> bool {
        self.scope == Scope::Chapter
    }

    pub fn is_section(&self) -> bool {
        self.scope == Scope::Section
    }

    pub fn markup(&self) -> MarkupState {
        MarkupState {
            is_chapter: self.is_chapter(),
            is_section: self.is_section(),
            is_markup_line: self.is_markup_line(),
            token: self.token(),
        }
    }

    /// True when the current line opens the first paragraph after a structural tag
    pub fn is_first_paragraph(&self) -> bool {
        self.first_paragraph == FirstParagraph::Current
    }

    /// True if bold is carried over to the next line
    pub fn is_bold(&self) -> bool {
        self.is_bold
    }

    /// True if italics is carried over to the next line
    pub fn is_italics(&self) -> bool {
        self.is_italics
    }

    pub fn indent_level(&self) -> usize {
        self.block_quote.level()
    }

    pub fn indent_stack(&self) -> &[String] {
        &self.block_quote.stack
    }

    /// True when the current line begins a paragraph
    pub fn starts_paragraph(&self) -> bool {
        self.previous.is_blank || self.previous.is_structural_markup
    }
}
