//! Structural markup tokens
//!
//! A structural markup line declares part of the document structure. Tags are
//! matched as case-insensitive line prefixes, the section break only as a whole
//! line.
//!
//!     Title: A Dark and Stormy Night
//!     Author: Mary Sue
//!     Chapter: Erased
//!     Section: Morning
//!     ---

/// The structural tags recognised at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupToken {
    Author,
    Chapter,
    Section,
    Title,
    SectionBreak,
}

impl MarkupToken {
    /// Tokens in the order they are tested. Prefix tags come first, the
    /// section break is tested last against the trimmed line.
    pub const ALL: [MarkupToken; 5] = [
        MarkupToken::Author,
        MarkupToken::Chapter,
        MarkupToken::Section,
        MarkupToken::Title,
        MarkupToken::SectionBreak,
    ];

    /// The literal text that triggers this token, in lower case
    pub fn literal(&self) -> &'static str {
        match self {
            MarkupToken::Author => "author:",
            MarkupToken::Chapter => "chapter:",
            MarkupToken::Section => "section:",
            MarkupToken::Title => "title:",
            MarkupToken::SectionBreak => "---",
        }
    }

    /// Find the token a line declares, if any.
    ///
    /// Prefix tags are compared without regard to ASCII case. The section break
    /// must be the whole line once surrounding whitespace is trimmed.
    pub fn detect(line: &str) -> Option<MarkupToken> {
        Self::ALL.into_iter().find(|token| token.matches(line))
    }

    /// Check whether this token matches the line
    pub fn matches(&self, line: &str) -> bool {
        match self {
            MarkupToken::SectionBreak => line.trim() == self.literal(),
            _ => strip_prefix_ignore_case(line, self.literal()).is_some(),
        }
    }

    /// Remove the tag text from the start of a line, returning the trimmed rest.
    ///
    /// Lines that do not start with the tag are returned trimmed but otherwise
    /// untouched.
    pub fn strip<'a>(&self, line: &'a str) -> &'a str {
        let line = line.trim();
        match self {
            MarkupToken::SectionBreak => line,
            _ => strip_prefix_ignore_case(line, self.literal())
                .unwrap_or(line)
                .trim(),
        }
    }

    /// Whether the paragraph following this tag counts as a first paragraph
    pub fn arms_first_paragraph(&self) -> bool {
        !matches!(self, MarkupToken::Author)
    }

    /// Check if this token opens a chapter
    pub fn is_chapter(&self) -> bool {
        matches!(self, MarkupToken::Chapter)
    }

    /// Check if this token opens a section (an explicit section or a break)
    pub fn is_section(&self) -> bool {
        matches!(self, MarkupToken::Section | MarkupToken::SectionBreak)
    }
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}
