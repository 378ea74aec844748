//! Comment and bracket scrubber
//!
//! The scrubber is stateful across lines: a block comment or bracketed aside
//! opened on one line stays open until its closing token turns up, however many
//! lines later. `reset` must be called between files.
use crate::proze::lexing::tokens::ScrubToken;
use logos::Logos;

/// Which kind of hidden block, if any, the scrubber is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    /// Text is visible
    #[default]
    Visible,
    /// Inside `### ... ###`
    InComment,
    /// Inside `[ ... ]`
    InBracket,
}

impl BlockState {
    /// Human readable name of the open block, used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            BlockState::Visible => "no block",
            BlockState::InComment => "block comment",
            BlockState::InBracket => "bracket block",
        }
    }
}

/// Removes comments and bracketed asides from manuscript lines
#[derive(Debug, Clone, Default)]
pub struct Scrubber {
    state: BlockState,
}

impl Scrubber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove hidden text from a line, carrying open blocks over to the next call.
    ///
    /// # Example
    ///
    /// Input:  `abcd [hidden] efg ## note`
    /// Output: `abcd  efg `
    pub fn remove(&mut self, line: &str) -> String {
        let mut kept = String::with_capacity(line.len());
        let mut lexer = ScrubToken::lexer(line);

        while let Some(result) = lexer.next() {
            let slice = lexer.slice();
            // Every character is covered by some token, but treat anything
            // unexpected as plain text rather than dropping it.
            let token = result.unwrap_or(ScrubToken::Text);

            match (self.state, token) {
                (BlockState::Visible, ScrubToken::BlockComment) => {
                    self.state = BlockState::InComment;
                }
                (BlockState::Visible, ScrubToken::BracketOpen) => {
                    self.state = BlockState::InBracket;
                }
                // Line comments have no closing token: the rest of the line is gone
                (BlockState::Visible, ScrubToken::LineComment) => break,
                (BlockState::Visible, _) => kept.push_str(slice),
                (BlockState::InComment, ScrubToken::BlockComment) => {
                    self.state = BlockState::Visible;
                }
                (BlockState::InBracket, ScrubToken::BracketClose) => {
                    self.state = BlockState::Visible;
                }
                (BlockState::InComment, _) | (BlockState::InBracket, _) => {}
            }
        }

        kept
    }

    /// Clear any open block.
    pub fn reset(&mut self) {
        self.state = BlockState::Visible;
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn in_comment_block(&self) -> bool {
        self.state == BlockState::InComment
    }

    pub fn in_bracket_block(&self) -> bool {
        self.state == BlockState::InBracket
    }

    /// True while a block comment or bracket block is waiting for its closing token
    pub fn is_in_block(&self) -> bool {
        self.state != BlockState::Visible
    }
}
