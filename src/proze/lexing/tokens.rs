//! Token definitions for the proze scrubber
//!
//! Only the characters that take part in comments, brackets and escapes are
//! interesting here. Everything else collapses into `Text` runs.
use logos::Logos;

/// All tokens the scrubber distinguishes
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScrubToken {
    // Comments
    #[token("###")]
    BlockComment,
    #[token("##")]
    LineComment,

    // Bracketed asides
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,

    // Escapes. Longest match makes `\###` a single escaped token, so the
    // trailing `##` can never be picked up as a line comment.
    #[token("\\\\")]
    EscapedBackslash,
    #[token("\\###")]
    #[token("\\##")]
    #[token("\\[")]
    #[token("\\]")]
    EscapedMarker,

    // Lone characters that only matter as part of a longer token
    #[token("#")]
    Hash,
    #[token("\\")]
    Backslash,

    // Text content (catch-all for non-special characters)
    #[regex(r"[^#\[\]\\]+")]
    Text,
}

impl ScrubToken {
    /// Check if this token opens or closes a hidden block
    pub fn is_block_delimiter(&self) -> bool {
        matches!(
            self,
            ScrubToken::BlockComment | ScrubToken::BracketOpen | ScrubToken::BracketClose
        )
    }

    /// Check if this token is plain content that never changes scrubber state
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            ScrubToken::Text
                | ScrubToken::Hash
                | ScrubToken::Backslash
                | ScrubToken::EscapedBackslash
                | ScrubToken::EscapedMarker
        )
    }
}

/// Convenience function to tokenize a line and collect all tokens
pub fn tokenize(source: &str) -> Vec<ScrubToken> {
    ScrubToken::lexer(source)
        .filter_map(|result| result.ok())
        .collect()
}

/// Convenience function to tokenize a line and collect tokens with their spans
pub fn tokenize_with_spans(source: &str) -> Vec<(ScrubToken, logos::Span)> {
    let mut lexer = ScrubToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}
