//! Lexing module for proze manuscripts
//!
//! This module removes the parts of a manuscript line the reader never sees:
//! comments and bracketed editorial asides.
//!
//! Tokens
//!
//!     `##`    line comment, hides the rest of the line
//!     `###`   block comment delimiter, the block may span any number of lines
//!     `[`     opens a bracketed aside, which may also span lines
//!     `]`     closes a bracketed aside
//!
//!     A backslash directly before a token escapes it. Backslashes pair up, so
//!     a token preceded by an odd number of backslashes is escaped and one
//!     preceded by an even number is not.
//!
//! Precedence
//!
//!     Outside of any block the earliest token on the line wins, which means a
//!     comment hides any bracket that follows it and a bracket hides any comment
//!     token inside it. Where `##` and `###` start at the same place the block
//!     delimiter wins. Inside a block only that block's closing token is looked
//!     for.
//!
//! The token recognition is a plain logos lexer. Longest-match resolves both the
//! `##`/`###` tie and the escape rules, so the scrubber itself is a small state
//! machine walking the token stream.

pub mod scrubber;
pub mod tokens;

pub use scrubber::{BlockState, Scrubber};
pub use tokens::{tokenize, tokenize_with_spans, ScrubToken};
