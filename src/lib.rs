//! # proze
//!
//! A compiler for the proze manuscript format.
//!
//! Manuscripts are plain text annotated with comments, bracketed asides, emphasis
//! markers and structural tags. The compiler strips the annotations, tracks
//! document structure line by line and renders the remaining prose as a finished
//! document.
//!
//! ## Testing
//!
//! Unit tests live beside the code they cover. End-to-end compilation, the
//! command line and scrubber properties are covered in `tests/`.

pub mod proze;
