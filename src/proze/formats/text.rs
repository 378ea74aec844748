//! Plain text output
//!
//!     Each scrubbed line is laid out in five steps:
//!     1. Collapse whitespace.
//!     2. Decide how many empty lines go in front of it. Chapter and section
//!        tags get two, a section break gets one. The first paragraph after a
//!        tag gets one inside a chapter or section and two anywhere else.
//!     3. Render structural tags: the tag text is removed, `Author:` becomes
//!        `by`, a section break stays `---`.
//!     4. Indent prose paragraphs and remove emphasis markers.
//!     5. Wrap at 80 characters.
//!
//!     Blank input lines produce nothing unless `removeBlankLines` is turned
//!     off, and `spacing` adds the extra empty lines of the `single+` and
//!     `double` layouts.

use crate::proze::config::{CompileOptions, Spacing};
use crate::proze::error::CompileError;
use crate::proze::formats::registry::{DocumentWriter, OutputStrategy};
use crate::proze::markup::MarkupToken;
use crate::proze::rules::{
    clean_whitespace, strip_emphasis, wrap, ParagraphContext, Rules, MAX_LINE_WIDTH,
};
use crate::proze::state::DocumentState;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Strategy producing a plain `.txt` document
pub struct TextStrategy;

impl OutputStrategy for TextStrategy {
    fn name(&self) -> &str {
        "txt"
    }

    fn extension(&self) -> &str {
        "txt"
    }

    fn description(&self) -> &str {
        "Plain text, wrapped at 80 columns"
    }

    fn open(
        &self,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<Box<dyn DocumentWriter>, CompileError> {
        let file = File::create(path).map_err(|source| CompileError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Box::new(TextWriter::new(
            BufWriter::new(file),
            options.clone(),
        )))
    }
}

/// Turns scrubbed lines into physical lines of plain text
#[derive(Debug, Clone)]
pub struct TextFormatter {
    rules: Rules,
}

impl TextFormatter {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            rules: Rules::new(options),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        self.rules.options()
    }

    /// Format one scrubbed line. Empty strings in the result are padding lines.
    pub fn format(&self, line: &str, state: &DocumentState) -> Vec<String> {
        if state.is_blank() {
            return self.format_blank(state);
        }

        let line = clean_whitespace(line);
        let mut output = Vec::new();

        match state.token() {
            Some(token) => {
                // A tag hidden inside a comment or bracket block leaves no trace
                if line.is_empty() {
                    return output;
                }
                pad(&mut output, markup_padding(token));
                let rendered = render_markup(token, &line);
                if !rendered.is_empty() {
                    self.push_wrapped(&mut output, &rendered);
                }
            }
            None => {
                if line.is_empty() {
                    return output;
                }
                pad(&mut output, self.prose_padding(state));
                let context = ParagraphContext::from_state(state);
                let text = self.rules.first_character(context) + &line;
                self.push_wrapped(&mut output, &strip_emphasis(&text));
            }
        }

        output
    }

    fn format_blank(&self, state: &DocumentState) -> Vec<String> {
        let previous = state.previous();
        let after_prose = !previous.is_blank && !previous.is_structural_markup;
        if !self.options().paragraph.remove_blank_lines && after_prose {
            vec![String::new()]
        } else {
            Vec::new()
        }
    }

    fn prose_padding(&self, state: &DocumentState) -> usize {
        if state.is_first_paragraph() {
            if state.is_chapter() || state.is_section() {
                1
            } else {
                2
            }
        } else if self.options().spacing == Spacing::SinglePlus && state.starts_paragraph() {
            1
        } else {
            0
        }
    }

    fn push_wrapped(&self, output: &mut Vec<String>, text: &str) {
        let double = self.options().spacing == Spacing::Double;
        for physical in wrap(text, MAX_LINE_WIDTH) {
            output.push(physical);
            if double {
                output.push(String::new());
            }
        }
    }
}

fn pad(output: &mut Vec<String>, count: usize) {
    output.extend(std::iter::repeat(String::new()).take(count));
}

fn markup_padding(token: MarkupToken) -> usize {
    match token {
        MarkupToken::Chapter | MarkupToken::Section => 2,
        MarkupToken::SectionBreak => 1,
        MarkupToken::Author | MarkupToken::Title => 0,
    }
}

fn render_markup(token: MarkupToken, line: &str) -> String {
    let rest = token.strip(line);
    match token {
        MarkupToken::Author if rest.is_empty() => "by".to_string(),
        MarkupToken::Author => format!("by {}", rest),
        _ => rest.to_string(),
    }
}

/// Document writer for plain text
pub struct TextWriter<W: Write> {
    out: W,
    formatter: TextFormatter,
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W, options: CompileOptions) -> Self {
        Self {
            out,
            formatter: TextFormatter::new(options),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DocumentWriter for TextWriter<W> {
    fn write(&mut self, line: &str, state: &DocumentState) -> io::Result<()> {
        for physical in self.formatter.format(line, state) {
            writeln!(self.out, "{}", physical)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proze::config::{Indent, ParagraphMode, TabFirst};

    fn render(lines: &[&str], options: CompileOptions) -> String {
        let mut state = DocumentState::new();
        let mut writer = TextWriter::new(Vec::new(), options);
        for line in lines {
            state.update(line);
            writer.write(line, &state).unwrap();
        }
        writer.finish().unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn format_last(lines: &[&str], options: CompileOptions) -> Vec<String> {
        let formatter = TextFormatter::new(options);
        let mut state = DocumentState::new();
        let mut output = Vec::new();
        for line in lines {
            state.update(line);
            output = formatter.format(line, &state);
        }
        output
    }

    #[test]
    fn test_blank_line_is_noop() {
        assert!(format_last(&["text", ""], CompileOptions::default()).is_empty());
        assert_eq!(render(&["", "   ", "\t"], CompileOptions::default()), "");
    }

    #[test]
    fn test_keep_blank_lines_after_prose() {
        let mut options = CompileOptions::default();
        options.paragraph.remove_blank_lines = false;
        assert_eq!(format_last(&["text", ""], options.clone()), vec![""]);
        // A blank line after a tag or another blank line still emits nothing
        assert!(format_last(&["Title: t", ""], options.clone()).is_empty());
        assert!(format_last(&["text", "", ""], options).is_empty());
    }

    #[test]
    fn test_markup_padding() {
        let options = CompileOptions::default();
        assert_eq!(
            format_last(&["Chapter: One"], options.clone()),
            vec!["", "", "One"]
        );
        assert_eq!(
            format_last(&["Section: Two"], options.clone()),
            vec!["", "", "Two"]
        );
        assert_eq!(format_last(&["---"], options.clone()), vec!["", "---"]);
        assert_eq!(format_last(&["Title: A Tale"], options.clone()), vec!["A Tale"]);
        assert_eq!(format_last(&["Author: Mary Sue"], options), vec!["by Mary Sue"]);
    }

    #[test]
    fn test_markup_is_case_insensitive() {
        assert_eq!(
            format_last(&["CHAPTER:   The   End "], CompileOptions::default()),
            vec!["", "", "The End"]
        );
    }

    #[test]
    fn test_author_without_name() {
        assert_eq!(format_last(&["Author:"], CompileOptions::default()), vec!["by"]);
    }

    #[test]
    fn test_empty_tag_emits_padding_only() {
        assert_eq!(format_last(&["Chapter:"], CompileOptions::default()), vec!["", ""]);
    }

    #[test]
    fn test_hidden_tag_emits_nothing() {
        let formatter = TextFormatter::new(CompileOptions::default());
        let mut state = DocumentState::new();
        state.update("Chapter: Cut");
        // The whole line sat inside an open bracket block
        assert!(formatter.format("", &state).is_empty());
        assert!(formatter.format("   ", &state).is_empty());
    }

    #[test]
    fn test_first_paragraph_padding() {
        let options = CompileOptions::default();
        assert_eq!(
            format_last(&["Chapter: One", "Body"], options.clone()),
            vec!["", "Body"]
        );
        assert_eq!(
            format_last(&["Title: T", "Body"], options.clone()),
            vec!["", "", "Body"]
        );
        // Start of a file counts as a title-level first paragraph
        assert_eq!(format_last(&["Body"], options), vec!["", "", "Body"]);
    }

    #[test]
    fn test_paragraph_indent() {
        let options = CompileOptions::default();
        assert_eq!(
            format_last(&["Chapter: One", "First", "", "Second"], options.clone()),
            vec!["\tSecond"]
        );
        // A continuation line is not indented
        assert_eq!(
            format_last(&["Chapter: One", "First", "", "Second", "more"], options),
            vec!["more"]
        );
    }

    #[test]
    fn test_tab_first_and_spaces() {
        let mut options = CompileOptions::default();
        options.paragraph.indent = Indent::Spaces(2);
        options.paragraph.tab_first = TabFirst {
            title: false,
            chapter: true,
            section: false,
        };
        assert_eq!(
            format_last(&["Chapter: One", "First"], options.clone()),
            vec!["", "  First"]
        );
        assert_eq!(
            format_last(&["Section: One", "First"], options),
            vec!["", "First"]
        );
    }

    #[test]
    fn test_justified_never_indents() {
        let mut options = CompileOptions::default();
        options.paragraph.mode = ParagraphMode::Justified;
        assert_eq!(
            format_last(&["Chapter: One", "First", "", "Second"], options),
            vec!["Second"]
        );
    }

    #[test]
    fn test_emphasis_is_removed() {
        assert_eq!(
            format_last(
                &["Chapter: One", "A __bold__ and *quiet* word"],
                CompileOptions::default()
            ),
            vec!["", "A bold and quiet word"]
        );
    }

    #[test]
    fn test_prose_that_scrubs_to_nothing_emits_nothing() {
        let formatter = TextFormatter::new(CompileOptions::default());
        let mut state = DocumentState::new();
        state.update("## only a comment");
        assert!(formatter.format("", &state).is_empty());
    }

    #[test]
    fn test_long_line_wraps() {
        let line = "Winchester Mason felt a drop of water splash into his hair. He looked up just in time.";
        let output = format_last(&["Chapter: One", line], CompileOptions::default());
        assert_eq!(
            output,
            vec![
                "",
                "Winchester Mason felt a drop of water splash into his hair. He looked up just in",
                "time.",
            ]
        );
    }

    #[test]
    fn test_single_plus_spacing() {
        let mut options = CompileOptions::default();
        options.spacing = Spacing::SinglePlus;
        assert_eq!(
            render(&["Chapter: One", "First", "", "Second", "more"], options),
            "\n\nOne\n\nFirst\n\n\tSecond\nmore\n"
        );
    }

    #[test]
    fn test_double_spacing() {
        let mut options = CompileOptions::default();
        options.spacing = Spacing::Double;
        assert_eq!(
            render(&["Chapter: One", "First", "next"], options),
            "\n\nOne\n\n\nFirst\n\nnext\n\n"
        );
    }

    #[test]
    fn test_writer_renders_document() {
        let lines = [
            "Title: A Dark and Stormy Night",
            "Author: Mary Sue",
            "",
            "Chapter: Erased",
            "The road was overgrown.",
            "",
            "Gerald walked on.",
        ];
        assert_eq!(
            render(&lines, CompileOptions::default()),
            "A Dark and Stormy Night\nby Mary Sue\n\n\nErased\n\nThe road was overgrown.\n\tGerald walked on.\n"
        );
    }

    #[test]
    fn test_strategy_metadata() {
        let strategy = TextStrategy;
        assert_eq!(strategy.name(), "txt");
        assert_eq!(strategy.extension(), "txt");
        assert!(!strategy.description().is_empty());
    }
}
