//! Compilation pipeline
//!
//! The pipeline drives every line of every manuscript file through the same
//! sequence of stages and hands the result to an output strategy.
//!
//!     For each file in the compile order:
//!         reset the scrubber and the document state
//!         (the first file also watches for an opening first paragraph)
//!         for each raw line:
//!             1. scrub comments and bracketed asides
//!             2. warn about invalid names in what is left
//!             3. update the document state with the raw line
//!             4. write the scrubbed line using the updated state
//!
//! The state sees the raw line so that structure is recognised even on lines a
//! comment partly hides. The writer sees the scrubbed line so hidden text never
//! reaches the output.
//!
//! A missing input file is skipped with a warning. Configuration problems and
//! unknown doctypes abort before the output file is created.

use crate::proze::config::{CompileOptions, NamesConfig, ProjectConfig};
use crate::proze::error::CompileError;
use crate::proze::formats::{DocumentWriter, StrategyRegistry, TextWriter};
use crate::proze::lexing::Scrubber;
use crate::proze::names::Names;
use crate::proze::state::DocumentState;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// What to compile and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Root folder of the proze project
    pub root: PathBuf,
    /// Output format, e.g. "txt"
    pub doctype: String,
    /// Output path without extension
    pub output: PathBuf,
    /// Config file to use instead of discovering one in `root`
    pub config: Option<PathBuf>,
}

impl CompileRequest {
    /// Compile the project at `root` into `<root>/output.<doctype>`
    pub fn new(root: impl Into<PathBuf>, doctype: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            output: root.join("output"),
            root,
            doctype: doctype.into(),
            config: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    fn load_config(&self) -> Result<ProjectConfig, CompileError> {
        let config = match &self.config {
            Some(path) => ProjectConfig::load_file(&self.root, path)?,
            None => ProjectConfig::load(&self.root)?,
        };
        Ok(config)
    }
}

/// Line-by-line compiler for proze files
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: CompileOptions,
    names: Names,
    scrubber: Scrubber,
    state: DocumentState,
    files_started: usize,
}

impl Pipeline {
    pub fn new(options: CompileOptions, names: &NamesConfig) -> Self {
        Self {
            options,
            names: Names::new(names),
            scrubber: Scrubber::new(),
            state: DocumentState::new(),
            files_started: 0,
        }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.compile.clone(), &config.names)
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// State after the last line compiled
    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// Compile one file's lines, returning the number of lines read.
    ///
    /// `source` names the file in log messages.
    pub fn compile_lines<R: BufRead>(
        &mut self,
        source: &Path,
        reader: R,
        writer: &mut dyn DocumentWriter,
    ) -> Result<usize, CompileError> {
        self.scrubber.reset();
        self.state.reset();
        if self.files_started == 0 {
            self.state.arm_first_paragraph();
        }
        self.files_started += 1;

        let mut count = 0;
        for (index, raw_line) in reader.lines().enumerate() {
            let raw_line = raw_line.map_err(|source_err| CompileError::Input {
                path: source.to_path_buf(),
                source: source_err,
            })?;
            count = index + 1;

            let line = self.scrubber.remove(&raw_line);
            self.check_names(&line, source, count);
            self.state.update(&raw_line);
            writer.write(&line, &self.state)?;
        }

        if self.scrubber.is_in_block() {
            log::warn!(
                "Unterminated {} at end of {}",
                self.scrubber.state().describe(),
                source.display()
            );
        }

        Ok(count)
    }

    /// Compile every file of the compile order found under `root`.
    ///
    /// Returns the number of files compiled.
    pub fn compile_order(
        &mut self,
        root: &Path,
        writer: &mut dyn DocumentWriter,
    ) -> Result<usize, CompileError> {
        let order = self.options.order.clone();
        let mut compiled = 0;

        for entry in &order {
            let path = root.join(entry);
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::warn!(
                        "Cannot find file \"{}\". Update the file names in your config file.",
                        path.display()
                    );
                    continue;
                }
                Err(source) => return Err(CompileError::Input { path, source }),
            };

            let lines = self.compile_lines(&path, BufReader::new(file), writer)?;
            log::debug!("Compiled {} ({} lines)", path.display(), lines);
            compiled += 1;
        }

        Ok(compiled)
    }

    fn check_names(&self, line: &str, source: &Path, line_number: usize) {
        let invalid = self.names.find_invalid(line);
        if !invalid.is_empty() {
            log::warn!(
                "Invalid names found in {}[{}]: {}",
                source.display(),
                line_number,
                invalid.join(", ")
            );
        }
    }
}

/// Compile a proze project.
///
/// Returns the path of the written document, or `None` when the compile order
/// is empty and nothing was written.
pub fn compile_project(
    request: &CompileRequest,
    registry: &StrategyRegistry,
) -> Result<Option<PathBuf>, CompileError> {
    let config = request.load_config()?;
    if config.compile.order.is_empty() {
        log::info!("No proze files to compile.");
        return Ok(None);
    }

    let strategy = registry.resolve(&request.doctype)?;
    let output = output_path(&request.output, strategy.extension());
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CompileError::Output {
            path: output.clone(),
            source,
        })?;
    }

    let mut writer = strategy.open(&output, &config.compile)?;
    let mut pipeline = Pipeline::from_config(&config);
    pipeline.compile_order(&request.root, writer.as_mut())?;
    writer.finish()?;

    log::info!("Wrote {}", output.display());
    Ok(Some(output))
}

/// Compile an in-memory manuscript to plain text
pub fn compile_str(source: &str, options: &CompileOptions) -> String {
    let mut pipeline = Pipeline::new(options.clone(), &NamesConfig::default());
    let mut writer = TextWriter::new(Vec::new(), options.clone());

    // Reading from and writing to memory cannot fail
    let compiled = pipeline
        .compile_lines(Path::new("<string>"), source.as_bytes(), &mut writer)
        .and_then(|_| writer.finish().map_err(CompileError::from));
    if let Err(e) = compiled {
        log::error!("Failed to compile string: {}", e);
    }

    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

/// `base` with `.extension` appended, keeping any dots already in the name
fn output_path(base: &Path, extension: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
