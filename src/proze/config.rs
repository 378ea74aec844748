//! Project configuration
//!
//! A proze project is a directory of `.proze` files with an optional config
//! file at its root. The first of `config.json`, `config.yml` and `config.yaml`
//! that exists is used. Without one, every `.proze` file under the root is
//! compiled in path order with default formatting.
//!
//! Options are validated one at a time: a value of the wrong type or outside the
//! allowed set falls back to its default instead of failing the whole load.

use crate::proze::error::ConfigError;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names looked for in the project root, in priority order
pub const CONFIG_FILENAMES: [&str; 3] = ["config.json", "config.yml", "config.yaml"];

/// Extension of manuscript files
pub const PROZE_EXTENSION: &str = "proze";

/// Width of the indent selected by `indent: spaces`
pub const SPACES_PER_TAB: usize = 4;

/// Widest paragraph indent accepted from a config file
pub const MAX_INDENT_SPACES: usize = 16;

/// How paragraphs are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParagraphMode {
    /// Indent the first line of paragraphs
    #[default]
    Prose,
    /// Never indent
    Justified,
}

impl ParagraphMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "prose" => Some(ParagraphMode::Prose),
            "justified" => Some(ParagraphMode::Justified),
            _ => None,
        }
    }
}

/// Line spacing of the compiled document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spacing {
    #[default]
    Single,
    /// Single spacing with an empty line before each paragraph
    SinglePlus,
    Double,
}

impl Spacing {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "single" => Some(Spacing::Single),
            "single+" => Some(Spacing::SinglePlus),
            "double" => Some(Spacing::Double),
            _ => None,
        }
    }
}

/// Characters inserted before the first line of an indented paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    pub fn as_text(&self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(count) => " ".repeat(*count),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if s.eq_ignore_ascii_case("tab") => Some(Indent::Tab),
            Value::String(s) if s.eq_ignore_ascii_case("spaces") => {
                Some(Indent::Spaces(SPACES_PER_TAB))
            }
            Value::Number(n) => n
                .as_u64()
                .and_then(|count| usize::try_from(count).ok())
                .filter(|count| (1..=MAX_INDENT_SPACES).contains(count))
                .map(Indent::Spaces),
            _ => None,
        }
    }
}

/// Whether the first paragraph of each kind of scope gets an indent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabFirst {
    pub title: bool,
    pub chapter: bool,
    pub section: bool,
}

/// Paragraph formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphOptions {
    pub mode: ParagraphMode,
    pub remove_blank_lines: bool,
    pub indent: Indent,
    pub tab_first: TabFirst,
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        Self {
            mode: ParagraphMode::Prose,
            remove_blank_lines: true,
            indent: Indent::Tab,
            tab_first: TabFirst::default(),
        }
    }
}

/// Options consumed by the compiler and its output strategies
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Files to compile, relative to the project root
    pub order: Vec<PathBuf>,
    pub paragraph: ParagraphOptions,
    pub spacing: Spacing,
}

/// Character, place and thing names used by the manuscript
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct NamesConfig {
    pub characters: Vec<String>,
    pub places: Vec<String>,
    pub things: Vec<String>,
    /// Names that must not appear anywhere in the manuscript
    pub invalid: Vec<String>,
}

/// Everything read from a project's config file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectConfig {
    pub compile: CompileOptions,
    pub names: NamesConfig,
}

/// Supported config file syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the syntax from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(ConfigFormat::Json),
            Some("yml") | Some("yaml") => Ok(ConfigFormat::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl ProjectConfig {
    /// Load the configuration of the project at `root`, discovering the config file.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        match find_config_path(root) {
            Some(path) => Self::load_file(root, &path),
            None => {
                log::info!("No config file found for project. Using default settings.");
                Self::defaults_for(root)
            }
        }
    }

    /// Load the configuration of the project at `root` from an explicit file.
    pub fn load_file(root: &Path, path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = parse_str(&source, format, path)?;

        let mut config = Self::defaults_for(root)?;
        config.apply(&parsed);
        Ok(config)
    }

    /// Default settings with the compile order found by scanning `root`
    pub fn defaults_for(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.compile.order = find_proze_files(root)?;
        Ok(config)
    }

    /// Override defaults with the recognised values of a parsed config file
    pub fn apply(&mut self, parsed: &Value) {
        if let Some(compile) = parsed.get("compile") {
            apply_compile_options(compile, &mut self.compile);
        }
        if let Some(names) = parsed.get("names") {
            match NamesConfig::deserialize(names) {
                Ok(names) => self.names = names,
                Err(e) => log::warn!("Ignoring invalid names in config: {}", e),
            }
        }
    }
}

/// Parse config source text into a generic value tree
pub fn parse_str(source: &str, format: ConfigFormat, path: &Path) -> Result<Value, ConfigError> {
    if source.trim().is_empty() {
        return Ok(Value::Null);
    }
    match format {
        ConfigFormat::Json => serde_json::from_str(source).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        ConfigFormat::Yaml => serde_yaml::from_str(source).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Find the config file of the project at `root`
pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Find every proze file under `root`, sorted, relative to `root`
pub fn find_proze_files(root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let pattern = format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        PROZE_EXTENSION
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(Result::ok)
        .map(|path| {
            path.strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone())
        })
        .collect();
    files.sort();
    Ok(files)
}

fn apply_compile_options(compile: &Value, options: &mut CompileOptions) {
    let order: Vec<PathBuf> = compile
        .get("order")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default();
    if !order.is_empty() {
        options.order = order;
    }

    if let Some(spacing) = compile
        .get("spacing")
        .and_then(Value::as_str)
        .and_then(Spacing::parse)
    {
        options.spacing = spacing;
    }

    if let Some(paragraph) = compile.get("paragraph") {
        apply_paragraph_options(paragraph, &mut options.paragraph);
    }
}

fn apply_paragraph_options(paragraph: &Value, options: &mut ParagraphOptions) {
    options.remove_blank_lines = bool_or(
        paragraph.get("removeBlankLines"),
        options.remove_blank_lines,
    );
    if let Some(mode) = paragraph
        .get("mode")
        .and_then(Value::as_str)
        .and_then(ParagraphMode::parse)
    {
        options.mode = mode;
    }
    if let Some(indent) = paragraph.get("indent").and_then(Indent::from_value) {
        options.indent = indent;
    }
    if let Some(tab_first) = paragraph.get("tabFirst") {
        let defaults = options.tab_first;
        options.tab_first = TabFirst {
            title: bool_or(tab_first.get("title"), defaults.title),
            chapter: bool_or(tab_first.get("chapter"), defaults.chapter),
            section: bool_or(tab_first.get("section"), defaults.section),
        };
    }
}

fn bool_or(value: Option<&Value>, default: bool) -> bool {
    value.and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::default();
        assert_eq!(config.compile.paragraph.mode, ParagraphMode::Prose);
        assert!(config.compile.paragraph.remove_blank_lines);
        assert_eq!(config.compile.paragraph.tab_first, TabFirst::default());
        assert_eq!(config.compile.spacing, Spacing::Single);
        assert!(config.names.invalid.is_empty());
    }

    #[test]
    fn test_apply_full_config() {
        let mut config = ProjectConfig::default();
        config.apply(&json!({
            "compile": {
                "order": ["one.proze", "two.proze"],
                "spacing": "Double",
                "paragraph": {
                    "mode": "JUSTIFIED",
                    "removeBlankLines": false,
                    "indent": 2,
                    "tabFirst": { "chapter": true, "section": true }
                }
            },
            "names": { "characters": ["Gerald"], "invalid": ["Jerry"] }
        }));
        assert_eq!(
            config.compile.order,
            vec![PathBuf::from("one.proze"), PathBuf::from("two.proze")]
        );
        assert_eq!(config.compile.spacing, Spacing::Double);
        assert_eq!(config.compile.paragraph.mode, ParagraphMode::Justified);
        assert!(!config.compile.paragraph.remove_blank_lines);
        assert_eq!(config.compile.paragraph.indent, Indent::Spaces(2));
        assert_eq!(
            config.compile.paragraph.tab_first,
            TabFirst {
                title: false,
                chapter: true,
                section: true
            }
        );
        assert_eq!(config.names.characters, vec!["Gerald"]);
        assert_eq!(config.names.invalid, vec!["Jerry"]);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let mut config = ProjectConfig::default();
        config.apply(&json!({
            "compile": {
                "order": [],
                "spacing": "triple",
                "paragraph": {
                    "mode": "ragged",
                    "removeBlankLines": "no",
                    "indent": 0,
                    "tabFirst": { "title": "yes" }
                }
            }
        }));
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_null_config_is_ignored() {
        let mut config = ProjectConfig::default();
        config.apply(&Value::Null);
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("config.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let path = Path::new("config.yml");
        let yaml = parse_str("compile:\n  spacing: single+\n", ConfigFormat::Yaml, path).unwrap();
        assert_eq!(yaml["compile"]["spacing"], "single+");
        let json = parse_str(r#"{"compile": {"order": ["a.proze"]}}"#, ConfigFormat::Json, path)
            .unwrap();
        assert_eq!(json["compile"]["order"][0], "a.proze");
        assert_eq!(parse_str("  \n", ConfigFormat::Yaml, path).unwrap(), Value::Null);
    }

    #[test]
    fn test_indent_text() {
        assert_eq!(Indent::Tab.as_text(), "\t");
        assert_eq!(Indent::Spaces(4).as_text(), "    ");
        assert_eq!(
            Indent::from_value(&json!("spaces")),
            Some(Indent::Spaces(SPACES_PER_TAB))
        );
    }

    #[test]
    fn test_indent_out_of_range_falls_back() {
        for indent in [json!(0), json!(-2), json!(2.5), json!(17), json!(u64::MAX)] {
            let mut config = ProjectConfig::default();
            config.apply(&json!({ "compile": { "paragraph": { "indent": indent } } }));
            assert_eq!(config.compile.paragraph.indent, Indent::Tab, "indent: {indent}");
        }

        let mut config = ProjectConfig::default();
        config.apply(&json!({ "compile": { "paragraph": { "indent": MAX_INDENT_SPACES } } }));
        assert_eq!(
            config.compile.paragraph.indent,
            Indent::Spaces(MAX_INDENT_SPACES)
        );
    }

    #[test]
    fn test_discovery_prefers_json() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "compile:\n  spacing: double\n").unwrap();
        assert_eq!(
            find_config_path(dir.path()),
            Some(dir.path().join("config.yaml"))
        );
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        assert_eq!(
            find_config_path(dir.path()),
            Some(dir.path().join("config.json"))
        );
    }

    #[test]
    fn test_default_order_is_relative_and_sorted() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("part2")).unwrap();
        fs::write(dir.path().join("part2/a.proze"), "").unwrap();
        fs::write(dir.path().join("b.proze"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(
            config.compile.order,
            vec![PathBuf::from("b.proze"), PathBuf::from("part2/a.proze")]
        );
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        assert!(matches!(
            ProjectConfig::load(dir.path()),
            Err(ConfigError::Json { .. })
        ));
    }
}
