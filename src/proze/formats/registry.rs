//! Strategy registry for compiled output
//!
//! Each output format implements `OutputStrategy` and is registered with
//! `StrategyRegistry` under its doctype name. Choosing a strategy never touches
//! the file system, so an unknown doctype fails before any output is created.

use crate::proze::config::CompileOptions;
use crate::proze::error::CompileError;
use crate::proze::state::DocumentState;
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Doctypes that are known but have no strategy yet
const PLANNED_DOCTYPES: &[&str] = &["pdf"];

/// Receives scrubbed lines and renders them into an open document
pub trait DocumentWriter {
    /// Render one scrubbed line. `state` has already been updated with the line.
    fn write(&mut self, line: &str, state: &DocumentState) -> io::Result<()>;

    /// Flush everything written so far to the underlying output
    fn finish(&mut self) -> io::Result<()>;
}

/// Trait for output strategies
pub trait OutputStrategy: Send + Sync {
    /// The doctype this strategy produces (e.g., "txt")
    fn name(&self) -> &str;

    /// Extension appended to the output path
    fn extension(&self) -> &str;

    /// Create the output file and return a writer for it
    fn open(
        &self,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<Box<dyn DocumentWriter>, CompileError>;

    /// Optional description of this strategy
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of output strategies
pub struct StrategyRegistry {
    strategies: HashMap<String, Box<dyn OutputStrategy>>,
    aliases: HashMap<String, String>,
}

impl StrategyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        StrategyRegistry {
            strategies: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register a strategy
    ///
    /// If a strategy with the same name already exists, it will be replaced.
    pub fn register<S: OutputStrategy + 'static>(&mut self, strategy: S) {
        self.strategies
            .insert(strategy.name().to_string(), Box::new(strategy));
    }

    /// Make `alias` resolve to the strategy registered as `name`
    pub fn alias(&mut self, alias: &str, name: &str) {
        self.aliases.insert(alias.to_string(), name.to_string());
    }

    /// Get a strategy by name or alias
    pub fn get(&self, name: &str) -> Option<&dyn OutputStrategy> {
        let name = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.strategies.get(name).map(|s| s.as_ref())
    }

    /// Check if a strategy exists
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolve a doctype, distinguishing planned doctypes from unknown ones
    pub fn resolve(&self, name: &str) -> Result<&dyn OutputStrategy, CompileError> {
        if let Some(strategy) = self.get(name) {
            return Ok(strategy);
        }
        if PLANNED_DOCTYPES.contains(&name) {
            Err(CompileError::NotImplemented(name.to_string()))
        } else {
            Err(CompileError::UnknownStrategy(name.to_string()))
        }
    }

    /// List all registered strategy names (sorted)
    pub fn list_strategies(&self) -> Vec<String> {
        let mut names: Vec<_> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in strategies
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(super::TextStrategy);
        registry.alias("text", "txt");

        registry
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
