//! Character name checks
//!
//! Writers list names that must not appear in the finished manuscript, such as
//! a character's old name after a rename. Lines are checked after comments are
//! removed, so a name mentioned in a note does not trigger a warning.

use crate::proze::config::NamesConfig;

/// Finds invalid names in manuscript lines
#[derive(Debug, Clone, Default)]
pub struct Names {
    /// (original spelling, lower-cased spelling)
    invalid: Vec<(String, String)>,
}

impl Names {
    pub fn new(config: &NamesConfig) -> Self {
        let invalid = config
            .invalid
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| (name.clone(), name.to_lowercase()))
            .collect();
        Self { invalid }
    }

    /// Every invalid name found on the line, in configuration order
    pub fn find_invalid(&self, line: &str) -> Vec<&str> {
        if self.invalid.is_empty() {
            return Vec::new();
        }
        let line = line.to_lowercase();
        self.invalid
            .iter()
            .filter(|(_, lowercase)| line.contains(lowercase.as_str()))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
