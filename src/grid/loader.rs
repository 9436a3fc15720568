//! Grid loader - YAML/JSON file loading and parsing
//!
//! Expressions inside the definition are parsed while loading, so a
//! malformed rule is reported here with its JSON path instead of at
//! render time.

use super::definition::GridDefinition;
use crate::rules::CellruleError;
use std::fs;
use std::path::Path;

/// Loads grid definitions from YAML or JSON files
pub struct GridLoader;

impl GridLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a grid definition; `.yaml`/`.yml` files are read as YAML,
    /// anything else as JSON.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<GridDefinition, CellruleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let grid = if is_yaml {
            Self::parse_yaml(&content)?
        } else {
            Self::parse_json(&content)?
        };

        log::debug!(
            "Loaded grid '{}' from {} ({} columns)",
            grid.name,
            path.display(),
            grid.columns.len()
        );
        Ok(grid)
    }

    /// Parse a grid definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<GridDefinition, CellruleError> {
        let grid: GridDefinition = serde_yaml::from_str(content)?;
        Ok(grid)
    }

    /// Parse a grid definition from a JSON string
    pub fn parse_json(content: &str) -> Result<GridDefinition, CellruleError> {
        let grid: GridDefinition = serde_json::from_str(content)?;
        Ok(grid)
    }
}

impl Default for GridLoader {
    fn default() -> Self {
        Self::new()
    }
}
