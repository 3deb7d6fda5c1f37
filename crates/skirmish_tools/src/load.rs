//! Reading data files from disk.

use std::fs;
use std::path::Path;

use skirmish_core::prelude::*;

use crate::error::{Result, ToolError};

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a unit registry from a RON file.
pub fn load_registry(path: &Path) -> Result<UnitRegistry> {
    tracing::debug!(path = %path.display(), "Loading unit registry");
    Ok(UnitRegistry::from_ron(&read(path)?)?)
}

/// Load a level template from a RON file.
pub fn load_level(path: &Path) -> Result<LevelTemplate> {
    tracing::debug!(path = %path.display(), "Loading level template");
    Ok(LevelTemplate::from_ron(&read(path)?)?)
}

/// Load rules from a RON file, or the defaults when no file is given.
pub fn load_rules(path: Option<&Path>) -> Result<RulesConfig> {
    match path {
        Some(path) => Ok(RulesConfig::from_ron(&read(path)?)?),
        None => Ok(RulesConfig::default()),
    }
}

/// Load everything a board needs and build the grid.
pub fn load_grid(units: &Path, level: &Path, rules: Option<&Path>) -> Result<Grid> {
    let registry = load_registry(units)?;
    let level = load_level(level)?;
    let rules = load_rules(rules)?;
    Ok(level.build_grid(&registry, &rules)?)
}
