//! Data validation utilities.

use std::path::Path;

use skirmish_core::prelude::*;

use crate::error::Result;
use crate::load::{load_level, load_registry, load_rules};

/// Summary of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Templates in the registry.
    pub templates: usize,
    /// Units the level places, if a level was checked.
    pub level_units: Option<usize>,
    /// Deployment tiles in the level, if a level was checked.
    pub deploy_tiles: Option<usize>,
}

/// Check a registry, and optionally a level built against it.
///
/// Every summon target must name a template, and every level character
/// must map to a template in the registry.
pub fn validate_data(
    registry: &UnitRegistry,
    level: Option<&LevelTemplate>,
    rules: &RulesConfig,
) -> Result<ValidationReport> {
    registry.validate()?;

    let mut report = ValidationReport {
        templates: registry.len(),
        level_units: None,
        deploy_tiles: None,
    };

    if let Some(level) = level {
        let grid = level.build_grid(registry, rules)?;
        if grid.deployable_locations().is_empty() {
            tracing::warn!("Level has no deployment tiles");
        }
        report.level_units = Some(grid.units().len());
        report.deploy_tiles = Some(grid.deployable_locations().len());
    }

    Ok(report)
}

/// Validate data files on disk.
///
/// # Errors
///
/// Returns an error if any file is unreadable or fails validation.
pub fn validate_files(
    units: &Path,
    level: Option<&Path>,
    rules: Option<&Path>,
) -> Result<ValidationReport> {
    let registry = load_registry(units)?;
    let level = level.map(load_level).transpose()?;
    let rules = load_rules(rules)?;
    validate_data(&registry, level.as_ref(), &rules)
}
