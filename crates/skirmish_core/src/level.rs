//! Level templates: a character grid plus a character-to-template map.
//!
//! The core does not own the level file format. It takes the already-parsed
//! shape (rows of characters and a unit key dictionary) and turns it into a
//! [`Grid`]. [`LevelTemplate::from_ron`] is a convenience for tools and
//! tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{Result, TacticsError};
use crate::grid::{CreateUnit, Grid, Tile};
use crate::location::Location;
use crate::template::UnitRegistry;

/// Parsed level layout.
///
/// # Example RON
///
/// ```ron
/// LevelTemplate(
///     tiles: [
///         "..s..",
///         ".....",
///         "*****",
///     ],
///     units: { 's': "skeleton" },
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelTemplate {
    /// Rows of tile characters, top to bottom.
    pub tiles: Vec<String>,
    /// Unit template key for each unit character.
    #[serde(default)]
    pub units: BTreeMap<char, String>,
}

impl LevelTemplate {
    /// Parse a level template from RON.
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| TacticsError::data_parse("level template", e))
    }

    /// Build the grid described by this template.
    ///
    /// Deploy markers become deployment tiles, floor markers become normal
    /// tiles, and every other character becomes a normal tile holding an
    /// enemy unit of the mapped template.
    pub fn build_grid(&self, registry: &UnitRegistry, rules: &RulesConfig) -> Result<Grid> {
        let mut rows = Vec::with_capacity(self.tiles.len());
        let mut spawns = Vec::new();

        for (row, line) in self.tiles.iter().enumerate() {
            let mut tiles = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                if ch == rules.deploy_marker {
                    tiles.push(Tile::deployable());
                    continue;
                }
                tiles.push(Tile::normal());
                if ch == rules.floor_marker {
                    continue;
                }

                let key = self.units.get(&ch).ok_or_else(|| {
                    TacticsError::data_parse(
                        "level template",
                        format!("unmapped character '{ch}' at row {row}, column {col}"),
                    )
                })?;
                spawns.push((Location::new(row as i32, col as i32), key.as_str()));
            }
            rows.push(tiles);
        }

        let mut grid = Grid::from_rows(rows, registry.clone())?;
        for (location, key) in spawns {
            grid.create_unit(location, key, CreateUnit::owned_by(rules.enemy))?;
        }

        tracing::debug!(
            height = grid.height(),
            width = grid.width(),
            units = grid.units().len(),
            "Level grid built"
        );
        Ok(grid)
    }
}
