//! ASCII rendering of a grid for debugging levels and ranges.
//!
//! Legend:
//! - `.` normal tile, `*` deployment tile
//! - uppercase letter: player unit, lowercase letter: other teams
//! - `m` move target, `a` action target, `x` both

use std::collections::BTreeSet;
use std::fmt::Write;

use skirmish_core::prelude::*;

use crate::error::{Result, ToolError};

fn unit_glyph(unit: &Unit, player: TeamId) -> char {
    let glyph = unit.template().chars().next().unwrap_or('?');
    if unit.owner() == player {
        glyph.to_ascii_uppercase()
    } else {
        glyph.to_ascii_lowercase()
    }
}

fn render_with<F>(grid: &Grid, mut overlay: F) -> String
where
    F: FnMut(Location) -> Option<char>,
{
    let mut out = String::with_capacity(grid.height() * (grid.width() + 1));
    for (row, tiles) in grid.rows().enumerate() {
        for (col, tile) in tiles.iter().enumerate() {
            let location = Location::new(row as i32, col as i32);
            let glyph = overlay(location).unwrap_or(if tile.is_deployable() { '*' } else { '.' });
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Render tiles and units.
#[must_use]
pub fn render_board(grid: &Grid, player: TeamId) -> String {
    render_with(grid, |location| {
        grid.unit_at(location).map(|unit| unit_glyph(unit, player))
    })
}

/// One line per unit in creation order.
#[must_use]
pub fn render_unit_list(grid: &Grid) -> String {
    let mut out = String::new();
    for unit in grid.units() {
        let health = unit.health();
        let _ = writeln!(
            out,
            "{} {} ({}) {} at {} hp {}/{}",
            unit.id(),
            unit.name(),
            unit.template(),
            unit.owner(),
            unit.location(),
            health.current(),
            health.natural(),
        );
    }
    out
}

/// Render the move and action target sets of the unit at `location`.
pub fn render_ranges(grid: &Grid, location: Location, player: TeamId) -> Result<String> {
    let unit = grid.unit_at(location).ok_or(ToolError::NoUnit(location))?;
    let moves: BTreeSet<Location> = unit.legal_move_targets(grid).into_iter().collect();
    let actions: BTreeSet<Location> = unit.legal_action_targets(grid).into_iter().collect();

    Ok(render_with(grid, |cell| {
        if let Some(occupant) = grid.unit_at(cell) {
            return Some(unit_glyph(occupant, player));
        }
        match (moves.contains(&cell), actions.contains(&cell)) {
            (true, true) => Some('x'),
            (true, false) => Some('m'),
            (false, true) => Some('a'),
            (false, false) => None,
        }
    }))
}
