//! Grid coordinates and cardinal directions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the battle grid.
///
/// Rows grow downward and columns grow rightward. Coordinates are signed so
/// that shape enumeration can produce locations off the grid edge; the grid
/// filters those out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Location {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl Location {
    /// Create a location from a row and column.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two locations.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Location one step away in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Location `distance` steps away in `direction`.
    #[must_use]
    pub const fn offset_by(self, direction: Direction, distance: i32) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr * distance, self.col + dc * distance)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Location {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// One of the four axis-aligned unit directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0.
    North,
    /// Toward higher rows.
    South,
    /// Toward higher columns.
    East,
    /// Toward column 0.
    West,
}

impl Direction {
    /// All cross directions in a fixed order.
    pub const CROSS: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// (row, col) delta for one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}
