//! Shape patterns for movement and action ranges.
//!
//! Each pattern enumerates the locations around an origin within a radius.
//! No bounds filtering happens here; the grid does that.

use serde::{Deserialize, Serialize};

use crate::location::{Direction, Location};

/// Largest radius a shape is enumerated at. Larger radii are clamped.
pub const MAX_RADIUS: u32 = 256;

fn clamped(radius: u32) -> i32 {
    radius.min(MAX_RADIUS) as i32
}

/// Named rule for enumerating locations around an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapePattern {
    /// Manhattan ball.
    #[default]
    Diamond,
    /// Chebyshev ball.
    Square,
    /// The four axis rays.
    Cross,
}

impl ShapePattern {
    /// Enumerate the locations of this pattern around `origin`.
    #[must_use]
    pub fn locations(self, origin: Location, range: u32) -> Vec<Location> {
        locations_in_pattern(origin, self, range)
    }
}

/// Enumerate the locations covered by `pattern` at `range` from `origin`.
#[must_use]
pub fn locations_in_pattern(origin: Location, pattern: ShapePattern, range: u32) -> Vec<Location> {
    match pattern {
        ShapePattern::Diamond => diamond_radius(origin, range),
        ShapePattern::Square => square_radius(origin, range),
        ShapePattern::Cross => cross_radius(origin, range),
    }
}

/// All locations within Manhattan distance `radius` of `origin`.
///
/// Yields `2r² + 2r + 1` locations, row bands ordered outward from the origin.
/// `radius` is clamped to [`MAX_RADIUS`].
#[must_use]
pub fn diamond_radius(origin: Location, radius: u32) -> Vec<Location> {
    let radius = clamped(radius);
    let mut locations = Vec::with_capacity((2 * radius * radius + 2 * radius + 1) as usize);

    for i in 0..=radius {
        let span = radius - i;
        for col in (origin.col - span)..=(origin.col + span) {
            locations.push(Location::new(origin.row + i, col));
            if i != 0 {
                locations.push(Location::new(origin.row - i, col));
            }
        }
    }

    locations
}

/// All locations within Chebyshev distance `radius` of `origin`.
///
/// The square is `2r + 1` cells wide, enumerated row-major.
#[must_use]
pub fn square_radius(origin: Location, radius: u32) -> Vec<Location> {
    let radius = clamped(radius);
    let side = (2 * radius + 1) as usize;
    let mut locations = Vec::with_capacity(side * side);

    for row in (origin.row - radius)..=(origin.row + radius) {
        for col in (origin.col - radius)..=(origin.col + radius) {
            locations.push(Location::new(row, col));
        }
    }

    locations
}

/// The origin plus the four axis rays out to `radius`.
#[must_use]
pub fn cross_radius(origin: Location, radius: u32) -> Vec<Location> {
    let radius = clamped(radius);
    let mut locations = Vec::with_capacity(4 * radius as usize + 1);
    locations.push(origin);

    for distance in 1..=radius {
        for direction in [
            Direction::South,
            Direction::North,
            Direction::East,
            Direction::West,
        ] {
            locations.push(origin.offset_by(direction, distance));
        }
    }

    locations
}
