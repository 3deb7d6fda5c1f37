//! Grid pathfinding using the A* algorithm.
//!
//! Movement is 4-directional with unit step cost, matching the Manhattan
//! metric used for movement budgets. Ties are broken by coordinates so the
//! same query always yields the same path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{Result, TacticsError};
use crate::grid::Grid;
use crate::location::{Direction, Location};

/// A node in the A* open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct AStarNode {
    location: Location,
    /// f_score = g_score + heuristic
    f_score: u32,
    /// Tie-breaker for determinism: lower coordinates first.
    tie_breaker: (i32, i32),
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse for min-heap behavior.
        match other.f_score.cmp(&self.f_score) {
            Ordering::Equal => other.tie_breaker.cmp(&self.tie_breaker),
            ord => ord,
        }
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a walking path from `start` to `goal`.
///
/// `walkable` decides which cells may be entered; the start cell is always
/// allowed since the walker already stands there. The returned path begins
/// with `start` and ends with `goal`.
///
/// # Errors
///
/// - `OutOfBounds` if start or goal is outside the grid
/// - `NoPath` if the goal is not walkable or cannot be reached
pub fn find_path<F>(grid: &Grid, walkable: F, start: Location, goal: Location) -> Result<Vec<Location>>
where
    F: Fn(Location) -> bool,
{
    for location in [start, goal] {
        if !grid.is_in_bounds(location) {
            return Err(TacticsError::OutOfBounds(location));
        }
    }

    if start == goal {
        return Ok(vec![start]);
    }
    if !walkable(goal) {
        return Err(TacticsError::NoPath {
            from: start,
            to: goal,
        });
    }

    let mut open_set: BinaryHeap<AStarNode> = BinaryHeap::new();
    let mut came_from: HashMap<Location, Location> = HashMap::new();
    let mut g_score: HashMap<Location, u32> = HashMap::new();

    g_score.insert(start, 0);
    open_set.push(AStarNode {
        location: start,
        f_score: start.manhattan_distance(goal),
        tie_breaker: (start.row, start.col),
    });

    while let Some(current) = open_set.pop() {
        if current.location == goal {
            return Ok(reconstruct_path(&came_from, goal));
        }

        let current_g = g_score
            .get(&current.location)
            .copied()
            .unwrap_or(u32::MAX);

        for direction in Direction::CROSS {
            let neighbor = current.location.offset(direction);
            if !grid.is_in_bounds(neighbor) || !walkable(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_score.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.location);
                g_score.insert(neighbor, tentative_g);
                open_set.push(AStarNode {
                    location: neighbor,
                    f_score: tentative_g + neighbor.manhattan_distance(goal),
                    tie_breaker: (neighbor.row, neighbor.col),
                });
            }
        }
    }

    Err(TacticsError::NoPath {
        from: start,
        to: goal,
    })
}

/// Reconstruct path from came_from map.
fn reconstruct_path(came_from: &HashMap<Location, Location>, goal: Location) -> Vec<Location> {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}
