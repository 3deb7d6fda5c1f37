//! Enemy end-of-turn movement.
//!
//! Each enemy walks toward the nearest opposing unit, one cell at a time,
//! until its movement budget runs out, the next cell is blocked, or it is
//! adjacent to its quarry. Paths are computed once per unit and never
//! replanned mid-walk.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::location::Location;
use crate::pathfinding::find_path;
use crate::team::TeamId;
use crate::unit::UnitId;

/// What one enemy did during its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStep {
    /// The enemy unit.
    pub unit: UnitId,
    /// Where it started.
    pub from: Location,
    /// Cells entered, in order. Empty if it stayed put.
    pub steps: Vec<Location>,
    /// Unit it walked toward.
    pub quarry: Option<UnitId>,
}

impl EnemyStep {
    /// Final cell after the walk.
    #[must_use]
    pub fn to(&self) -> Location {
        self.steps.last().copied().unwrap_or(self.from)
    }
}

/// Move every unit of `enemy` toward the closest unit of `opponent`.
///
/// Units act in creation order. Returns one record per enemy unit.
pub fn run_enemy_turn(grid: &mut Grid, enemy: TeamId, opponent: TeamId) -> Vec<EnemyStep> {
    let movers: Vec<UnitId> = grid.units_owned_by(enemy).map(|unit| unit.id()).collect();
    let mut report = Vec::with_capacity(movers.len());

    for id in movers {
        let Some(unit) = grid.unit(id) else {
            continue;
        };
        let from = unit.location();
        let mut step = EnemyStep {
            unit: id,
            from,
            steps: Vec::new(),
            quarry: None,
        };

        let Some(quarry) = grid.closest_unit_owned_by(from, opponent) else {
            report.push(step);
            continue;
        };
        let goal = quarry.location();
        step.quarry = Some(quarry.id());

        let walkable = |loc: Location| loc == goal || !grid.is_occupied(loc);
        let path = match find_path(grid, walkable, from, goal) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(unit = %id, %from, %goal, "Enemy has no path: {e}");
                report.push(step);
                continue;
            }
        };

        for next in path.into_iter().skip(1) {
            if next == goal {
                break;
            }
            if grid.try_move(id, next).is_err() {
                break;
            }
            step.steps.push(next);
        }

        tracing::debug!(unit = %id, %from, to = %step.to(), "Enemy moved");
        report.push(step);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CreateUnit, Tile};
    use crate::shape::ShapePattern;
    use crate::template::{ActionSpec, MovementSpec, OnKill, TargetType, UnitRegistry, UnitTemplate};

    fn registry() -> UnitRegistry {
        let mut registry = UnitRegistry::new();
        for (key, range) in [("slow", 1), ("fast", 3)] {
            registry.insert(
                key,
                UnitTemplate {
                    name: key.into(),
                    image_key: key.into(),
                    health: 5,
                    movement: MovementSpec {
                        name: "Walk".into(),
                        pattern: ShapePattern::Diamond,
                        range,
                    },
                    action: ActionSpec {
                        name: "Hit".into(),
                        pattern: ShapePattern::Diamond,
                        range: 1,
                        target_type: TargetType::EnemyUnit,
                        on_hit: None,
                        on_kill: OnKill::None,
                    },
                    ranged: None,
                },
            );
        }
        registry
    }

    fn spawn(grid: &mut Grid, key: &str, row: i32, col: i32, owner: TeamId) -> UnitId {
        grid.create_unit(Location::new(row, col), key, CreateUnit::owned_by(owner))
            .unwrap()
    }

    #[test]
    fn test_enemy_walks_up_to_budget() {
        let mut grid = Grid::filled(1, 8, Tile::normal(), registry());
        let enemy = spawn(&mut grid, "fast", 0, 0, TeamId::ENEMY);
        let player = spawn(&mut grid, "slow", 0, 7, TeamId::PLAYER);

        let report = run_enemy_turn(&mut grid, TeamId::ENEMY, TeamId::PLAYER);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].quarry, Some(player));
        assert_eq!(report[0].to(), Location::new(0, 3));
        assert_eq!(grid.unit(enemy).unwrap().location(), Location::new(0, 3));
        assert!(grid.unit(enemy).unwrap().used_move());
    }

    #[test]
    fn test_enemy_stops_next_to_quarry() {
        let mut grid = Grid::filled(1, 4, Tile::normal(), registry());
        let enemy = spawn(&mut grid, "fast", 0, 0, TeamId::ENEMY);
        spawn(&mut grid, "slow", 0, 2, TeamId::PLAYER);

        let report = run_enemy_turn(&mut grid, TeamId::ENEMY, TeamId::PLAYER);

        assert_eq!(report[0].steps, vec![Location::new(0, 1)]);
        assert_eq!(grid.unit(enemy).unwrap().used_move_count(), 1);
    }

    #[test]
    fn test_enemy_stops_when_blocked() {
        let mut grid = Grid::filled(1, 6, Tile::normal(), registry());
        let first = spawn(&mut grid, "slow", 0, 1, TeamId::ENEMY);
        let second = spawn(&mut grid, "fast", 0, 0, TeamId::ENEMY);
        spawn(&mut grid, "slow", 0, 5, TeamId::PLAYER);

        // The corridor is one cell wide, so the second enemy has no path
        // past the first and stays put.
        let report = run_enemy_turn(&mut grid, TeamId::ENEMY, TeamId::PLAYER);

        assert_eq!(report[0].unit, first);
        assert_eq!(report[0].to(), Location::new(0, 2));
        assert_eq!(report[1].unit, second);
        assert!(report[1].steps.is_empty());
        assert_eq!(grid.unit(second).unwrap().location(), Location::new(0, 0));
    }

    #[test]
    fn test_enemy_without_opponents_stays() {
        let mut grid = Grid::filled(3, 3, Tile::normal(), registry());
        spawn(&mut grid, "fast", 1, 1, TeamId::ENEMY);

        let report = run_enemy_turn(&mut grid, TeamId::ENEMY, TeamId::PLAYER);

        assert_eq!(report[0].quarry, None);
        assert_eq!(report[0].to(), Location::new(1, 1));
    }
}
