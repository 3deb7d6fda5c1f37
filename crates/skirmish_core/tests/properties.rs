//! Property tests for geometry, movement budgets, and targeting.

use std::collections::HashSet;

use proptest::prelude::*;
use skirmish_core::pathfinding::find_path;
use skirmish_core::prelude::*;
use skirmish_test_utils::determinism::strategies::{
    arb_damage, arb_location, arb_location_in, arb_move_sequence, arb_pattern, arb_range,
};
use skirmish_test_utils::fixtures::open_grid;

const SIZE: usize = 7;

fn two_unit_grid(knight_at: Location, skeleton_at: Location) -> (Grid, UnitId) {
    let mut grid = open_grid(SIZE, SIZE);
    let knight = grid
        .create_unit(knight_at, "knight", CreateUnit::owned_by(TeamId::PLAYER))
        .unwrap();
    grid.create_unit(skeleton_at, "skeleton", CreateUnit::owned_by(TeamId::ENEMY))
        .unwrap();
    (grid, knight)
}

proptest! {
    #[test]
    fn prop_shape_cardinality(origin in arb_location(), range in arb_range()) {
        let r = range as usize;

        let diamond = ShapePattern::Diamond.locations(origin, range);
        prop_assert_eq!(diamond.len(), 2 * r * r + 2 * r + 1);
        prop_assert!(diamond.iter().all(|loc| loc.manhattan_distance(origin) <= range));

        let square = ShapePattern::Square.locations(origin, range);
        prop_assert_eq!(square.len(), (2 * r + 1) * (2 * r + 1));

        let cross = ShapePattern::Cross.locations(origin, range);
        prop_assert_eq!(cross.len(), 4 * r + 1);
        prop_assert!(cross.iter().all(|loc| loc.row == origin.row || loc.col == origin.col));
    }

    #[test]
    fn prop_shapes_have_no_duplicates(
        origin in arb_location(),
        pattern in arb_pattern(),
        range in arb_range(),
    ) {
        let cells = pattern.locations(origin, range);
        let unique: HashSet<_> = cells.iter().copied().collect();
        prop_assert_eq!(unique.len(), cells.len());
        prop_assert!(cells.contains(&origin));
    }

    #[test]
    fn prop_move_budget_never_exceeded(
        knight_at in arb_location_in(SIZE, SIZE),
        skeleton_at in arb_location_in(SIZE, SIZE),
        moves in arb_move_sequence(SIZE, SIZE, 8),
    ) {
        prop_assume!(knight_at != skeleton_at);
        let (mut grid, knight) = two_unit_grid(knight_at, skeleton_at);
        let range = grid.unit(knight).unwrap().movement().range;
        let mut spent = 0;

        for target in moves {
            let before = grid.clone();
            match grid.try_move(knight, target) {
                Ok(distance) => {
                    spent += distance;
                    prop_assert_eq!(grid.unit(knight).unwrap().location(), target);
                }
                Err(e) => {
                    prop_assert!(e.is_rejection());
                    prop_assert_eq!(&grid, &before);
                }
            }
            let unit = grid.unit(knight).unwrap();
            prop_assert_eq!(unit.used_move_count(), spent);
            prop_assert!(spent <= range);
            prop_assert_ne!(unit.location(), skeleton_at);
        }
    }

    #[test]
    fn prop_legal_move_targets_are_free(
        knight_at in arb_location_in(SIZE, SIZE),
        skeleton_at in arb_location_in(SIZE, SIZE),
    ) {
        prop_assume!(knight_at != skeleton_at);
        let (grid, knight) = two_unit_grid(knight_at, skeleton_at);
        let unit = grid.unit(knight).unwrap();

        for target in unit.legal_move_targets(&grid) {
            prop_assert!(grid.is_in_bounds(target));
            prop_assert!(!grid.is_occupied(target));
        }
        prop_assert!(!unit.legal_action_targets(&grid).contains(&knight_at));
    }

    #[test]
    fn prop_reset_clears_budgets(
        knight_at in arb_location_in(SIZE, SIZE),
        moves in arb_move_sequence(SIZE, SIZE, 4),
        force in any::<bool>(),
    ) {
        let mut grid = open_grid(SIZE, SIZE);
        let knight = grid
            .create_unit(knight_at, "knight", CreateUnit::owned_by(TeamId::PLAYER))
            .unwrap();
        for target in moves {
            let _ = grid.try_move(knight, target);
        }
        let unit = grid.unit_mut(knight).unwrap();
        if force {
            unit.force_used_move();
        }

        unit.reset();

        prop_assert_eq!(unit.used_move_count(), 0);
        prop_assert!(!unit.used_action());
        prop_assert!(!unit.forced_used_move());
        prop_assert!(!unit.used_move());
    }

    #[test]
    fn prop_damage_clamps_at_zero(damage in arb_damage()) {
        let mut grid = open_grid(1, 1);
        let knight = grid
            .create_unit(Location::new(0, 0), "knight", CreateUnit::owned_by(TeamId::PLAYER))
            .unwrap();
        let unit = grid.unit_mut(knight).unwrap();
        unit.damage(damage);

        prop_assert_eq!(unit.health().current(), 10u32.saturating_sub(damage));
        prop_assert_eq!(unit.is_dead(), damage >= 10);
        prop_assert_eq!(unit.health().natural(), 10);
    }

    #[test]
    fn prop_open_grid_paths_are_shortest(
        start in arb_location_in(SIZE, SIZE),
        goal in arb_location_in(SIZE, SIZE),
    ) {
        let grid = open_grid(SIZE, SIZE);
        let path = find_path(&grid, |loc| !grid.is_occupied(loc), start, goal).unwrap();

        prop_assert_eq!(path.first(), Some(&start));
        prop_assert_eq!(path.last(), Some(&goal));
        prop_assert_eq!(path.len() as u32, start.manhattan_distance(goal) + 1);
        prop_assert!(path.windows(2).all(|w| w[0].manhattan_distance(w[1]) == 1));
    }
}
