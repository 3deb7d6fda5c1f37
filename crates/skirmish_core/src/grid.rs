//! The battle grid: tiles plus the units standing on them.
//!
//! The grid is the sole owner of units. Units are created and destroyed
//! only through grid operations, and at most one unit occupies a cell.
//! Unit iteration order is creation order, which keeps nearest-unit ties
//! and enemy turn order deterministic.

use serde::{Deserialize, Serialize};

use crate::combat::{apply_effect, is_valid_target, ActionReport, Effect};
use crate::error::{Result, TacticsError};
use crate::location::{Direction, Location};
use crate::team::TeamId;
use crate::template::UnitRegistry;
use crate::unit::{Projectile, ProjectileId, Unit, UnitId};

/// Functional marker of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    /// Ordinary floor.
    #[default]
    Normal,
    /// Player deployment zone.
    Deployable,
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Tile marker.
    pub kind: TileKind,
}

impl Tile {
    /// An ordinary tile.
    #[must_use]
    pub const fn normal() -> Self {
        Self {
            kind: TileKind::Normal,
        }
    }

    /// A deployment tile.
    #[must_use]
    pub const fn deployable() -> Self {
        Self {
            kind: TileKind::Deployable,
        }
    }

    /// Check if this is a deployment tile.
    #[must_use]
    pub const fn is_deployable(&self) -> bool {
        matches!(self.kind, TileKind::Deployable)
    }
}

/// Options for [`Grid::create_unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateUnit {
    /// Team that owns the new unit.
    pub owner: TeamId,
    /// Replace a unit already standing on the cell.
    pub override_existing: bool,
}

impl CreateUnit {
    /// Create without overriding.
    #[must_use]
    pub const fn owned_by(owner: TeamId) -> Self {
        Self {
            owner,
            override_existing: false,
        }
    }

    /// Create, replacing any existing occupant.
    #[must_use]
    pub const fn overriding(owner: TeamId) -> Self {
        Self {
            owner,
            override_existing: true,
        }
    }
}

/// Tile matrix plus the unit collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
    width: usize,
    units: Vec<Unit>,
    registry: UnitRegistry,
    next_unit_id: u64,
    next_projectile_id: u64,
}

impl Grid {
    /// Build a grid from rows of tiles.
    ///
    /// Fails with [`TacticsError::DataParse`] if the rows differ in width.
    pub fn from_rows(rows: Vec<Vec<Tile>>, registry: UnitRegistry) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some(index) = rows.iter().position(|row| row.len() != width) {
            return Err(TacticsError::data_parse(
                "grid",
                format!(
                    "row {index} has {} tiles, expected {width}",
                    rows[index].len()
                ),
            ));
        }

        Ok(Self {
            rows,
            width,
            units: Vec::new(),
            registry,
            next_unit_id: 1,
            next_projectile_id: 1,
        })
    }

    /// Build a `height` x `width` grid filled with `tile`.
    #[must_use]
    pub fn filled(height: usize, width: usize, tile: Tile, registry: UnitRegistry) -> Self {
        Self {
            rows: vec![vec![tile; width]; height],
            width,
            units: Vec::new(),
            registry,
            next_unit_id: 1,
            next_projectile_id: 1,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Template registry used to create units.
    #[must_use]
    pub const fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// Check if a location is inside the grid.
    #[must_use]
    pub fn is_in_bounds(&self, location: Location) -> bool {
        location.row >= 0
            && location.col >= 0
            && (location.row as usize) < self.rows.len()
            && (location.col as usize) < self.width
    }

    /// Tile at a location, or `None` out of bounds.
    #[must_use]
    pub fn tile(&self, location: Location) -> Option<&Tile> {
        if !self.is_in_bounds(location) {
            return None;
        }
        self.rows
            .get(location.row as usize)
            .and_then(|row| row.get(location.col as usize))
    }

    /// Rows of tiles, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Check if the tile at `location` is a deployment cell.
    #[must_use]
    pub fn is_deployable(&self, location: Location) -> bool {
        self.tile(location).is_some_and(Tile::is_deployable)
    }

    /// All deployment cells in row-major order.
    #[must_use]
    pub fn deployable_locations(&self) -> Vec<Location> {
        self.locations()
            .filter(|&loc| self.is_deployable(loc))
            .collect()
    }

    /// Every in-bounds location in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.rows.len()).flat_map(move |row| {
            (0..self.width).map(move |col| Location::new(row as i32, col as i32))
        })
    }

    /// Turn every deployment cell into a normal one.
    pub fn clear_deployment_markers(&mut self) {
        for tile in self.rows.iter_mut().flatten() {
            tile.kind = TileKind::Normal;
        }
    }

    /// All units in creation order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    /// Look up a unit by id, mutably.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id() == id)
    }

    /// Unit standing at `location`.
    #[must_use]
    pub fn unit_at(&self, location: Location) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.location() == location)
    }

    /// Unit standing at `location`, mutably.
    pub fn unit_at_mut(&mut self, location: Location) -> Option<&mut Unit> {
        self.units
            .iter_mut()
            .find(|unit| unit.location() == location)
    }

    /// Check if a unit stands at `location`.
    #[must_use]
    pub fn is_occupied(&self, location: Location) -> bool {
        self.unit_at(location).is_some()
    }

    /// Create a unit of template `key` at `location`.
    ///
    /// Fails with `OutOfBounds`, `UnknownTemplate`, or `OccupiedCell` (unless
    /// `override_existing` is set, in which case the occupant is removed
    /// first).
    pub fn create_unit(
        &mut self,
        location: Location,
        key: &str,
        options: CreateUnit,
    ) -> Result<UnitId> {
        if !self.is_in_bounds(location) {
            return Err(TacticsError::OutOfBounds(location));
        }
        let template = self.registry.require(key)?;
        if self.is_occupied(location) && !options.override_existing {
            return Err(TacticsError::OccupiedCell(location));
        }

        let id = UnitId::new(self.next_unit_id);
        let unit = Unit::from_template(id, key, template, options.owner, location);

        if let Some(replaced) = self.remove_unit(location) {
            tracing::debug!(replaced = %replaced.id(), %location, "Replacing unit");
        }
        self.next_unit_id += 1;
        self.units.push(unit);

        tracing::debug!(unit = %id, template = key, owner = %options.owner, %location, "Unit created");
        Ok(id)
    }

    /// Remove the unit at `location`, if any.
    pub fn remove_unit(&mut self, location: Location) -> Option<Unit> {
        let index = self
            .units
            .iter()
            .position(|unit| unit.location() == location)?;
        Some(self.units.remove(index))
    }

    /// Clear every unit's per-turn movement and action budgets.
    pub fn reset_all_units(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
    }

    /// Walk from `origin` (exclusive) in `direction` and return the first
    /// occupied cell, or `None` on leaving the grid.
    #[must_use]
    pub fn find_first_unit_along_direction(
        &self,
        origin: Location,
        direction: Direction,
    ) -> Option<Location> {
        let mut current = origin.offset(direction);
        while self.is_in_bounds(current) {
            if self.is_occupied(current) {
                return Some(current);
            }
            current = current.offset(direction);
        }
        None
    }

    /// Units owned by `owner`, in creation order.
    pub fn units_owned_by(&self, owner: TeamId) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |unit| unit.owner() == owner)
    }

    /// Nearest unit owned by `owner` by Manhattan distance.
    ///
    /// Ties go to the unit created first.
    #[must_use]
    pub fn closest_unit_owned_by(&self, origin: Location, owner: TeamId) -> Option<&Unit> {
        self.closest_unit_matching(origin, |unit| unit.owner() == owner)
    }

    /// Nearest unit satisfying `predicate` by Manhattan distance.
    ///
    /// Ties go to the unit created first.
    pub fn closest_unit_matching<F>(&self, origin: Location, predicate: F) -> Option<&Unit>
    where
        F: Fn(&Unit) -> bool,
    {
        let mut closest: Option<(&Unit, u32)> = None;
        for unit in self.units.iter().filter(|unit| predicate(unit)) {
            let distance = unit.location().manhattan_distance(origin);
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((unit, distance));
            }
        }
        closest.map(|(unit, _)| unit)
    }

    /// Teams that still have at least one unit, sorted.
    #[must_use]
    pub fn teams_present(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = self.units.iter().map(Unit::owner).collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    fn require_unit(&self, id: UnitId) -> Result<&Unit> {
        self.unit(id).ok_or(TacticsError::UnknownUnit(id))
    }

    /// Move unit `id` to `target`, spending movement equal to the Manhattan
    /// distance. Returns the distance spent.
    ///
    /// On error nothing changes.
    pub fn try_move(&mut self, id: UnitId, target: Location) -> Result<u32> {
        let distance = match self.require_unit(id)?.check_move(target, self) {
            Ok(distance) => distance,
            Err(e) => {
                tracing::debug!(unit = %id, %target, "Move rejected: {e}");
                return Err(e);
            }
        };

        if let Some(unit) = self.unit_mut(id) {
            let from = unit.location();
            unit.commit_move(target, distance);
            tracing::debug!(unit = %id, %from, to = %target, distance, "Unit moved");
        }
        Ok(distance)
    }

    /// Resolve unit `id`'s direct action against the occupant of `target`.
    ///
    /// The action is spent whenever a valid target was found. On error
    /// nothing changes.
    pub fn try_action(&mut self, id: UnitId, target: Location) -> Result<ActionReport> {
        let actor = self.require_unit(id)?;
        if let Err(e) = actor.check_action(target, self) {
            tracing::debug!(unit = %id, %target, "Action rejected: {e}");
            return Err(e);
        }
        let actor = actor.clone();
        let effect = Effect::from(actor.action());

        let report = apply_effect(self, &actor, &effect, target)?;
        if let Some(unit) = self.unit_mut(id) {
            unit.mark_action_used();
        }
        Ok(report)
    }

    /// Mark unit `id`'s action as spent without resolving anything.
    pub fn spend_action(&mut self, id: UnitId) -> Result<()> {
        let unit = self.unit_mut(id).ok_or(TacticsError::UnknownUnit(id))?;
        unit.mark_action_used();
        Ok(())
    }

    /// Queue one projectile per target of unit `id`'s projectile action.
    ///
    /// Returns the new projectile ids; empty if nothing qualifies. Firing
    /// commits the action while the volley is pending but does not spend
    /// it. [`Grid::resolve_projectile`] does, so a
    /// caller that fires nothing must decide whether the turn is spent.
    pub fn fire_projectiles(&mut self, id: UnitId) -> Result<Vec<ProjectileId>> {
        let shooter = self.require_unit(id)?;
        if shooter.action_committed() {
            return Err(TacticsError::ActionAlreadyUsed(id));
        }
        let origin = shooter.location();
        let targets = shooter.ranged_targets(self);

        let mut queued = Vec::with_capacity(targets.len());
        for target in targets {
            let projectile = Projectile {
                id: ProjectileId::new(self.next_projectile_id),
                origin,
                target,
            };
            self.next_projectile_id += 1;
            if let Some(unit) = self.unit_mut(id) {
                unit.queue_projectile(projectile);
            }
            tracing::debug!(unit = %id, projectile = %projectile.id, %target, "Projectile queued");
            queued.push(projectile.id);
        }
        Ok(queued)
    }

    /// Resolve an arrived projectile and spend the shooter's action.
    ///
    /// Returns `None` when the cell no longer holds a valid target. An id
    /// that is not pending on the unit fails with `UnknownProjectile` and
    /// changes nothing, so resolving twice never applies damage twice.
    pub fn resolve_projectile(
        &mut self,
        id: UnitId,
        projectile: ProjectileId,
    ) -> Result<Option<ActionReport>> {
        let shooter = self
            .unit_mut(id)
            .ok_or(TacticsError::UnknownUnit(id))?;
        let Some(arrived) = shooter.take_projectile(projectile) else {
            tracing::error!(unit = %id, %projectile, "Resolved a projectile that is not pending");
            return Err(TacticsError::UnknownProjectile {
                unit: id,
                projectile,
            });
        };
        shooter.mark_action_used();

        let actor = shooter.clone();
        let Some(effect) = actor.ranged().map(Effect::from) else {
            return Ok(None);
        };
        if !is_valid_target(effect.target_type, actor.owner(), self.unit_at(arrived.target)) {
            tracing::debug!(unit = %id, %projectile, target = %arrived.target, "Projectile found no target");
            return Ok(None);
        }

        apply_effect(self, &actor, &effect, arrived.target).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapePattern;
    use crate::template::{
        ActionSpec, MovementSpec, OnHit, OnKill, RangedSpec, RangedTargeting, TargetType,
        UnitTemplate,
    };

    fn template(health: u32, damage: u32, on_kill: OnKill) -> UnitTemplate {
        UnitTemplate {
            name: "Soldier".into(),
            image_key: "soldier".into(),
            health,
            movement: MovementSpec {
                name: "Walk".into(),
                pattern: ShapePattern::Diamond,
                range: 3,
            },
            action: ActionSpec {
                name: "Strike".into(),
                pattern: ShapePattern::Diamond,
                range: 1,
                target_type: TargetType::EnemyUnit,
                on_hit: Some(OnHit {
                    damage,
                    ..OnHit::default()
                }),
                on_kill,
            },
            ranged: Some(RangedSpec {
                name: "Throw".into(),
                targeting: RangedTargeting::CrossRays,
                target_type: TargetType::EnemyUnit,
                on_hit: Some(OnHit {
                    damage: 2,
                    ..OnHit::default()
                }),
                on_kill: OnKill::None,
            }),
        }
    }

    fn registry() -> UnitRegistry {
        let mut registry = UnitRegistry::new();
        registry.insert("soldier", template(10, 5, OnKill::None));
        registry.insert(
            "necromancer",
            template(
                10,
                5,
                OnKill::Summon {
                    template: "zombie".into(),
                },
            ),
        );
        registry.insert("zombie", template(3, 1, OnKill::None));
        registry
    }

    fn grid() -> Grid {
        Grid::filled(6, 6, Tile::normal(), registry())
    }

    fn spawn(grid: &mut Grid, key: &str, row: i32, col: i32, owner: TeamId) -> UnitId {
        grid.create_unit(Location::new(row, col), key, CreateUnit::owned_by(owner))
            .unwrap()
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![Tile::normal(); 3], vec![Tile::normal(); 2]];
        let err = Grid::from_rows(rows, UnitRegistry::new()).unwrap_err();
        assert!(matches!(err, TacticsError::DataParse { .. }));
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::filled(2, 3, Tile::normal(), UnitRegistry::new());
        assert!(grid.is_in_bounds(Location::new(1, 2)));
        assert!(!grid.is_in_bounds(Location::new(2, 0)));
        assert!(!grid.is_in_bounds(Location::new(0, 3)));
        assert!(!grid.is_in_bounds(Location::new(-1, 0)));
        assert_eq!(grid.locations().count(), 6);
    }

    #[test]
    fn test_deployment_markers() {
        let rows = vec![
            vec![Tile::deployable(), Tile::normal()],
            vec![Tile::normal(), Tile::deployable()],
        ];
        let mut grid = Grid::from_rows(rows, UnitRegistry::new()).unwrap();

        assert!(grid.is_deployable(Location::new(0, 0)));
        assert!(!grid.is_deployable(Location::new(0, 1)));
        assert!(!grid.is_deployable(Location::new(5, 5)));
        assert_eq!(grid.deployable_locations().len(), 2);

        grid.clear_deployment_markers();
        assert!(grid.deployable_locations().is_empty());
    }

    #[test]
    fn test_create_unit_errors() {
        let mut grid = grid();
        spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);

        assert_eq!(
            grid.create_unit(Location::new(0, 0), "soldier", CreateUnit::owned_by(TeamId::ENEMY)),
            Err(TacticsError::OccupiedCell(Location::new(0, 0)))
        );
        assert_eq!(
            grid.create_unit(Location::new(9, 0), "soldier", CreateUnit::owned_by(TeamId::ENEMY)),
            Err(TacticsError::OutOfBounds(Location::new(9, 0)))
        );
        assert_eq!(
            grid.create_unit(Location::new(1, 1), "dragon", CreateUnit::owned_by(TeamId::ENEMY)),
            Err(TacticsError::UnknownTemplate("dragon".into()))
        );
        assert_eq!(grid.units().len(), 1);
    }

    #[test]
    fn test_create_unit_override() {
        let mut grid = grid();
        let first = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);
        let second = grid
            .create_unit(Location::new(0, 0), "zombie", CreateUnit::overriding(TeamId::PLAYER))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(grid.units().len(), 1);
        assert!(grid.unit(first).is_none());
        assert_eq!(grid.unit_at(Location::new(0, 0)).map(Unit::template), Some("zombie"));
    }

    #[test]
    fn test_remove_unit_is_noop_safe() {
        let mut grid = grid();
        assert!(grid.remove_unit(Location::new(1, 1)).is_none());
        spawn(&mut grid, "soldier", 1, 1, TeamId::PLAYER);
        assert!(grid.remove_unit(Location::new(1, 1)).is_some());
        assert!(grid.units().is_empty());
    }

    #[test]
    fn test_find_first_unit_along_direction() {
        let mut grid = grid();
        spawn(&mut grid, "soldier", 2, 5, TeamId::ENEMY);
        spawn(&mut grid, "soldier", 2, 4, TeamId::ENEMY);

        let origin = Location::new(2, 1);
        assert_eq!(
            grid.find_first_unit_along_direction(origin, Direction::East),
            Some(Location::new(2, 4))
        );
        assert_eq!(grid.find_first_unit_along_direction(origin, Direction::North), None);
        assert_eq!(grid.find_first_unit_along_direction(origin, Direction::West), None);
    }

    #[test]
    fn test_closest_unit_ties_go_to_first_created() {
        let mut grid = grid();
        let first = spawn(&mut grid, "soldier", 0, 2, TeamId::PLAYER);
        spawn(&mut grid, "soldier", 2, 0, TeamId::PLAYER);
        spawn(&mut grid, "soldier", 5, 5, TeamId::ENEMY);

        let closest = grid.closest_unit_owned_by(Location::new(0, 0), TeamId::PLAYER);
        assert_eq!(closest.map(Unit::id), Some(first));
        assert_eq!(grid.units_owned_by(TeamId::PLAYER).count(), 2);
        assert!(grid
            .closest_unit_owned_by(Location::new(0, 0), TeamId(7))
            .is_none());
    }

    #[test]
    fn test_multi_step_move_budget() {
        let mut grid = grid();
        let id = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);

        assert_eq!(grid.try_move(id, Location::new(0, 2)), Ok(2));
        assert_eq!(grid.try_move(id, Location::new(0, 3)), Ok(1));
        assert_eq!(
            grid.try_move(id, Location::new(0, 4)),
            Err(TacticsError::MoveExhausted(id))
        );

        let unit = grid.unit(id).unwrap();
        assert_eq!(unit.location(), Location::new(0, 3));
        assert_eq!(unit.used_move_count(), 3);
    }

    #[test]
    fn test_move_budget_exceeded_leaves_state() {
        let mut grid = grid();
        let id = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);

        assert_eq!(grid.try_move(id, Location::new(1, 1)), Ok(2));
        assert_eq!(
            grid.try_move(id, Location::new(3, 1)),
            Err(TacticsError::MoveBudgetExceeded {
                unit: id,
                required: 2,
                remaining: 1,
            })
        );
        assert_eq!(grid.unit(id).unwrap().location(), Location::new(1, 1));
    }

    #[test]
    fn test_move_onto_occupied_rejected() {
        let mut grid = grid();
        let id = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);
        spawn(&mut grid, "soldier", 0, 1, TeamId::ENEMY);

        assert_eq!(
            grid.try_move(id, Location::new(0, 1)),
            Err(TacticsError::OccupiedCell(Location::new(0, 1)))
        );
        assert_eq!(grid.unit(id).unwrap().used_move_count(), 0);
    }

    #[test]
    fn test_legal_move_targets_exclude_occupied_and_out_of_bounds() {
        let mut grid = grid();
        let id = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);
        spawn(&mut grid, "soldier", 1, 0, TeamId::ENEMY);

        let targets = grid.unit(id).unwrap().legal_move_targets(&grid);
        assert!(!targets.contains(&Location::new(0, 0)));
        assert!(!targets.contains(&Location::new(1, 0)));
        assert!(targets.iter().all(|&loc| grid.is_in_bounds(loc)));
        assert!(targets.contains(&Location::new(0, 3)));
        // 10 cells of the radius-3 diamond are in bounds; two are occupied.
        assert_eq!(targets.len(), 8);
    }

    #[test]
    fn test_legal_action_targets_exclude_self() {
        let mut grid = grid();
        let id = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);

        let targets = grid.unit(id).unwrap().legal_action_targets(&grid);
        assert_eq!(targets.len(), 2);
        assert!(!targets.contains(&Location::new(0, 0)));
    }

    #[test]
    fn test_action_kills_and_removes() {
        let mut registry = registry();
        registry.insert("victim", template(10, 0, OnKill::None));
        let mut grid = Grid::filled(4, 4, Tile::normal(), registry);
        let attacker = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);
        let victim = spawn(&mut grid, "victim", 0, 1, TeamId::ENEMY);
        grid.unit_mut(victim).unwrap().damage(5);

        let report = grid.try_action(attacker, Location::new(0, 1)).unwrap();

        assert_eq!(report.damage, 5);
        assert!(report.killed);
        assert_eq!(report.summoned, None);
        assert!(grid.unit(victim).is_none());
        assert!(grid.unit(attacker).unwrap().used_action());
    }

    #[test]
    fn test_action_against_ally_changes_nothing() {
        let mut grid = grid();
        let attacker = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);
        let ally = spawn(&mut grid, "soldier", 0, 1, TeamId::PLAYER);
        let before = grid.clone();

        assert_eq!(
            grid.try_action(attacker, Location::new(0, 1)),
            Err(TacticsError::InvalidTarget(Location::new(0, 1)))
        );
        assert_eq!(grid, before);
        assert_eq!(grid.unit(ally).unwrap().health().current(), 10);
    }

    #[test]
    fn test_action_only_once_per_turn() {
        let mut grid = grid();
        let attacker = spawn(&mut grid, "soldier", 0, 0, TeamId::PLAYER);
        let target = spawn(&mut grid, "soldier", 0, 1, TeamId::ENEMY);

        assert!(grid.try_action(attacker, Location::new(0, 1)).is_ok());
        assert_eq!(
            grid.try_action(attacker, Location::new(0, 1)),
            Err(TacticsError::ActionAlreadyUsed(attacker))
        );
        assert_eq!(grid.unit(target).unwrap().health().current(), 5);

        grid.reset_all_units();
        assert!(grid.try_action(attacker, Location::new(0, 1)).is_ok());
        assert!(grid.unit(target).is_none());
    }

    #[test]
    fn test_kill_summons_for_killer() {
        let mut grid = grid();
        let necromancer = spawn(&mut grid, "necromancer", 2, 2, TeamId::PLAYER);
        spawn(&mut grid, "zombie", 2, 3, TeamId::ENEMY);

        let report = grid.try_action(necromancer, Location::new(2, 3)).unwrap();
        let summoned = report.summoned.unwrap();

        let risen = grid.unit(summoned).unwrap();
        assert_eq!(risen.template(), "zombie");
        assert_eq!(risen.owner(), TeamId::PLAYER);
        assert_eq!(risen.location(), Location::new(2, 3));
        assert_eq!(
            grid.units()
                .iter()
                .filter(|u| u.location() == Location::new(2, 3))
                .count(),
            1
        );
    }

    #[test]
    fn test_projectile_resolves_once() {
        let mut grid = grid();
        let shooter = spawn(&mut grid, "soldier", 2, 0, TeamId::PLAYER);
        let target = spawn(&mut grid, "soldier", 2, 5, TeamId::ENEMY);

        let queued = grid.fire_projectiles(shooter).unwrap();
        assert_eq!(queued.len(), 1);
        assert!(!grid.unit(shooter).unwrap().used_action());
        assert_eq!(grid.unit(shooter).unwrap().projectiles()[0].target, Location::new(2, 5));

        let report = grid.resolve_projectile(shooter, queued[0]).unwrap().unwrap();
        assert_eq!(report.damage, 2);
        assert!(grid.unit(shooter).unwrap().used_action());
        assert!(grid.unit(shooter).unwrap().projectiles().is_empty());

        assert_eq!(
            grid.resolve_projectile(shooter, queued[0]),
            Err(TacticsError::UnknownProjectile {
                unit: shooter,
                projectile: queued[0],
            })
        );
        assert_eq!(grid.unit(target).unwrap().health().current(), 8);
    }

    #[test]
    fn test_cross_rays_skip_allies() {
        let mut grid = grid();
        let shooter = spawn(&mut grid, "soldier", 2, 2, TeamId::PLAYER);
        spawn(&mut grid, "soldier", 0, 2, TeamId::ENEMY);
        spawn(&mut grid, "soldier", 2, 4, TeamId::PLAYER);
        spawn(&mut grid, "soldier", 2, 5, TeamId::ENEMY);

        let queued = grid.fire_projectiles(shooter).unwrap();
        let targets: Vec<_> = grid
            .unit(shooter)
            .unwrap()
            .projectiles()
            .iter()
            .map(|p| p.target)
            .collect();

        assert_eq!(queued.len(), 1);
        assert_eq!(targets, vec![Location::new(0, 2)]);
    }

    #[test]
    fn test_fire_with_no_targets_queues_nothing() {
        let mut grid = grid();
        let shooter = spawn(&mut grid, "soldier", 2, 2, TeamId::PLAYER);

        assert_eq!(grid.fire_projectiles(shooter), Ok(Vec::new()));
        assert!(!grid.unit(shooter).unwrap().used_action());
    }

    #[test]
    fn test_projectile_fizzles_when_target_left() {
        let mut grid = grid();
        let shooter = spawn(&mut grid, "soldier", 2, 0, TeamId::PLAYER);
        let target = spawn(&mut grid, "soldier", 2, 5, TeamId::ENEMY);

        let queued = grid.fire_projectiles(shooter).unwrap();
        grid.try_move(target, Location::new(3, 5)).unwrap();

        assert_eq!(grid.resolve_projectile(shooter, queued[0]), Ok(None));
        assert!(grid.unit(shooter).unwrap().used_action());
        assert_eq!(grid.unit(target).unwrap().health().current(), 10);
    }

    #[test]
    fn test_second_volley_rejected_while_pending() {
        let mut grid = grid();
        let shooter = spawn(&mut grid, "soldier", 2, 0, TeamId::PLAYER);
        let target = spawn(&mut grid, "soldier", 2, 5, TeamId::ENEMY);

        let first = grid.fire_projectiles(shooter).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(
            grid.fire_projectiles(shooter),
            Err(TacticsError::ActionAlreadyUsed(shooter))
        );
        assert_eq!(grid.unit(shooter).unwrap().projectiles().len(), 1);

        grid.resolve_projectile(shooter, first[0]).unwrap();
        assert_eq!(grid.unit(target).unwrap().health().current(), 8);
        assert_eq!(
            grid.fire_projectiles(shooter),
            Err(TacticsError::ActionAlreadyUsed(shooter))
        );
    }

    #[test]
    fn test_strike_rejected_while_volley_pending() {
        let mut grid = grid();
        let shooter = spawn(&mut grid, "soldier", 2, 4, TeamId::PLAYER);
        let target = spawn(&mut grid, "soldier", 2, 5, TeamId::ENEMY);

        let queued = grid.fire_projectiles(shooter).unwrap();
        assert!(grid.unit(shooter).unwrap().action_committed());
        assert_eq!(
            grid.try_action(shooter, Location::new(2, 5)),
            Err(TacticsError::ActionAlreadyUsed(shooter))
        );
        assert_eq!(grid.unit(target).unwrap().health().current(), 10);

        grid.resolve_projectile(shooter, queued[0]).unwrap();
        assert_eq!(grid.unit(target).unwrap().health().current(), 8);

        grid.reset_all_units();
        assert!(!grid.unit(shooter).unwrap().action_committed());
        assert!(grid.try_action(shooter, Location::new(2, 5)).is_ok());
    }
}
