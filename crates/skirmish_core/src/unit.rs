//! Per-unit state: health, movement budget, action flag and pending
//! projectiles.
//!
//! A [`Unit`] never holds a reference to the [`Grid`] it stands on. Queries
//! that need occupancy take the grid as an argument, and mutations that
//! touch other units are driven by the grid (see [`Grid::try_move`],
//! [`Grid::try_action`], [`Grid::fire_projectiles`] and
//! [`Grid::resolve_projectile`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::is_valid_target;
use crate::error::{Result, TacticsError};
use crate::grid::Grid;
use crate::location::{Direction, Location};
use crate::shape::locations_in_pattern;
use crate::team::TeamId;
use crate::template::{ActionSpec, MovementSpec, RangedSpec, RangedTargeting, UnitTemplate};

/// Unique identifier for a unit on a grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct UnitId(u64);

impl UnitId {
    /// Create a unit id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an in-flight projectile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Create a projectile id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bounded stat. `current` always stays within `[0, natural]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stat {
    current: u32,
    natural: u32,
}

impl Stat {
    /// Create a stat at its natural value.
    #[must_use]
    pub const fn full(natural: u32) -> Self {
        Self {
            current: natural,
            natural,
        }
    }

    /// Create a stat with an explicit current value, clamped to `natural`.
    #[must_use]
    pub fn new(current: u32, natural: u32) -> Self {
        Self {
            current: current.min(natural),
            natural,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Natural (maximum) value.
    #[must_use]
    pub const fn natural(&self) -> u32 {
        self.natural
    }

    /// Shift the current value by `amount`, clamped to `[0, natural]`.
    pub fn modify_current(&mut self, amount: i64) {
        let shifted = i64::from(self.current) + amount;
        self.current = shifted.clamp(0, i64::from(self.natural)) as u32;
    }
}

/// A pending ranged effect owned by the unit that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Projectile {
    /// Identity used to resolve the projectile on arrival.
    pub id: ProjectileId,
    /// Where the shooter stood when it fired.
    pub origin: Location,
    /// Cell the projectile flies to.
    pub target: Location,
}

/// A combatant on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    template: String,
    name: String,
    image_key: String,
    owner: TeamId,
    location: Location,
    health: Stat,
    movement: MovementSpec,
    action: ActionSpec,
    ranged: Option<RangedSpec>,
    used_move_count: u32,
    used_action: bool,
    forced_used_move: bool,
    projectiles: Vec<Projectile>,
}

impl Unit {
    pub(crate) fn from_template(
        id: UnitId,
        key: &str,
        template: &UnitTemplate,
        owner: TeamId,
        location: Location,
    ) -> Self {
        Self {
            id,
            template: key.to_string(),
            name: template.name.clone(),
            image_key: template.image_key.clone(),
            owner,
            location,
            health: Stat::full(template.health),
            movement: template.movement.clone(),
            action: template.action.clone(),
            ranged: template.ranged.clone(),
            used_move_count: 0,
            used_action: false,
            forced_used_move: false,
            projectiles: Vec::new(),
        }
    }

    /// Unit identifier.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Key of the template this unit was created from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sprite key.
    #[must_use]
    pub fn image_key(&self) -> &str {
        &self.image_key
    }

    /// Owning team.
    #[must_use]
    pub const fn owner(&self) -> TeamId {
        self.owner
    }

    /// Current cell.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Health stat.
    #[must_use]
    pub const fn health(&self) -> Stat {
        self.health
    }

    /// Movement definition.
    #[must_use]
    pub const fn movement(&self) -> &MovementSpec {
        &self.movement
    }

    /// Direct action definition.
    #[must_use]
    pub const fn action(&self) -> &ActionSpec {
        &self.action
    }

    /// Projectile action definition, if any.
    #[must_use]
    pub const fn ranged(&self) -> Option<&RangedSpec> {
        self.ranged.as_ref()
    }

    /// Distance moved so far this turn.
    #[must_use]
    pub const fn used_move_count(&self) -> u32 {
        self.used_move_count
    }

    /// Movement left this turn, ignoring the forced flag.
    #[must_use]
    pub const fn remaining_move(&self) -> u32 {
        self.movement.range.saturating_sub(self.used_move_count)
    }

    /// True once the full budget is spent or movement was force-locked.
    #[must_use]
    pub const fn used_move(&self) -> bool {
        self.forced_used_move || self.used_move_count == self.movement.range
    }

    /// True once the unit has acted this turn.
    #[must_use]
    pub const fn used_action(&self) -> bool {
        self.used_action
    }

    /// True once the action is spent or a volley is in flight.
    ///
    /// This is the per-turn action budget: a unit with pending projectiles
    /// may not act or fire again until the turn resets.
    #[must_use]
    pub fn action_committed(&self) -> bool {
        self.used_action || !self.projectiles.is_empty()
    }

    /// True if [`Unit::force_used_move`] locked movement this turn.
    #[must_use]
    pub const fn forced_used_move(&self) -> bool {
        self.forced_used_move
    }

    /// Projectiles fired but not yet resolved.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// True when health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health.current() == 0
    }

    /// Lock movement for the rest of the turn without spending the budget.
    pub fn force_used_move(&mut self) {
        self.forced_used_move = true;
    }

    /// Clear per-turn budgets.
    pub fn reset(&mut self) {
        self.used_move_count = 0;
        self.used_action = false;
        self.forced_used_move = false;
    }

    /// Remove `amount` health, clamped at zero.
    pub fn damage(&mut self, amount: u32) {
        self.health.modify_current(-i64::from(amount));
    }

    /// Restore `amount` health, clamped at natural.
    pub fn heal(&mut self, amount: u32) {
        self.health.modify_current(i64::from(amount));
    }

    /// Cells the movement shape covers at full range, in bounds and empty.
    ///
    /// The shape is enumerated at the configured range rather than the
    /// remaining budget; [`Unit::check_move`] enforces the budget.
    #[must_use]
    pub fn legal_move_targets(&self, grid: &Grid) -> Vec<Location> {
        locations_in_pattern(self.location, self.movement.pattern, self.movement.range)
            .into_iter()
            .filter(|&loc| grid.is_in_bounds(loc))
            .filter(|&loc| !grid.is_occupied(loc))
            .collect()
    }

    /// Cells the action shape covers, in bounds, excluding the unit's own.
    #[must_use]
    pub fn legal_action_targets(&self, grid: &Grid) -> Vec<Location> {
        locations_in_pattern(self.location, self.action.pattern, self.action.range)
            .into_iter()
            .filter(|&loc| grid.is_in_bounds(loc))
            .filter(|&loc| loc != self.location)
            .collect()
    }

    /// Validate a move and return its cost.
    pub fn check_move(&self, target: Location, grid: &Grid) -> Result<u32> {
        if self.used_move() {
            return Err(TacticsError::MoveExhausted(self.id));
        }
        if grid.is_occupied(target) {
            return Err(TacticsError::OccupiedCell(target));
        }
        if !grid.is_in_bounds(target) {
            return Err(TacticsError::OutOfBounds(target));
        }

        let distance = self.location.manhattan_distance(target);
        if self.used_move_count + distance > self.movement.range {
            return Err(TacticsError::MoveBudgetExceeded {
                unit: self.id,
                required: distance,
                remaining: self.remaining_move(),
            });
        }

        Ok(distance)
    }

    /// Validate a direct action and return the targeted unit.
    pub fn check_action(&self, target: Location, grid: &Grid) -> Result<UnitId> {
        if self.action_committed() {
            return Err(TacticsError::ActionAlreadyUsed(self.id));
        }

        let occupant = grid.unit_at(target);
        if !is_valid_target(self.action.target_type, self.owner, occupant) {
            return Err(TacticsError::InvalidTarget(target));
        }

        occupant
            .map(Unit::id)
            .ok_or(TacticsError::InvalidTarget(target))
    }

    /// Cells the projectile action would fire at right now.
    ///
    /// Empty if the unit has no projectile action or nothing qualifies.
    #[must_use]
    pub fn ranged_targets(&self, grid: &Grid) -> Vec<Location> {
        let Some(spec) = &self.ranged else {
            return Vec::new();
        };

        let qualifies = |loc: Location| {
            is_valid_target(spec.target_type, self.owner, grid.unit_at(loc))
        };

        match spec.targeting {
            RangedTargeting::CrossRays => Direction::CROSS
                .iter()
                .filter_map(|&dir| grid.find_first_unit_along_direction(self.location, dir))
                .filter(|&loc| qualifies(loc))
                .collect(),
            RangedTargeting::NearestEnemy => grid
                .closest_unit_matching(self.location, |unit| unit.owner != self.owner)
                .map(Unit::location)
                .filter(|&loc| qualifies(loc))
                .into_iter()
                .collect(),
            RangedTargeting::Pattern { pattern, range } => {
                locations_in_pattern(self.location, pattern, range)
                    .into_iter()
                    .filter(|&loc| loc != self.location && grid.is_in_bounds(loc))
                    .filter(|&loc| qualifies(loc))
                    .collect()
            }
        }
    }

    pub(crate) fn commit_move(&mut self, target: Location, distance: u32) {
        self.location = target;
        self.used_move_count += distance;
    }

    pub(crate) fn mark_action_used(&mut self) {
        self.used_action = true;
    }

    pub(crate) fn queue_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub(crate) fn take_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        let index = self.projectiles.iter().position(|p| p.id == id)?;
        Some(self.projectiles.remove(index))
    }
}
