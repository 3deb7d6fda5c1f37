//! The root of a battle: grid, phase state, and rules.
//!
//! [`Encounter`] is what a presentation layer holds. It gates every
//! interaction on the battle phase and on unit ownership, then delegates to
//! the [`Grid`]:
//!
//! - **Deployment** - [`Encounter::deploy`] places player units on
//!   deployment tiles; [`Encounter::finish_deployment`] ends the phase
//! - **Fight** - [`Encounter::move_unit`], [`Encounter::act`],
//!   [`Encounter::fire`], [`Encounter::resolve_projectile`], and
//!   [`Encounter::end_turn`]
//!
//! # Example
//!
//! ```
//! use skirmish_core::prelude::*;
//!
//! let registry = UnitRegistry::from_ron(r#"{
//!     "knight": UnitTemplate(
//!         name: "Knight",
//!         image_key: "knight",
//!         health: 10,
//!         movement: MovementSpec(name: "Walk", range: 2),
//!         action: ActionSpec(name: "Slash", range: 1, on_hit: Some(OnHit(damage: 4))),
//!     ),
//! }"#).unwrap();
//! let level = LevelTemplate {
//!     tiles: vec!["k...".into(), "....".into(), "**..".into()],
//!     units: [('k', "knight".to_string())].into_iter().collect(),
//! };
//!
//! let mut encounter = Encounter::from_level(&level, &registry, RulesConfig::default()).unwrap();
//! let knight = encounter.deploy(Location::new(2, 0), "knight").unwrap();
//! encounter.finish_deployment();
//!
//! encounter.move_unit(knight, Location::new(1, 0)).unwrap();
//! let report = encounter.act(knight, Location::new(0, 0)).unwrap();
//! assert_eq!(report.damage, 4);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::battle::{Battle, BattlePhase};
use crate::combat::ActionReport;
use crate::config::RulesConfig;
use crate::enemy_turn::{run_enemy_turn, EnemyStep};
use crate::error::{Result, TacticsError};
use crate::grid::{CreateUnit, Grid};
use crate::level::LevelTemplate;
use crate::location::Location;
use crate::team::TeamId;
use crate::template::UnitRegistry;
use crate::unit::{ProjectileId, Unit, UnitId};

/// Snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// What happened when a turn ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number after advancing.
    pub turn: u32,
    /// Enemy movement, in the order it happened.
    pub enemy_steps: Vec<EnemyStep>,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    encounter: Encounter,
}

/// A battle in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    grid: Grid,
    battle: Battle,
    rules: RulesConfig,
}

impl Encounter {
    /// Start an encounter in deployment on an existing grid.
    #[must_use]
    pub fn new(grid: Grid, rules: RulesConfig) -> Self {
        Self {
            grid,
            battle: Battle::new(),
            rules,
        }
    }

    /// Build the grid from a level template and start in deployment.
    pub fn from_level(
        level: &LevelTemplate,
        registry: &UnitRegistry,
        rules: RulesConfig,
    ) -> Result<Self> {
        let grid = level.build_grid(registry, &rules)?;
        Ok(Self::new(grid, rules))
    }

    /// The battle grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The battle grid, for collaborators that drive it directly.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Phase and turn state.
    #[must_use]
    pub const fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Active rules.
    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    fn require_phase(&self, expected: BattlePhase) -> Result<()> {
        let actual = self.battle.phase();
        if actual == expected {
            Ok(())
        } else {
            Err(TacticsError::WrongPhase { expected, actual })
        }
    }

    fn player_unit(&self, id: UnitId) -> Result<&Unit> {
        let unit = self.grid.unit(id).ok_or(TacticsError::UnknownUnit(id))?;
        if unit.owner() != self.rules.player {
            return Err(TacticsError::NotOwnedByPlayer(id));
        }
        Ok(unit)
    }

    /// Place a player unit of template `key` on a deployment tile,
    /// replacing any unit already there.
    pub fn deploy(&mut self, location: Location, key: &str) -> Result<UnitId> {
        self.require_phase(BattlePhase::Deployment)?;
        if !self.grid.is_in_bounds(location) {
            return Err(TacticsError::OutOfBounds(location));
        }
        if !self.grid.is_deployable(location) {
            return Err(TacticsError::OutOfRange(location));
        }
        self.grid
            .create_unit(location, key, CreateUnit::overriding(self.rules.player))
    }

    /// End deployment and clear the deployment markers.
    ///
    /// Returns false if the battle was already in the fight phase.
    pub fn finish_deployment(&mut self) -> bool {
        if !self.battle.finish_deployment() {
            return false;
        }
        self.grid.clear_deployment_markers();
        true
    }

    /// Cells unit `id` could move to.
    pub fn legal_move_targets(&self, id: UnitId) -> Result<Vec<Location>> {
        self.grid
            .unit(id)
            .map(|unit| unit.legal_move_targets(&self.grid))
            .ok_or(TacticsError::UnknownUnit(id))
    }

    /// Cells unit `id` could act on.
    pub fn legal_action_targets(&self, id: UnitId) -> Result<Vec<Location>> {
        self.grid
            .unit(id)
            .map(|unit| unit.legal_action_targets(&self.grid))
            .ok_or(TacticsError::UnknownUnit(id))
    }

    /// Move a player unit to one of its legal move targets.
    pub fn move_unit(&mut self, id: UnitId, target: Location) -> Result<u32> {
        self.require_phase(BattlePhase::Fight)?;
        let unit = self.player_unit(id)?;
        unit.check_move(target, &self.grid)?;
        if !unit.legal_move_targets(&self.grid).contains(&target) {
            return Err(TacticsError::OutOfRange(target));
        }
        self.grid.try_move(id, target)
    }

    /// Lock a player unit's movement for the rest of the turn.
    pub fn lock_movement(&mut self, id: UnitId) -> Result<()> {
        self.require_phase(BattlePhase::Fight)?;
        self.player_unit(id)?;
        if let Some(unit) = self.grid.unit_mut(id) {
            unit.force_used_move();
        }
        Ok(())
    }

    /// Resolve a player unit's direct action on one of its legal targets.
    pub fn act(&mut self, id: UnitId, target: Location) -> Result<ActionReport> {
        self.require_phase(BattlePhase::Fight)?;
        let unit = self.player_unit(id)?;
        if unit.action_committed() {
            return Err(TacticsError::ActionAlreadyUsed(id));
        }
        if !unit.legal_action_targets(&self.grid).contains(&target) {
            return Err(TacticsError::OutOfRange(target));
        }
        self.grid.try_action(id, target)
    }

    /// Fire a player unit's projectile action.
    ///
    /// If nothing qualifies as a target the action is spent immediately,
    /// since no [`Encounter::resolve_projectile`] call will ever complete it.
    pub fn fire(&mut self, id: UnitId) -> Result<Vec<ProjectileId>> {
        self.require_phase(BattlePhase::Fight)?;
        self.player_unit(id)?;
        let queued = self.grid.fire_projectiles(id)?;
        if queued.is_empty() {
            self.grid.spend_action(id)?;
        }
        Ok(queued)
    }

    /// Apply an arrived projectile.
    pub fn resolve_projectile(
        &mut self,
        id: UnitId,
        projectile: ProjectileId,
    ) -> Result<Option<ActionReport>> {
        self.require_phase(BattlePhase::Fight)?;
        self.grid.resolve_projectile(id, projectile)
    }

    /// End the player's turn: reset budgets, move the enemy, advance the turn.
    pub fn end_turn(&mut self) -> Result<TurnReport> {
        self.require_phase(BattlePhase::Fight)?;

        let pending: usize = self.grid.units().iter().map(|u| u.projectiles().len()).sum();
        if pending > 0 {
            tracing::warn!(pending, "Ending turn with unresolved projectiles");
        }

        self.grid.reset_all_units();
        let enemy_steps = run_enemy_turn(&mut self.grid, self.rules.enemy, self.rules.player);
        let turn = self.battle.advance_turn();

        Ok(TurnReport { turn, enemy_steps })
    }

    /// The last team standing, once the fight has started.
    #[must_use]
    pub fn winner(&self) -> Option<TeamId> {
        if !self.battle.is_fight() {
            return None;
        }
        match self.grid.teams_present().as_slice() {
            [team] => Some(*team),
            _ => None,
        }
    }

    /// Serialize the encounter.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            encounter: self,
        };
        bincode::serialize(&snapshot)
            .map_err(|e| TacticsError::Snapshot(format!("Failed to serialize encounter: {e}")))
    }

    /// Restore an encounter from [`Encounter::snapshot`] bytes.
    pub fn restore(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = bincode::deserialize(bytes)
            .map_err(|e| TacticsError::Snapshot(format!("Failed to deserialize encounter: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(TacticsError::Snapshot(format!(
                "Unsupported snapshot version {}, expected {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        Ok(snapshot.encounter)
    }

    /// Hash of the full encounter state for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        match bincode::serialize(self) {
            Ok(bytes) => bytes.hash(&mut hasher),
            Err(e) => tracing::error!("Failed to encode encounter for hashing: {e}"),
        }
        hasher.finish()
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    encounter: &'a Encounter,
}
