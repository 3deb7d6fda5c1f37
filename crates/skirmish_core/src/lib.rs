//! # Skirmish Core
//!
//! Turn-based tactical combat core for a grid game.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO (data is parsed from strings the caller supplies)
//! - No randomness
//! - No animation timing
//!
//! A presentation layer renders [`grid::Grid`] state and drives the core in
//! response to input and timer events. Projectile actions are split into a
//! fire step and a resolve step so the presenter can animate in between.
//!
//! ## Crate Structure
//!
//! - [`location`] and [`shape`] - coordinates and range patterns
//! - [`grid`] - tiles, unit ownership, occupancy queries
//! - [`unit`] - per-unit budgets, target validation, projectiles
//! - [`combat`] - target filters and hit/kill/summon resolution
//! - [`battle`] - deployment and fight phases
//! - [`pathfinding`] and [`enemy_turn`] - enemy movement
//! - [`template`], [`level`], [`config`] - data-driven setup
//! - [`encounter`] - the phase-gated root a presenter holds

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod combat;
pub mod config;
pub mod encounter;
pub mod enemy_turn;
pub mod error;
pub mod grid;
pub mod level;
pub mod location;
pub mod pathfinding;
pub mod shape;
pub mod team;
pub mod template;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{Battle, BattlePhase};
    pub use crate::combat::ActionReport;
    pub use crate::config::RulesConfig;
    pub use crate::encounter::{Encounter, TurnReport};
    pub use crate::enemy_turn::EnemyStep;
    pub use crate::error::{Result, TacticsError};
    pub use crate::grid::{CreateUnit, Grid, Tile, TileKind};
    pub use crate::level::LevelTemplate;
    pub use crate::location::{Direction, Location};
    pub use crate::shape::ShapePattern;
    pub use crate::team::TeamId;
    pub use crate::template::{
        ActionSpec, DamageType, MovementSpec, OnHit, OnKill, RangedSpec, RangedTargeting,
        TargetType, UnitRegistry, UnitTemplate,
    };
    pub use crate::unit::{Projectile, ProjectileId, Stat, Unit, UnitId};
}
