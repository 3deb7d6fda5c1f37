//! Error types for the tactics core.
//!
//! Most variants describe an *expected* outcome of normal play (a click on
//! a cell the unit cannot reach, an attack on an ally). They are returned
//! with state left untouched, and the presentation layer is free to ignore
//! them. See [`TacticsError::is_rejection`].

use thiserror::Error;

use crate::battle::BattlePhase;
use crate::location::Location;
use crate::unit::{ProjectileId, UnitId};

/// Result type alias using [`TacticsError`].
pub type Result<T> = std::result::Result<T, TacticsError>;

/// Top-level error type for the tactics core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TacticsError {
    /// Location lies outside the grid.
    #[error("Location {0} is out of bounds")]
    OutOfBounds(Location),

    /// Cell already holds a unit.
    #[error("Cell {0} is occupied")]
    OccupiedCell(Location),

    /// Occupant at the location fails the action's target filter, or the
    /// cell is empty.
    #[error("No valid target at {0}")]
    InvalidTarget(Location),

    /// Location is not among the unit's legal targets.
    #[error("Location {0} is out of range")]
    OutOfRange(Location),

    /// The unit already acted this turn.
    #[error("Unit {0} already used its action this turn")]
    ActionAlreadyUsed(UnitId),

    /// The unit's movement is spent or locked for this turn.
    #[error("Unit {0} has no movement left this turn")]
    MoveExhausted(UnitId),

    /// The requested move is longer than the remaining budget.
    #[error("Unit {unit} needs {required} movement but only {remaining} remains")]
    MoveBudgetExceeded {
        /// Moving unit.
        unit: UnitId,
        /// Distance of the requested move.
        required: u32,
        /// Movement left this turn.
        remaining: u32,
    },

    /// A projectile id that is not queued on the unit.
    ///
    /// This never arises from player input; it means the presentation
    /// layer resolved a projectile twice or against the wrong unit.
    #[error("Unit {unit} has no pending projectile {projectile}")]
    UnknownProjectile {
        /// Unit the projectile was resolved against.
        unit: UnitId,
        /// Projectile id that was not found.
        projectile: ProjectileId,
    },

    /// Unit id does not exist on the grid (it may have been killed).
    #[error("Unit not found: {0}")]
    UnknownUnit(UnitId),

    /// Template key missing from the registry.
    #[error("Unknown unit template: {0}")]
    UnknownTemplate(String),

    /// Operation not allowed in the current battle phase.
    #[error("Operation requires {expected} phase, battle is in {actual} phase")]
    WrongPhase {
        /// Phase the operation needs.
        expected: BattlePhase,
        /// Phase the battle is in.
        actual: BattlePhase,
    },

    /// The player tried to command a unit it does not own.
    #[error("Unit {0} is not controlled by the player")]
    NotOwnedByPlayer(UnitId),

    /// No walkable path between two locations.
    #[error("No path from {from} to {to}")]
    NoPath {
        /// Path start.
        from: Location,
        /// Path goal.
        to: Location,
    },

    /// Data file parsing error.
    #[error("Failed to parse {what}: {message}")]
    DataParse {
        /// What was being parsed.
        what: String,
        /// Error message.
        message: String,
    },

    /// Snapshot encoding or decoding failed.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl TacticsError {
    /// Returns true for outcomes of ordinary play that leave state unchanged.
    ///
    /// Callers driving the core from user input can treat these as no-ops.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds(_)
                | Self::OccupiedCell(_)
                | Self::InvalidTarget(_)
                | Self::OutOfRange(_)
                | Self::ActionAlreadyUsed(_)
                | Self::MoveExhausted(_)
                | Self::MoveBudgetExceeded { .. }
                | Self::WrongPhase { .. }
                | Self::NotOwnedByPlayer(_)
        )
    }

    pub(crate) fn data_parse(what: impl Into<String>, message: impl ToString) -> Self {
        Self::DataParse {
            what: what.into(),
            message: message.to_string(),
        }
    }
}
