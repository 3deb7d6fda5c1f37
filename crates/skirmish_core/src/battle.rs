//! Battle phase and turn counter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    /// The player places units on deployment tiles.
    #[default]
    Deployment,
    /// Units move and act.
    Fight,
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployment => write!(f, "deployment"),
            Self::Fight => write!(f, "fight"),
        }
    }
}

/// Phase state plus the turn counter.
///
/// The phase only ever moves from deployment to fight. The turn counter is
/// advanced by whoever runs the turn loop; the battle never increments it
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Battle {
    phase: BattlePhase,
    turn: u32,
}

impl Battle {
    /// A battle in deployment at turn 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: BattlePhase::Deployment,
            turn: 0,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Current turn number.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Check if the battle is in deployment.
    #[must_use]
    pub const fn is_deployment(&self) -> bool {
        matches!(self.phase, BattlePhase::Deployment)
    }

    /// Check if the battle is in the fight phase.
    #[must_use]
    pub const fn is_fight(&self) -> bool {
        matches!(self.phase, BattlePhase::Fight)
    }

    /// End deployment. Returns true if the phase changed.
    pub fn finish_deployment(&mut self) -> bool {
        if self.phase != BattlePhase::Deployment {
            return false;
        }
        self.phase = BattlePhase::Fight;
        tracing::info!(turn = self.turn, "Deployment finished");
        true
    }

    /// Advance the turn counter and return the new turn.
    pub fn advance_turn(&mut self) -> u32 {
        self.turn += 1;
        tracing::info!(turn = self.turn, "Turn advanced");
        self.turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_battle_in_deployment() {
        let battle = Battle::new();
        assert!(battle.is_deployment());
        assert_eq!(battle.turn(), 0);
        assert_eq!(Battle::default(), battle);
    }

    #[test]
    fn test_finish_deployment_is_one_way() {
        let mut battle = Battle::new();
        assert!(battle.finish_deployment());
        assert_eq!(battle.phase(), BattlePhase::Fight);

        assert!(!battle.finish_deployment());
        assert_eq!(battle.phase(), BattlePhase::Fight);
    }

    #[test]
    fn test_turn_is_advanced_externally() {
        let mut battle = Battle::new();
        battle.finish_deployment();
        assert_eq!(battle.turn(), 0);
        assert_eq!(battle.advance_turn(), 1);
        assert_eq!(battle.advance_turn(), 2);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(BattlePhase::Fight.to_string(), "fight");
    }
}
