//! Team identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for the side that owns a unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl TeamId {
    /// Units placed by the level template.
    pub const ENEMY: Self = Self(0);
    /// Units deployed by the player.
    pub const PLAYER: Self = Self(1);

    /// Get the display name for this team.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self.0 {
            0 => "Enemy",
            1 => "Player",
            _ => "Neutral",
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.display_name(), self.0)
    }
}
