//! Battle rules configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TacticsError};
use crate::team::TeamId;

/// Which team is which, and how level templates mark tiles.
///
/// # Example RON
///
/// ```ron
/// RulesConfig(
///     player: 1,
///     enemy: 0,
///     deploy_marker: '*',
///     floor_marker: '.',
/// )
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Team controlled by the player.
    pub player: TeamId,
    /// Team placed by the level and moved by the enemy turn.
    pub enemy: TeamId,
    /// Level character for a deployment tile.
    pub deploy_marker: char,
    /// Level character for an empty floor tile.
    pub floor_marker: char,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            player: TeamId::PLAYER,
            enemy: TeamId::ENEMY,
            deploy_marker: '*',
            floor_marker: '.',
        }
    }
}

impl RulesConfig {
    /// Parse rules from RON. Missing fields take their defaults.
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| TacticsError::data_parse("rules config", e))
    }
}
