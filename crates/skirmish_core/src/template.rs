//! Data-driven unit templates.
//!
//! Templates describe a kind of unit: its health, how it moves, and what its
//! action does. A [`UnitRegistry`] maps template keys to templates and is
//! loaded from RON at battle setup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TacticsError};
use crate::shape::ShapePattern;

/// Which occupants an action may affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetType {
    /// A unit owned by another team.
    #[default]
    EnemyUnit,
    /// A unit owned by the acting team.
    AllyUnit,
    /// Any unit.
    AnyUnit,
}

/// Flavor tag for damage. Carried into reports; it has no mechanical effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DamageType {
    /// Plain damage.
    #[default]
    Normal,
    /// Blades and claws.
    Slashing,
    /// Life-draining magic.
    Necrotic,
}

/// Effect applied to the target when an action lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnHit {
    /// Health removed from the target.
    pub damage: u32,
    /// Damage flavor.
    #[serde(default)]
    pub damage_type: DamageType,
}

/// Effect applied when an action kills its target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnKill {
    /// Nothing happens.
    #[default]
    None,
    /// A unit of the given template rises where the target fell, owned by
    /// the killer.
    Summon {
        /// Template key of the summoned unit.
        template: String,
    },
}

/// How a unit moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSpec {
    /// Display name ("Walk", "Shamble").
    pub name: String,
    /// Shape of reachable cells.
    #[serde(default)]
    pub pattern: ShapePattern,
    /// Total distance the unit may cover per turn.
    pub range: u32,
}

/// A directly-resolved action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Display name ("Slash", "Bite").
    pub name: String,
    /// Shape of targetable cells.
    #[serde(default)]
    pub pattern: ShapePattern,
    /// Radius of the targeting shape.
    pub range: u32,
    /// Occupants the action may affect.
    #[serde(default)]
    pub target_type: TargetType,
    /// Effect on the target.
    #[serde(default)]
    pub on_hit: Option<OnHit>,
    /// Effect when the target dies.
    #[serde(default)]
    pub on_kill: OnKill,
}

/// How a ranged action picks the cells its projectiles fly to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangedTargeting {
    /// First unit along each of the four axis directions.
    CrossRays,
    /// The closest unit of another team.
    NearestEnemy,
    /// Every occupied cell of a shape around the shooter.
    Pattern {
        /// Shape of the blast.
        pattern: ShapePattern,
        /// Radius of the shape.
        range: u32,
    },
}

/// A deferred action that fires projectiles and resolves on arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedSpec {
    /// Display name ("Bone Spear").
    pub name: String,
    /// Target selection rule.
    pub targeting: RangedTargeting,
    /// Occupants the projectile may affect.
    #[serde(default)]
    pub target_type: TargetType,
    /// Effect on the target.
    #[serde(default)]
    pub on_hit: Option<OnHit>,
    /// Effect when the target dies.
    #[serde(default)]
    pub on_kill: OnKill,
}

/// Data-driven unit definition.
///
/// # Example RON
///
/// ```ron
/// UnitTemplate(
///     name: "Necromancer",
///     image_key: "necromancer",
///     health: 8,
///     movement: MovementSpec(name: "Walk", pattern: Diamond, range: 2),
///     action: ActionSpec(
///         name: "Drain",
///         pattern: Diamond,
///         range: 1,
///         target_type: EnemyUnit,
///         on_hit: Some(OnHit(damage: 3, damage_type: Necrotic)),
///         on_kill: Summon(template: "skeleton"),
///     ),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Display name.
    pub name: String,
    /// Sprite key for the presentation layer.
    pub image_key: String,
    /// Natural (maximum) health. Units spawn at full health.
    pub health: u32,
    /// Movement definition.
    pub movement: MovementSpec,
    /// Direct action definition.
    pub action: ActionSpec,
    /// Optional projectile action.
    #[serde(default)]
    pub ranged: Option<RangedSpec>,
}

impl UnitTemplate {
    /// Template keys this template can summon.
    pub fn summon_keys(&self) -> impl Iterator<Item = &str> {
        let direct = match &self.action.on_kill {
            OnKill::Summon { template } => Some(template.as_str()),
            OnKill::None => None,
        };
        let ranged = self.ranged.as_ref().and_then(|spec| match &spec.on_kill {
            OnKill::Summon { template } => Some(template.as_str()),
            OnKill::None => None,
        });
        direct.into_iter().chain(ranged)
    }
}

/// Registry of unit templates keyed by template key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitRegistry {
    templates: BTreeMap<String, UnitTemplate>,
}

impl UnitRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from a RON map of key to [`UnitTemplate`].
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| TacticsError::data_parse("unit registry", e))
    }

    /// Add or replace a template.
    pub fn insert(&mut self, key: impl Into<String>, template: UnitTemplate) {
        self.templates.insert(key.into(), template);
    }

    /// Look up a template by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&UnitTemplate> {
        self.templates.get(key)
    }

    /// Look up a template, failing with [`TacticsError::UnknownTemplate`].
    pub fn require(&self, key: &str) -> Result<&UnitTemplate> {
        self.get(key)
            .ok_or_else(|| TacticsError::UnknownTemplate(key.to_string()))
    }

    /// Template keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Iterate over `(key, template)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UnitTemplate)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Check that every summon refers to a known template.
    pub fn validate(&self) -> Result<()> {
        for (key, template) in self.iter() {
            for summon in template.summon_keys() {
                if self.get(summon).is_none() {
                    tracing::warn!(template = key, summon, "Summon refers to unknown template");
                    return Err(TacticsError::UnknownTemplate(summon.to_string()));
                }
            }
        }
        Ok(())
    }
}
