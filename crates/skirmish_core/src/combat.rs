//! Target filtering and effect resolution.
//!
//! Direct actions and arriving projectiles share the same resolution path:
//! 1. **Hit** - apply on-hit damage to the occupant
//! 2. **Death check** - remove the occupant if its health reached zero
//! 3. **Kill effect** - apply on-kill (summon) at the vacated cell
//!
//! The order is fixed and always completes within one call.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TacticsError};
use crate::grid::{CreateUnit, Grid};
use crate::location::Location;
use crate::team::TeamId;
use crate::template::{ActionSpec, DamageType, OnHit, OnKill, RangedSpec, TargetType};
use crate::unit::{Unit, UnitId};

/// Check whether `occupant` passes the `target_type` filter for `actor`.
#[must_use]
pub fn is_valid_target(target_type: TargetType, actor: TeamId, occupant: Option<&Unit>) -> bool {
    match (target_type, occupant) {
        (_, None) => false,
        (TargetType::EnemyUnit, Some(unit)) => unit.owner() != actor,
        (TargetType::AllyUnit, Some(unit)) => unit.owner() == actor,
        (TargetType::AnyUnit, Some(_)) => true,
    }
}

/// The resolvable part of an action or projectile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Occupants the effect may touch.
    pub target_type: TargetType,
    /// Damage on hit.
    pub on_hit: Option<OnHit>,
    /// Follow-up on kill.
    pub on_kill: OnKill,
}

impl From<&ActionSpec> for Effect {
    fn from(spec: &ActionSpec) -> Self {
        Self {
            target_type: spec.target_type,
            on_hit: spec.on_hit,
            on_kill: spec.on_kill.clone(),
        }
    }
}

impl From<&RangedSpec> for Effect {
    fn from(spec: &RangedSpec) -> Self {
        Self {
            target_type: spec.target_type,
            on_hit: spec.on_hit,
            on_kill: spec.on_kill.clone(),
        }
    }
}

/// Outcome of one resolved hit, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Unit that acted.
    pub actor: UnitId,
    /// Unit that was hit.
    pub target: UnitId,
    /// Cell the hit landed on.
    pub location: Location,
    /// Health actually removed.
    pub damage: u32,
    /// Damage flavor.
    pub damage_type: DamageType,
    /// Whether the target died and was removed.
    pub killed: bool,
    /// Unit created by an on-kill summon.
    pub summoned: Option<UnitId>,
}

/// Apply `effect` from `actor` to the occupant of `location`.
///
/// The occupant must already have passed [`is_valid_target`].
pub(crate) fn apply_effect(
    grid: &mut Grid,
    actor: &Unit,
    effect: &Effect,
    location: Location,
) -> Result<ActionReport> {
    let target = grid
        .unit_at_mut(location)
        .ok_or(TacticsError::InvalidTarget(location))?;
    let target_id = target.id();

    let before = target.health().current();
    if let Some(hit) = effect.on_hit {
        target.damage(hit.damage);
    }
    let damage = before - target.health().current();
    let killed = target.is_dead();

    let mut summoned = None;
    if killed {
        grid.remove_unit(location);
        tracing::info!(actor = %actor.id(), target = %target_id, %location, "Unit killed");

        if let OnKill::Summon { template } = &effect.on_kill {
            let options = CreateUnit {
                owner: actor.owner(),
                override_existing: false,
            };
            match grid.create_unit(location, template, options) {
                Ok(id) => {
                    tracing::info!(actor = %actor.id(), summoned = %id, template = %template, "Unit summoned");
                    summoned = Some(id);
                }
                Err(e) => tracing::error!(template = %template, "Summon failed: {e}"),
            }
        }
    }

    Ok(ActionReport {
        actor: actor.id(),
        target: target_id,
        location,
        damage,
        damage_type: effect.on_hit.map(|hit| hit.damage_type).unwrap_or_default(),
        killed,
        summoned,
    })
}
