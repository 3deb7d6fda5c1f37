//! Test fixtures and helpers.
//!
//! A small sample roster and level shared by unit tests, integration tests,
//! and benchmarks, plus a scripted player for driving whole turns.

use serde::Deserialize;
use skirmish_core::prelude::*;

/// Sample roster covering every targeting rule and an on-kill summon.
pub const SAMPLE_UNITS: &str = r#"{
    "knight": UnitTemplate(
        name: "Knight",
        image_key: "knight",
        health: 10,
        movement: MovementSpec(name: "Walk", range: 3),
        action: ActionSpec(
            name: "Slash",
            range: 1,
            on_hit: Some(OnHit(damage: 4, damage_type: Slashing)),
        ),
    ),
    "archer": UnitTemplate(
        name: "Archer",
        image_key: "archer",
        health: 6,
        movement: MovementSpec(name: "Walk", range: 2),
        action: ActionSpec(name: "Stab", range: 1, on_hit: Some(OnHit(damage: 1))),
        ranged: Some(RangedSpec(
            name: "Arrow",
            targeting: NearestEnemy,
            on_hit: Some(OnHit(damage: 3)),
        )),
    ),
    "necromancer": UnitTemplate(
        name: "Necromancer",
        image_key: "necromancer",
        health: 8,
        movement: MovementSpec(name: "Walk", range: 2),
        action: ActionSpec(
            name: "Drain",
            pattern: Square,
            range: 1,
            on_hit: Some(OnHit(damage: 3, damage_type: Necrotic)),
            on_kill: Summon(template: "skeleton"),
        ),
        ranged: Some(RangedSpec(
            name: "Bone Spear",
            targeting: CrossRays,
            on_hit: Some(OnHit(damage: 2)),
        )),
    ),
    "cleric": UnitTemplate(
        name: "Cleric",
        image_key: "cleric",
        health: 7,
        movement: MovementSpec(name: "Walk", range: 2),
        action: ActionSpec(name: "Mend", range: 2, target_type: AllyUnit),
        ranged: Some(RangedSpec(
            name: "Holy Burst",
            targeting: Pattern(pattern: Cross, range: 2),
            on_hit: Some(OnHit(damage: 1)),
        )),
    ),
    "skeleton": UnitTemplate(
        name: "Skeleton",
        image_key: "skeleton",
        health: 4,
        movement: MovementSpec(name: "Shamble", range: 2),
        action: ActionSpec(
            name: "Claw",
            range: 1,
            on_hit: Some(OnHit(damage: 2, damage_type: Slashing)),
        ),
    ),
    "zombie": UnitTemplate(
        name: "Zombie",
        image_key: "zombie",
        health: 6,
        movement: MovementSpec(name: "Shamble", range: 1),
        action: ActionSpec(
            name: "Bite",
            range: 1,
            on_hit: Some(OnHit(damage: 2)),
            on_kill: Summon(template: "zombie"),
        ),
    ),
}"#;

/// Sample level: two enemies on the top row, deployment tiles on the bottom.
pub const SAMPLE_LEVEL: &str = r#"LevelTemplate(
    tiles: [
        "..s...z.",
        "........",
        "........",
        "........",
        "**.**.**",
    ],
    units: { 's': "skeleton", 'z': "zombie" },
)"#;

/// The sample roster.
///
/// # Panics
///
/// Panics if [`SAMPLE_UNITS`] fails to parse.
#[must_use]
pub fn sample_registry() -> UnitRegistry {
    UnitRegistry::from_ron(SAMPLE_UNITS).expect("sample units parse")
}

/// The sample level.
///
/// # Panics
///
/// Panics if [`SAMPLE_LEVEL`] fails to parse.
#[must_use]
pub fn sample_level() -> LevelTemplate {
    LevelTemplate::from_ron(SAMPLE_LEVEL).expect("sample level parses")
}

/// A fresh encounter on the sample level, still in deployment.
///
/// # Panics
///
/// Panics if the sample level does not build.
#[must_use]
pub fn sample_encounter() -> Encounter {
    Encounter::from_level(&sample_level(), &sample_registry(), RulesConfig::default())
        .expect("sample encounter builds")
}

/// The sample encounter with a knight, an archer, and a necromancer
/// deployed, already in the fight phase.
///
/// # Panics
///
/// Panics if deployment fails.
#[must_use]
pub fn deployed_encounter() -> Encounter {
    let mut encounter = sample_encounter();
    for (col, key) in [(0, "knight"), (3, "archer"), (7, "necromancer")] {
        encounter
            .deploy(Location::new(4, col), key)
            .expect("deploy on a deployment tile");
    }
    encounter.finish_deployment();
    encounter
}

/// An empty all-normal grid over the sample roster.
#[must_use]
pub fn open_grid(height: usize, width: usize) -> Grid {
    Grid::filled(height, width, Tile::normal(), sample_registry())
}

/// Units, level, and rules in a single RON document.
///
/// # Example RON
///
/// ```ron
/// (
///     units: { "skeleton": UnitTemplate(...) },
///     level: LevelTemplate(tiles: ["s.", "**"], units: { 's': "skeleton" }),
/// )
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Unit roster.
    pub units: UnitRegistry,
    /// Level layout.
    pub level: LevelTemplate,
    /// Rules; defaults when omitted.
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Scenario {
    /// Parse a scenario document.
    pub fn from_ron(source: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    /// Start an encounter from this scenario.
    pub fn encounter(&self) -> Result<Encounter> {
        Encounter::from_level(&self.level, &self.units, self.rules)
    }
}

/// Play one player turn with a fixed script, then end the turn.
///
/// Each player unit, in creation order, attacks the first legal target it
/// has. If it has none it steps toward the nearest enemy and tries again,
/// and failing that fires its projectile action and resolves every
/// projectile immediately. Returns `None` if the turn could not be ended.
pub fn auto_play_turn(encounter: &mut Encounter) -> Option<TurnReport> {
    let player = encounter.rules().player;
    let ids: Vec<UnitId> = encounter
        .grid()
        .units_owned_by(player)
        .map(Unit::id)
        .collect();

    for id in ids {
        if try_attack(encounter, id) {
            continue;
        }
        advance_toward_enemy(encounter, id);
        if try_attack(encounter, id) {
            continue;
        }
        let has_ranged = encounter
            .grid()
            .unit(id)
            .is_some_and(|unit| unit.ranged().is_some());
        if has_ranged {
            if let Ok(queued) = encounter.fire(id) {
                for projectile in queued {
                    if let Err(e) = encounter.resolve_projectile(id, projectile) {
                        tracing::trace!(unit = %id, %projectile, "Scripted resolve failed: {e}");
                    }
                }
            }
        }
    }

    encounter.end_turn().ok()
}

fn try_attack(encounter: &mut Encounter, id: UnitId) -> bool {
    let grid = encounter.grid();
    let Some(unit) = grid.unit(id) else {
        return false;
    };
    if unit.action_committed() || unit.action().target_type == TargetType::AllyUnit {
        return false;
    }
    let target = unit
        .legal_action_targets(grid)
        .into_iter()
        .find(|&loc| unit.check_action(loc, grid).is_ok());

    match target {
        Some(target) => encounter.act(id, target).is_ok(),
        None => false,
    }
}

fn advance_toward_enemy(encounter: &mut Encounter, id: UnitId) {
    let grid = encounter.grid();
    let Some(unit) = grid.unit(id) else {
        return;
    };
    let owner = unit.owner();
    let here = unit.location();
    let Some(quarry) = grid.closest_unit_matching(here, |other| other.owner() != owner) else {
        return;
    };
    let goal = quarry.location();

    let best = unit
        .legal_move_targets(grid)
        .into_iter()
        .filter(|&loc| unit.check_move(loc, grid).is_ok())
        .min_by_key(|loc| loc.manhattan_distance(goal));

    if let Some(target) = best {
        if target.manhattan_distance(goal) < here.manhattan_distance(goal) {
            if let Err(e) = encounter.move_unit(id, target) {
                tracing::trace!(unit = %id, %target, "Scripted move failed: {e}");
            }
        }
    }
}
