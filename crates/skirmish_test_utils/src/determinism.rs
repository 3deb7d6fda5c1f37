//! Determinism testing utilities.
//!
//! Provides a harness for verifying that an encounter produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Replays and snapshot restores only work if the core is fully
//! deterministic. Sources of non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The core keeps units in a `Vec` in creation order and the registry in
//!   a `BTreeMap`.
//!
//! - **Pathfinding ties**: A* breaks equal costs on a fixed key, never on
//!   heap insertion order.
//!
//! - **System randomness**: the core has none.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual rules (move budget, targeting, kills)
//! 2. **Property tests**: random inputs must still produce deterministic outputs
//! 3. **Integration tests**: full scripted encounters are reproducible
//! 4. **Parallel tests**: running N encounters on threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use skirmish_core::encounter::Encounter;

use crate::fixtures::auto_play_turn;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of turns played.
    pub turns: u32,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>, turns: u32) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        Self {
            is_deterministic,
            hashes,
            turns,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic encounter).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Encounter is non-deterministic!\n\
                 Runs: {}\n\
                 Turns: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.turns,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a state machine multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `turns` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute a state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    turns: u32,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        for _ in 0..turns {
            step(&mut state);
        }
        hashes.push(hash(&state));
    }

    DeterminismResult::from_hashes(hashes, turns)
}

/// Play `turns` scripted turns of an encounter twice and compare hashes.
pub fn verify_encounter_determinism<F>(setup_fn: F, turns: u32) -> DeterminismResult
where
    F: Fn() -> Encounter,
{
    verify_determinism(
        2,
        turns,
        setup_fn,
        |encounter| {
            auto_play_turn(encounter);
        },
        Encounter::state_hash,
    )
}

/// Play N encounters on scoped threads and collect final hashes.
///
/// Catches non-determinism that only shows up under thread scheduling or
/// memory layout differences.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_encounters<F>(setup_fn: F, num_runs: usize, turns: u32) -> DeterminismResult
where
    F: Fn() -> Encounter + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_runs)
            .map(|_| {
                s.spawn(|| {
                    let mut encounter = setup_fn();
                    for _ in 0..turns {
                        auto_play_turn(&mut encounter);
                    }
                    encounter.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("encounter thread panicked"))
            .collect()
    });

    DeterminismResult::from_hashes(hashes, turns)
}

/// Compare two encounters turn by turn, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs match throughout, `Some(turn)` if they differ after
/// that many turns.
pub fn find_first_divergence<F>(setup_fn: F, turns: u32) -> Option<u32>
where
    F: Fn() -> Encounter,
{
    let mut first = setup_fn();
    let mut second = setup_fn();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for turn in 1..=turns {
        auto_play_turn(&mut first);
        auto_play_turn(&mut second);
        if first.state_hash() != second.state_hash() {
            return Some(turn);
        }
    }

    None
}

/// Verify that a snapshot mid-encounter restores to an encounter that
/// plays out identically to the original.
pub fn verify_snapshot_determinism<F>(setup_fn: F, turns_before: u32, turns_after: u32) -> bool
where
    F: Fn() -> Encounter,
{
    let mut original = setup_fn();
    for _ in 0..turns_before {
        auto_play_turn(&mut original);
    }

    let Ok(bytes) = original.snapshot() else {
        return false;
    };
    let Ok(mut restored) = Encounter::restore(&bytes) else {
        return false;
    };
    if restored.state_hash() != original.state_hash() {
        return false;
    }

    for _ in 0..turns_after {
        auto_play_turn(&mut original);
        auto_play_turn(&mut restored);
    }
    restored.state_hash() == original.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for grid and unit inputs.
pub mod strategies {
    use proptest::prelude::*;
    use skirmish_core::location::Location;
    use skirmish_core::shape::ShapePattern;

    /// Generate a location near the origin, including negative coordinates.
    pub fn arb_location() -> impl Strategy<Value = Location> {
        (-20i32..20, -20i32..20).prop_map(|(row, col)| Location::new(row, col))
    }

    /// Generate a location inside a `height` x `width` grid.
    pub fn arb_location_in(height: usize, width: usize) -> impl Strategy<Value = Location> {
        (0..height as i32, 0..width as i32).prop_map(|(row, col)| Location::new(row, col))
    }

    /// Generate any shape pattern.
    pub fn arb_pattern() -> impl Strategy<Value = ShapePattern> {
        prop_oneof![
            Just(ShapePattern::Diamond),
            Just(ShapePattern::Square),
            Just(ShapePattern::Cross),
        ]
    }

    /// Generate a range radius (0-6).
    pub fn arb_range() -> impl Strategy<Value = u32> {
        0u32..7
    }

    /// Generate a movement budget (1-5).
    pub fn arb_move_range() -> impl Strategy<Value = u32> {
        1u32..6
    }

    /// Generate health values (1-50).
    pub fn arb_health() -> impl Strategy<Value = u32> {
        1u32..50
    }

    /// Generate damage values (0-60).
    pub fn arb_damage() -> impl Strategy<Value = u32> {
        0u32..60
    }

    /// Generate a sequence of move targets inside a grid.
    pub fn arb_move_sequence(
        height: usize,
        width: usize,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<Location>> {
        proptest::collection::vec(arb_location_in(height, width), 0..max_len)
    }
}
