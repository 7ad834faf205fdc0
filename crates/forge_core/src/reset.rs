//! The two irreversible resets: ascension and prestige.
//!
//! Both are idempotent-safe no-ops when their eligibility test fails — an
//! ineligible call must never silently reset progress.

use crate::num::{self, Num};
use crate::types::{GameContent, GameState, PrestigeState};

pub fn ascension_requirement(content: &GameContent) -> Num {
    Num::from_f64(content.constants.ascension_requirement)
}

/// Stardust paid out by an ascension at the current energy:
/// `floor((energy / requirement) ^ ascension_exponent)`. Zero below the
/// requirement.
pub fn ascension_payout(state: &GameState, content: &GameContent) -> Num {
    let requirement = ascension_requirement(content);
    if state.energy < requirement {
        return Num::zero();
    }
    let ratio = state.energy / requirement;
    num::pow(&ratio, &Num::from_f64(content.constants.ascension_exponent)).floor()
}

pub fn can_ascend(state: &GameState, content: &GameContent) -> bool {
    state.energy >= ascension_requirement(content)
}

/// Converts energy progress into stardust. Generators, upgrades, and energy
/// reset to catalog defaults; stardust, stardust upgrades, prestige, and
/// statistics are retained (`total_ascensions` increments).
///
/// Returns the stardust gained, or `None` when ineligible (state untouched).
pub fn ascend(state: &mut GameState, content: &GameContent) -> Option<Num> {
    if !can_ascend(state, content) {
        return None;
    }
    let payout = ascension_payout(state, content);

    let fresh = GameState::new(content, state.meta.last_active_ms);
    state.energy = fresh.energy;
    state.generators = fresh.generators;
    state.upgrades = fresh.upgrades;

    state.stardust = state.stardust + payout;
    state.statistics.total_ascensions += 1;
    state.statistics.max_stardust_reached = state.statistics.max_stardust_reached.max(state.stardust);
    Some(payout)
}

/// Stardust required to reach prestige level `level + 1`:
/// `prestige_base_requirement ^ ((level + 1) × prestige_requirement_scaling)`.
pub fn prestige_requirement(content: &GameContent, level: u64) -> Num {
    let exponent = (level as f64 + 1.0) * content.constants.prestige_requirement_scaling;
    num::powf(
        content.constants.prestige_base_requirement,
        &Num::from_f64(exponent),
    )
}

pub fn can_prestige(state: &GameState, content: &GameContent) -> bool {
    state.stardust >= prestige_requirement(content, state.prestige.level)
}

/// Full reset to catalog defaults, carrying forward only statistics and the
/// strictly-increased prestige state.
///
/// Returns the new prestige level, or `None` when ineligible (state untouched).
pub fn prestige(state: &mut GameState, content: &GameContent) -> Option<u64> {
    if !can_prestige(state, content) {
        return None;
    }
    let level = state.prestige.level;
    let points = state.prestige.points
        + Num::from_f64((level as f64 + 1.0) * content.constants.prestige_points_per_level);
    let next = PrestigeState {
        level: level + 1,
        points,
        multiplier: num::powf(content.constants.prestige_multiplier_base, &points),
    };

    let statistics = state.statistics.clone();
    let counters = state.counters.clone();
    let mut fresh = GameState::new(content, state.meta.last_active_ms);
    fresh.prestige = next;
    fresh.statistics = statistics;
    fresh.counters = counters;
    *state = fresh;
    Some(state.prestige.level)
}
