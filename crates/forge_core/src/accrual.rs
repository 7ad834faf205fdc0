//! Real-time energy accrual: live ticks and offline catch-up.
//!
//! Elapsed time is always computed by the caller from a monotonic clock and
//! passed in; this module never reads a clock. A tick whose rate or
//! resulting balance is non-finite is discarded whole — corrupt values never
//! reach state.

use crate::economy;
use crate::num::Num;
use crate::types::{GameContent, GameState};

/// Advances energy by `rate × elapsed × rate_multiplier`, updating the
/// generation statistics and watermarks. Returns the gain, zero when the
/// tick was discarded.
fn credit(
    state: &mut GameState,
    content: &GameContent,
    elapsed_seconds: f64,
    rate_multiplier: &Num,
) -> Num {
    if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
        return Num::zero();
    }
    let rate = economy::energy_per_second(state, content) * *rate_multiplier;
    let gain = rate * Num::from_f64(elapsed_seconds);
    let next_energy = state.energy + gain;
    if !rate.is_finite() || !gain.is_finite() || !next_energy.is_finite() {
        return Num::zero();
    }

    state.energy = next_energy;
    state.statistics.total_energy_generated = state.statistics.total_energy_generated + gain;
    state.statistics.max_energy_reached = state.statistics.max_energy_reached.max(state.energy);
    state.statistics.total_time_played_seconds += elapsed_seconds;
    gain
}

/// One live tick. `elapsed_seconds` is the monotonic-clock time since the
/// previous tick.
pub fn advance(state: &mut GameState, content: &GameContent, elapsed_seconds: f64) -> Num {
    credit(state, content, elapsed_seconds, &Num::one())
}

/// One-shot catch-up for the time since the last persisted activity, capped
/// at the configured offline window and scaled by the offline-boost upgrade.
/// Uses the multipliers implied by the current (restored) state.
pub fn offline_catch_up(state: &mut GameState, content: &GameContent, now_ms: i64) -> Num {
    let elapsed_seconds = ((now_ms - state.meta.last_active_ms) as f64 / 1000.0)
        .clamp(0.0, content.constants.max_offline_seconds);
    let boost = economy::offline_boost_multiplier(state, content);
    let gain = credit(state, content, elapsed_seconds, &boost);
    if now_ms > state.meta.last_active_ms {
        state.meta.last_active_ms = now_ms;
    }
    gain
}

/// Stamps the last-activity timestamp. Called before each persisted write.
pub fn touch(state: &mut GameState, now_ms: i64) {
    if now_ms > state.meta.last_active_ms {
        state.meta.last_active_ms = now_ms;
    }
}
