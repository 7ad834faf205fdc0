//! `forge_core` — deterministic progression/economy engine.
//!
//! No IO, no network, no clocks. Elapsed time is always passed in by the
//! caller; all quantities flow through the big-number adapter in [`num`].

mod accrual;
mod cost;
mod economy;
mod engine;
pub mod num;
mod reset;
mod snapshot;
mod types;

pub use accrual::{advance, offline_catch_up, touch};
pub use cost::{
    bulk_cost, can_afford, cost_scaling, generator_scaling, max_affordable, refresh_costs,
    unit_cost,
};
pub use economy::{
    energy_from_stardust_multiplier, energy_per_click, energy_per_second,
    global_upgrade_multiplier, offline_boost_multiplier, stardust_multiplier,
};
pub use engine::{apply_command, envelope, step};
pub use num::Num;
pub use reset::{
    ascend, ascension_payout, ascension_requirement, can_ascend, can_prestige, prestige,
    prestige_requirement,
};
pub use snapshot::{from_lean, to_lean, LeanSnapshot, OwnedCount, PrestigeSnapshot, StatisticsSnapshot};
pub use types::*;

pub(crate) fn emit(counters: &mut Counters, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, event }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

#[cfg(test)]
mod tests;
