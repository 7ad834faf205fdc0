//! Derived-rate math: energy per second, energy per click, and the
//! multiplier stack.
//!
//! Everything here is a pure read over `(&GameState, &GameContent)`. The
//! composition order below is fixed: live ticks and offline catch-up fold
//! the same sequence, so identical inputs always produce identical results
//! under big-number rounding.

use crate::num::{self, Num};
use crate::types::{
    GameContent, GameState, ItemState, StardustEffect, UpgradeEffect,
};

/// Owned count for an item id, zero when the id is absent from state.
fn owned_of<K: std::hash::Hash + Eq>(items: &std::collections::HashMap<K, ItemState>, id: &K) -> Num {
    items.get(id).map_or_else(Num::zero, |item| item.owned)
}

/// Total owned level across upgrades with the given effect, zero if none.
fn stardust_upgrade_level(state: &GameState, content: &GameContent, effect: &StardustEffect) -> Num {
    content
        .stardust_upgrades
        .iter()
        .filter(|def| def.effect == *effect)
        .map(|def| owned_of(&state.stardust_upgrades, &def.id))
        .fold(Num::zero(), |acc, level| acc + level)
}

fn stardust_upgrade_multiplier(
    state: &GameState,
    content: &GameContent,
    effect: &StardustEffect,
) -> Num {
    content
        .stardust_upgrades
        .iter()
        .filter(|def| def.effect == *effect)
        .fold(Num::one(), |acc, def| {
            let level = owned_of(&state.stardust_upgrades, &def.id);
            if level > Num::zero() {
                acc * num::powf(def.base_multiplier, &level)
            } else {
                acc
            }
        })
}

/// Product of all global upgrades, `base_multiplier ^ level` each.
pub fn global_upgrade_multiplier(state: &GameState, content: &GameContent) -> Num {
    content
        .upgrades
        .iter()
        .filter(|def| def.effect == UpgradeEffect::Global)
        .fold(Num::one(), |acc, def| {
            let level = owned_of(&state.upgrades, &def.id);
            if level > Num::zero() {
                acc * num::powf(def.base_multiplier, &level)
            } else {
                acc
            }
        })
}

/// Product of all efficiency upgrades.
pub fn efficiency_multiplier(state: &GameState, content: &GameContent) -> Num {
    content
        .upgrades
        .iter()
        .filter(|def| def.effect == UpgradeEffect::Efficiency)
        .fold(Num::one(), |acc, def| {
            let level = owned_of(&state.upgrades, &def.id);
            if level > Num::zero() {
                acc * num::powf(def.base_multiplier, &level)
            } else {
                acc
            }
        })
}

/// `stardust_effect_base ^ stardust`, clamped through the log-form `pow`,
/// times the stardust-amplifier upgrade, times the prestige multiplier.
pub fn stardust_multiplier(state: &GameState, content: &GameContent) -> Num {
    let base = num::powf(content.constants.stardust_effect_base, &state.stardust);
    let amplifier = stardust_upgrade_multiplier(state, content, &StardustEffect::AmplifyStardust);
    base * amplifier * state.prestige.multiplier
}

/// Energy multiplier derived from the stardust balance. Inactive (1) until
/// the infusion upgrade is owned; then
/// `base_multiplier ^ level × (stardust + 1) ^ energy_from_stardust_exponent`.
pub fn energy_from_stardust_multiplier(state: &GameState, content: &GameContent) -> Num {
    let level = stardust_upgrade_level(state, content, &StardustEffect::EnergyFromStardust);
    if level == Num::zero() {
        return Num::one();
    }
    let leveled = stardust_upgrade_multiplier(state, content, &StardustEffect::EnergyFromStardust);
    let from_balance = num::pow(
        &(state.stardust + Num::one()),
        &Num::from_f64(content.constants.energy_from_stardust_exponent),
    );
    leveled * from_balance
}

/// Total level across synergy upgrades, with the multiplier of the first
/// owned one. `None` when no synergy upgrade is owned.
fn synergy_levels(state: &GameState, content: &GameContent) -> Option<(f64, Num)> {
    content
        .upgrades
        .iter()
        .filter(|def| def.effect == UpgradeEffect::Synergy)
        .find_map(|def| {
            let level = owned_of(&state.upgrades, &def.id);
            (level > Num::zero()).then_some((def.base_multiplier, level))
        })
}

/// Per-generator output fold shared by the rate calculation. Catalog order is
/// tier order, so "preceding tier" is simply the previous element.
fn generator_output_total(state: &GameState, content: &GameContent) -> Num {
    let synergy = synergy_levels(state, content);
    let mut total = Num::zero();
    let mut preceding_owned: Option<Num> = None;

    for def in &content.generators {
        let owned = owned_of(&state.generators, &def.id);
        let mut output = def.base_output * owned;

        for upgrade in &content.upgrades {
            if let UpgradeEffect::Generator { target } = &upgrade.effect {
                if target == &def.id {
                    let level = owned_of(&state.upgrades, &upgrade.id);
                    if level > Num::zero() {
                        output = output * num::powf(upgrade.base_multiplier, &level);
                    }
                }
            }
        }

        if let (Some(prev), Some((base, levels))) = (preceding_owned, &synergy) {
            let exponent = prev * *levels;
            if exponent > Num::zero() {
                output = output * num::powf(*base, &exponent);
            }
        }

        total = total + output;
        preceding_owned = Some(owned);
    }
    total
}

/// Passive generation rate: the generator fold times, in order, the global,
/// stardust, stardust-derived, and efficiency multipliers.
pub fn energy_per_second(state: &GameState, content: &GameContent) -> Num {
    generator_output_total(state, content)
        * global_upgrade_multiplier(state, content)
        * stardust_multiplier(state, content)
        * energy_from_stardust_multiplier(state, content)
        * efficiency_multiplier(state, content)
}

/// Manual-action yield: base click output through the same multiplier tail
/// as the passive rate.
pub fn energy_per_click(state: &GameState, content: &GameContent) -> Num {
    Num::from_f64(content.constants.base_click_output)
        * global_upgrade_multiplier(state, content)
        * stardust_multiplier(state, content)
        * energy_from_stardust_multiplier(state, content)
        * efficiency_multiplier(state, content)
}

/// Offline catch-up effectiveness, `base ^ level` of the offline-boost
/// stardust upgrade. 1 when unowned.
pub fn offline_boost_multiplier(state: &GameState, content: &GameContent) -> Num {
    stardust_upgrade_multiplier(state, content, &StardustEffect::OfflineBoost)
}
