//! Geometric cost curves: unit cost, bulk cost, and closed-form
//! "buy max" solving.

use crate::num::{self, Num};
use crate::types::{
    GameContent, GameState, ItemRef, ItemState, StardustEffect,
};

/// How close a scaling factor must be to 1 before the geometric series
/// degenerates to the linear form.
const UNIT_SCALING_EPSILON: f64 = 1e-9;

/// Resolved view of a purchasable item: everything the cost math needs,
/// independent of which family the item came from.
pub(crate) struct ItemView {
    pub base_cost: Num,
    pub scaling: f64,
    pub owned: Num,
    pub max_level: Option<u32>,
}

/// Looks an item up across the three families. `None` for unknown ids —
/// callers treat that as a rejected command, not a fault.
pub(crate) fn resolve(
    state: &GameState,
    content: &GameContent,
    item: &ItemRef,
) -> Option<ItemView> {
    match item {
        ItemRef::Generator(id) => {
            let def = content.generators.iter().find(|d| &d.id == id)?;
            let owned = owned_in(&state.generators, id)?;
            Some(ItemView {
                base_cost: def.base_cost,
                scaling: generator_scaling(state, content),
                owned,
                max_level: None,
            })
        }
        ItemRef::Upgrade(id) => {
            let def = content.upgrades.iter().find(|d| &d.id == id)?;
            let owned = owned_in(&state.upgrades, id)?;
            Some(ItemView {
                base_cost: def.base_cost,
                scaling: content.constants.upgrade_cost_scaling,
                owned,
                max_level: def.max_level,
            })
        }
        ItemRef::StardustUpgrade(id) => {
            let def = content.stardust_upgrades.iter().find(|d| &d.id == id)?;
            let owned = owned_in(&state.stardust_upgrades, id)?;
            Some(ItemView {
                base_cost: def.base_cost,
                scaling: content.constants.stardust_upgrade_cost_scaling,
                owned,
                max_level: def.max_level,
            })
        }
    }
}

fn owned_in<K: std::hash::Hash + Eq>(
    items: &std::collections::HashMap<K, ItemState>,
    id: &K,
) -> Option<Num> {
    items.get(id).map(|item| item.owned)
}

/// Generator cost scaling, reduced multiplicatively by the cost-reduction
/// stardust upgrade and floored at 1 so costs never decrease with purchases.
pub fn generator_scaling(state: &GameState, content: &GameContent) -> f64 {
    let mut scaling = content.constants.generator_cost_scaling;
    for def in &content.stardust_upgrades {
        if def.effect != StardustEffect::GeneratorCostReduction {
            continue;
        }
        if let Some(item) = state.stardust_upgrades.get(&def.id) {
            let level = item.owned.to_f64();
            if level > 0.0 {
                scaling *= def.base_multiplier.powf(level);
            }
        }
    }
    scaling.max(1.0)
}

/// The scaling factor the given item's cost curve uses.
pub fn cost_scaling(state: &GameState, content: &GameContent, item: &ItemRef) -> Option<f64> {
    resolve(state, content, item).map(|view| view.scaling)
}

pub(crate) fn geometric_unit_cost(base_cost: &Num, scaling: f64, owned: &Num) -> Num {
    *base_cost * num::powf(scaling, owned)
}

/// Next-unit cost, `base_cost × scaling ^ owned`. This is also the value the
/// per-item `cost` cache must hold.
pub fn unit_cost(state: &GameState, content: &GameContent, item: &ItemRef) -> Option<Num> {
    let view = resolve(state, content, item)?;
    Some(geometric_unit_cost(&view.base_cost, view.scaling, &view.owned))
}

pub(crate) fn geometric_bulk_cost(unit: &Num, scaling: f64, quantity: &Num) -> Num {
    if *quantity <= Num::zero() {
        return Num::zero();
    }
    // A single unit costs exactly the unit cost; routing it through the
    // series would smear log-form rounding over an exact value.
    if *quantity == Num::one() {
        return *unit;
    }
    if (scaling - 1.0).abs() < UNIT_SCALING_EPSILON {
        return *unit * *quantity;
    }
    let growth = num::powf(scaling, quantity) - Num::one();
    *unit * growth / Num::from_f64(scaling - 1.0)
}

/// Total cost of buying `quantity` units from the current owned count,
/// `unit × (scaling^q − 1) / (scaling − 1)`, linear when scaling is 1.
pub fn bulk_cost(
    state: &GameState,
    content: &GameContent,
    item: &ItemRef,
    quantity: &Num,
) -> Option<Num> {
    let view = resolve(state, content, item)?;
    let unit = geometric_unit_cost(&view.base_cost, view.scaling, &view.owned);
    Some(geometric_bulk_cost(&unit, view.scaling, quantity))
}

pub(crate) fn geometric_max_affordable(unit: &Num, scaling: f64, currency: &Num) -> Num {
    if *currency < *unit {
        return Num::zero();
    }
    if (scaling - 1.0).abs() < UNIT_SCALING_EPSILON {
        return (*currency / *unit).floor();
    }
    // Closed-form inverse of the series: log_s(currency/unit × (s−1) + 1).
    let argument = *currency / *unit * Num::from_f64(scaling - 1.0) + Num::one();
    let quantity = argument.log10() / scaling.log10();
    if !quantity.is_finite() {
        return Num::zero();
    }
    let mut quantity = Num::from_f64(quantity).floor();

    // The log runs in f64 and can land one step off in either direction;
    // settle against the exact series.
    for _ in 0..4 {
        if quantity > Num::zero() && geometric_bulk_cost(unit, scaling, &quantity) > *currency {
            quantity = quantity - Num::one();
        } else {
            break;
        }
    }
    for _ in 0..4 {
        let next = quantity + Num::one();
        if geometric_bulk_cost(unit, scaling, &next) <= *currency {
            quantity = next;
        } else {
            break;
        }
    }
    quantity.max(Num::zero())
}

/// Largest integer quantity whose bulk cost fits in `currency`, clamped to
/// the remaining level headroom. Zero when nothing is affordable.
pub fn max_affordable(
    state: &GameState,
    content: &GameContent,
    item: &ItemRef,
    currency: &Num,
) -> Num {
    let Some(view) = resolve(state, content, item) else {
        return Num::zero();
    };
    let unit = geometric_unit_cost(&view.base_cost, view.scaling, &view.owned);
    let affordable = geometric_max_affordable(&unit, view.scaling, currency);
    clamp_to_headroom(affordable, &view)
}

/// Remaining purchases before `max_level`, unbounded when no cap is defined.
pub(crate) fn clamp_to_headroom(quantity: Num, view: &ItemView) -> Num {
    match view.max_level {
        Some(cap) => {
            let headroom = Num::from_u64(u64::from(cap)).saturating_sub(view.owned);
            quantity.min(headroom)
        }
        None => quantity,
    }
}

/// Whether `quantity` units can be bought with `currency` without exceeding
/// the level cap.
pub fn can_afford(
    state: &GameState,
    content: &GameContent,
    item: &ItemRef,
    quantity: &Num,
    currency: &Num,
) -> bool {
    let Some(view) = resolve(state, content, item) else {
        return false;
    };
    if *quantity <= Num::zero() {
        return false;
    }
    if clamp_to_headroom(*quantity, &view) < *quantity {
        return false;
    }
    let unit = geometric_unit_cost(&view.base_cost, view.scaling, &view.owned);
    geometric_bulk_cost(&unit, view.scaling, quantity) <= *currency
}

/// Recomputes every item's cost cache from its owned count. Used after a
/// snapshot load, where costs are never persisted.
pub fn refresh_costs(state: &mut GameState, content: &GameContent) {
    let generator_scaling = generator_scaling(state, content);
    for def in &content.generators {
        if let Some(item) = state.generators.get_mut(&def.id) {
            item.cost = geometric_unit_cost(&def.base_cost, generator_scaling, &item.owned);
        }
    }
    for def in &content.upgrades {
        if let Some(item) = state.upgrades.get_mut(&def.id) {
            item.cost = geometric_unit_cost(
                &def.base_cost,
                content.constants.upgrade_cost_scaling,
                &item.owned,
            );
        }
    }
    for def in &content.stardust_upgrades {
        if let Some(item) = state.stardust_upgrades.get_mut(&def.id) {
            item.cost = geometric_unit_cost(
                &def.base_cost,
                content.constants.stardust_upgrade_cost_scaling,
                &item.owned,
            );
        }
    }
}
