//! Command application.
//!
//! The UI collaborator (or the autoplay pilot) submits [`Command`]s; each is
//! validated first and applied as a single atomic mutation. Ineligible or
//! unaffordable commands apply nothing and emit nothing — they are no-ops,
//! never faults.

use crate::num::Num;
use crate::types::{
    Command, CommandEnvelope, CommandId, Event, EventEnvelope, GameContent, GameState, ItemRef,
    PurchaseQuantity,
};
use crate::{accrual, cost, economy, emit, reset};

/// Wraps a command in an envelope with a freshly allocated id.
pub fn envelope(state: &mut GameState, command: Command) -> CommandEnvelope {
    let id = CommandId(format!("cmd_{:06}", state.counters.next_command_id));
    state.counters.next_command_id += 1;
    CommandEnvelope { id, command }
}

/// Applies one command, returning the events it produced. An empty vector
/// means the command was rejected or had nothing to do; state is unchanged
/// in that case.
pub fn apply_command(
    state: &mut GameState,
    content: &GameContent,
    command: &Command,
) -> Vec<EventEnvelope> {
    let mut events = Vec::new();
    match command {
        Command::Click => apply_click(state, content, &mut events),
        Command::Purchase { item, quantity } => {
            apply_purchase(state, content, item, quantity, &mut events);
        }
        Command::Ascend => {
            if let Some(gained) = reset::ascend(state, content) {
                events.push(emit(
                    &mut state.counters,
                    Event::Ascended {
                        stardust_gained: gained,
                    },
                ));
            }
        }
        Command::Prestige => {
            if let Some(level) = reset::prestige(state, content) {
                events.push(emit(
                    &mut state.counters,
                    Event::Prestiged {
                        level,
                        points: state.prestige.points,
                    },
                ));
            }
        }
    }
    events
}

fn apply_click(state: &mut GameState, content: &GameContent, events: &mut Vec<EventEnvelope>) {
    let gained = economy::energy_per_click(state, content);
    let next = state.energy + gained;
    if !gained.is_finite() || !next.is_finite() {
        return;
    }
    state.energy = next;
    state.statistics.total_energy_generated = state.statistics.total_energy_generated + gained;
    state.statistics.max_energy_reached = state.statistics.max_energy_reached.max(state.energy);
    events.push(emit(&mut state.counters, Event::EnergyClicked { gained }));
}

fn apply_purchase(
    state: &mut GameState,
    content: &GameContent,
    item: &ItemRef,
    quantity: &PurchaseQuantity,
    events: &mut Vec<EventEnvelope>,
) {
    let currency = match item {
        ItemRef::Generator(_) | ItemRef::Upgrade(_) => state.energy,
        ItemRef::StardustUpgrade(_) => state.stardust,
    };

    let quantity = match quantity {
        PurchaseQuantity::Exact(requested) => {
            // Validation: a non-finite or non-positive request is rejected
            // before any state is touched.
            if !requested.is_finite() || *requested <= Num::zero() {
                return;
            }
            requested.floor()
        }
        PurchaseQuantity::Max => cost::max_affordable(state, content, item, &currency),
    };
    if quantity <= Num::zero() {
        return;
    }
    if !cost::can_afford(state, content, item, &quantity, &currency) {
        return;
    }
    let Some(total) = cost::bulk_cost(state, content, item, &quantity) else {
        return;
    };

    match item {
        ItemRef::Generator(id) => {
            state.energy = state.energy.saturating_sub(total);
            if let Some(entry) = state.generators.get_mut(id) {
                entry.owned = entry.owned + quantity;
            }
        }
        ItemRef::Upgrade(id) => {
            state.energy = state.energy.saturating_sub(total);
            if let Some(entry) = state.upgrades.get_mut(id) {
                entry.owned = entry.owned + quantity;
            }
        }
        ItemRef::StardustUpgrade(id) => {
            state.stardust = state.stardust.saturating_sub(total);
            if let Some(entry) = state.stardust_upgrades.get_mut(id) {
                entry.owned = entry.owned + quantity;
            }
        }
    }

    // The owned count changed; refresh the cost cache. Generator scaling can
    // shift when a cost-reduction upgrade was just bought, so refresh all
    // generators in that case.
    if matches!(item, ItemRef::StardustUpgrade(_)) {
        cost::refresh_costs(state, content);
    } else if let Some(unit) = cost::unit_cost(state, content, item) {
        match item {
            ItemRef::Generator(id) => {
                if let Some(entry) = state.generators.get_mut(id) {
                    entry.cost = unit;
                }
            }
            ItemRef::Upgrade(id) => {
                if let Some(entry) = state.upgrades.get_mut(id) {
                    entry.cost = unit;
                }
            }
            ItemRef::StardustUpgrade(_) => {}
        }
    }

    events.push(emit(
        &mut state.counters,
        Event::ItemPurchased {
            item: item.clone(),
            quantity,
            cost: total,
        },
    ));
}

/// Convenience used by session runtimes: advance accrual, then apply a batch
/// of commands in order. Mirrors a single cooperative step.
pub fn step(
    state: &mut GameState,
    content: &GameContent,
    elapsed_seconds: f64,
    commands: &[Command],
) -> Vec<EventEnvelope> {
    accrual::advance(state, content, elapsed_seconds);
    let mut events = Vec::new();
    for command in commands {
        events.extend(apply_command(state, content, command));
    }
    events
}
