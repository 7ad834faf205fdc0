//! Autoplay policy for headless runs.
//!
//! Drives a session automatically:
//! 1. Prestige once stardust reaches twice the requirement.
//! 2. Ascend the moment the energy threshold is met.
//! 3. Spend stardust above the banked prestige requirement on stardust
//!    upgrades.
//! 4. Spend energy on upgrades, then generators, max-quantity each, and
//!    keep clicking.

use forge_core::{
    can_ascend, prestige_requirement, Command, GameContent, GameState, ItemRef, Num,
    PurchaseQuantity,
};

pub trait CommandSource {
    fn next_commands(&mut self, state: &GameState, content: &GameContent) -> Vec<Command>;
}

/// Deterministic greedy policy. Keeps the next prestige requirement banked,
/// spends only the surplus, and otherwise buys everything it can in catalog
/// order.
pub struct GreedyPilot;

impl CommandSource for GreedyPilot {
    fn next_commands(&mut self, state: &GameState, content: &GameContent) -> Vec<Command> {
        let mut commands = Vec::new();

        let reserve = prestige_requirement(content, state.prestige.level);
        if state.stardust >= reserve * Num::from_f64(2.0) {
            commands.push(Command::Prestige);
            return commands;
        }
        if can_ascend(state, content) {
            commands.push(Command::Ascend);
            return commands;
        }

        // Spend stardust above the banked requirement, one level at a time,
        // against each item's cached next-unit cost.
        let mut surplus = state.stardust.saturating_sub(reserve);
        for def in &content.stardust_upgrades {
            let Some(item) = state.stardust_upgrades.get(&def.id) else {
                continue;
            };
            if item.cost <= surplus {
                surplus = surplus.saturating_sub(item.cost);
                commands.push(Command::Purchase {
                    item: ItemRef::StardustUpgrade(def.id.clone()),
                    quantity: PurchaseQuantity::Exact(Num::one()),
                });
            }
        }

        for def in &content.upgrades {
            commands.push(Command::Purchase {
                item: ItemRef::Upgrade(def.id.clone()),
                quantity: PurchaseQuantity::Max,
            });
        }
        for def in &content.generators {
            commands.push(Command::Purchase {
                item: ItemRef::Generator(def.id.clone()),
                quantity: PurchaseQuantity::Max,
            });
        }
        commands.push(Command::Click);
        commands
    }
}
