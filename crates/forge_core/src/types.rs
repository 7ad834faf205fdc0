//! Type definitions for `forge_core`.
//!
//! All public types, structs, enums, and ID newtypes used by the engine.
//! Catalog (content) types describe what exists; state types describe what
//! the player owns. Derived values (rates, costs, multipliers) are pure
//! functions of the owned counts — the only cached derived field is each
//! item's `cost`, recomputed whenever its owned count changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::num::Num;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(GeneratorId);
string_id!(UpgradeId);
string_id!(StardustUpgradeId);
string_id!(CommandId);
string_id!(EventId);

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContent {
    pub content_version: String,
    /// Sorted by tier; tiers are contiguous from 1 (validated by content
    /// loading). Synergy math relies on this ordering.
    pub generators: Vec<GeneratorDef>,
    pub upgrades: Vec<UpgradeDef>,
    pub stardust_upgrades: Vec<StardustUpgradeDef>,
    pub constants: Constants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorDef {
    pub id: GeneratorId,
    pub name: String,
    pub tier: u32,
    pub base_cost: Num,
    /// Energy per second produced by one owned unit, before multipliers.
    pub base_output: Num,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub base_cost: Num,
    pub base_multiplier: f64,
    pub effect: UpgradeEffect,
    pub max_level: Option<u32>,
}

/// What an energy-bought upgrade does. One case per kind — resolved by
/// exhaustive matching, never by probing optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UpgradeEffect {
    /// Multiplies all energy generation per level.
    Global,
    /// Multiplies one generator's output per level.
    Generator { target: GeneratorId },
    /// Each generator tier is boosted by the owned count of the preceding
    /// tier, `base_multiplier ^ (preceding_owned × level)`.
    Synergy,
    /// Multiplies all generator output per level.
    Efficiency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StardustUpgradeDef {
    pub id: StardustUpgradeId,
    pub name: String,
    pub description: String,
    /// Priced in stardust, not energy.
    pub base_cost: Num,
    pub base_multiplier: f64,
    pub effect: StardustEffect,
    pub max_level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StardustEffect {
    /// Multiplies the stardust multiplier per level.
    AmplifyStardust,
    /// Grants an energy multiplier derived from the stardust balance.
    EnergyFromStardust,
    /// Multiplicatively reduces generator cost scaling per level.
    GeneratorCostReduction,
    /// Multiplies offline catch-up gain per level.
    OfflineBoost,
}

/// Tuning constants. Plain floats: these enter the economy only through the
/// big-number adapter at the point of use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    pub starting_energy: f64,
    pub base_click_output: f64,

    // Ascension
    pub ascension_requirement: f64,
    pub ascension_exponent: f64,

    // Prestige
    pub prestige_base_requirement: f64,
    pub prestige_requirement_scaling: f64,
    pub prestige_points_per_level: f64,
    pub prestige_multiplier_base: f64,

    // Cost scaling factors per item family
    pub generator_cost_scaling: f64,
    pub upgrade_cost_scaling: f64,
    pub stardust_upgrade_cost_scaling: f64,

    // Stardust effects
    pub stardust_effect_base: f64,
    pub energy_from_stardust_exponent: f64,

    // Offline catch-up window
    pub max_offline_seconds: f64,

    // Session runtime cadence
    pub accrual_interval_ms: u64,
    pub autosave_interval_secs: u64,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub meta: MetaState,
    pub energy: Num,
    pub stardust: Num,
    pub generators: HashMap<GeneratorId, ItemState>,
    pub upgrades: HashMap<UpgradeId, ItemState>,
    pub stardust_upgrades: HashMap<StardustUpgradeId, ItemState>,
    pub prestige: PrestigeState,
    pub statistics: Statistics,
    pub counters: Counters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub schema_version: u32,
    pub content_version: String,
    /// Wall-clock milliseconds of the last persisted activity. Drives
    /// offline catch-up on load.
    pub last_active_ms: i64,
}

/// Owned count plus the cached next-unit cost,
/// `base_cost × scaling ^ owned`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemState {
    pub owned: Num,
    pub cost: Num,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrestigeState {
    pub level: u64,
    pub points: Num,
    /// `prestige_multiplier_base ^ points` — strictly increasing in points.
    pub multiplier: Num,
}

/// Monotone counters. Never reset by ascension or prestige.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub total_energy_generated: Num,
    pub total_ascensions: u64,
    pub max_energy_reached: Num,
    pub max_stardust_reached: Num,
    pub total_time_played_seconds: f64,
    pub start_time_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_command_id: u64,
}

impl GameState {
    /// Fresh state from catalog defaults. Every catalog item starts unowned
    /// with its cost cache at `base_cost`.
    pub fn new(content: &GameContent, now_ms: i64) -> Self {
        let generators = content
            .generators
            .iter()
            .map(|def| {
                (
                    def.id.clone(),
                    ItemState {
                        owned: Num::zero(),
                        cost: def.base_cost,
                    },
                )
            })
            .collect();
        let upgrades = content
            .upgrades
            .iter()
            .map(|def| {
                (
                    def.id.clone(),
                    ItemState {
                        owned: Num::zero(),
                        cost: def.base_cost,
                    },
                )
            })
            .collect();
        let stardust_upgrades = content
            .stardust_upgrades
            .iter()
            .map(|def| {
                (
                    def.id.clone(),
                    ItemState {
                        owned: Num::zero(),
                        cost: def.base_cost,
                    },
                )
            })
            .collect();
        GameState {
            meta: MetaState {
                schema_version: 1,
                content_version: content.content_version.clone(),
                last_active_ms: now_ms,
            },
            energy: Num::from_f64(content.constants.starting_energy),
            stardust: Num::zero(),
            generators,
            upgrades,
            stardust_upgrades,
            prestige: PrestigeState {
                level: 0,
                points: Num::zero(),
                multiplier: Num::one(),
            },
            statistics: Statistics {
                total_energy_generated: Num::zero(),
                total_ascensions: 0,
                max_energy_reached: Num::from_f64(content.constants.starting_energy),
                max_stardust_reached: Num::zero(),
                total_time_played_seconds: 0.0,
                start_time_ms: now_ms,
            },
            counters: Counters {
                next_event_id: 0,
                next_command_id: 0,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

/// Addresses a purchasable item in any of the three families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRef {
    Generator(GeneratorId),
    Upgrade(UpgradeId),
    StardustUpgrade(StardustUpgradeId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PurchaseQuantity {
    Exact(Num),
    /// Largest affordable quantity under the cost curve and level cap.
    Max,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: CommandId,
    pub command: Command,
}

/// Player intents. The UI collaborator submits these; it never mutates state
/// directly. Ineligible commands apply nothing and emit nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    Click,
    Purchase {
        item: ItemRef,
        quantity: PurchaseQuantity,
    },
    Ascend,
    Prestige,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    EnergyClicked {
        gained: Num,
    },
    ItemPurchased {
        item: ItemRef,
        quantity: Num,
        cost: Num,
    },
    Ascended {
        stardust_gained: Num,
    },
    Prestiged {
        level: u64,
        points: Num,
    },
}
