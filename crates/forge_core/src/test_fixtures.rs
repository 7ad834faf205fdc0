//! Shared test fixtures for forge_core and downstream crates.
//!
//! `base_content()` provides a compressed catalog suitable for
//! integration-level tests: three generators whose first matches the
//! 10-cost / 0.1-output starter, one upgrade of each effect, all four
//! stardust upgrades, and low reset thresholds so milestone tests stay fast.

use crate::num::Num;
use crate::types::{
    Constants, GameContent, GameState, GeneratorDef, GeneratorId, StardustEffect,
    StardustUpgradeDef, StardustUpgradeId, UpgradeDef, UpgradeEffect, UpgradeId,
};

/// Compressed full-featured content: low ascension/prestige thresholds,
/// deterministic starter values.
pub fn base_content() -> GameContent {
    GameContent {
        content_version: "test".to_string(),
        generators: vec![
            GeneratorDef {
                id: GeneratorId("gen_spark".to_string()),
                name: "Spark Cell".to_string(),
                tier: 1,
                base_cost: Num::from_f64(10.0),
                base_output: Num::from_f64(0.1),
            },
            GeneratorDef {
                id: GeneratorId("gen_coil".to_string()),
                name: "Flux Coil".to_string(),
                tier: 2,
                base_cost: Num::from_f64(120.0),
                base_output: Num::from_f64(1.0),
            },
            GeneratorDef {
                id: GeneratorId("gen_array".to_string()),
                name: "Fusion Array".to_string(),
                tier: 3,
                base_cost: Num::from_f64(2000.0),
                base_output: Num::from_f64(8.0),
            },
        ],
        upgrades: vec![
            UpgradeDef {
                id: UpgradeId("upg_global".to_string()),
                name: "Focusing Lens".to_string(),
                description: "Doubles all energy generation per level.".to_string(),
                base_cost: Num::from_f64(500.0),
                base_multiplier: 2.0,
                effect: UpgradeEffect::Global,
                max_level: Some(25),
            },
            UpgradeDef {
                id: UpgradeId("upg_spark_boost".to_string()),
                name: "Spark Injector".to_string(),
                description: "Triples Spark Cell output per level.".to_string(),
                base_cost: Num::from_f64(1000.0),
                base_multiplier: 3.0,
                effect: UpgradeEffect::Generator {
                    target: GeneratorId("gen_spark".to_string()),
                },
                max_level: Some(12),
            },
            UpgradeDef {
                id: UpgradeId("upg_synergy".to_string()),
                name: "Harmonic Coupling".to_string(),
                description: "Each tier boosts the next by 6% per unit of the tier below."
                    .to_string(),
                base_cost: Num::from_f64(8000.0),
                base_multiplier: 1.06,
                effect: UpgradeEffect::Synergy,
                max_level: Some(50),
            },
            UpgradeDef {
                id: UpgradeId("upg_efficiency".to_string()),
                name: "Overclock".to_string(),
                description: "All generators 25% more efficient per level.".to_string(),
                base_cost: Num::from_f64(20_000.0),
                base_multiplier: 1.25,
                effect: UpgradeEffect::Efficiency,
                max_level: Some(100),
            },
        ],
        stardust_upgrades: vec![
            StardustUpgradeDef {
                id: StardustUpgradeId("sdu_amplifier".to_string()),
                name: "Stardust Amplifier".to_string(),
                description: "Stardust is 12% more effective per level.".to_string(),
                base_cost: Num::from_f64(1.0),
                base_multiplier: 1.12,
                effect: StardustEffect::AmplifyStardust,
                max_level: Some(100),
            },
            StardustUpgradeDef {
                id: StardustUpgradeId("sdu_infusion".to_string()),
                name: "Stardust Infusion".to_string(),
                description: "Energy multiplier based on the stardust balance.".to_string(),
                base_cost: Num::from_f64(4.0),
                base_multiplier: 1.6,
                effect: StardustEffect::EnergyFromStardust,
                max_level: Some(50),
            },
            StardustUpgradeDef {
                id: StardustUpgradeId("sdu_discount".to_string()),
                name: "Cosmic Discount".to_string(),
                description: "Reduces generator cost scaling by 1.5% per level.".to_string(),
                base_cost: Num::from_f64(15.0),
                base_multiplier: 0.985,
                effect: StardustEffect::GeneratorCostReduction,
                max_level: Some(50),
            },
            StardustUpgradeDef {
                id: StardustUpgradeId("sdu_temporal".to_string()),
                name: "Temporal Storage".to_string(),
                description: "Offline progress 30% more effective per level.".to_string(),
                base_cost: Num::from_f64(80.0),
                base_multiplier: 1.3,
                effect: StardustEffect::OfflineBoost,
                max_level: Some(20),
            },
        ],
        constants: Constants {
            starting_energy: 10.0,
            base_click_output: 1.0,
            // Low thresholds keep milestone tests fast.
            ascension_requirement: 1000.0,
            ascension_exponent: 0.5,
            prestige_base_requirement: 8.0,
            prestige_requirement_scaling: 1.0,
            prestige_points_per_level: 12.0,
            prestige_multiplier_base: 1.18,
            generator_cost_scaling: 1.09,
            upgrade_cost_scaling: 1.22,
            stardust_upgrade_cost_scaling: 1.42,
            stardust_effect_base: 1.07,
            energy_from_stardust_exponent: 0.55,
            max_offline_seconds: 86_400.0,
            accrual_interval_ms: 100,
            autosave_interval_secs: 5,
        },
    }
}

/// Bare-minimum content: one generator, no upgrades. For codec and cost
/// tests that want no multiplier interference.
pub fn minimal_content() -> GameContent {
    let mut content = base_content();
    content.generators.truncate(1);
    content.upgrades.clear();
    content.stardust_upgrades.clear();
    content
}

/// Fresh state over the given content, created at timestamp zero.
pub fn base_state(content: &GameContent) -> GameState {
    GameState::new(content, 0)
}
