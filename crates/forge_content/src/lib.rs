//! Production catalog and content loading shared between forge_cli and
//! forge_session.
//!
//! The catalog ships in code as [`default_content`]; [`load_content`]
//! deserializes an override from JSON for balance experiments. Both paths go
//! through [`validate_content`], which panics on authoring errors.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use forge_core::num::Num;
use forge_core::{
    Constants, GameContent, GeneratorDef, GeneratorId, StardustEffect, StardustUpgradeDef,
    StardustUpgradeId, UpgradeDef, UpgradeEffect, UpgradeId,
};

/// Validates cross-references and value ranges in content, panicking on any
/// authoring error.
///
/// Catches mistakes like: a targeted upgrade pointing at an unknown
/// generator, duplicate ids, a tier gap that would break synergy math, or a
/// scaling factor below 1 that would make costs shrink with each purchase.
pub fn validate_content(content: &GameContent) {
    let mut generator_ids: HashSet<&str> = HashSet::new();
    for generator in &content.generators {
        assert!(
            generator_ids.insert(generator.id.0.as_str()),
            "duplicate generator id '{}'",
            generator.id,
        );
        assert!(
            generator.base_cost > Num::zero(),
            "generator '{}' base_cost must be positive",
            generator.id,
        );
        assert!(
            generator.base_output > Num::zero(),
            "generator '{}' base_output must be positive",
            generator.id,
        );
    }

    // Tiers must be contiguous from 1 in catalog order: the synergy formula
    // reads "preceding tier" as the previous catalog element.
    for (index, generator) in content.generators.iter().enumerate() {
        assert!(
            generator.tier as usize == index + 1,
            "generator '{}' has tier {} at catalog position {}; tiers must be contiguous from 1",
            generator.id,
            generator.tier,
            index,
        );
    }

    let mut upgrade_ids: HashSet<&str> = HashSet::new();
    for upgrade in &content.upgrades {
        assert!(
            upgrade_ids.insert(upgrade.id.0.as_str()),
            "duplicate upgrade id '{}'",
            upgrade.id,
        );
        assert!(
            upgrade.base_cost > Num::zero(),
            "upgrade '{}' base_cost must be positive",
            upgrade.id,
        );
        assert!(
            upgrade.base_multiplier > 0.0,
            "upgrade '{}' base_multiplier must be positive",
            upgrade.id,
        );
        if let UpgradeEffect::Generator { target } = &upgrade.effect {
            assert!(
                generator_ids.contains(target.0.as_str()),
                "upgrade '{}' targets unknown generator '{}'",
                upgrade.id,
                target,
            );
        }
        if let Some(max_level) = upgrade.max_level {
            assert!(
                max_level >= 1,
                "upgrade '{}' max_level must be at least 1",
                upgrade.id,
            );
        }
    }

    let mut stardust_ids: HashSet<&str> = HashSet::new();
    for upgrade in &content.stardust_upgrades {
        assert!(
            stardust_ids.insert(upgrade.id.0.as_str()),
            "duplicate stardust upgrade id '{}'",
            upgrade.id,
        );
        assert!(
            upgrade.base_cost > Num::zero(),
            "stardust upgrade '{}' base_cost must be positive",
            upgrade.id,
        );
        assert!(
            upgrade.base_multiplier > 0.0,
            "stardust upgrade '{}' base_multiplier must be positive",
            upgrade.id,
        );
        // Cost reduction is the only effect whose multiplier sits below 1.
        if upgrade.effect != StardustEffect::GeneratorCostReduction {
            assert!(
                upgrade.base_multiplier >= 1.0,
                "stardust upgrade '{}' base_multiplier must not shrink its effect",
                upgrade.id,
            );
        }
    }

    let constants = &content.constants;
    assert!(
        constants.generator_cost_scaling >= 1.0
            && constants.upgrade_cost_scaling >= 1.0
            && constants.stardust_upgrade_cost_scaling >= 1.0,
        "cost scaling factors below 1 would make costs shrink with purchases",
    );
    assert!(
        constants.ascension_requirement > 0.0 && constants.ascension_exponent > 0.0,
        "ascension constants must be positive",
    );
    assert!(
        constants.prestige_base_requirement > 1.0 && constants.prestige_multiplier_base > 1.0,
        "prestige curve must strictly increase",
    );
    assert!(
        constants.max_offline_seconds > 0.0,
        "offline window must be positive",
    );
}

/// Loads a content override from a JSON file.
pub fn load_content(path: &Path) -> Result<GameContent> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading content file {}", path.display()))?;
    let content: GameContent = serde_json::from_str(&text)
        .with_context(|| format!("parsing content file {}", path.display()))?;
    validate_content(&content);
    Ok(content)
}

/// The shipped production catalog.
pub fn default_content() -> GameContent {
    let content = GameContent {
        content_version: "1.0.0".to_string(),
        generators: vec![
            generator("h_cloud", "Hydrogen Cloud", 1, 8.0, 0.15),
            generator("s_nursery", "Stellar Nursery", 2, 120.0, 1.5),
            generator("g_cluster", "Galaxy Cluster", 3, 2000.0, 10.0),
            generator("neutron_star", "Neutron Star", 4, 35_000.0, 65.0),
            generator("black_hole", "Black Hole", 5, 650_000.0, 320.0),
            generator("quasar", "Quasar", 6, 8e7, 1800.0),
            generator("cosmic_web", "Cosmic Web", 7, 8e11, 12_000.0),
            generator("universe", "Universe", 8, 8e16, 120_000.0),
        ],
        upgrades: vec![
            UpgradeDef {
                id: UpgradeId("energy_boost_1".to_string()),
                name: "Cosmic Rays".to_string(),
                description: "Multiplies Energy generation by 1.25x per level.".to_string(),
                base_cost: Num::from_f64(400.0),
                base_multiplier: 1.25,
                effect: UpgradeEffect::Global,
                max_level: Some(25),
            },
            UpgradeDef {
                id: UpgradeId("h_cloud_boost_1".to_string()),
                name: "Focused Solar Winds".to_string(),
                description: "Multiplies Hydrogen Cloud output by 2.2x per level.".to_string(),
                base_cost: Num::from_f64(800.0),
                base_multiplier: 2.2,
                effect: UpgradeEffect::Generator {
                    target: GeneratorId("h_cloud".to_string()),
                },
                max_level: Some(12),
            },
            UpgradeDef {
                id: UpgradeId("s_nursery_boost_1".to_string()),
                name: "Gravitational Collapse".to_string(),
                description: "Multiplies Stellar Nursery output by 2.2x per level.".to_string(),
                base_cost: Num::from_f64(6500.0),
                base_multiplier: 2.2,
                effect: UpgradeEffect::Generator {
                    target: GeneratorId("s_nursery".to_string()),
                },
                max_level: Some(12),
            },
            UpgradeDef {
                id: UpgradeId("g_cluster_boost_1".to_string()),
                name: "Galactic Filaments".to_string(),
                description: "Multiplies Galaxy Cluster output by 1.6x per level.".to_string(),
                base_cost: Num::from_f64(45_000.0),
                base_multiplier: 1.6,
                effect: UpgradeEffect::Generator {
                    target: GeneratorId("g_cluster".to_string()),
                },
                max_level: Some(15),
            },
            UpgradeDef {
                id: UpgradeId("energy_boost_2".to_string()),
                name: "Zero-Point Energy".to_string(),
                description: "Multiplies Energy generation by 1.25x per level.".to_string(),
                base_cost: Num::from_f64(180_000.0),
                base_multiplier: 1.25,
                effect: UpgradeEffect::Global,
                max_level: Some(25),
            },
            UpgradeDef {
                id: UpgradeId("synergy_boost_1".to_string()),
                name: "Cosmic Harmony".to_string(),
                description: "Each generator tier boosts the next by 6% per unit of the tier below, per level."
                    .to_string(),
                base_cost: Num::from_f64(8e5),
                base_multiplier: 1.06,
                effect: UpgradeEffect::Synergy,
                max_level: Some(50),
            },
            UpgradeDef {
                id: UpgradeId("efficiency_boost_1".to_string()),
                name: "Quantum Efficiency".to_string(),
                description: "All generators become 25% more efficient per level.".to_string(),
                base_cost: Num::from_f64(8e8),
                base_multiplier: 1.25,
                effect: UpgradeEffect::Efficiency,
                max_level: Some(100),
            },
        ],
        stardust_upgrades: vec![
            StardustUpgradeDef {
                id: StardustUpgradeId("stardust_boost_1".to_string()),
                name: "Stardust Amplifier".to_string(),
                description: "Stardust is 12% more effective per level.".to_string(),
                base_cost: Num::from_f64(1.0),
                base_multiplier: 1.12,
                effect: StardustEffect::AmplifyStardust,
                max_level: Some(100),
            },
            StardustUpgradeDef {
                id: StardustUpgradeId("energy_from_stardust_1".to_string()),
                name: "Stardust Infusion".to_string(),
                description: "Gain a multiplier to energy based on stardust amount.".to_string(),
                base_cost: Num::from_f64(4.0),
                base_multiplier: 1.6,
                effect: StardustEffect::EnergyFromStardust,
                max_level: Some(50),
            },
            StardustUpgradeDef {
                id: StardustUpgradeId("generator_cost_reduction_1".to_string()),
                name: "Cosmic Discount".to_string(),
                description: "Reduces the cost scaling of generators by 1.5% per level."
                    .to_string(),
                base_cost: Num::from_f64(15.0),
                base_multiplier: 0.985,
                effect: StardustEffect::GeneratorCostReduction,
                max_level: Some(50),
            },
            StardustUpgradeDef {
                id: StardustUpgradeId("offline_boost_1".to_string()),
                name: "Temporal Storage".to_string(),
                description: "Offline progress is 30% more effective per level.".to_string(),
                base_cost: Num::from_f64(80.0),
                base_multiplier: 1.3,
                effect: StardustEffect::OfflineBoost,
                max_level: Some(20),
            },
        ],
        constants: Constants {
            starting_energy: 25.0,
            base_click_output: 1.0,
            ascension_requirement: 5e5,
            ascension_exponent: 0.35,
            prestige_base_requirement: 8.0,
            prestige_requirement_scaling: 8.0,
            prestige_points_per_level: 12.0,
            prestige_multiplier_base: 1.18,
            generator_cost_scaling: 1.09,
            upgrade_cost_scaling: 1.22,
            stardust_upgrade_cost_scaling: 1.42,
            stardust_effect_base: 1.07,
            energy_from_stardust_exponent: 0.55,
            // 24 hours
            max_offline_seconds: 86_400.0,
            accrual_interval_ms: 100,
            autosave_interval_secs: 5,
        },
    };
    validate_content(&content);
    content
}

fn generator(id: &str, name: &str, tier: u32, base_cost: f64, base_output: f64) -> GeneratorDef {
    GeneratorDef {
        id: GeneratorId(id.to_string()),
        name: name.to_string(),
        tier,
        base_cost: Num::from_f64(base_cost),
        base_output: Num::from_f64(base_output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::GameState;

    #[test]
    fn test_default_catalog_passes_validation() {
        let content = default_content(); // validates internally
        assert_eq!(content.generators.len(), 8);
        assert_eq!(content.upgrades.len(), 7);
        assert_eq!(content.stardust_upgrades.len(), 4);
    }

    #[test]
    fn test_default_state_starts_with_configured_energy() {
        let content = default_content();
        let state = GameState::new(&content, 0);
        assert!((state.energy.to_f64() - 25.0).abs() < 1e-9);
        assert_eq!(state.generators.len(), 8);
    }

    #[test]
    #[should_panic(expected = "targets unknown generator")]
    fn test_upgrade_target_unknown_panics() {
        let mut content = default_content();
        content.upgrades.push(UpgradeDef {
            id: UpgradeId("upg_ghost".to_string()),
            name: "Ghost".to_string(),
            description: String::new(),
            base_cost: Num::from_f64(1.0),
            base_multiplier: 2.0,
            effect: UpgradeEffect::Generator {
                target: GeneratorId("gen_missing".to_string()),
            },
            max_level: None,
        });
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "duplicate generator id")]
    fn test_duplicate_generator_id_panics() {
        let mut content = default_content();
        let first = content.generators[0].clone();
        content.generators.push(first);
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "tiers must be contiguous")]
    fn test_tier_gap_panics() {
        let mut content = default_content();
        content.generators[3].tier = 9;
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "base_cost must be positive")]
    fn test_non_positive_cost_panics() {
        let mut content = default_content();
        content.generators[0].base_cost = Num::zero();
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "cost scaling factors below 1")]
    fn test_shrinking_cost_scaling_panics() {
        let mut content = default_content();
        content.constants.generator_cost_scaling = 0.9;
        validate_content(&content);
    }

    #[test]
    fn test_catalog_serializes_and_reloads() {
        let content = default_content();
        let json = serde_json::to_string(&content).unwrap();
        let reloaded: GameContent = serde_json::from_str(&json).unwrap();
        validate_content(&reloaded);
        assert_eq!(reloaded.content_version, content.content_version);
    }
}
