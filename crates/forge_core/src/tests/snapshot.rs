use super::*;

fn played_state(content: &GameContent) -> GameState {
    let mut state = test_state(content);
    state.energy = Num::from_f64(4321.5);
    state.stardust = Num::from_f64(17.0);
    set_generator(&mut state, "gen_spark", 42.0);
    set_generator(&mut state, "gen_coil", 6.0);
    set_upgrade(&mut state, "upg_global", 4.0);
    set_stardust_upgrade(&mut state, "sdu_amplifier", 2.0);
    state.prestige.level = 1;
    state.prestige.points = Num::from_f64(12.0);
    state.prestige.multiplier = crate::num::powf(1.18, &Num::from_f64(12.0));
    state.statistics.total_ascensions = 3;
    state.statistics.total_energy_generated = Num::from_f64(1e6);
    state.meta.last_active_ms = 1000;
    refresh_costs(&mut state, content);
    state
}

#[test]
fn lean_snapshot_omits_unowned_items_and_costs() {
    let content = test_content();
    let state = played_state(&content);
    let lean = to_lean(&state);

    assert_eq!(lean.generators.len(), 2, "only owned generators persist");
    assert_eq!(lean.upgrades.len(), 1);
    let json = serde_json::to_string(&lean).unwrap();
    assert!(!json.contains("\"cost\""), "derived costs must never persist");
}

#[test]
fn round_trip_reproduces_owned_counts_and_balances() {
    let content = test_content();
    let state = played_state(&content);
    let lean = to_lean(&state);
    // Same instant: no offline gain in between.
    let restored = from_lean(&lean, &content, 1000);

    assert_eq!(restored.energy, state.energy);
    assert_eq!(restored.stardust, state.stardust);
    for (id, item) in &state.generators {
        assert_eq!(restored.generators[id].owned, item.owned, "generator {id}");
    }
    for (id, item) in &state.upgrades {
        assert_eq!(restored.upgrades[id].owned, item.owned, "upgrade {id}");
    }
    for (id, item) in &state.stardust_upgrades {
        assert_eq!(
            restored.stardust_upgrades[id].owned, item.owned,
            "stardust upgrade {id}"
        );
    }
    assert_eq!(restored.prestige.level, state.prestige.level);
    assert_eq!(restored.prestige.points, state.prestige.points);
    assert_eq!(restored.prestige.multiplier, state.prestige.multiplier);
    assert_eq!(
        restored.statistics.total_ascensions,
        state.statistics.total_ascensions
    );
}

#[test]
fn round_trip_survives_json() {
    let content = test_content();
    let state = played_state(&content);
    let json = serde_json::to_string(&to_lean(&state)).unwrap();
    let lean: LeanSnapshot = serde_json::from_str(&json).unwrap();
    let restored = from_lean(&lean, &content, 1000);
    assert_eq!(restored.energy, state.energy);
    assert_eq!(
        restored.generators[&GeneratorId("gen_spark".to_string())].owned,
        Num::from_f64(42.0)
    );
}

#[test]
fn wire_field_names_follow_the_protocol() {
    let content = test_content();
    let state = played_state(&content);
    let json = serde_json::to_string(&to_lean(&state)).unwrap();
    assert!(json.contains("\"lastActive\""));
    assert!(json.contains("\"stardustUpgrades\""));
    assert!(json.contains("\"owned\""));
}

#[test]
fn restored_costs_match_derivation_from_owned() {
    let content = test_content();
    let state = played_state(&content);
    let restored = from_lean(&to_lean(&state), &content, 1000);

    for def in &content.generators {
        let derived = unit_cost(&restored, &content, &ItemRef::Generator(def.id.clone())).unwrap();
        assert_eq!(
            restored.generators[&def.id].cost, derived,
            "cost cache must equal the derived unit cost for {}",
            def.id
        );
    }
}

#[test]
fn unknown_snapshot_ids_are_ignored() {
    let content = test_content();
    let state = test_state(&content);
    let mut lean = to_lean(&state);
    lean.generators.push(OwnedCount {
        id: "gen_removed_in_v2".to_string(),
        owned: Num::from_f64(99.0),
    });

    let restored = from_lean(&lean, &content, 0);
    assert_eq!(restored.generators.len(), content.generators.len());
}

#[test]
fn new_catalog_entries_default_on_load() {
    // A save taken before "gen_array" existed still loads, with the new
    // generator at its default.
    let mut old_content = test_content();
    old_content.generators.truncate(2);
    let mut old_state = GameState::new(&old_content, 0);
    old_state
        .generators
        .get_mut(&GeneratorId("gen_spark".to_string()))
        .unwrap()
        .owned = Num::from_f64(5.0);
    let lean = to_lean(&old_state);

    let content = test_content();
    let restored = from_lean(&lean, &content, 0);
    let array = &restored.generators[&GeneratorId("gen_array".to_string())];
    assert_eq!(array.owned, Num::zero());
    assert_close(&array.cost, 2000.0);
}

#[test]
fn restored_levels_clamp_to_max_level() {
    let content = test_content();
    let state = test_state(&content);
    let mut lean = to_lean(&state);
    lean.upgrades.push(OwnedCount {
        id: "upg_global".to_string(),
        owned: Num::from_f64(9999.0),
    });

    let restored = from_lean(&lean, &content, 0);
    let global = &restored.upgrades[&UpgradeId("upg_global".to_string())];
    assert_close(&global.owned, 25.0);
}

#[test]
fn load_applies_offline_catch_up() {
    // Saved with 2/s and lastActive 10 s in the past: +20 energy on load,
    // before any live tick.
    let content = test_content();
    let mut state = test_state(&content);
    set_generator(&mut state, "gen_spark", 20.0);
    state.energy = Num::from_f64(100.0);
    state.meta.last_active_ms = 50_000;
    let lean = to_lean(&state);

    let restored = from_lean(&lean, &content, 60_000);

    assert_close(&restored.energy, 120.0);
    assert_eq!(restored.meta.last_active_ms, 60_000);
}

#[test]
fn load_with_current_timestamp_gains_nothing() {
    let content = test_content();
    let mut state = test_state(&content);
    set_generator(&mut state, "gen_spark", 20.0);
    state.energy = Num::from_f64(100.0);
    state.meta.last_active_ms = 60_000;
    let lean = to_lean(&state);

    let restored = from_lean(&lean, &content, 60_000);
    assert_close(&restored.energy, 100.0);
}

#[test]
fn malformed_counts_are_sanitized_on_load() {
    let content = test_content();
    let state = test_state(&content);
    let mut lean = to_lean(&state);
    lean.generators.push(OwnedCount {
        id: "gen_spark".to_string(),
        owned: Num::from_f64(-3.0),
    });
    lean.upgrades.push(OwnedCount {
        id: "upg_global".to_string(),
        owned: Num::from_f64(2.9),
    });

    let restored = from_lean(&lean, &content, 0);
    assert_eq!(
        restored.generators[&GeneratorId("gen_spark".to_string())].owned,
        Num::zero(),
        "negative counts clamp to zero"
    );
    assert_close(
        &restored.upgrades[&UpgradeId("upg_global".to_string())].owned,
        2.0,
    );
}

#[test]
fn missing_optional_sections_default() {
    // Hand-written minimal payload: only balances and lastActive.
    let content = test_content();
    let json = r#"{"energy":"250","stardust":"3","lastActive":0}"#;
    let lean: LeanSnapshot = serde_json::from_str(json).unwrap();
    let restored = from_lean(&lean, &content, 0);

    assert_close(&restored.energy, 250.0);
    assert_close(&restored.stardust, 3.0);
    assert_eq!(restored.prestige.level, 0);
    assert_eq!(restored.statistics.total_ascensions, 0);
}
