use super::*;
use crate::test_fixtures::{base_content, base_state, minimal_content};

mod snapshot;

// --- Shared test helpers ------------------------------------------------

fn test_content() -> GameContent {
    base_content()
}

fn test_state(content: &GameContent) -> GameState {
    base_state(content)
}

fn set_generator(state: &mut GameState, id: &str, owned: f64) {
    let item = state
        .generators
        .get_mut(&GeneratorId(id.to_string()))
        .expect("unknown generator id in test");
    item.owned = Num::from_f64(owned);
}

fn set_upgrade(state: &mut GameState, id: &str, level: f64) {
    let item = state
        .upgrades
        .get_mut(&UpgradeId(id.to_string()))
        .expect("unknown upgrade id in test");
    item.owned = Num::from_f64(level);
}

fn set_stardust_upgrade(state: &mut GameState, id: &str, level: f64) {
    let item = state
        .stardust_upgrades
        .get_mut(&StardustUpgradeId(id.to_string()))
        .expect("unknown stardust upgrade id in test");
    item.owned = Num::from_f64(level);
}

fn generator_ref(id: &str) -> ItemRef {
    ItemRef::Generator(GeneratorId(id.to_string()))
}

fn upgrade_ref(id: &str) -> ItemRef {
    ItemRef::Upgrade(UpgradeId(id.to_string()))
}

fn stardust_ref(id: &str) -> ItemRef {
    ItemRef::StardustUpgrade(StardustUpgradeId(id.to_string()))
}

/// Relative comparison for values that passed through the log-form `pow`.
fn assert_close(actual: &Num, expected: f64) {
    let actual = actual.to_f64();
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() < 1e-6 * scale,
        "expected ~{expected}, got {actual}"
    );
}
