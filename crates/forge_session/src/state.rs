use std::sync::Arc;

use forge_core::{
    apply_command, energy_per_click, energy_per_second, Command, EventEnvelope, GameContent,
    GameState, LeanSnapshot, Num,
};
use parking_lot::Mutex;

pub struct SessionState {
    pub game: GameState,
    pub content: GameContent,
}

pub type SharedSession = Arc<Mutex<SessionState>>;

pub fn new_shared(content: GameContent, game: GameState) -> SharedSession {
    Arc::new(Mutex::new(SessionState { game, content }))
}

/// Builds the session at startup: restores the local snapshot when one
/// exists (including its offline catch-up pass), otherwise starts fresh.
pub fn bootstrap(
    content: GameContent,
    store: &crate::local::LocalStore,
    now_ms: i64,
) -> anyhow::Result<SharedSession> {
    let game = match store.read()? {
        Some(snapshot) => forge_core::from_lean(&snapshot, &content, now_ms),
        None => GameState::new(&content, now_ms),
    };
    Ok(new_shared(content, game))
}

impl SessionState {
    /// Applies one player intent. The lock holder mutates state atomically;
    /// readers never observe a partially applied command.
    pub fn dispatch(&mut self, command: &Command) -> Vec<EventEnvelope> {
        apply_command(&mut self.game, &self.content, command)
    }

    pub fn rate(&self) -> Num {
        energy_per_second(&self.game, &self.content)
    }

    pub fn click_value(&self) -> Num {
        energy_per_click(&self.game, &self.content)
    }

    pub fn snapshot(&self) -> LeanSnapshot {
        forge_core::to_lean(&self.game)
    }

    /// Replaces the whole state from a loaded snapshot — a single atomic
    /// swap, including the offline catch-up pass the codec runs.
    pub fn restore(&mut self, snapshot: &LeanSnapshot, now_ms: i64) {
        self.game = forge_core::from_lean(snapshot, &self.content, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalStore;
    use forge_core::test_fixtures::{base_content, base_state};

    #[test]
    fn bootstrap_starts_fresh_without_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("save.json"));
        let content = base_content();
        let starting = content.constants.starting_energy;

        let session = bootstrap(content, &store, 0).unwrap();
        let guard = session.lock();
        assert!((guard.game.energy.to_f64() - starting).abs() < 1e-9);
    }

    #[test]
    fn bootstrap_restores_the_local_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("save.json"));
        let content = base_content();
        let mut game = base_state(&content);
        game.energy = Num::from_f64(5555.0);
        forge_core::touch(&mut game, 1000);
        store.write(&forge_core::to_lean(&game)).unwrap();

        let session = bootstrap(content, &store, 1000).unwrap();
        let guard = session.lock();
        assert_eq!(guard.game.energy, Num::from_f64(5555.0));
    }

    #[test]
    fn dispatch_applies_commands_atomically() {
        let content = base_content();
        let game = base_state(&content);
        let session = new_shared(content, game);

        let events = session.lock().dispatch(&Command::Click);
        assert_eq!(events.len(), 1);
        assert!(session.lock().game.energy > Num::from_f64(10.0));
    }
}
