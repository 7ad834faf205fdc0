//! Lean-snapshot codec.
//!
//! A snapshot carries only balances, owned counts, prestige progress, and
//! selected statistics — never the derived `cost` caches, which are
//! recomputed on load. Field names follow the wire protocol
//! (`lastActive`, `stardustUpgrades`, `{id, owned}` pairs), so the same
//! types serve local persistence and the remote store.

use serde::{Deserialize, Serialize};

use crate::num::{self, Num};
use crate::types::{GameContent, GameState, ItemState};
use crate::{accrual, cost};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeanSnapshot {
    pub energy: Num,
    pub stardust: Num,
    #[serde(default)]
    pub generators: Vec<OwnedCount>,
    #[serde(default)]
    pub upgrades: Vec<OwnedCount>,
    #[serde(default)]
    pub stardust_upgrades: Vec<OwnedCount>,
    #[serde(default)]
    pub prestige: Option<PrestigeSnapshot>,
    #[serde(default)]
    pub statistics: Option<StatisticsSnapshot>,
    /// Wall-clock milliseconds of the last persisted activity.
    pub last_active: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedCount {
    pub id: String,
    pub owned: Num,
}

/// Prestige progress. The multiplier is derived from points and is
/// recomputed on load, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestigeSnapshot {
    pub level: u64,
    pub points: Num,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub total_energy_generated: Num,
    pub total_ascensions: u64,
    pub max_energy_reached: Num,
    pub max_stardust_reached: Num,
    pub total_time_played_seconds: f64,
    pub start_time_ms: i64,
}

fn owned_entries<K, F>(
    items: &std::collections::HashMap<K, ItemState>,
    id_text: F,
) -> Vec<OwnedCount>
where
    K: std::hash::Hash + Eq,
    F: Fn(&K) -> String,
{
    let mut entries: Vec<OwnedCount> = items
        .iter()
        .filter(|(_, item)| item.owned > Num::zero())
        .map(|(id, item)| OwnedCount {
            id: id_text(id),
            owned: item.owned,
        })
        .collect();
    // Stable output so identical states serialize byte-identically.
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    entries
}

/// Extracts the minimal persisted representation of `state`.
pub fn to_lean(state: &GameState) -> LeanSnapshot {
    LeanSnapshot {
        energy: state.energy,
        stardust: state.stardust,
        generators: owned_entries(&state.generators, |id| id.0.clone()),
        upgrades: owned_entries(&state.upgrades, |id| id.0.clone()),
        stardust_upgrades: owned_entries(&state.stardust_upgrades, |id| id.0.clone()),
        prestige: Some(PrestigeSnapshot {
            level: state.prestige.level,
            points: state.prestige.points,
        }),
        statistics: Some(StatisticsSnapshot {
            total_energy_generated: state.statistics.total_energy_generated,
            total_ascensions: state.statistics.total_ascensions,
            max_energy_reached: state.statistics.max_energy_reached,
            max_stardust_reached: state.statistics.max_stardust_reached,
            total_time_played_seconds: state.statistics.total_time_played_seconds,
            start_time_ms: state.statistics.start_time_ms,
        }),
        last_active: state.meta.last_active_ms,
    }
}

/// A restored count: finite, non-negative, whole, and within the level cap.
fn restored_count(raw: &Num, max_level: Option<u32>) -> Num {
    if !raw.is_finite() {
        return Num::zero();
    }
    let count = raw.floor().max(Num::zero());
    match max_level {
        Some(cap) => count.min(Num::from_u64(u64::from(cap))),
        None => count,
    }
}

fn restored_balance(raw: &Num, fallback: Num) -> Num {
    if raw.is_finite() && *raw >= Num::zero() {
        *raw
    } else {
        fallback
    }
}

/// Reconstructs a full `GameState` by overlaying a snapshot on a freshly
/// generated default state: snapshot ids unknown to the catalog are ignored,
/// catalog entries missing from the snapshot keep their defaults, every cost
/// cache is recomputed from the restored owned counts, and one offline
/// catch-up pass runs if the snapshot's `lastActive` lies in the past.
pub fn from_lean(snapshot: &LeanSnapshot, content: &GameContent, now_ms: i64) -> GameState {
    let mut state = GameState::new(content, now_ms);

    state.energy = restored_balance(&snapshot.energy, state.energy);
    state.stardust = restored_balance(&snapshot.stardust, Num::zero());

    for entry in &snapshot.generators {
        let id = crate::types::GeneratorId(entry.id.clone());
        if let Some(item) = state.generators.get_mut(&id) {
            item.owned = restored_count(&entry.owned, None);
        }
    }
    for entry in &snapshot.upgrades {
        let id = crate::types::UpgradeId(entry.id.clone());
        let cap = content
            .upgrades
            .iter()
            .find(|def| def.id == id)
            .and_then(|def| def.max_level);
        if let Some(item) = state.upgrades.get_mut(&id) {
            item.owned = restored_count(&entry.owned, cap);
        }
    }
    for entry in &snapshot.stardust_upgrades {
        let id = crate::types::StardustUpgradeId(entry.id.clone());
        let cap = content
            .stardust_upgrades
            .iter()
            .find(|def| def.id == id)
            .and_then(|def| def.max_level);
        if let Some(item) = state.stardust_upgrades.get_mut(&id) {
            item.owned = restored_count(&entry.owned, cap);
        }
    }

    if let Some(prestige) = &snapshot.prestige {
        state.prestige.level = prestige.level;
        state.prestige.points = restored_balance(&prestige.points, Num::zero());
        state.prestige.multiplier = num::powf(
            content.constants.prestige_multiplier_base,
            &state.prestige.points,
        );
    }
    if let Some(statistics) = &snapshot.statistics {
        state.statistics.total_energy_generated =
            restored_balance(&statistics.total_energy_generated, Num::zero());
        state.statistics.total_ascensions = statistics.total_ascensions;
        state.statistics.max_energy_reached =
            restored_balance(&statistics.max_energy_reached, state.energy);
        state.statistics.max_stardust_reached =
            restored_balance(&statistics.max_stardust_reached, state.stardust);
        if statistics.total_time_played_seconds.is_finite()
            && statistics.total_time_played_seconds >= 0.0
        {
            state.statistics.total_time_played_seconds = statistics.total_time_played_seconds;
        }
        state.statistics.start_time_ms = statistics.start_time_ms;
    }

    cost::refresh_costs(&mut state, content);

    state.meta.last_active_ms = snapshot.last_active;
    if snapshot.last_active < now_ms {
        accrual::offline_catch_up(&mut state, content, now_ms);
    } else {
        state.meta.last_active_ms = now_ms;
    }
    state
}
