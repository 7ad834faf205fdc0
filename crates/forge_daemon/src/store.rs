//! Save storage keyed by identity.
//!
//! The stored envelope mirrors the original wire format: the serialized
//! game-state string plus its integrity tag. `FsStore` keeps one file per
//! identity; `MemoryStore` backs the router tests.

#[cfg(test)]
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
#[cfg(test)]
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveEnvelope {
    /// JSON-serialized lean snapshot, exactly as hashed.
    pub game_state: String,
    /// Base64 HMAC-SHA-256 tag over `game_state`.
    pub hash: String,
}

pub trait SaveStore: Send + Sync {
    fn put(&self, identity: &str, envelope: &SaveEnvelope) -> Result<()>;
    fn get(&self, identity: &str) -> Result<Option<SaveEnvelope>>;
}

// ---------------------------------------------------------------------------
// Filesystem store
// ---------------------------------------------------------------------------

pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating save directory {}", dir.display()))?;
        Ok(FsStore {
            dir: dir.to_path_buf(),
        })
    }

    /// Identities are caller-supplied strings; encode them so they can never
    /// traverse outside the save directory.
    fn path_for(&self, identity: &str) -> PathBuf {
        let encoded = URL_SAFE_NO_PAD.encode(identity.as_bytes());
        self.dir.join(format!("{encoded}.json"))
    }
}

impl SaveStore for FsStore {
    fn put(&self, identity: &str, envelope: &SaveEnvelope) -> Result<()> {
        let path = self.path_for(identity);
        let body = serde_json::to_string(envelope).context("serializing save envelope")?;
        std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn get(&self, identity: &str) -> Result<Option<SaveEnvelope>> {
        let path = self.path_for(identity);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error).with_context(|| format!("reading {}", path.display()))
            }
        };
        let envelope =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(envelope))
    }
}

// ---------------------------------------------------------------------------
// In-memory store (tests)
// ---------------------------------------------------------------------------

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    saves: Mutex<HashMap<String, SaveEnvelope>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Direct mutation hook for tamper tests.
    pub fn corrupt<F: FnOnce(&mut SaveEnvelope)>(&self, identity: &str, mutate: F) {
        let mut saves = self.saves.lock();
        if let Some(envelope) = saves.get_mut(identity) {
            mutate(envelope);
        }
    }
}

#[cfg(test)]
impl SaveStore for MemoryStore {
    fn put(&self, identity: &str, envelope: &SaveEnvelope) -> Result<()> {
        self.saves
            .lock()
            .insert(identity.to_string(), envelope.clone());
        Ok(())
    }

    fn get(&self, identity: &str) -> Result<Option<SaveEnvelope>> {
        Ok(self.saves.lock().get(identity).cloned())
    }
}
