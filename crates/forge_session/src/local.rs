//! Local snapshot persistence: one lean snapshot JSON at a fixed path,
//! read once at session start, written on the autosave cadence and at
//! shutdown.

use std::path::PathBuf;

use anyhow::{Context, Result};
use forge_core::LeanSnapshot;

#[derive(Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        LocalStore { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Writes the snapshot via a sibling temp file and rename, so a crash
    /// mid-write never truncates the previous save.
    pub fn write(&self, snapshot: &LeanSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating save directory {}", parent.display()))?;
            }
        }
        let body = serde_json::to_string(snapshot).context("serializing snapshot")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    /// Reads the snapshot if one exists. A missing file is a fresh session,
    /// not an error.
    pub fn read(&self) -> Result<Option<LeanSnapshot>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let snapshot = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(snapshot))
    }
}
