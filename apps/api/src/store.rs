//! Persistence Store — a flat JSON record of the three form fields that
//! survive across sessions. Overwritten wholesale on every submission;
//! no migrations, no partial updates, no locking (single local user).

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The persisted form fields. Field names match the on-disk JSON keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub misc_criteria: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the saved state. Never fails: a missing, unreadable, or
    /// malformed file yields the all-empty default.
    pub fn load(&self) -> SavedState {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => SavedState::default(),
        }
    }

    /// Overwrites the backing file with pretty-printed JSON. Writes to a
    /// temp file in the same directory and renames it over the target, so
    /// a crash mid-write cannot leave a truncated store behind.
    pub fn save(&self, state: &SavedState) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let json = serde_json::to_string_pretty(state).context("Failed to serialize saved state")?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write saved state")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}
