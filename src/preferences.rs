//! Persistent display preferences.

use crate::errors::PreferenceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default = "default_night_mode")]
    pub night_mode: bool,
}

fn default_night_mode() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            night_mode: default_night_mode(),
        }
    }
}

/// JSON-backed preference file. Every change is written through immediately.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    preferences: Preferences,
}

impl PreferenceStore {
    /// Read the file at `path`, falling back to defaults when it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let preferences = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Preferences::default()
        };
        debug!(path = %path.display(), night_mode = preferences.night_mode, "preferences loaded");
        Ok(Self { path, preferences })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn night_mode(&self) -> bool {
        self.preferences.night_mode
    }

    /// Flip night mode and persist it. Returns the new value.
    pub fn toggle_night_mode(&mut self) -> Result<bool, PreferenceError> {
        self.set_night_mode(!self.preferences.night_mode)?;
        Ok(self.preferences.night_mode)
    }

    pub fn set_night_mode(&mut self, enabled: bool) -> Result<(), PreferenceError> {
        let updated = Preferences { night_mode: enabled };
        self.write(&updated)?;
        self.preferences = updated;
        Ok(())
    }

    fn write(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(preferences)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_defaults_to_night_mode() {
        let dir = TempDir::new().expect("temp dir");
        let store = PreferenceStore::open(dir.path().join("prefs.json")).expect("open");
        assert!(store.night_mode());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_toggle_persists() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = PreferenceStore::open(&path).expect("open");
        assert!(!store.toggle_night_mode().expect("toggle"));

        let reopened = PreferenceStore::open(&path).expect("reopen");
        assert_eq!(reopened.preferences(), Preferences { night_mode: false });

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(json["night_mode"], false);
    }

    #[test]
    fn test_corrupted_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").expect("write");

        match PreferenceStore::open(&path) {
            Err(PreferenceError::Corrupted(_)) => {}
            other => panic!("Expected corrupted preferences, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_object_uses_default() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{}").expect("write");
        assert!(PreferenceStore::open(&path).expect("open").night_mode());
    }
}
