//! State persistence.

use super::model::AppState;
use crate::error::{KnobError, Result};
use crate::fs::atomic_write_file;
use std::fs;
use std::path::Path;

impl AppState {
    /// Write the state as pretty JSON, atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| KnobError::StateError(format!("failed to serialize state: {}", e)))?;

        atomic_write_file(path, &format!("{}\n", json))?;
        tracing::info!(path = %path.display(), knobs = self.knobs.len(), "saved state");
        Ok(())
    }

    /// Read a state file.
    ///
    /// # Errors
    ///
    /// - [`KnobError::NotFound`] when the file does not exist
    /// - [`KnobError::StateError`] when it is unreadable or not a state document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KnobError::NotFound(format!(
                "state file {} not found",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            KnobError::StateError(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let state: AppState = serde_json::from_str(&content).map_err(|e| {
            KnobError::StateError(format!("invalid state file '{}': {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), knobs = state.knobs.len(), "loaded state");
        Ok(state)
    }

    /// Load the state at `path`, or an empty state when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Err(KnobError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Names (file stems) of the `*.json` snapshots in `dir`, sorted.
    ///
    /// A missing directory lists as empty.
    pub fn list_saved<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            KnobError::StateError(format!("failed to read '{}': {}", dir.display(), e))
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }
}
