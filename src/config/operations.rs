//! Config loading, validation, and serialization.

use super::model::Config;
use crate::error::{KnobError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            KnobError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults when it is absent.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| KnobError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            KnobError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - directory and file names must be non-empty
    /// - `default_knob_min` must be below `default_knob_max`
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("templates_dir", &self.templates_dir),
            ("states_dir", &self.states_dir),
            ("state_file", &self.state_file),
        ] {
            if value.trim().is_empty() {
                return Err(KnobError::UserError(format!(
                    "config validation failed: {} must be non-empty",
                    field
                )));
            }
        }

        if self.default_knob_min >= self.default_knob_max {
            return Err(KnobError::UserError(format!(
                "config validation failed: default_knob_min ({}) must be less than default_knob_max ({})",
                self.default_knob_min, self.default_knob_max
            )));
        }

        Ok(())
    }
}
