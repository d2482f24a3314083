//! Workspace resolution for knobprompt.
//!
//! Every command operates on a workspace root containing a `.knobprompt/`
//! data directory. The root comes from `--root`, then the `KNOBPROMPT_ROOT`
//! environment variable, then the current working directory. All other paths
//! (config, live state, saved states, templates) are derived from the root and
//! the loaded [`Config`].

use crate::config::Config;
use crate::error::{KnobError, Result};
use crate::templates::safe_filename;
use std::env;
use std::path::{Path, PathBuf};

/// Name of the data directory under the workspace root.
pub const DATA_DIR: &str = ".knobprompt";

/// Environment variable consulted when `--root` is not given.
pub const ROOT_ENV_VAR: &str = "KNOBPROMPT_ROOT";

/// Resolved paths and configuration for one workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    /// Absolute (or caller-supplied) workspace root.
    pub root: PathBuf,

    /// `{root}/.knobprompt/`
    pub data_dir: PathBuf,

    /// Configuration loaded from `{data_dir}/config.yaml`, or defaults.
    pub config: Config,
}

impl WorkspaceContext {
    /// Resolve the workspace from an optional explicit root.
    pub fn resolve(root: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => match env::var_os(ROOT_ENV_VAR) {
                Some(value) if !value.is_empty() => PathBuf::from(value),
                _ => env::current_dir().map_err(|e| {
                    KnobError::UserError(format!(
                        "failed to get current working directory: {}",
                        e
                    ))
                })?,
            },
        };

        Self::resolve_from(root)
    }

    /// Resolve the workspace rooted at `root`, loading its config if present.
    pub fn resolve_from<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let data_dir = root.join(DATA_DIR);
        let config = Config::load_or_default(data_dir.join("config.yaml"))?;

        tracing::debug!(root = %root.display(), "resolved workspace");

        Ok(Self {
            root,
            data_dir,
            config,
        })
    }

    /// Whether `knobprompt init` has been run here.
    pub fn is_initialized(&self) -> bool {
        self.config_path().exists()
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.yaml")
    }

    /// The live application state file.
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.state_file)
    }

    /// Directory of named state snapshots.
    pub fn states_dir(&self) -> PathBuf {
        self.data_dir.join(&self.config.states_dir)
    }

    /// Path of the named snapshot `{states_dir}/{safe_name}.json`.
    pub fn saved_state_path(&self, name: &str) -> PathBuf {
        self.states_dir().join(format!("{}.json", safe_filename(name)))
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.data_dir.join(&self.config.templates_dir)
    }
}
