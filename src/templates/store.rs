//! Template storage on disk.

use super::model::{Template, TemplateSummary};
use crate::error::{KnobError, Result};
use crate::fs::atomic_write_file;
use crate::state::{AppState, KnobDefaults};
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Map a template name to a file stem.
///
/// Spaces and every other character that is not alphanumeric or `_` become
/// `_`; the result is lower-cased. `"My Cool Template!"` → `"my_cool_template_"`.
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

/// A directory of `<safe_name>.json` template files.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_filename(name)))
    }

    /// Write `template`, stamping `created_at` (if unset) and `updated_at`.
    pub fn save(&self, template: &mut Template) -> Result<PathBuf> {
        if template.name.trim().is_empty() {
            return Err(KnobError::UserError(
                "template name must be non-empty".to_string(),
            ));
        }

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        if template.created_at.is_none() {
            template.created_at = Some(now.clone());
        }
        template.updated_at = Some(now);

        let path = self.path_for(&template.name);
        let json = serde_json::to_string_pretty(template).map_err(|e| {
            KnobError::StateError(format!("failed to serialize template: {}", e))
        })?;
        atomic_write_file(&path, &format!("{}\n", json))?;

        tracing::info!(name = %template.name, path = %path.display(), "saved template");
        Ok(path)
    }

    /// Load a template by name, `Ok(None)` when no such file exists.
    pub fn load(&self, name: &str) -> Result<Option<Template>> {
        let path = self.path_for(name);
        if !path.exists() {
            tracing::debug!(name, path = %path.display(), "template not found");
            return Ok(None);
        }

        let template = read_template(&path)?;
        tracing::info!(name = %template.name, "loaded template");
        Ok(Some(template))
    }

    /// Like [`Self::load`], but a missing template is [`KnobError::NotFound`].
    pub fn require(&self, name: &str) -> Result<Template> {
        self.load(name)?
            .ok_or_else(|| KnobError::NotFound(format!("template '{}'", name)))
    }

    /// Delete a template, `Ok(false)` when it did not exist.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).map_err(|e| {
            KnobError::StateError(format!("failed to delete '{}': {}", path.display(), e))
        })?;
        tracing::info!(name, path = %path.display(), "deleted template");
        Ok(true)
    }

    /// Summaries of every readable template, sorted by file name.
    ///
    /// Files that fail to parse are skipped with a warning. A missing
    /// directory lists as empty.
    pub fn list(&self) -> Result<Vec<TemplateSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            KnobError::StateError(format!("failed to read '{}': {}", self.dir.display(), e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().is_some_and(|ext| ext == "json")
                    && !path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with('.'))
            })
            .collect();
        paths.sort();

        let mut summaries = Vec::with_capacity(paths.len());
        for path in paths {
            match read_template(&path) {
                Ok(template) => summaries.push(template.summary()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable template")
                }
            }
        }
        Ok(summaries)
    }

    /// Capture `state` as a template and save it.
    pub fn save_from_state(
        &self,
        name: &str,
        description: Option<String>,
        state: &AppState,
    ) -> Result<Template> {
        let mut template = Template::from_state(name, state);
        template.description = description;
        // Re-saving keeps the original creation time.
        if let Some(existing) = self.load(name)? {
            template.created_at = existing.created_at;
        }
        self.save(&mut template)?;
        Ok(template)
    }

    /// Merge a stored template's knobs and prompt into `state`.
    pub fn apply(
        &self,
        name: &str,
        state: &mut AppState,
        defaults: &KnobDefaults,
    ) -> Result<Template> {
        let template = self.require(name)?;
        state.update_state(&template.state_update(), defaults)?;
        Ok(template)
    }
}

fn read_template(path: &Path) -> Result<Template> {
    let content = fs::read_to_string(path).map_err(|e| {
        KnobError::StateError(format!("failed to read '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        KnobError::StateError(format!("invalid template file '{}': {}", path.display(), e))
    })
}
