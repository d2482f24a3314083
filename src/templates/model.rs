//! Template documents.

use crate::state::{AppState, Knob};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A saved template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Knob settings keyed by knob id, in the shape [`AppState::update_state`] merges.
    #[serde(default)]
    pub knobs: Map<String, Value>,
    #[serde(default)]
    pub variables: Map<String, Value>,
    #[serde(default)]
    pub prompt: Option<String>,
    /// RFC3339, set on first save.
    #[serde(default)]
    pub created_at: Option<String>,
    /// RFC3339, refreshed on every save.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            knobs: Map::new(),
            variables: Map::new(),
            prompt: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Capture the knobs and prompt text of `state`.
    pub fn from_state(name: impl Into<String>, state: &AppState) -> Self {
        let knobs = state
            .knobs
            .iter()
            .map(|(id, knob)| (id.to_string(), knob_settings(knob)))
            .collect();

        Self {
            knobs,
            prompt: state.prompt.as_ref().map(|p| p.text.clone()),
            ..Self::new(name)
        }
    }

    /// The partial state document that [`AppState::update_state`] merges.
    pub fn state_update(&self) -> Value {
        let mut update = Map::new();
        update.insert("knobs".to_string(), Value::Object(self.knobs.clone()));
        if let Some(prompt) = &self.prompt {
            update.insert("prompt".to_string(), Value::String(prompt.clone()));
        }
        Value::Object(update)
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            created_at: self.created_at.clone().unwrap_or_default(),
            updated_at: self.updated_at.clone().unwrap_or_default(),
        }
    }
}

fn knob_settings(knob: &Knob) -> Value {
    let mut settings = Map::new();
    settings.insert("value".to_string(), Value::from(knob.value));
    settings.insert("mode".to_string(), Value::from(knob.mode.as_str()));
    settings.insert("label".to_string(), Value::from(knob.label.clone()));
    settings.insert("min".to_string(), Value::from(knob.min));
    settings.insert("max".to_string(), Value::from(knob.max));
    if let Some(name) = &knob.variable_name {
        settings.insert("variable_name".to_string(), Value::from(name.clone()));
    }
    Value::Object(settings)
}

/// Listing entry for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}
