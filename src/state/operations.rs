//! State mutations and pipeline snapshots.

use super::model::{AppState, Knob, KnobDefaults, MODES, Prompt, VariableGroup};
use crate::engine::{KnobMap, Variables, WeightMode};
use crate::error::{KnobError, Result};
use serde_json::{Map, Value, json};

impl AppState {
    /// Set a knob's value and weight mode.
    ///
    /// # Errors
    ///
    /// [`KnobError::StateError`] when the knob does not exist or is locked.
    pub fn update_knob(&mut self, id: u32, value: f64, mode: WeightMode) -> Result<&Knob> {
        match self.knobs.get_mut(&id) {
            Some(knob) if !knob.locked => {
                knob.value = value;
                knob.mode = mode;
                Ok(knob)
            }
            _ => Err(KnobError::StateError(format!(
                "knob {} not found or locked",
                id
            ))),
        }
    }

    /// Create or replace a knob.
    pub fn define_knob(&mut self, knob: Knob) -> &Knob {
        let id = knob.id;
        self.knobs.insert(id, knob);
        &self.knobs[&id]
    }

    /// Merge a partial state document into this state.
    ///
    /// Accepts `{"knobs": {"<id>": {value?, mode?, label?, min?, max?,
    /// variable_name?}}, "prompt": ...}`. Knob ids that are not integers are
    /// skipped, as are entries that are not objects. Unknown knobs are created
    /// from `defaults` with the label `Knob {id}`. `prompt` may be an object,
    /// a bare string, or null (which leaves the prompt untouched).
    pub fn update_state(&mut self, data: &Value, defaults: &KnobDefaults) -> Result<()> {
        let Value::Object(data) = data else {
            return Err(KnobError::UserError(format!(
                "state update must be a JSON object, got {}",
                data
            )));
        };

        // Decode everything fallible before touching `self` so a rejected
        // update leaves the state unchanged.
        let prompt = match data.get("prompt") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(Prompt::new(text.clone())),
            Some(prompt @ Value::Object(_)) => {
                Some(serde_json::from_value(prompt.clone()).map_err(|e| {
                    KnobError::UserError(format!("invalid prompt in state update: {}", e))
                })?)
            }
            Some(other) => {
                return Err(KnobError::UserError(format!(
                    "prompt must be an object or string, got {}",
                    other
                )));
            }
        };

        if let Some(Value::Object(knobs)) = data.get("knobs") {
            for (key, fields) in knobs {
                let Ok(id) = key.trim().parse::<u32>() else {
                    tracing::debug!(key = %key, "skipping non-integer knob id");
                    continue;
                };
                let Value::Object(fields) = fields else {
                    tracing::debug!(id, "skipping non-object knob entry");
                    continue;
                };
                let knob = self
                    .knobs
                    .entry(id)
                    .or_insert_with(|| Knob::new(id, defaults));
                merge_knob_fields(knob, fields);
            }
        }

        if let Some(prompt) = prompt {
            self.update_prompt(prompt);
        }

        Ok(())
    }

    /// Replace the prompt being edited.
    pub fn update_prompt(&mut self, prompt: Prompt) -> &Prompt {
        self.prompt.insert(prompt)
    }

    /// Create a variable group, replacing an unlocked group of the same name.
    ///
    /// # Errors
    ///
    /// [`KnobError::UserError`] for a blank name; [`KnobError::StateError`]
    /// when a locked group already holds the name.
    pub fn create_variable_group(&mut self, group: VariableGroup) -> Result<&VariableGroup> {
        let name = group.name.trim().to_string();
        if name.is_empty() {
            return Err(KnobError::UserError(
                "variable group name must not be empty".to_string(),
            ));
        }
        if self.variable_groups.get(&name).is_some_and(|g| g.locked) {
            return Err(KnobError::StateError(format!(
                "variable group '{}' is locked",
                name
            )));
        }

        tracing::debug!(group = %name, variables = group.variables.len(), "creating variable group");
        let group = VariableGroup { name: name.clone(), ..group };
        self.variable_groups.insert(name.clone(), group);
        Ok(&self.variable_groups[&name])
    }

    /// Variable groups in name order.
    pub fn variable_groups(&self) -> impl Iterator<Item = &VariableGroup> {
        self.variable_groups.values()
    }

    /// Switch the active control mode (`A`, `B`, `C`, or `D`).
    pub fn switch_mode(&mut self, mode: &str) -> Result<()> {
        if !MODES.contains(&mode) {
            return Err(KnobError::StateError(format!(
                "invalid mode '{}': expected one of {}",
                mode,
                MODES.join(", ")
            )));
        }
        self.current_mode = mode.to_string();
        Ok(())
    }

    /// Knob attributes for one pipeline run.
    pub fn knob_snapshot(&self) -> KnobMap {
        self.knobs.iter().map(|(id, knob)| (*id, knob.attrs())).collect()
    }

    /// [`Self::knob_snapshot`] with labels linked to matching variable names.
    pub fn linked_snapshot(&self, variables: &Variables) -> KnobMap {
        let mut knobs = self.knob_snapshot();
        link_variables(&mut knobs, variables);
        knobs
    }

    /// The client-facing view: `{knobs, prompt, current_mode}`.
    pub fn current_view(&self) -> Value {
        json!({
            "knobs": self.knobs,
            "prompt": self.prompt,
            "current_mode": self.current_mode,
        })
    }
}

/// Set `variable_name` on every knob whose label names a variable.
pub fn link_variables(knobs: &mut KnobMap, variables: &Variables) {
    for knob in knobs.values_mut() {
        if let Some(label) = &knob.label
            && variables.contains_key(label)
        {
            knob.variable_name = Some(label.clone());
        }
    }
}

fn merge_knob_fields(knob: &mut Knob, fields: &Map<String, Value>) {
    if let Some(value) = fields.get("value").and_then(Value::as_f64) {
        knob.value = value;
    }
    if let Some(mode) = fields.get("mode").and_then(Value::as_str) {
        match WeightMode::from_str(mode) {
            Some(mode) => knob.mode = mode,
            None => tracing::warn!(id = knob.id, mode, "ignoring unknown knob mode"),
        }
    }
    if let Some(label) = fields.get("label").and_then(Value::as_str) {
        knob.label = label.to_string();
    }
    if let Some(min) = fields.get("min").and_then(Value::as_f64) {
        knob.min = min;
    }
    if let Some(max) = fields.get("max").and_then(Value::as_f64) {
        knob.max = max;
    }
    match fields.get("variable_name") {
        Some(Value::String(name)) => knob.variable_name = Some(name.clone()),
        Some(Value::Null) => knob.variable_name = None,
        _ => {}
    }
}
