//! Real-time session over newline-delimited JSON.
//!
//! `knobprompt session` reads one client message per line on stdin and writes
//! server messages, one per line, to stdout. Every message is an envelope
//! `{"type": "...", "data": ...}`.
//!
//! | Client message      | Reply                                          |
//! |---------------------|------------------------------------------------|
//! | `state_update`      | `state_update` with the current view           |
//! | `process_prompt`    | `prompt_result`                                |
//! | `save_template`     | `template_saved`                               |
//! | `load_template`     | `template_loaded`, then `state_update` on hit  |
//! | `list_templates`    | `templates_list`                               |
//! | anything undecodable| `error`                                        |
//!
//! State changes are written back to the workspace state file.

use crate::context::WorkspaceContext;
use crate::engine::{Pipeline, Variables};
use crate::error::{KnobError, Result};
use crate::request::ProcessingResponse;
use crate::state::{AppState, KnobDefaults};
use crate::templates::{Template, TemplateStore, TemplateSummary};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use uuid::Uuid;

/// Raw `{type, data}` envelope read from the client.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Default, Deserialize)]
struct PromptData {
    #[serde(default)]
    text: String,
    #[serde(default)]
    variables: Variables,
}

#[derive(Debug, Default, Deserialize)]
struct TemplateData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    knobs: Map<String, Value>,
    #[serde(default)]
    variables: Map<String, Value>,
    #[serde(default)]
    prompt: Option<String>,
}

/// Result of a template save or load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    pub message: String,
}

impl TemplateOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            name: None,
            template: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplatesList {
    pub success: bool,
    pub templates: Vec<TemplateSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorData {
    pub message: String,
}

/// Messages written to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    InitialState(Value),
    StateUpdate(Value),
    PromptResult(ProcessingResponse),
    TemplateSaved(TemplateOutcome),
    TemplateLoaded(TemplateOutcome),
    TemplatesList(TemplatesList),
    Error(ErrorData),
}

impl ServerMessage {
    fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorData {
            message: message.into(),
        })
    }
}

/// A session bound to one workspace.
pub struct Session {
    state: AppState,
    state_file: PathBuf,
    store: TemplateStore,
    defaults: KnobDefaults,
    pipeline: Pipeline,
}

impl Session {
    /// Open a session on the workspace's live state.
    pub fn open(ctx: &WorkspaceContext) -> Result<Self> {
        let state_file = ctx.state_file();
        Ok(Self {
            state: AppState::load_or_default(&state_file)?,
            state_file,
            store: TemplateStore::new(ctx.templates_dir()),
            defaults: KnobDefaults::from(&ctx.config),
            pipeline: Pipeline::realtime(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The message sent once when a client connects.
    pub fn initial_state(&self) -> ServerMessage {
        ServerMessage::InitialState(self.state.current_view())
    }

    /// Handle one line of client input, returning the replies in order.
    ///
    /// Blank lines produce no reply. Failures are reported to the client,
    /// never propagated.
    pub fn handle_line(&mut self, line: &str) -> Vec<ServerMessage> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let envelope: Envelope = match serde_json::from_str(line) {
            Ok(envelope) => envelope,
            Err(e) => return vec![ServerMessage::error(format!("invalid message: {}", e))],
        };

        tracing::debug!(kind = %envelope.kind, "session message");
        match envelope.kind.as_str() {
            "state_update" => vec![self.on_state_update(&envelope.data)],
            "process_prompt" => vec![self.on_process_prompt(envelope.data)],
            "save_template" => vec![self.on_save_template(envelope.data)],
            "load_template" => self.on_load_template(&envelope.data),
            "list_templates" => vec![self.on_list_templates()],
            other => vec![ServerMessage::error(format!(
                "unknown message type '{}'",
                other
            ))],
        }
    }

    /// Serve `input` until end of stream.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        write_message(&mut output, &self.initial_state())?;

        for line in input.lines() {
            let line = line
                .map_err(|e| KnobError::UserError(format!("failed to read session input: {}", e)))?;
            for reply in self.handle_line(&line) {
                write_message(&mut output, &reply)?;
            }
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        self.state.save(&self.state_file)
    }

    fn on_state_update(&mut self, data: &Value) -> ServerMessage {
        let updated = self
            .state
            .update_state(data, &self.defaults)
            .and_then(|()| self.persist());
        match updated {
            Ok(()) => ServerMessage::StateUpdate(self.state.current_view()),
            Err(err) => ServerMessage::error(err.to_string()),
        }
    }

    fn on_process_prompt(&self, data: Value) -> ServerMessage {
        let prompt: PromptData = match serde_json::from_value(data) {
            Ok(prompt) => prompt,
            Err(e) => {
                return ServerMessage::PromptResult(ProcessingResponse::failed(
                    "",
                    format!("invalid process_prompt data: {}", e),
                ));
            }
        };

        let knobs = self.state.linked_snapshot(&prompt.variables);
        let rendered = self.pipeline.render(&prompt.text, &knobs, &prompt.variables);
        ServerMessage::PromptResult(ProcessingResponse::succeeded(
            &prompt.text,
            rendered.text,
            rendered.diagnostics,
        ))
    }

    fn on_save_template(&self, data: Value) -> ServerMessage {
        let data: TemplateData = match serde_json::from_value(data) {
            Ok(data) => data,
            Err(e) => {
                return ServerMessage::TemplateSaved(TemplateOutcome::failure(format!(
                    "Error saving template: {}",
                    e
                )));
            }
        };

        let name = data
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(generated_template_name);
        let mut template = Template {
            description: data.description,
            knobs: data.knobs,
            variables: data.variables,
            prompt: data.prompt,
            ..Template::new(name.clone())
        };

        match self.store.save(&mut template) {
            Ok(_) => ServerMessage::TemplateSaved(TemplateOutcome {
                success: true,
                message: format!("Template '{}' saved successfully", name),
                name: Some(name),
                template: None,
            }),
            Err(err) => ServerMessage::TemplateSaved(TemplateOutcome {
                name: Some(name.clone()),
                ..TemplateOutcome::failure(format!("Failed to save template '{}': {}", name, err))
            }),
        }
    }

    fn on_load_template(&mut self, data: &Value) -> Vec<ServerMessage> {
        let Some(name) = data
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
        else {
            return vec![ServerMessage::TemplateLoaded(TemplateOutcome::failure(
                "Template name is required",
            ))];
        };

        let template = match self.store.load(name) {
            Ok(Some(template)) => template,
            Ok(None) => {
                return vec![ServerMessage::TemplateLoaded(TemplateOutcome::failure(
                    format!("Template '{}' not found", name),
                ))];
            }
            Err(err) => {
                return vec![ServerMessage::TemplateLoaded(TemplateOutcome::failure(
                    format!("Error loading template: {}", err),
                ))];
            }
        };

        let loaded = ServerMessage::TemplateLoaded(TemplateOutcome {
            success: true,
            name: Some(template.name.clone()),
            message: format!("Template '{}' loaded successfully", template.name),
            template: Some(template.clone()),
        });
        vec![loaded, self.on_state_update(&template.state_update())]
    }

    fn on_list_templates(&self) -> ServerMessage {
        match self.store.list() {
            Ok(templates) => ServerMessage::TemplatesList(TemplatesList {
                success: true,
                templates,
                message: None,
            }),
            Err(err) => ServerMessage::TemplatesList(TemplatesList {
                success: false,
                templates: Vec::new(),
                message: Some(format!("Error listing templates: {}", err)),
            }),
        }
    }
}

/// `Template <8 hex digits>`, distinct across saves in the same second.
fn generated_template_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("Template {}", &id[..8])
}

fn write_message<W: Write>(output: &mut W, message: &ServerMessage) -> Result<()> {
    let line = serde_json::to_string(message)
        .map_err(|e| KnobError::StateError(format!("failed to encode message: {}", e)))?;
    writeln!(output, "{}", line)
        .and_then(|()| output.flush())
        .map_err(|e| KnobError::UserError(format!("failed to write session output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn session() -> (TempDir, WorkspaceContext, Session) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = WorkspaceContext::resolve_from(temp_dir.path()).unwrap();
        let session = Session::open(&ctx).unwrap();
        (temp_dir, ctx, session)
    }

    fn send(session: &mut Session, message: Value) -> Vec<Value> {
        session
            .handle_line(&message.to_string())
            .iter()
            .map(|reply| serde_json::to_value(reply).unwrap())
            .collect()
    }

    #[test]
    fn test_initial_state_envelope() {
        let (_dir, _ctx, session) = session();
        let message = serde_json::to_value(session.initial_state()).unwrap();
        assert_eq!(message["type"], "initial_state");
        assert_eq!(message["data"]["current_mode"], "A");
        assert!(message["data"]["knobs"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_state_update_is_persisted() {
        let (_dir, ctx, mut session) = session();

        let replies = send(
            &mut session,
            json!({"type": "state_update", "data": {"knobs": {"1": {"value": 20, "label": "style"}}}}),
        );

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["type"], "state_update");
        assert_eq!(replies[0]["data"]["knobs"]["1"]["value"], 20.0);

        let saved = AppState::load(ctx.state_file()).unwrap();
        assert_eq!(saved.knobs[&1].label, "style");
    }

    #[test]
    fn test_process_prompt_links_knob_labels() {
        let (_dir, _ctx, mut session) = session();
        send(
            &mut session,
            json!({"type": "state_update", "data": {"knobs": {"1": {"value": 100, "label": "style"}}}}),
        );

        let replies = send(
            &mut session,
            json!({"type": "process_prompt", "data": {
                "text": "a {style} car, [neon:1:B]",
                "variables": {"style": "red, blue, green"}
            }}),
        );

        assert_eq!(replies[0]["type"], "prompt_result");
        assert_eq!(replies[0]["data"]["success"], true);
        assert_eq!(replies[0]["data"]["original"], "a {style} car, [neon:1:B]");
        assert_eq!(replies[0]["data"]["processed"], "a green car, (neon:10)");
    }

    #[test]
    fn test_save_list_and_load_template() {
        let (_dir, _ctx, mut session) = session();

        let saved = send(
            &mut session,
            json!({"type": "save_template", "data": {
                "name": "Night Drive",
                "description": "neon",
                "knobs": {"2": {"value": 10, "label": "glow"}},
                "prompt": "a car at night"
            }}),
        );
        assert_eq!(saved[0]["type"], "template_saved");
        assert_eq!(saved[0]["data"]["success"], true);
        assert_eq!(saved[0]["data"]["name"], "Night Drive");

        let listed = send(&mut session, json!({"type": "list_templates"}));
        assert_eq!(listed[0]["type"], "templates_list");
        assert_eq!(listed[0]["data"]["templates"][0]["name"], "Night Drive");

        let loaded = send(
            &mut session,
            json!({"type": "load_template", "data": {"name": "Night Drive"}}),
        );
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0]["type"], "template_loaded");
        assert_eq!(loaded[0]["data"]["template"]["prompt"], "a car at night");
        assert_eq!(loaded[1]["type"], "state_update");
        assert_eq!(loaded[1]["data"]["knobs"]["2"]["label"], "glow");
        assert_eq!(loaded[1]["data"]["prompt"]["text"], "a car at night");
    }

    #[test]
    fn test_load_template_failures() {
        let (_dir, _ctx, mut session) = session();

        let missing_name = send(&mut session, json!({"type": "load_template", "data": {}}));
        assert_eq!(missing_name.len(), 1);
        assert_eq!(missing_name[0]["data"]["success"], false);
        assert_eq!(missing_name[0]["data"]["message"], "Template name is required");

        let not_found = send(
            &mut session,
            json!({"type": "load_template", "data": {"name": "ghost"}}),
        );
        assert_eq!(not_found.len(), 1);
        assert_eq!(not_found[0]["data"]["message"], "Template 'ghost' not found");
    }

    #[test]
    fn test_save_template_without_name_gets_generated_name() {
        let (_dir, _ctx, mut session) = session();
        let saved = send(&mut session, json!({"type": "save_template", "data": {}}));
        assert_eq!(saved[0]["data"]["success"], true);
        assert!(
            saved[0]["data"]["name"]
                .as_str()
                .unwrap()
                .starts_with("Template ")
        );
    }

    #[test]
    fn test_unnamed_saves_do_not_overwrite_each_other() {
        let (_dir, _ctx, mut session) = session();

        let first = send(
            &mut session,
            json!({"type": "save_template", "data": {"prompt": "first"}}),
        );
        let second = send(
            &mut session,
            json!({"type": "save_template", "data": {"prompt": "second"}}),
        );
        assert_ne!(first[0]["data"]["name"], second[0]["data"]["name"]);

        let listed = send(&mut session, json!({"type": "list_templates"}));
        assert_eq!(listed[0]["data"]["templates"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_rejected_state_update_is_not_applied() {
        let (_dir, ctx, mut session) = session();

        let replies = send(
            &mut session,
            json!({"type": "state_update", "data": {"knobs": {"7": {"value": 90}}, "prompt": 5}}),
        );
        assert_eq!(replies[0]["type"], "error");
        assert!(session.state().knobs.is_empty());

        send(
            &mut session,
            json!({"type": "state_update", "data": {"knobs": {"1": {"value": 10}}}}),
        );
        let saved = AppState::load(ctx.state_file()).unwrap();
        assert_eq!(saved.knobs.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_undecodable_and_unknown_messages() {
        let (_dir, _ctx, mut session) = session();

        let replies = session.handle_line("{not json");
        assert!(matches!(replies[0], ServerMessage::Error(_)));

        let replies = send(&mut session, json!({"type": "dance"}));
        assert_eq!(replies[0]["type"], "error");

        assert!(session.handle_line("   ").is_empty());
    }

    #[test]
    fn test_run_writes_ndjson() {
        let (_dir, _ctx, mut session) = session();
        let input = "{\"type\":\"list_templates\"}\n\n{\"type\":\"state_update\",\"data\":{}}\n";
        let mut output = Vec::new();

        session.run(input.as_bytes(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let kinds: Vec<&str> = lines.iter().map(|l| l["type"].as_str().unwrap()).collect();
        assert_eq!(kinds, ["initial_state", "templates_list", "state_update"]);
    }
}
