//! Tests for application state.

use super::*;
use crate::engine::{KnobAttrs, Pipeline, VarValue, WeightMode, vars};
use crate::error::KnobError;
use serde_json::json;
use tempfile::TempDir;

fn state_with_knob(id: u32, label: &str) -> AppState {
    let mut state = AppState::default();
    let mut knob = Knob::new(id, &KnobDefaults::default());
    knob.label = label.to_string();
    state.define_knob(knob);
    state
}

#[test]
fn test_default_state() {
    let state = AppState::default();
    assert!(state.knobs.is_empty());
    assert!(state.prompt.is_none());
    assert_eq!(state.current_mode, "A");
}

#[test]
fn test_update_knob() {
    let mut state = state_with_knob(1, "style");

    let knob = state.update_knob(1, 80.0, WeightMode::B).unwrap();

    assert_eq!(knob.value, 80.0);
    assert_eq!(knob.mode, WeightMode::B);
}

#[test]
fn test_update_missing_knob_is_state_error() {
    let mut state = AppState::default();
    let err = state.update_knob(9, 10.0, WeightMode::A).unwrap_err();
    assert!(matches!(err, KnobError::StateError(_)));
    assert!(err.to_string().contains("knob 9"));
}

#[test]
fn test_update_locked_knob_is_state_error() {
    let mut state = state_with_knob(1, "style");
    state.knobs.get_mut(&1).unwrap().locked = true;

    assert!(state.update_knob(1, 10.0, WeightMode::A).is_err());
    assert_eq!(state.knobs[&1].value, 50.0);
}

#[test]
fn test_update_state_creates_and_merges_knobs() {
    let mut state = state_with_knob(1, "style");
    let defaults = KnobDefaults {
        min: 0.0,
        max: 10.0,
        value: 5.0,
    };

    state
        .update_state(
            &json!({
                "knobs": {
                    "1": {"value": 75, "mode": "C"},
                    "2": {"label": "mood"},
                    "3": {}
                }
            }),
            &defaults,
        )
        .unwrap();

    assert_eq!(state.knobs[&1].value, 75.0);
    assert_eq!(state.knobs[&1].mode, WeightMode::C);
    assert_eq!(state.knobs[&1].label, "style");

    assert_eq!(state.knobs[&2].label, "mood");
    assert_eq!(state.knobs[&2].value, 5.0);
    assert_eq!(state.knobs[&2].max, 10.0);

    assert_eq!(state.knobs[&3].label, "Knob 3");
}

#[test]
fn test_update_state_skips_invalid_ids_and_entries() {
    let mut state = AppState::default();
    state
        .update_state(
            &json!({"knobs": {"abc": {"value": 1}, "-4": {}, "5": "nope", "6": {"value": 1}}}),
            &KnobDefaults::default(),
        )
        .unwrap();

    assert_eq!(state.knobs.keys().copied().collect::<Vec<_>>(), vec![6]);
}

#[test]
fn test_update_state_ignores_unknown_mode() {
    let mut state = state_with_knob(1, "x");
    state
        .update_state(&json!({"knobs": {"1": {"mode": "Z"}}}), &KnobDefaults::default())
        .unwrap();
    assert_eq!(state.knobs[&1].mode, WeightMode::A);
}

#[test]
fn test_update_state_sets_prompt() {
    let mut state = AppState::default();
    let defaults = KnobDefaults::default();

    state
        .update_state(&json!({"prompt": {"text": "a {style} car"}}), &defaults)
        .unwrap();
    assert_eq!(state.prompt.as_ref().unwrap().text, "a {style} car");

    state.update_state(&json!({"prompt": "plain"}), &defaults).unwrap();
    assert_eq!(state.prompt.as_ref().unwrap().text, "plain");

    state.update_state(&json!({"prompt": null}), &defaults).unwrap();
    assert_eq!(state.prompt.as_ref().unwrap().text, "plain");
}

#[test]
fn test_update_state_rejects_non_object() {
    let mut state = AppState::default();
    let err = state
        .update_state(&json!([1, 2]), &KnobDefaults::default())
        .unwrap_err();
    assert!(matches!(err, KnobError::UserError(_)));
}

#[test]
fn test_rejected_update_leaves_state_unchanged() {
    let mut state = state_with_knob(1, "style");
    let before = state.clone();

    let err = state
        .update_state(
            &json!({"knobs": {"1": {"value": 5}, "7": {"value": 90}}, "prompt": 5}),
            &KnobDefaults::default(),
        )
        .unwrap_err();
    assert!(matches!(err, KnobError::UserError(_)));
    assert_eq!(state, before);

    let err = state
        .update_state(
            &json!({"knobs": {"7": {"value": 90}}, "prompt": {"text": 3}}),
            &KnobDefaults::default(),
        )
        .unwrap_err();
    assert!(matches!(err, KnobError::UserError(_)));
    assert!(!state.knobs.contains_key(&7));
}

#[test]
fn test_create_variable_group() {
    let mut state = AppState::default();
    let mut group = VariableGroup::new(" palette ");
    group.variables.push(GroupVariable::new("style", "oil, ink"));
    group.color = "#ff8800".to_string();

    let created = state.create_variable_group(group).unwrap();
    assert_eq!(created.name, "palette");
    assert_eq!(created.variables[0].weight, 1.0);

    state.create_variable_group(VariableGroup::new("lighting")).unwrap();
    let names: Vec<&str> = state.variable_groups().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["lighting", "palette"]);
}

#[test]
fn test_create_variable_group_replaces_unlocked() {
    let mut state = AppState::default();
    let mut first = VariableGroup::new("palette");
    first.variables.push(GroupVariable::new("a", "1"));
    state.create_variable_group(first).unwrap();

    state.create_variable_group(VariableGroup::new("palette")).unwrap();

    assert_eq!(state.variable_groups().count(), 1);
    assert!(state.variable_groups["palette"].variables.is_empty());
}

#[test]
fn test_create_variable_group_rejects_blank_and_locked() {
    let mut state = AppState::default();
    let err = state.create_variable_group(VariableGroup::new("  ")).unwrap_err();
    assert!(matches!(err, KnobError::UserError(_)));

    let mut locked = VariableGroup::new("fixed");
    locked.locked = true;
    state.create_variable_group(locked).unwrap();

    let err = state.create_variable_group(VariableGroup::new("fixed")).unwrap_err();
    assert!(matches!(err, KnobError::StateError(_)));
    assert!(state.variable_groups["fixed"].locked);
}

#[test]
fn test_variable_groups_survive_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    let mut state = AppState::default();
    let mut group = VariableGroup::new("palette");
    group.variables.push(GroupVariable::new("style", "oil"));
    state.create_variable_group(group).unwrap();

    state.save(&path).unwrap();

    assert_eq!(AppState::load(&path).unwrap().variable_groups, state.variable_groups);
}

#[test]
fn test_switch_mode() {
    let mut state = AppState::default();
    state.switch_mode("D").unwrap();
    assert_eq!(state.current_mode, "D");

    let err = state.switch_mode("E").unwrap_err();
    assert!(matches!(err, KnobError::StateError(_)));
    assert_eq!(state.current_mode, "D");
}

#[test]
fn test_update_prompt() {
    let mut state = AppState::default();
    let prompt = state.update_prompt(Prompt::new("hello"));
    assert_eq!(prompt.text, "hello");
}

#[test]
fn test_knob_snapshot() {
    let state = state_with_knob(4, "style");
    let snapshot = state.knob_snapshot();
    assert_eq!(
        snapshot[&4],
        KnobAttrs::at(50.0).with_label("style")
    );
}

#[test]
fn test_link_variables_by_label() {
    let mut state = state_with_knob(1, "style");
    state.define_knob(Knob::new(2, &KnobDefaults::default()));

    let snapshot = state.linked_snapshot(&vars([("style", "a, b")]));

    assert_eq!(snapshot[&1].variable_name.as_deref(), Some("style"));
    assert_eq!(snapshot[&2].variable_name, None);
}

#[test]
fn test_snapshot_drives_realtime_render() {
    let mut state = state_with_knob(1, "style");
    state.update_knob(1, 100.0, WeightMode::A).unwrap();
    let variables = vars([("style", VarValue::from("red, blue"))]);

    let rendered =
        Pipeline::realtime().render("{style} car", &state.linked_snapshot(&variables), &variables);

    assert_eq!(rendered.text, "blue car");
}

#[test]
fn test_current_view_shape() {
    let mut state = state_with_knob(1, "style");
    state.update_prompt(Prompt::new("x"));

    let view = state.current_view();

    assert_eq!(view["knobs"]["1"]["label"], "style");
    assert_eq!(view["prompt"]["text"], "x");
    assert_eq!(view["current_mode"], "A");
    assert!(view.get("variable_groups").is_none());
}

#[test]
fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");

    let mut state = state_with_knob(1, "style");
    state.update_prompt(Prompt::new("a {style} car"));
    state.switch_mode("B").unwrap();
    state.variable_groups.insert(
        "colors".to_string(),
        VariableGroup {
            name: "colors".to_string(),
            variables: vec![GroupVariable {
                name: "c".to_string(),
                value: "red".to_string(),
                weight: 1.0,
            }],
            locked: false,
            color: "#ff0000".to_string(),
        },
    );

    state.save(&path).unwrap();
    let loaded = AppState::load(&path).unwrap();

    assert_eq!(loaded, state);
}

#[test]
fn test_load_missing_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let err = AppState::load(temp_dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, KnobError::NotFound(_)));

    let state = AppState::load_or_default(temp_dir.path().join("nope.json")).unwrap();
    assert_eq!(state, AppState::default());
}

#[test]
fn test_load_corrupt_is_state_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = AppState::load(&path).unwrap_err();
    assert!(matches!(err, KnobError::StateError(_)));
}

#[test]
fn test_load_minimal_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    std::fs::write(&path, r#"{"knobs": {"2": {"id": 2, "value": 10}}}"#).unwrap();

    let state = AppState::load(&path).unwrap();

    assert_eq!(state.knobs[&2].value, 10.0);
    assert_eq!(state.knobs[&2].max, 100.0);
    assert_eq!(state.current_mode, "A");
}

#[test]
fn test_list_saved() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("states");

    assert!(AppState::list_saved(&dir).unwrap().is_empty());

    AppState::default().save(dir.join("night.json")).unwrap();
    AppState::default().save(dir.join("day.json")).unwrap();
    std::fs::write(dir.join("notes.txt"), "x").unwrap();

    assert_eq!(AppState::list_saved(&dir).unwrap(), vec!["day", "night"]);
}
