//! Tests for config functionality.

use crate::config::Config;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.templates_dir, "templates");
    assert_eq!(config.states_dir, "states");
    assert_eq!(config.state_file, "state.json");
    assert_eq!(config.default_knob_min, 0.0);
    assert_eq!(config.default_knob_max, 100.0);
    assert_eq!(config.default_knob_value, 50.0);
    assert_eq!(config.log_filter, "warn");
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
templates_dir: presets
default_knob_max: 10
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.templates_dir, "presets");
    assert_eq!(config.default_knob_max, 10.0);

    // Unspecified values should use defaults
    assert_eq!(config.states_dir, "states");
    assert_eq!(config.default_knob_value, 50.0);
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
log_filter: debug
future_option: true
nested:
  thing: 1
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.log_filter, "debug");
}

#[test]
fn test_invalid_yaml_is_user_error() {
    let err = Config::from_yaml("templates_dir: [unclosed").unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
}

#[test]
fn test_validate_knob_range() {
    let config = Config {
        default_knob_min: 5.0,
        default_knob_max: 5.0,
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("default_knob_min"));
}

#[test]
fn test_validate_empty_dir_name() {
    let err = Config::from_yaml("states_dir: ''").unwrap_err();
    assert!(err.to_string().contains("states_dir"));
}

#[test]
fn test_yaml_roundtrip() {
    let config = Config {
        state_file: "live.json".to_string(),
        log_filter: "knobprompt=debug".to_string(),
        ..Config::default()
    };
    let yaml = config.to_yaml().unwrap();
    assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path().join("config.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_reads_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "default_knob_value: 20\n").unwrap();

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.default_knob_value, 20.0);
}
