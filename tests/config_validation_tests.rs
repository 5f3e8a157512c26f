//! Config Validation Tests
//!
//! Exercises typo detection, range validation and file loading of the
//! monitor configuration independently from the scoring pipeline.

use flexotwin::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use flexotwin::config::{ConfigError, MonitorConfig, StageTiebreak};
use std::io::Write;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_health_weight_warns_with_suggestion() {
    let toml_str = r#"
[health]
rpn_wieght = 0.4
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("rpn_wieght"));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("health.rpn_weight"));
}

#[test]
fn typo_inside_component_array_warns() {
    let toml_str = r#"
[[components]]
name = "Feeder"
rpn_valeu = 252.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("components.rpn_value"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[machine]
name = "FLEXO-2"
line = "Corrugator B"
utc_offset_hours = 7

[health]
rpn_weight = 0.5
oee_weight = 0.5
critical_threshold = 35.0

[downtime]
performance_threshold = 15.0
stage_tiebreak = "random"

[estimator]
timeout_ms = 500

[[components]]
name = "Feeder"
rpn_value = 252.0

[[components]]
name = "Printing"
rpn_value = 320.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Unexpected warnings: {:?}", warnings);

    let config = MonitorConfig::from_toml_str(toml_str).unwrap();
    assert_eq!(config.machine.name, "FLEXO-2");
    assert_eq!(config.downtime.stage_tiebreak, StageTiebreak::Random);
    assert_eq!(config.components.len(), 2);
    // Unset fields keep their defaults
    assert_eq!(config.health.threshold_good, 70.0);
}

#[test]
fn far_off_key_has_no_suggestion() {
    let known = known_config_keys();
    assert!(suggest_correction("completely_unrelated_section", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn default_config_passes_range_checks() {
    let (errors, warnings) = validate_ranges(&MonitorConfig::default());
    assert!(errors.is_empty(), "Errors: {:?}", errors);
    assert!(warnings.is_empty(), "Warnings: {:?}", warnings);
}

#[test]
fn weights_must_sum_to_one() {
    let toml_str = r#"
[health]
rpn_weight = 0.7
oee_weight = 0.6
"#;
    match MonitorConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("rpn_weight")), "Errors: {:?}", errors);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn critical_above_good_is_rejected() {
    let mut config = MonitorConfig::default();
    config.health.critical_threshold = 80.0;
    assert!(config.validate().is_err());
}

#[test]
fn out_of_range_percentage_is_rejected() {
    let mut config = MonitorConfig::default();
    config.downtime.quality_threshold = 120.0;
    let (errors, _) = validate_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("downtime.quality_threshold")));
}

#[test]
fn duplicate_component_names_are_rejected() {
    let toml_str = r#"
[[components]]
name = "Feeder"
rpn_value = 252.0

[[components]]
name = "feeder"
rpn_value = 100.0
"#;
    assert!(matches!(
        MonitorConfig::from_toml_str(toml_str),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn suspicious_rpn_only_warns() {
    let toml_str = r#"
[[components]]
name = "Feeder"
rpn_value = 1500.0
"#;
    let config = MonitorConfig::from_toml_str(toml_str).unwrap();
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 1);
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn load_from_file_round_trips_saved_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flexotwin.toml");

    let mut config = MonitorConfig::default();
    config.machine.name = "FLEXO-9".to_string();
    config.estimator.max_duration_minutes = 720.0;
    config.save_to_file(&path).unwrap();

    let loaded = MonitorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.machine.name, "FLEXO-9");
    assert_eq!(loaded.estimator.max_duration_minutes, 720.0);
}

#[test]
fn malformed_file_reports_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[health\nrpn_weight = ").unwrap();

    match MonitorConfig::load_from_file(file.path()) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = MonitorConfig::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}
