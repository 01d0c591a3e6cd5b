use std::io::Write;
use std::path::Path;

use talon_common::config::ConfigError;
use talon_control::config::RobotConfig;
use tempfile::NamedTempFile;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/robot.toml");

#[test]
fn bundled_sample_loads_and_validates() {
    let config = RobotConfig::load_validated(Path::new(SAMPLE)).unwrap();
    assert_eq!(config.cycle.period_ms, 20);
    assert_eq!(config.shared.service_name, "talon");
    assert!(!config.drivetrain.start_poses.is_empty());
}

#[test]
fn empty_file_yields_defaults() {
    let file = NamedTempFile::new().unwrap();
    let config = RobotConfig::load_validated(file.path()).unwrap();
    let defaults = RobotConfig::default();
    assert_eq!(config.cycle.period_ms, defaults.cycle.period_ms);
    assert_eq!(config.setpoints.speaker_shooter, defaults.setpoints.speaker_shooter);
}

#[test]
fn partial_file_overrides_only_named_keys() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[maneuvers]\nsettle_delay_s = 0.25").unwrap();
    let config = RobotConfig::load_validated(file.path()).unwrap();
    assert_eq!(config.maneuvers.settle_delay_s, 0.25);
    assert_eq!(
        config.maneuvers.auto_prep_timeout_s,
        RobotConfig::default().maneuvers.auto_prep_timeout_s
    );
}

#[test]
fn missing_file_is_reported() {
    let missing = Path::new("/nonexistent/robot.toml");
    let err = RobotConfig::load_validated(missing).unwrap_err();
    assert!(matches!(&err, ConfigError::FileNotFound(path) if path == missing));
    assert!(err.to_string().contains("/nonexistent/robot.toml"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = RobotConfig::from_toml_str("[cycle\nperiod_ms = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn out_of_range_values_are_rejected() {
    for text in [
        "[cycle]\nperiod_ms = 0",
        "[cycle]\nsnapshot_interval = 0",
        "[maneuvers]\nsettle_delay_s = -1.0",
        "[maneuvers]\nauto_shot_timeout_s = 0.0",
    ] {
        let err = RobotConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)), "{text}: {err}");
    }
}

#[test]
fn defaults_survive_a_toml_round_trip() {
    let text = toml::to_string(&RobotConfig::default()).unwrap();
    let config = RobotConfig::from_toml_str(&text).unwrap();
    assert_eq!(config.feedback.shooter_segments, vec![[2, 4]]);
    assert_eq!(config.zeroing.elevator.timeout_s, 3.0);
}
