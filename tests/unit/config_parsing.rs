//! Unit tests for TOML configuration parsing.

use tmc_uart_motion::config::{load_config, parse_config, DriverConfig};
use tmc_uart_motion::{ConfigError, Error, Microsteps};

/// Test parsing a complete driver configuration from TOML.
#[test]
fn test_parse_driver_config() {
    let toml_str = r#"
[bus]
baudrate = 57600
driver_address = 1
max_tries = 3

[motor]
steps_per_revolution = 400
microsteps = 32
hold_current = 2
run_current = 16
hold_delay = 8
invert_direction = true
"#;

    let config: DriverConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.bus.baudrate, 57_600);
    assert_eq!(config.bus.driver_address, 1);
    assert_eq!(config.bus.max_tries, 3);
    assert_eq!(config.motor.steps_per_revolution, 400);
    assert_eq!(config.motor.microsteps, Microsteps::THIRTY_SECOND);
    assert_eq!(config.motor.hold_current, 2);
    assert_eq!(config.motor.run_current, 16);
    assert_eq!(config.motor.hold_delay, 8);
    assert!(config.motor.invert_direction);
    assert_eq!(config.motor.microsteps_per_revolution(), 12_800);
}

/// Test that omitted sections and fields fall back to defaults.
#[test]
fn test_partial_config_uses_defaults() {
    let toml_str = r#"
[motor]
run_current = 20
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.bus.baudrate, 115_200);
    assert_eq!(config.bus.driver_address, 0);
    assert_eq!(config.bus.max_tries, 10);
    assert_eq!(config.motor.run_current, 20);
    assert_eq!(config.motor.hold_current, 1);
    assert_eq!(config.motor.microsteps, Microsteps::EIGHTH);
    assert_eq!(config.motor.steps_per_revolution, 200);
}

/// Test that invalid microstep values are rejected during parsing.
#[test]
fn test_invalid_microsteps_rejected() {
    let toml_str = r#"
[motor]
microsteps = 12
"#;

    let result: Result<DriverConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err(), "Should reject non-power-of-2 microsteps");
}

/// Test that a type mismatch is reported as a parse error.
#[test]
fn test_type_mismatch_is_parse_error() {
    let toml_str = r#"
[bus]
baudrate = "fast"
"#;

    match parse_config(toml_str) {
        Err(Error::Config(ConfigError::ParseError(msg))) => assert!(!msg.is_empty()),
        other => panic!("expected parse error, got {:?}", other),
    }
}

/// Test loading configuration from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("tmc_uart_motion_load_test.toml");
    std::fs::write(
        &path,
        r#"
[bus]
driver_address = 3

[motor]
microsteps = 256
"#,
    )
    .expect("Failed to write temp file");

    let config = load_config(&path).expect("Failed to load config");
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.bus.driver_address, 3);
    assert_eq!(config.motor.microsteps, Microsteps::TWO_FIFTY_SIXTH);
}
