//! Unit tests for configuration validation.

use tmc_uart_motion::config::{parse_config, validate_config, DriverConfig};
use tmc_uart_motion::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[bus]
driver_address = 3

[motor]
hold_current = 31
run_current = 31
hold_delay = 15
"#;

    let config: DriverConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a driver address outside 0-3.
#[test]
fn test_invalid_driver_address() {
    let toml_str = r#"
[bus]
driver_address = 4
"#;

    let config: DriverConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidDriverAddress(4)))
    );
}

/// Test validation fails for a zero baudrate.
#[test]
fn test_zero_baudrate() {
    let result = parse_config(
        r#"
[bus]
baudrate = 0
"#,
    );
    assert_eq!(result, Err(Error::Config(ConfigError::InvalidBaudrate(0))));
}

/// Test validation fails for currents above 31.
#[test]
fn test_current_out_of_range() {
    let result = parse_config(
        r#"
[motor]
hold_current = 40
"#,
    );
    assert_eq!(result, Err(Error::Config(ConfigError::InvalidCurrent(40))));
}

/// Test validation fails for a hold delay above 15.
#[test]
fn test_hold_delay_out_of_range() {
    let mut config = DriverConfig::default();
    config.motor.hold_delay = 16;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidHoldDelay(16)))
    ));
}

/// Test validation fails for zero steps per revolution.
#[test]
fn test_zero_steps_per_revolution() {
    let result = parse_config(
        r#"
[motor]
steps_per_revolution = 0
"#,
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
    ));
}
