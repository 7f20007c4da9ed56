//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::DriverConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use tmc_uart_motion::load_config;
///
/// let config = load_config("driver.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DriverConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = truncated(&e.to_string());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<DriverConfig> {
    let config: DriverConfig = toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

fn truncated(msg: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Microsteps;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, DriverConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[bus]
baudrate = 230400
driver_address = 2
max_tries = 4

[motor]
steps_per_revolution = 400
microsteps = 16
hold_current = 4
run_current = 12
hold_delay = 6
invert_direction = true
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.bus.baudrate, 230_400);
        assert_eq!(config.bus.driver_address, 2);
        assert_eq!(config.bus.max_tries, 4);
        assert_eq!(config.motor.microsteps, Microsteps::SIXTEENTH);
        assert_eq!(config.motor.run_current, 12);
        assert!(config.motor.invert_direction);
    }

    #[test]
    fn test_parse_rejects_bad_microsteps() {
        let toml = r#"
[motor]
microsteps = 12
"#;
        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_address() {
        let toml = r#"
[bus]
driver_address = 7
"#;
        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::InvalidDriverAddress(7)))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/driver.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }
}
