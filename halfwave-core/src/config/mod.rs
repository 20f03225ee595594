//! Board configuration
//!
//! Typed configuration plus a no_std parser for the `board.toml` file the
//! firmware embeds.

pub mod toml;
pub mod types;

pub use toml::{parse_board, ParseError};
pub use types::*;

/// Errors from loading a board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML text could not be parsed
    Parse(ParseError),
    /// Parsed values are inconsistent
    Invalid(ValidationError),
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Parse and validate a board configuration
pub fn load_board(input: &str) -> Result<BoardConfig, ConfigError> {
    let config = parse_board(input)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid() {
        let config = load_board("[serial]\npin = 8\n").unwrap();
        assert_eq!(config.serial.tx_pin(), 8);
    }

    #[test]
    fn test_load_reports_parse_error() {
        assert_eq!(
            load_board("[nope]\n"),
            Err(ConfigError::Parse(ParseError::InvalidSection))
        );
    }

    #[test]
    fn test_load_reports_validation_error() {
        assert_eq!(
            load_board("[audio]\npin = 4\n[serial]\npin = 4\n"),
            Err(ConfigError::Invalid(ValidationError::PinConflict(4)))
        );
    }
}
