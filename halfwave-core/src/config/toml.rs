//! Simple TOML parser for board configuration
//!
//! This is a minimal line-based parser that handles only the subset needed
//! for `board.toml`. It does NOT support the full TOML language and needs no
//! allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - `[board]`, `[audio]` and `[serial]` section headers
//! - Pin values as integers or `"gpioN"` strings
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys

use heapless::String;

use super::types::{BoardConfig, TransferMode, MAX_GPIO};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in the current section
    UnknownKey,
    /// Key outside of any section
    KeyOutsideSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// Line is neither a header nor a key/value pair
    InvalidLine,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Board,
    Audio,
    Serial,
}

/// Parse TOML text into a [`BoardConfig`]
///
/// Keys that are not present keep their default values.
pub fn parse_board(input: &str) -> Result<BoardConfig, ParseError> {
    let mut config = BoardConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

/// Parse a section header like "audio"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "board" => Ok(Section::Board),
        "audio" => Ok(Section::Audio),
        "serial" => Ok(Section::Serial),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Apply one key/value to the config being built
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut BoardConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => Err(ParseError::KeyOutsideSection),
        Section::Board => match key {
            "name" => {
                config.name =
                    String::try_from(parse_string(value)).map_err(|_| ParseError::InvalidValue)?;
                Ok(())
            }
            _ => Err(ParseError::UnknownKey),
        },
        Section::Audio => {
            let audio = &mut config.audio;
            match key {
                "pin" => audio.pin = parse_pin(value)?,
                "sample_rate" => audio.sample_rate = parse_int(value)?,
                "resolution_bits" => audio.resolution_bits = parse_int(value)?,
                "sys_clk_hz" => audio.sys_clk_hz = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
        Section::Serial => {
            let serial = &mut config.serial;
            match key {
                "pin" => serial.pin = parse_pin(value)?,
                "baud_rate" => serial.baud_rate = parse_int(value)?,
                "transfer" => serial.transfer = parse_transfer(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
    }
}

/// Drop a trailing comment, ignoring '#' inside quotes
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, allowing '_' separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a pin value like `4` or `"gpio4"`
fn parse_pin(value: &str) -> Result<u8, ParseError> {
    let value = parse_string(value);
    let digits = value.strip_prefix("gpio").unwrap_or(value);
    let pin: u8 = digits.parse().map_err(|_| ParseError::InvalidPin)?;
    if pin > MAX_GPIO {
        return Err(ParseError::InvalidPin);
    }
    Ok(pin)
}

/// Parse a transfer engine name
fn parse_transfer(value: &str) -> Result<TransferMode, ParseError> {
    match parse_string(value) {
        "dma" => Ok(TransferMode::Dma),
        "blocking" => Ok(TransferMode::Blocking),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Demo board
[board]
name = "pico-audio"  # shown in logs

[audio]
pin = "gpio2"
sample_rate = 16_000
resolution_bits = 10

[serial]
pin = 4
baud_rate = 1000000
transfer = "blocking"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_board(SAMPLE).unwrap();
        assert_eq!(config.name.as_str(), "pico-audio");
        assert_eq!(config.audio.pin, 2);
        assert_eq!(config.audio.sample_rate, 16_000);
        assert_eq!(config.audio.resolution_bits, 10);
        assert_eq!(config.serial.pin, 4);
        assert_eq!(config.serial.baud_rate, 1_000_000);
        assert_eq!(config.serial.transfer, TransferMode::Blocking);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_board("[audio]\nsample_rate = 8000\n").unwrap();
        let defaults = BoardConfig::default();
        assert_eq!(config.audio.sample_rate, 8000);
        assert_eq!(config.audio.pin, defaults.audio.pin);
        assert_eq!(config.serial, defaults.serial);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_board("").unwrap(), BoardConfig::default());
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_board("[display]\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_board("[serial]\nparity = \"even\"\n"),
            Err(ParseError::UnknownKey)
        );
    }

    #[test]
    fn test_key_outside_section() {
        assert_eq!(
            parse_board("pin = 3\n"),
            Err(ParseError::KeyOutsideSection)
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_board("[audio]\nsample_rate = fast\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_board("[serial]\ntransfer = \"pio\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_board("[audio]\npin = \"gpio30\"\n"),
            Err(ParseError::InvalidPin)
        );
        assert_eq!(
            parse_board("[audio]\npin = \"adc0\"\n"),
            Err(ParseError::InvalidPin)
        );
    }

    #[test]
    fn test_garbage_line() {
        assert_eq!(parse_board("[audio]\npin\n"), Err(ParseError::InvalidLine));
    }

    #[test]
    fn test_hash_inside_string() {
        let config = parse_board("[board]\nname = \"rev#2\"\n").unwrap();
        assert_eq!(config.name.as_str(), "rev#2");
    }
}
