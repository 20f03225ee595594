//! Build script for halfwave-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pin pairs routed to UART1, the only UART the firmware drives
const UART1_PAIRS: [i64; 4] = [4, 8, 20, 24];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");
    if !config_path.exists() {
        fail(
            "board.toml not found",
            &["The firmware embeds board.toml from the crate directory.".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in board.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_audio(&config, &mut errors);
    validate_serial(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    println!("cargo:warning=board.toml validated successfully");
}

/// Print a boxed error and abort the build
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// Only [board], [audio] and [serial] are understood by the firmware parser
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };

    for (name, value) in table {
        if !["board", "audio", "serial"].contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("'{}' must be a section", name));
        }
    }

    if let Some(toml::Value::String(name)) = config.get("board").and_then(|b| b.get("name")) {
        if name.len() > 16 {
            errors.push("[board] name is longer than 16 bytes".to_string());
        }
    }
}

fn validate_audio(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(audio) = config.get("audio").and_then(|a| a.as_table()) else {
        return;
    };

    if let Some(pin) = audio.get("pin") {
        match gpio_number(pin) {
            Some(0..=29) => {}
            _ => errors.push("[audio] pin must be 0-29 or \"gpioN\"".to_string()),
        }
    }

    if let Some(value) = audio.get("sample_rate") {
        if !matches!(value.as_integer(), Some(rate) if rate > 0) {
            errors.push("[audio] sample_rate must be a positive integer".to_string());
        }
    }

    if let Some(value) = audio.get("resolution_bits") {
        if !matches!(value.as_integer(), Some(1..=16)) {
            errors.push("[audio] resolution_bits must be 1-16".to_string());
        }
    }
}

fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(serial) = config.get("serial").and_then(|s| s.as_table()) else {
        return;
    };

    if let Some(pin) = serial.get("pin") {
        match gpio_number(pin) {
            Some(n @ 0..=29) if UART1_PAIRS.contains(&(n & !1)) => {}
            Some(0..=29) => errors.push("[serial] pin pair is not routed to UART1".to_string()),
            _ => errors.push("[serial] pin must be 0-29 or \"gpioN\"".to_string()),
        }
    }

    if let Some(value) = serial.get("baud_rate") {
        if !matches!(value.as_integer(), Some(baud) if baud > 0) {
            errors.push("[serial] baud_rate must be a positive integer".to_string());
        }
    }

    if let Some(value) = serial.get("transfer") {
        if !matches!(value.as_str(), Some("dma" | "blocking")) {
            errors.push("[serial] transfer must be 'dma' or 'blocking'".to_string());
        }
    }

    let audio_pin = config
        .get("audio")
        .and_then(|a| a.get("pin"))
        .and_then(gpio_number);
    let serial_pin = serial.get("pin").and_then(gpio_number);
    if let (Some(audio), Some(serial)) = (audio_pin, serial_pin) {
        if audio & !1 == serial & !1 {
            errors.push(format!("GPIO{} is used by both [audio] and [serial]", audio));
        }
    }
}

/// Pin as an integer or a "gpioN" string
fn gpio_number(value: &toml::Value) -> Option<i64> {
    match value {
        toml::Value::Integer(n) => Some(*n),
        toml::Value::String(s) => s.strip_prefix("gpio")?.parse().ok(),
        _ => None,
    }
}
