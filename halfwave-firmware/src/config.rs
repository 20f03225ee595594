//! Board configuration loading
//!
//! The configuration is compiled in from `board.toml`; build.rs has already
//! rejected malformed files, so a load failure here means the embedded text
//! and the runtime parser disagree. Defaults are used in that case.

use defmt::*;

use halfwave_core::config::{load_board, BoardConfig, TransferMode};
use halfwave_hal_rp2040::{gpio_to_uart, UartId};

/// Embedded board configuration (compiled into firmware)
const EMBEDDED_CONFIG: &str = include_str!("../board.toml");

/// Load the embedded configuration, falling back to defaults
pub fn load() -> BoardConfig {
    let config = match load_board(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("board.toml rejected ({}), using defaults", e);
            BoardConfig::default()
        }
    };
    log_config(&config);
    config
}

/// Returns true if the serial pin pair is routed to UART1
pub fn serial_on_uart1(config: &BoardConfig) -> bool {
    gpio_to_uart(config.serial.tx_pin()) == Some(UartId::Uart1)
}

fn log_config(config: &BoardConfig) {
    info!("Board: {}", config.name.as_str());
    info!(
        "Audio: GPIO{} @ {} Hz, {} bit",
        config.audio.pin, config.audio.sample_rate, config.audio.resolution_bits
    );
    let transfer = match config.serial.transfer {
        TransferMode::Dma => "dma",
        TransferMode::Blocking => "blocking",
    };
    info!(
        "Serial: GPIO{}/GPIO{} @ {} baud ({})",
        config.serial.tx_pin(),
        config.serial.rx_pin(),
        config.serial.baud_rate,
        transfer
    );
}
