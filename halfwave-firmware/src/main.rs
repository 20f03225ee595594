//! Halfwave demo firmware
//!
//! Brings up the PWM audio streamer and the single-wire serial transport on
//! an RP2040 from the embedded `board.toml`, then beeps once a second and
//! probes the bus twice a second.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use halfwave_core::config::{BoardConfig, TransferMode};
use halfwave_core::timing;
use halfwave_core::traits::SingleWireSerial;
use halfwave_drivers::audio::{AudioStreamer, ToneSource};
use halfwave_drivers::serial::{BlockingEngine, DmaEngine, SingleWireTransport};
use halfwave_hal_rp2040::{
    LinePins, Pacing, PinBank, RemainingPeripherals, RpDmaChannel, RpPwmSlice, Uart1Control,
};

mod channels;
mod config;
mod irq;
mod tasks;

/// Beep pitch
const TONE_HZ: u32 = 880;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Halfwave firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (mut bank, rest) = PinBank::from_peripherals(p);
    info!("Peripherals initialized");

    let config = config::load();

    init_audio(&config, &mut bank);
    if let Err(e) = init_serial(&config, &mut bank, rest, &spawner) {
        error!("Serial disabled: {}", e);
    }

    unwrap!(spawner.spawn(tasks::audio_task()));
    unwrap!(spawner.spawn(tasks::beep_task()));
    info!("All tasks spawned");
}

fn init_audio(config: &BoardConfig, bank: &mut PinBank) {
    let pin = match bank.take(config.audio.pin) {
        Ok(pin) => pin,
        Err(e) => {
            error!("Audio disabled: GPIO{} {}", config.audio.pin, e);
            return;
        }
    };

    let mut tone = ToneSource::new(config.audio.resolution_bits);
    tone.set_frequency(TONE_HZ, config.audio.sample_rate);
    let pwm = RpPwmSlice::new(pin);
    let slice = pwm.slice();
    let streamer = AudioStreamer::new(tone, pwm, &config.audio, channels::wake_audio);

    if irq::AUDIO.install(streamer).is_err() {
        error!("Audio streamer already installed");
        return;
    }
    irq::enable_audio();
    info!("Audio ready on GPIO{} (PWM slice {})", config.audio.pin, slice);

    let audio = &config.audio;
    let resolution = timing::resolution(audio.resolution_bits);
    let divider = timing::pwm_divider(audio.sys_clk_hz, audio.sample_rate, resolution);
    debug!(
        "PWM divider {}, effective rate {} Hz",
        divider,
        timing::effective_rate(audio.sys_clk_hz, divider, resolution)
    );
}

/// Why the serial transport could not be brought up
#[derive(Debug, Clone, Copy, Format)]
enum SerialSetupError {
    /// Pin pair is not routed to UART1
    NotUart1,
    /// A pin of the pair is out of range or already in use
    Pin(halfwave_hal_rp2040::PinError),
    /// The transport slot is already filled
    Slot(halfwave_core::SlotError),
    /// Configured baud rate was refused
    Baud(halfwave_core::DeviceError),
    /// Task could not be spawned
    Spawn,
}

fn init_serial(
    config: &BoardConfig,
    bank: &mut PinBank,
    rest: RemainingPeripherals,
    spawner: &Spawner,
) -> Result<(), SerialSetupError> {
    if !config::serial_on_uart1(config) {
        return Err(SerialSetupError::NotUart1);
    }

    let serial = &config.serial;
    let tx = bank.take(serial.tx_pin()).map_err(SerialSetupError::Pin)?;
    let rx = bank.take(serial.rx_pin()).map_err(SerialSetupError::Pin)?;
    let pins = LinePins::new(tx, rx);
    let (uart, uart_tx, uart_rx) = Uart1Control::new(rest.uart1);

    match serial.transfer {
        TransferMode::Dma => {
            let engine = DmaEngine::new(
                RpDmaChannel::new(rest.dma_ch2, Pacing::uart1_tx()),
                RpDmaChannel::new(rest.dma_ch3, Pacing::uart1_rx()),
            );
            let (tx_channel, rx_channel) = engine.channels();
            debug!("DMA channels: tx {} rx {}", tx_channel, rx_channel);
            let mut transport = SingleWireTransport::new(serial.pin, pins, uart, engine);
            transport
                .set_baud(serial.baud_rate)
                .map_err(SerialSetupError::Baud)?;
            transport.set_listener(channels::on_serial_event);

            irq::SERIAL
                .install(transport)
                .map_err(SerialSetupError::Slot)?;
            irq::enable_serial();
            spawner
                .spawn(tasks::serial_dma_task())
                .map_err(|_| SerialSetupError::Spawn)?;
        }
        TransferMode::Blocking => {
            let engine = BlockingEngine::new(uart_tx, uart_rx);
            let mut transport = SingleWireTransport::new(serial.pin, pins, uart, engine);
            transport
                .set_baud(serial.baud_rate)
                .map_err(SerialSetupError::Baud)?;
            transport.set_listener(channels::on_serial_event);

            spawner
                .spawn(tasks::serial_blocking_task(transport))
                .map_err(|_| SerialSetupError::Spawn)?;
        }
    }

    info!(
        "Serial ready on GPIO{}/GPIO{}",
        serial.tx_pin(),
        serial.rx_pin()
    );
    Ok(())
}
