//! Inter-task communication channels
//!
//! Serial events arrive in interrupt context (or synchronously, for the
//! blocking transport) and are handed to the serial task through a channel.
//! The tone source wakes the audio task through a signal, since it runs
//! while the streamer slot is borrowed.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use halfwave_core::SerialEvent;

/// Channel capacity for serial events
const SERIAL_EVENT_CHANNEL_SIZE: usize = 4;

/// Transfer completions and break detections from the transport
pub static SERIAL_EVENTS: Channel<CriticalSectionRawMutex, SerialEvent, SERIAL_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Transport listener: queue the event for the serial task
pub fn on_serial_event(event: SerialEvent) {
    if SERIAL_EVENTS.try_send(event).is_err() {
        warn!("Serial event dropped: {}", event);
    }
}

/// Upstream has data for the streamer
pub static AUDIO_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Streamer wake callback: schedule a `pull_request` on the audio task
pub fn wake_audio() {
    AUDIO_WAKE.signal(());
}
