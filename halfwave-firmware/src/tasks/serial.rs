//! Single-wire bus tasks
//!
//! Both tasks send a probe frame at a fixed interval. The DMA task then
//! turns the line around and listens for a reply until a break ends the
//! frame or the window closes. The blocking transport would spin forever
//! waiting for bytes on a quiet line, so its task only transmits.

use defmt::*;
use embassy_time::{with_timeout, Duration, Ticker};
use static_cell::StaticCell;

use halfwave_core::traits::SingleWireSerial;
use halfwave_core::SerialEvent;

use crate::channels::SERIAL_EVENTS;
use crate::irq::{BlockingTransport, SERIAL};

/// Time between probe frames
const PROBE_INTERVAL_MS: u64 = 500;

/// How long to wait for a transfer to finish
const TRANSFER_TIMEOUT_MS: u64 = 20;

/// Reply buffer size
const REPLY_LEN: usize = 16;

/// Probe frame
static PROBE: [u8; 4] = [0x55, 0x01, 0x00, 0x56];

static REPLY_BUF: StaticCell<[u8; REPLY_LEN]> = StaticCell::new();

/// Wait for `expected` on the event channel
///
/// Events of the other kind are logged and skipped.
async fn wait_for(expected: SerialEvent) -> bool {
    let deadline = Duration::from_millis(TRANSFER_TIMEOUT_MS);
    loop {
        match with_timeout(deadline, SERIAL_EVENTS.receive()).await {
            Ok(event) if event == expected => return true,
            Ok(event) => debug!("Skipping {}", event),
            Err(_) => return false,
        }
    }
}

#[embassy_executor::task]
pub async fn serial_dma_task() {
    info!("Serial task started (dma)");

    let mut reply: Option<&'static mut [u8]> = Some(REPLY_BUF.init([0; REPLY_LEN]));
    let mut ticker = Ticker::every(Duration::from_millis(PROBE_INTERVAL_MS));

    loop {
        ticker.next().await;

        match SERIAL.with(|serial| serial.send_dma(&PROBE)) {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                warn!("Probe send failed: {}", e);
                continue;
            }
            None => continue,
        }
        if !wait_for(SerialEvent::DataSent).await {
            warn!("Probe send timed out");
            let _ = SERIAL.with(|serial| serial.abort_dma());
            continue;
        }

        if reply.is_none() {
            reply = SERIAL.with(|serial| serial.take_received()).flatten();
        }
        if reply.is_none() {
            warn!("Reply buffer still held by the transport");
            continue;
        }

        // A refused receive hands the buffer back
        let started = SERIAL
            .with(|serial| {
                let buf = reply.take()?;
                Some(serial.receive_dma(buf).map_err(|(e, buf)| {
                    reply = Some(buf);
                    e
                }))
            })
            .flatten();
        match started {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                warn!("Reply receive failed: {}", e);
                continue;
            }
            None => continue,
        }

        let answered = wait_for(SerialEvent::DataReceived).await;

        // A break or a timeout leaves the channel running; stop it to get
        // the buffer back
        reply = SERIAL
            .with(|serial| {
                if serial.is_busy() {
                    let _ = serial.abort_dma();
                }
                serial.take_received()
            })
            .flatten();

        match (&reply, answered) {
            (Some(buf), true) => info!("Reply: {=[u8]:x}", &buf[..]),
            (Some(_), false) => debug!("No reply"),
            (None, _) => warn!("Reply buffer not reclaimed yet"),
        }
        let _ = SERIAL.with(|serial| serial.configure_rx(false));
    }
}

#[embassy_executor::task]
pub async fn serial_blocking_task(mut serial: BlockingTransport) {
    info!("Serial task started (blocking)");

    let mut ticker = Ticker::every(Duration::from_millis(PROBE_INTERVAL_MS));
    let mut sent: u32 = 0;

    loop {
        ticker.next().await;

        if let Err(e) = serial.send_dma(&PROBE) {
            warn!("Probe send failed: {}", e);
            continue;
        }
        // The blocking transport reports completion before returning
        if matches!(SERIAL_EVENTS.try_receive(), Ok(SerialEvent::DataSent)) {
            sent += 1;
            debug!("Probes sent: {}", sent);
        }
    }
}
