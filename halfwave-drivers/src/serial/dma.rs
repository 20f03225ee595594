//! DMA transfer engine
//!
//! Uses one channel per direction, each paced by the UART request line of
//! its direction. A completion is only reported for a channel that has a
//! transfer running, so a late interrupt after an abort is dropped.

use halfwave_core::traits::ReceiveError;
use halfwave_core::{DeviceError, SerialEvent};
use halfwave_hal::DmaChannel;

use super::{Completion, TransferEngine};

/// Transfer engine backed by two DMA channels
pub struct DmaEngine<TX: DmaChannel, RX: DmaChannel> {
    tx: TX,
    rx: RX,
    tx_active: bool,
    rx_active: bool,
}

impl<TX: DmaChannel, RX: DmaChannel> DmaEngine<TX, RX> {
    /// Create an engine from the transmit and receive channels
    pub fn new(tx: TX, rx: RX) -> Self {
        Self {
            tx,
            rx,
            tx_active: false,
            rx_active: false,
        }
    }

    /// Channel numbers as `(tx, rx)`
    pub fn channels(&self) -> (u8, u8) {
        (self.tx.number(), self.rx.number())
    }
}

impl<TX: DmaChannel, RX: DmaChannel> TransferEngine for DmaEngine<TX, RX> {
    fn start_send(&mut self, data: &'static [u8]) -> Result<Completion, DeviceError> {
        if self.tx.is_busy() {
            return Err(DeviceError::Busy);
        }
        self.tx.start_to_peripheral(data);
        self.tx_active = true;
        Ok(Completion::Pending)
    }

    fn start_receive(&mut self, buf: &'static mut [u8]) -> Result<Completion, ReceiveError> {
        self.rx
            .start_from_peripheral(buf)
            .map_err(|buf| (DeviceError::Busy, buf))?;
        self.rx_active = true;
        Ok(Completion::Pending)
    }

    fn is_busy(&self) -> bool {
        self.tx.is_busy() || self.rx.is_busy()
    }

    fn abort(&mut self) {
        self.tx.abort();
        self.rx.abort();
        self.tx_active = false;
        self.rx_active = false;
    }

    fn complete(&mut self, channel: u8) -> Option<SerialEvent> {
        if channel == self.tx.number() && self.tx_active {
            self.tx_active = false;
            Some(SerialEvent::DataSent)
        } else if channel == self.rx.number() && self.rx_active {
            self.rx_active = false;
            Some(SerialEvent::DataReceived)
        } else {
            None
        }
    }

    fn take_received(&mut self) -> Option<&'static mut [u8]> {
        self.rx.take_buffer()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::boxed::Box;
    use std::vec;

    /// DMA channel that stays busy until the test clears `busy`
    struct MockChannel {
        number: u8,
        busy: bool,
        aborted: bool,
        sent: Option<&'static [u8]>,
        buffer: Option<&'static mut [u8]>,
    }

    impl MockChannel {
        fn new(number: u8) -> Self {
            Self {
                number,
                busy: false,
                aborted: false,
                sent: None,
                buffer: None,
            }
        }
    }

    impl DmaChannel for MockChannel {
        fn number(&self) -> u8 {
            self.number
        }

        fn start_to_peripheral(&mut self, src: &'static [u8]) {
            self.sent = Some(src);
            self.busy = true;
        }

        fn start_from_peripheral(
            &mut self,
            dst: &'static mut [u8],
        ) -> Result<(), &'static mut [u8]> {
            if self.busy || self.buffer.is_some() {
                return Err(dst);
            }
            dst.fill(0xA5);
            self.buffer = Some(dst);
            self.busy = true;
            Ok(())
        }

        fn is_busy(&self) -> bool {
            self.busy
        }

        fn abort(&mut self) {
            self.aborted = true;
            self.busy = false;
        }

        fn take_buffer(&mut self) -> Option<&'static mut [u8]> {
            if self.busy {
                return None;
            }
            self.buffer.take()
        }
    }

    fn engine() -> DmaEngine<MockChannel, MockChannel> {
        DmaEngine::new(MockChannel::new(2), MockChannel::new(3))
    }

    fn leak(len: usize) -> &'static mut [u8] {
        Box::leak(vec![0u8; len].into_boxed_slice())
    }

    #[test]
    fn test_send_is_pending() {
        static DATA: [u8; 3] = [1, 2, 3];
        let mut e = engine();

        assert_eq!(e.start_send(&DATA), Ok(Completion::Pending));
        assert!(e.is_busy());
        assert_eq!(e.tx.sent, Some(&DATA[..]));
    }

    #[test]
    fn test_receive_and_reclaim() {
        let mut e = engine();

        assert_eq!(e.start_receive(leak(4)), Ok(Completion::Pending));
        assert!(e.take_received().is_none());

        e.rx.busy = false;
        assert_eq!(e.take_received().map(|b| &*b), Some(&[0xA5; 4][..]));
        assert!(e.take_received().is_none());
    }

    #[test]
    fn test_unclaimed_buffer_refuses_next_receive() {
        let mut e = engine();
        e.start_receive(leak(4)).unwrap();
        e.rx.busy = false;
        assert_eq!(e.complete(3), Some(SerialEvent::DataReceived));

        let second = leak(2);
        let ptr = second.as_ptr();
        let (err, back) = e.start_receive(second).unwrap_err();
        assert_eq!(err, DeviceError::Busy);
        assert_eq!(back.as_ptr(), ptr);

        assert_eq!(e.take_received().map(|b| b.len()), Some(4));
        assert!(e.take_received().is_none());
        assert_eq!(e.start_receive(back), Ok(Completion::Pending));
    }

    #[test]
    fn test_complete_maps_channels() {
        static DATA: [u8; 2] = [1, 2];
        let mut e = engine();
        assert_eq!(e.channels(), (2, 3));

        e.start_send(&DATA).unwrap();
        e.start_receive(leak(1)).unwrap();
        assert_eq!(e.complete(0), None);
        assert_eq!(e.complete(2), Some(SerialEvent::DataSent));
        assert_eq!(e.complete(3), Some(SerialEvent::DataReceived));

        // Each transfer completes once
        assert_eq!(e.complete(2), None);
        assert_eq!(e.complete(3), None);
    }

    #[test]
    fn test_no_completion_without_transfer() {
        let mut e = engine();
        assert_eq!(e.complete(2), None);
        assert_eq!(e.complete(3), None);
    }

    #[test]
    fn test_complete_after_abort_is_dropped() {
        static DATA: [u8; 1] = [7];
        let mut e = engine();
        e.start_send(&DATA).unwrap();
        e.start_receive(leak(2)).unwrap();

        e.abort();
        assert_eq!(e.complete(2), None);
        assert_eq!(e.complete(3), None);
        assert_eq!(e.take_received().map(|b| b.len()), Some(2));
    }

    #[test]
    fn test_abort_stops_both_channels() {
        static DATA: [u8; 1] = [9];
        let mut e = engine();
        e.start_send(&DATA).unwrap();

        e.abort();
        assert!(e.tx.aborted);
        assert!(e.rx.aborted);
        assert!(!e.is_busy());
    }
}
