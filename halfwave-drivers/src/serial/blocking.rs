//! Blocking transfer engine
//!
//! Moves bytes through the UART data register before returning. Transmit
//! goes byte by byte and waits for the line to drain; receive fills the
//! whole buffer.

use halfwave_core::traits::ReceiveError;
use halfwave_core::{DeviceError, SerialEvent};
use halfwave_hal::{UartRx, UartTx};

use super::{Completion, TransferEngine};

/// Transfer engine that blocks the caller
pub struct BlockingEngine<T: UartTx, R: UartRx> {
    tx: T,
    rx: R,
    received: Option<&'static mut [u8]>,
}

impl<T: UartTx, R: UartRx> BlockingEngine<T, R> {
    /// Create an engine from the UART halves
    pub fn new(tx: T, rx: R) -> Self {
        Self {
            tx,
            rx,
            received: None,
        }
    }
}

impl<T: UartTx, R: UartRx> TransferEngine for BlockingEngine<T, R> {
    fn start_send(&mut self, data: &'static [u8]) -> Result<Completion, DeviceError> {
        for &byte in data {
            self.tx.write_byte(byte).map_err(|_| DeviceError::Io)?;
        }
        self.tx.flush().map_err(|_| DeviceError::Io)?;
        Ok(Completion::Done)
    }

    fn start_receive(&mut self, buf: &'static mut [u8]) -> Result<Completion, ReceiveError> {
        if self.received.is_some() {
            return Err((DeviceError::Busy, buf));
        }
        if self.rx.read_blocking(buf).is_err() {
            return Err((DeviceError::Io, buf));
        }
        self.received = Some(buf);
        Ok(Completion::Done)
    }

    fn is_busy(&self) -> bool {
        false
    }

    fn abort(&mut self) {}

    fn complete(&mut self, _channel: u8) -> Option<SerialEvent> {
        None
    }

    fn take_received(&mut self) -> Option<&'static mut [u8]> {
        self.received.take()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::boxed::Box;
    use std::collections::VecDeque;
    use std::vec;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockTx {
        written: Vec<u8>,
        writes: usize,
        flushed: bool,
        fail: bool,
    }

    impl UartTx for MockTx {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.writes += 1;
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushed = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockRx {
        line: VecDeque<u8>,
    }

    impl UartRx for MockRx {
        type Error = ();

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            for slot in buf.iter_mut() {
                *slot = self.line.pop_front().ok_or(())?;
            }
            Ok(buf.len())
        }
    }

    fn leak(len: usize) -> &'static mut [u8] {
        Box::leak(vec![0u8; len].into_boxed_slice())
    }

    #[test]
    fn test_send_byte_by_byte() {
        static DATA: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];
        let mut e = BlockingEngine::new(MockTx::default(), MockRx::default());

        assert_eq!(e.start_send(&DATA), Ok(Completion::Done));
        assert_eq!(e.tx.written, DATA);
        assert_eq!(e.tx.writes, 4);
        assert!(e.tx.flushed);
        assert!(!e.is_busy());
    }

    #[test]
    fn test_send_error() {
        static DATA: [u8; 1] = [1];
        let tx = MockTx {
            fail: true,
            ..Default::default()
        };
        let mut e = BlockingEngine::new(tx, MockRx::default());
        assert_eq!(e.start_send(&DATA), Err(DeviceError::Io));
    }

    #[test]
    fn test_receive_fills_buffer() {
        let rx = MockRx {
            line: [1, 2, 3, 4, 5].into_iter().collect(),
        };
        let mut e = BlockingEngine::new(MockTx::default(), rx);

        assert_eq!(e.start_receive(leak(3)), Ok(Completion::Done));
        assert_eq!(e.take_received().map(|b| &*b), Some(&[1, 2, 3][..]));
        assert!(e.take_received().is_none());
        assert_eq!(e.rx.line.len(), 2);
    }

    #[test]
    fn test_receive_error_returns_buffer() {
        let mut e = BlockingEngine::new(MockTx::default(), MockRx::default());
        let buf = leak(2);
        let ptr = buf.as_ptr();

        let (err, back) = e.start_receive(buf).unwrap_err();
        assert_eq!(err, DeviceError::Io);
        assert_eq!(back.as_ptr(), ptr);
        assert!(e.take_received().is_none());
    }

    #[test]
    fn test_unclaimed_buffer_refuses_next_receive() {
        let rx = MockRx {
            line: [1, 2, 3, 4].into_iter().collect(),
        };
        let mut e = BlockingEngine::new(MockTx::default(), rx);
        e.start_receive(leak(2)).unwrap();

        let (err, back) = e.start_receive(leak(1)).unwrap_err();
        assert_eq!(err, DeviceError::Busy);
        assert_eq!(back.len(), 1);
        assert_eq!(e.rx.line.len(), 2);
        assert_eq!(e.take_received().map(|b| &*b), Some(&[1, 2][..]));
    }

    #[test]
    fn test_never_completes_from_dma() {
        let mut e = BlockingEngine::new(MockTx::default(), MockRx::default());
        assert_eq!(e.complete(0), None);
        e.abort();
        assert!(!e.is_busy());
    }
}
