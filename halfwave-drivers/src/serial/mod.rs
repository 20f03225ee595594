//! Half-duplex single-wire serial transport
//!
//! The transport owns line switching and event delivery. Moving bytes is
//! delegated to a [`TransferEngine`]:
//!
//! - [`DmaEngine`]: starts a DMA transfer and returns; completion comes
//!   from the DMA interrupt
//! - [`BlockingEngine`]: moves the bytes through the UART before returning

pub mod blocking;
pub mod dma;
pub mod single_wire;

pub use blocking::BlockingEngine;
pub use dma::DmaEngine;
pub use single_wire::SingleWireTransport;

use halfwave_core::traits::ReceiveError;
use halfwave_core::{DeviceError, SerialEvent};

/// How a transfer request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    /// Still running; completion is reported through an interrupt
    Pending,
    /// Finished before the call returned
    Done,
}

/// Byte mover behind a single-wire transport
pub trait TransferEngine {
    /// Transmit `data`
    fn start_send(&mut self, data: &'static [u8]) -> Result<Completion, DeviceError>;

    /// Receive into `buf`
    ///
    /// A refused or failed receive hands `buf` back.
    fn start_receive(&mut self, buf: &'static mut [u8]) -> Result<Completion, ReceiveError>;

    /// Check if a transfer is in flight
    fn is_busy(&self) -> bool;

    /// Cancel any transfer in flight
    fn abort(&mut self);

    /// Map a finished DMA channel to the event it completes
    ///
    /// Returns `None` if `channel` does not belong to this engine or has no
    /// transfer running.
    fn complete(&mut self, channel: u8) -> Option<SerialEvent>;

    /// Reclaim the buffer of the last finished receive
    fn take_received(&mut self) -> Option<&'static mut [u8]>;
}
