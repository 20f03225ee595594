//! Half-duplex single-wire serial trait
//!
//! One physical line is shared by both directions, so the transport must be
//! switched explicitly between transmitting and receiving. Operations the
//! transport cannot perform report [`DeviceError::NotImplemented`] instead of
//! pretending to succeed.

use crate::error::DeviceError;
use crate::events::EventListener;

/// Line role of a single-wire transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SingleWireMode {
    /// Both lines released from the UART
    #[default]
    Idle,
    /// Transmit line bound to the UART
    Transmit,
    /// Receive line bound to the UART
    Receive,
}

impl SingleWireMode {
    /// Returns true if a transfer direction is active
    pub fn is_active(&self) -> bool {
        matches!(self, SingleWireMode::Transmit | SingleWireMode::Receive)
    }
}

/// A refused receive: the reason, and the caller's buffer handed back
pub type ReceiveError = (DeviceError, &'static mut [u8]);

/// Half-duplex single-wire serial transport
pub trait SingleWireSerial {
    /// Switch the line role
    fn set_mode(&mut self, mode: SingleWireMode) -> Result<(), DeviceError>;

    /// Get the current line role
    fn mode(&self) -> SingleWireMode;

    /// Enter transmit mode, or go idle
    fn configure_tx(&mut self, enable: bool) -> Result<(), DeviceError> {
        self.set_mode(if enable {
            SingleWireMode::Transmit
        } else {
            SingleWireMode::Idle
        })
    }

    /// Enter receive mode, or go idle
    fn configure_rx(&mut self, enable: bool) -> Result<(), DeviceError> {
        self.set_mode(if enable {
            SingleWireMode::Receive
        } else {
            SingleWireMode::Idle
        })
    }

    /// Set the baud rate
    fn set_baud(&mut self, baud: u32) -> Result<(), DeviceError>;

    /// Get the configured baud rate
    fn baud(&self) -> u32;

    /// Register the completion listener
    fn set_listener(&mut self, listener: EventListener);

    /// Transmit `data`, switching to transmit mode first if needed
    fn send_dma(&mut self, data: &'static [u8]) -> Result<(), DeviceError>;

    /// Receive into `buf`, switching to receive mode first if needed
    ///
    /// On error the buffer is returned with the reason.
    fn receive_dma(&mut self, buf: &'static mut [u8]) -> Result<(), ReceiveError>;

    /// Abort the current transfer and go idle
    ///
    /// Returns [`DeviceError::InvalidParameter`] if no direction is active.
    fn abort_dma(&mut self) -> Result<(), DeviceError>;

    /// Write a single character
    fn putc(&mut self, _c: u8) -> Result<(), DeviceError> {
        Err(DeviceError::NotImplemented)
    }

    /// Read a single character
    fn getc(&mut self) -> Result<u8, DeviceError> {
        Err(DeviceError::NotImplemented)
    }

    /// Blocking send outside the DMA path
    fn send(&mut self, _data: &[u8]) -> Result<(), DeviceError> {
        Err(DeviceError::NotImplemented)
    }

    /// Blocking receive outside the DMA path
    fn receive(&mut self, _buf: &mut [u8]) -> Result<usize, DeviceError> {
        Err(DeviceError::NotImplemented)
    }

    /// Drive a break condition on the line
    fn send_break(&mut self) -> Result<(), DeviceError> {
        Err(DeviceError::NotImplemented)
    }

    /// Bytes received by the current transfer
    fn bytes_received(&self) -> Result<usize, DeviceError> {
        Err(DeviceError::NotImplemented)
    }

    /// Bytes transmitted by the current transfer
    fn bytes_transmitted(&self) -> Result<usize, DeviceError> {
        Err(DeviceError::NotImplemented)
    }
}
