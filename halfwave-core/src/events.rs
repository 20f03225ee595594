//! Serial transport events
//!
//! The transport reports completion to upper layers through a plain
//! function pointer. It may be called from interrupt context, so a listener
//! should only hand the event off (signal, channel `try_send`).

/// Event reported by the single-wire transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialEvent {
    /// A receive transfer completed or a break ended a frame
    DataReceived,
    /// A transmit transfer completed
    DataSent,
}

/// Listener invoked on transfer completion or break detection
pub type EventListener = fn(SerialEvent);
