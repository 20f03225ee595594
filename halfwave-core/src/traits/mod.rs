//! Driver-facing traits
//!
//! These traits define the interface between the drivers, the upstream
//! data producers and the interrupt glue.

pub mod irq;
pub mod serial;
pub mod source;

pub use irq::{SerialIrqHandler, WrapHandler};
pub use serial::{ReceiveError, SingleWireMode, SingleWireSerial};
pub use source::{DataSink, DataSource};
