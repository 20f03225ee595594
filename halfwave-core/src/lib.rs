//! Board-agnostic core for the halfwave drivers
//!
//! This crate contains everything that does not touch registers:
//!
//! - Error taxonomy shared by the drivers
//! - Serial events and the listener contract
//! - Data source / sink and interrupt handler traits
//! - Set-once instance slots for interrupt dispatch
//! - PWM timing math
//! - Board configuration types and the `board.toml` parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod sync;
pub mod timing;
pub mod traits;

pub use error::DeviceError;
pub use events::{EventListener, SerialEvent};
pub use sync::{InstanceSlot, SlotError};
