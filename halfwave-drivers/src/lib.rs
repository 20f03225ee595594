//! Driver implementations
//!
//! This crate provides the two drivers built on the `halfwave-hal` traits:
//!
//! - PWM audio streamer (double-buffered, wrap-interrupt paced)
//! - Half-duplex single-wire serial transport (DMA or blocking engine)

#![no_std]
#![deny(unsafe_code)]

pub mod audio;
pub mod serial;
