//! Embassy async tasks
//!
//! Each task runs independently; serial events reach the serial tasks
//! through [`SERIAL_EVENTS`](crate::channels::SERIAL_EVENTS) and upstream
//! wake-ups reach the audio task through
//! [`AUDIO_WAKE`](crate::channels::AUDIO_WAKE).

pub mod audio;
pub mod serial;

pub use audio::{audio_task, beep_task};
pub use serial::{serial_blocking_task, serial_dma_task};
