//! Audio output drivers

pub mod pwm_streamer;
pub mod tone;

pub use pwm_streamer::{AudioStreamer, FillOutcome, Half, HalfState, CHUNK_SAMPLES};
pub use tone::ToneSource;
