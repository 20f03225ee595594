//! Test tone generator
//!
//! A [`DataSource`] producing a triangle wave from a 32-bit phase
//! accumulator, followed by a stretch of midpoint-level silence. Used by
//! the firmware to exercise the streamer without an external producer.

use halfwave_core::timing::midpoint;
use halfwave_core::traits::DataSource;

use super::pwm_streamer::CHUNK_SAMPLES;

/// Triangle wave source, one chunk per pull
pub struct ToneSource<const CHUNK: usize = CHUNK_SAMPLES> {
    chunk: [[u8; 2]; CHUNK],
    /// Phase accumulator (wraps at 2^32 = one period)
    phase: u32,
    /// Phase increment per sample: `freq / sample_rate * 2^32`
    increment: u32,
    midpoint: u16,
    amplitude: u16,
    tone_chunks: u32,
    rest_chunks: u32,
    wake: Option<fn()>,
}

impl<const CHUNK: usize> ToneSource<CHUNK> {
    /// Create a silent source for the given PWM resolution
    ///
    /// The amplitude is a quarter of full scale.
    pub fn new(resolution_bits: u8) -> Self {
        let midpoint = midpoint(resolution_bits);
        Self {
            chunk: [[0; 2]; CHUNK],
            phase: 0,
            increment: 0,
            midpoint,
            amplitude: midpoint / 2,
            tone_chunks: 0,
            rest_chunks: 0,
            wake: None,
        }
    }

    /// Set the tone frequency
    pub fn set_frequency(&mut self, hz: u32, sample_rate: u32) {
        self.increment = if sample_rate == 0 {
            0
        } else {
            (((hz as u64) << 32) / sample_rate as u64) as u32
        };
    }

    /// Queue `tone` chunks of signal followed by `rest` chunks of silence
    ///
    /// Wakes the connected consumer when anything was queued.
    pub fn schedule(&mut self, tone: u32, rest: u32) {
        self.tone_chunks = tone;
        self.rest_chunks = rest;
        if self.has_data() {
            if let Some(wake) = self.wake {
                wake();
            }
        }
    }

    /// Returns true if chunks are queued
    pub fn has_data(&self) -> bool {
        self.tone_chunks > 0 || self.rest_chunks > 0
    }

    fn level(&self, phase: u32) -> u16 {
        // Fold the second half of the period back down
        let folded = if phase & 0x8000_0000 != 0 { !phase } else { phase };
        let position = folded >> 15;
        let span = 2 * self.amplitude as u32;
        let low = (self.midpoint - self.amplitude) as u32;
        (low + ((position * span) >> 16)) as u16
    }

    fn fill_tone(&mut self) {
        let mut phase = self.phase;
        for i in 0..CHUNK {
            self.chunk[i] = self.level(phase).to_le_bytes();
            phase = phase.wrapping_add(self.increment);
        }
        self.phase = phase;
    }

    fn fill_rest(&mut self) {
        let rest = self.midpoint.to_le_bytes();
        self.chunk.fill(rest);
    }
}

impl<const CHUNK: usize> DataSource for ToneSource<CHUNK> {
    fn connect(&mut self, wake: fn()) {
        self.wake = Some(wake);
    }

    fn pull(&mut self) -> &[u8] {
        if self.tone_chunks > 0 {
            self.tone_chunks -= 1;
            self.fill_tone();
        } else if self.rest_chunks > 0 {
            self.rest_chunks -= 1;
            self.fill_rest();
        } else {
            return &[];
        }
        self.chunk.as_flattened()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::cell::Cell;
    use std::vec::Vec;

    std::thread_local! {
        static WAKES: Cell<usize> = const { Cell::new(0) };
    }

    fn wake() {
        WAKES.with(|w| w.set(w.get() + 1));
    }

    fn wakes() -> usize {
        WAKES.with(|w| w.get())
    }

    fn samples(bytes: &[u8]) -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn test_empty_until_scheduled() {
        let mut tone: ToneSource<8> = ToneSource::new(10);
        assert!(tone.pull().is_empty());
        assert!(!tone.has_data());
    }

    #[test]
    fn test_tone_then_rest_then_empty() {
        let mut tone: ToneSource<8> = ToneSource::new(10);
        tone.set_frequency(1_000, 8_000);
        tone.schedule(2, 1);

        assert_eq!(tone.pull().len(), 16);
        assert_eq!(tone.pull().len(), 16);
        assert_eq!(samples(tone.pull()), [512; 8]);
        assert!(tone.pull().is_empty());
    }

    #[test]
    fn test_triangle_shape() {
        // 8 samples per period
        let mut tone: ToneSource<8> = ToneSource::new(10);
        tone.set_frequency(1_000, 8_000);
        tone.schedule(1, 0);

        let wave = samples(tone.pull());
        assert_eq!(wave[0], 256);
        assert_eq!(wave[2], 512);
        assert!(wave[4] >= 767);
        assert_eq!(wave[6], 511);
        assert!(wave.iter().all(|&s| (256..=768).contains(&s)));
    }

    #[test]
    fn test_phase_continues_across_chunks() {
        let mut tone: ToneSource<4> = ToneSource::new(10);
        tone.set_frequency(1_000, 8_000);
        tone.schedule(2, 0);

        let first = samples(tone.pull());
        let second = samples(tone.pull());
        assert_eq!(first[0], 256);
        assert!(second[0] >= 767);
    }

    #[test]
    fn test_schedule_wakes_connected_consumer() {
        let mut tone: ToneSource<4> = ToneSource::new(10);
        tone.schedule(1, 0);
        assert_eq!(wakes(), 0);

        tone.connect(wake);
        tone.schedule(0, 0);
        assert_eq!(wakes(), 0);
        assert!(!tone.has_data());

        tone.schedule(2, 1);
        assert_eq!(wakes(), 1);
        assert!(tone.has_data());
    }
}
