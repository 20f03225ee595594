//! Double-buffered PWM audio streamer
//!
//! Samples are played one per PWM counter wrap. The buffer is split in two
//! halves: while the wrap handler reads one half, the other one is refilled
//! from the upstream [`DataSource`].
//!
//! ```text
//!  play_position
//!        v
//! +-------------+-------------+
//! |   First     |   Second    |
//! +-------------+-------------+
//!  <-- CHUNK --> <-- CHUNK -->
//! ```
//!
//! Each half carries a [`HalfState`]. Only a half that is not [`HalfState::Ready`]
//! may be written while playing, so the wrap handler never reads a half that
//! is being refilled. Pulls always go to halves in play order.
//!
//! When upstream runs dry the streamer halts quietly: it stops the counter and
//! waits for the next [`DataSink::pull_request`]. The `wake` callback handed
//! to [`AudioStreamer::new`] is registered with upstream, which calls it once
//! data is available again.

use halfwave_core::config::AudioConfig;
use halfwave_core::timing::{self, midpoint, pwm_divider, top};
use halfwave_core::traits::{DataSink, DataSource, WrapHandler};
use halfwave_hal::PwmSlice;

/// Samples per half-buffer
pub const CHUNK_SAMPLES: usize = 256;

/// Leading samples inspected to detect a silent chunk
const SILENCE_PROBE: usize = 16;

/// One half of the double buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    First,
    Second,
}

impl Half {
    fn index(self) -> usize {
        match self {
            Half::First => 0,
            Half::Second => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            Half::First => Half::Second,
            Half::Second => Half::First,
        }
    }
}

/// Ownership state of a half-buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalfState {
    /// Holds samples that have not been played yet
    Ready,
    /// Fully played; free to refill
    Drained,
    /// Last refill got no data
    Starved,
}

/// Result of a refill attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FillOutcome {
    /// Samples copied from upstream
    Copied(usize),
    /// Silent chunk; this many samples zero-filled
    Silenced(usize),
    /// Upstream had no data
    Empty,
    /// The half still holds unplayed samples
    Refused,
}

impl FillOutcome {
    /// Returns true if the half now holds samples
    pub fn is_filled(&self) -> bool {
        matches!(self, FillOutcome::Copied(_) | FillOutcome::Silenced(_))
    }
}

/// PWM audio streamer
///
/// `CHUNK` is the number of `u16` samples per half-buffer.
pub struct AudioStreamer<S: DataSource, P: PwmSlice, const CHUNK: usize = CHUNK_SAMPLES> {
    pin: u8,
    upstream: S,
    pwm: P,
    buffer: [[u16; CHUNK]; 2],
    state: [HalfState; 2],
    play_position: usize,
    playing: bool,
    sample_rate: u32,
    resolution_bits: u8,
    sys_clk_hz: u32,
    underruns: u32,
}

impl<S: DataSource, P: PwmSlice, const CHUNK: usize> AudioStreamer<S, P, CHUNK> {
    /// Create a streamer and register it with `upstream`
    ///
    /// The PWM slice is configured for `config.sample_rate` but stays stopped
    /// until the first [`pull_request`](Self::pull_request). `wake` is passed
    /// to [`DataSource::connect`]; it must arrange for `pull_request` to run
    /// outside the current borrow of the streamer.
    pub fn new(upstream: S, pwm: P, config: &AudioConfig, wake: fn()) -> Self {
        let mut streamer = Self {
            pin: config.pin,
            upstream,
            pwm,
            buffer: [[0; CHUNK]; 2],
            state: [HalfState::Drained; 2],
            play_position: 0,
            playing: false,
            sample_rate: config.sample_rate,
            resolution_bits: config.resolution_bits,
            sys_clk_hz: config.sys_clk_hz,
            underruns: 0,
        };

        streamer.set_sample_rate(config.sample_rate);
        streamer.pwm.clear_irq();
        streamer.upstream.connect(wake);
        streamer
    }

    /// Output GPIO
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Set the output sample rate
    ///
    /// Rates the divider cannot express are clamped to its range.
    pub fn set_sample_rate(&mut self, freq: u32) {
        self.sample_rate = freq;
        let divider = pwm_divider(
            self.sys_clk_hz,
            freq,
            timing::resolution(self.resolution_bits),
        );
        self.pwm.configure(divider, top(self.resolution_bits));
    }

    /// Configured sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Start the PWM counter
    pub fn enable(&mut self) {
        self.pwm.set_enabled(true);
    }

    /// Stop the PWM counter
    pub fn disable(&mut self) {
        self.pwm.set_enabled(false);
    }

    /// Returns true while samples are being played
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Index of the next sample to play, in `0..2 * CHUNK`
    pub fn play_position(&self) -> usize {
        self.play_position
    }

    /// Number of refills that got no data while playing
    pub fn underruns(&self) -> u32 {
        self.underruns
    }

    /// Mutable access to the upstream source
    pub fn upstream_mut(&mut self) -> &mut S {
        &mut self.upstream
    }

    /// Current state of a half
    pub fn half_state(&self, half: Half) -> HalfState {
        self.state[half.index()]
    }

    /// Samples held by a half
    pub fn samples(&self, half: Half) -> &[u16; CHUNK] {
        &self.buffer[half.index()]
    }

    /// Prime both halves and start playing
    ///
    /// Does nothing while already playing.
    pub fn pull_request(&mut self) {
        if self.playing {
            return;
        }

        self.play_position = 0;
        let first = self.fill_buffer(Half::First);
        let second = self.fill_buffer(Half::Second);

        let start = if first.is_filled() {
            Half::First
        } else if second.is_filled() {
            Half::Second
        } else {
            return;
        };

        self.play_position = start.index() * CHUNK;
        self.playing = true;
        self.arm();
    }

    /// Pull one chunk from upstream into `half`
    ///
    /// A chunk whose leading samples all sit at the midpoint level is treated
    /// as silence and zero-filled. Samples past the chunk end are set to 0.
    pub fn fill_buffer(&mut self, half: Half) -> FillOutcome {
        let i = half.index();
        if self.playing && self.state[i] == HalfState::Ready {
            return FillOutcome::Refused;
        }

        let silence = midpoint(self.resolution_bits);
        let data = self.upstream.pull();
        let count = (data.len() / 2).min(CHUNK);

        if count == 0 {
            self.state[i] = HalfState::Starved;
            if self.playing {
                self.underruns = self.underruns.wrapping_add(1);
            }
            return FillOutcome::Empty;
        }

        let silent = data
            .chunks_exact(2)
            .take(count.min(SILENCE_PROBE))
            .all(|b| u16::from_le_bytes([b[0], b[1]]) == silence);

        let dst = &mut self.buffer[i];
        if silent {
            dst[..count].fill(0);
        } else {
            for (sample, bytes) in dst[..count].iter_mut().zip(data.chunks_exact(2)) {
                *sample = u16::from_le_bytes([bytes[0], bytes[1]]);
            }
        }
        dst[count..].fill(0);

        self.state[i] = HalfState::Ready;
        self.arm();

        if silent {
            FillOutcome::Silenced(count)
        } else {
            FillOutcome::Copied(count)
        }
    }

    /// Play one sample and refill drained halves
    pub fn on_wrap(&mut self) {
        if !self.playing {
            return;
        }

        let half = self.playing_half();
        self.pwm
            .set_level(self.buffer[half.index()][self.play_position % CHUNK]);
        self.play_position += 1;

        if self.play_position == CHUNK {
            self.finish_half(Half::First);
        } else if self.play_position == 2 * CHUNK {
            self.play_position = 0;
            self.finish_half(Half::Second);
        }
    }

    fn playing_half(&self) -> Half {
        if self.play_position < CHUNK {
            Half::First
        } else {
            Half::Second
        }
    }

    /// `drained` has been played to its end
    fn finish_half(&mut self, drained: Half) {
        self.state[drained.index()] = HalfState::Drained;

        let next = drained.other();
        if self.state[next.index()] != HalfState::Ready && !self.fill_buffer(next).is_filled() {
            self.halt();
            return;
        }

        self.fill_buffer(drained);
    }

    fn arm(&mut self) {
        self.pwm.set_enabled(true);
        self.pwm.set_irq_enabled(true);
    }

    fn halt(&mut self) {
        self.playing = false;
        self.pwm.set_irq_enabled(false);
        self.pwm.set_enabled(false);
        self.pwm.set_level(0);
    }
}

impl<S: DataSource, P: PwmSlice, const CHUNK: usize> DataSink for AudioStreamer<S, P, CHUNK> {
    fn pull_request(&mut self) {
        AudioStreamer::pull_request(self);
    }
}

impl<S: DataSource, P: PwmSlice, const CHUNK: usize> WrapHandler for AudioStreamer<S, P, CHUNK> {
    fn on_wrap(&mut self) {
        AudioStreamer::on_wrap(self);
    }
}
