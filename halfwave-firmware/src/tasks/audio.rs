//! Audio tasks
//!
//! The beep task queues a short tone on the streamer's source at a fixed
//! interval. Queuing wakes the audio task, which asks the streamer to start
//! pulling. Between beeps the streamer drains its upstream and halts.

use defmt::*;
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;

use crate::channels::AUDIO_WAKE;
use crate::irq::{AUDIO, MISSED};

/// Time between beeps
const BEEP_INTERVAL_MS: u64 = 1000;

/// Chunks of tone per beep (256 samples each)
const TONE_CHUNKS: u32 = 16;

/// Chunks of silence after the tone
const REST_CHUNKS: u32 = 4;

/// Restart the streamer whenever its source has data again
#[embassy_executor::task]
pub async fn audio_task() {
    if !AUDIO.is_installed() {
        warn!("Audio streamer not installed, audio task exiting");
        return;
    }
    info!("Audio task started");

    let mut last_underruns = 0;

    loop {
        AUDIO_WAKE.wait().await;

        let status = AUDIO.with(|audio| {
            audio.pull_request();
            (audio.is_playing(), audio.underruns())
        });

        let Some((playing, underruns)) = status else {
            warn!("Audio streamer busy, wake dropped");
            continue;
        };

        if !playing {
            warn!("Playback did not start");
        }
        if underruns != last_underruns {
            debug!("Audio underruns: {}", underruns);
            last_underruns = underruns;
        }

        let missed = MISSED.load(Ordering::Relaxed);
        if missed > 0 {
            debug!("Missed interrupts: {}", missed);
        }
    }
}

/// Queue a beep once per interval when the previous one has played out
#[embassy_executor::task]
pub async fn beep_task() {
    if !AUDIO.is_installed() {
        return;
    }

    let mut ticker = Ticker::every(Duration::from_millis(BEEP_INTERVAL_MS));

    loop {
        ticker.next().await;

        let queued = AUDIO.with(|audio| {
            let tone = audio.upstream_mut();
            if tone.has_data() {
                return false;
            }
            tone.schedule(TONE_CHUNKS, REST_CHUNKS);
            true
        });

        if queued != Some(true) {
            debug!("Previous beep still queued");
        }
    }
}
