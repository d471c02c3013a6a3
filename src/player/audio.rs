use rodio::Source;
use std::sync::Arc;
use std::time::Duration;

use super::circular_buffer::CircularBuffer;
use super::clock::AudioClock;

/// Clock is advanced in batches of this many samples
const CLOCK_BATCH: u64 = 256;

/// Endless rodio source fed by the decoder through a circular buffer.
///
/// Every sample handed to the sink advances the [`AudioClock`]. For files
/// without audio the source plays silence and still drives the clock.
pub struct AudioSource {
    buffer: Arc<CircularBuffer<f32>>,
    clock: AudioClock,
    has_audio: bool,
    samples_consumed: u64,
}

impl AudioSource {
    pub fn new(buffer: Arc<CircularBuffer<f32>>, clock: AudioClock, has_audio: bool) -> Self {
        Self {
            buffer,
            clock,
            has_audio,
            samples_consumed: 0,
        }
    }

    fn count_sample(&mut self) {
        self.samples_consumed += 1;
        if self.samples_consumed % CLOCK_BATCH == 0 {
            self.clock.advance_samples(CLOCK_BATCH);
        }
    }
}

impl Iterator for AudioSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.clock.should_clear_buffer() {
            self.buffer.clear();
            self.samples_consumed = 0;
            return Some(0.0);
        }

        match self.buffer.try_pop() {
            Some(sample) => {
                self.count_sample();
                Some(sample)
            }
            None => {
                // Underrun only counts as playback time when there is no audio track
                if !self.has_audio {
                    self.count_sample();
                }
                Some(0.0)
            }
        }
    }
}

impl Source for AudioSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.clock.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.clock.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
