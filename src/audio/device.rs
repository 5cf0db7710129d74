//! Audio device integration using rodio.
//!
//! Plays samples pulled straight from the bound emulator to the system
//! audio device, with the shared state mutex providing the stop/drain
//! guarantee.

use super::{AudioBackend, SharedAudioState};
use rodio::{OutputStream, Sink, Source};
use std::sync::Arc;
use std::time::Duration;

/// Audio source that fills batches from the shared emulator state.
///
/// Never ends: underruns and unbound stretches degrade to silence so the
/// output stream stays alive across track switches and file reloads.
struct EmulatorSource {
    state: SharedAudioState,
    sample_rate: u32,
    /// Internal batch buffer, refilled under the state lock. One refill is
    /// one "callback invocation" for drain purposes.
    buffer: Vec<i16>,
    pos: usize,
}

impl EmulatorSource {
    fn new(state: SharedAudioState, sample_rate: u32, buffer_frames: usize) -> Self {
        let len = buffer_frames * 2; // interleaved stereo
        EmulatorSource {
            state,
            sample_rate,
            buffer: vec![0i16; len],
            pos: len, // start by filling a new batch
        }
    }
}

impl Iterator for EmulatorSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        if self.pos >= self.buffer.len() {
            self.state.lock().fill(&mut self.buffer);
            self.pos = 0;
        }
        let sample = self.buffer[self.pos];
        self.pos += 1;
        Some(sample)
    }
}

impl Source for EmulatorSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.buffer.len())
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Audio output backend backed by a rodio sink.
///
/// Opened paused; the player starts it explicitly once a track is running.
pub struct RodioBackend {
    _stream: OutputStream,
    sink: Sink,
    state: SharedAudioState,
}

impl RodioBackend {
    /// Open the default output device at `sample_rate` and register the
    /// fill source with a batch size of `buffer_frames` stereo frames.
    ///
    /// The error string from the audio stack is returned unchanged.
    pub fn open(
        sample_rate: u32,
        buffer_frames: usize,
        state: SharedAudioState,
    ) -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| e.to_string())?;
        let sink = Sink::try_new(&handle).map_err(|e| e.to_string())?;
        sink.pause();
        sink.append(EmulatorSource::new(
            Arc::clone(&state),
            sample_rate,
            buffer_frames,
        ));
        Ok(RodioBackend {
            _stream: stream,
            sink,
            state,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn start(&mut self) {
        self.state.lock().set_enabled(true);
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.pause();
        // Drain: a fill in flight holds the state lock, so clearing the
        // enabled flag under it cannot return until that fill has completed,
        // and no later fill touches the emulator.
        self.state.lock().set_enabled(false);
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.stop();
    }
}
