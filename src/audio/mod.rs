//! Audio output and the bridge between the callback thread and the emulator.
//!
//! The backend pulls samples on its own real-time thread. All state that
//! thread touches lives in [`AudioState`] behind one `parking_lot` mutex;
//! that same mutex is the drain primitive: a backend [`stop`] acquires it
//! after disabling generation, so once `stop` returns no callback is
//! mid-execution and the control thread may mutate the emulator freely.
//!
//! [`stop`]: AudioBackend::stop

pub mod device;

pub use device::RodioBackend;

use crate::emu::ChipEmulator;
use parking_lot::Mutex;
use std::sync::Arc;

/// Default sample rate (44.1 kHz).
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Number of audio buffers per second. Raise the resulting buffer size if
/// you encounter audio skipping.
pub const FILL_RATE: u32 = 45;

/// Smallest buffer the backend will be opened with, in frames.
pub const MIN_BUFFER_FRAMES: usize = 512;

/// Compute the output buffer size in frames for `sample_rate`.
///
/// The smallest power of two that is at least [`MIN_BUFFER_FRAMES`] and
/// covers roughly 1/[`FILL_RATE`] of a second of stereo 16-bit audio.
pub fn buffer_frame_count(sample_rate: u32) -> usize {
    let min_size = (sample_rate as usize) * 2 / FILL_RATE as usize;
    let mut size = MIN_BUFFER_FRAMES;
    while size < min_size {
        size *= 2;
    }
    size
}

/// Start/stop surface of an audio output stream.
///
/// Implementations must make [`stop`](Self::stop) synchronous with respect
/// to the callback thread: after it returns, no further fill happens and any
/// in-flight fill has completed. [`RodioBackend`] is the production
/// implementation; tests substitute recording fakes.
pub trait AudioBackend {
    /// Resume pulling samples.
    fn start(&mut self);

    /// Stop pulling samples and drain any in-flight callback.
    fn stop(&mut self);
}

/// State shared between the control thread and the audio callback.
///
/// Owns the bound emulator instance. `enabled` gates sample generation so a
/// stopped backend can never touch the emulator even if its device delivers
/// one more pull.
pub struct AudioState {
    emu: Option<Box<dyn ChipEmulator>>,
    enabled: bool,
}

/// Shared handle to an [`AudioState`].
pub type SharedAudioState = Arc<Mutex<AudioState>>;

impl AudioState {
    /// Create an empty, disabled state.
    pub fn new() -> Self {
        Self {
            emu: None,
            enabled: false,
        }
    }

    /// Create a shared handle to a fresh state.
    pub fn new_shared() -> SharedAudioState {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Bind an emulator instance, replacing any previous one.
    pub fn bind(&mut self, emu: Box<dyn ChipEmulator>) {
        self.emu = Some(emu);
    }

    /// Release the bound emulator instance, if any.
    pub fn unbind(&mut self) -> Option<Box<dyn ChipEmulator>> {
        self.emu.take()
    }

    /// True if an emulator instance is bound.
    pub fn is_bound(&self) -> bool {
        self.emu.is_some()
    }

    /// Borrow the bound emulator.
    pub fn emu(&self) -> Option<&dyn ChipEmulator> {
        self.emu.as_deref()
    }

    /// Mutably borrow the bound emulator.
    pub fn emu_mut(&mut self) -> Option<&mut (dyn ChipEmulator + 'static)> {
        self.emu.as_deref_mut()
    }

    /// Gate sample generation on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fill `out` with interleaved stereo samples.
    ///
    /// Always satisfies the whole buffer: silence when generation is gated
    /// off or no emulator is bound. Generation errors have no return path
    /// out of an audio callback and are deliberately dropped, leaving
    /// whatever partial output the emulator produced.
    pub fn fill(&mut self, out: &mut [i16]) {
        if !self.enabled {
            out.fill(0);
            return;
        }
        match self.emu.as_deref_mut() {
            Some(emu) => {
                let _ = emu.generate(out);
            }
            None => out.fill(0),
        }
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emu::TrackInfo;

    struct NoisyEmu {
        fail: bool,
    }

    impl ChipEmulator for NoisyEmu {
        fn load_companion_playlist(&mut self, _path: &std::path::Path) -> Result<(), String> {
            Ok(())
        }
        fn track_count(&self) -> usize {
            1
        }
        fn track_info(&self, _track: usize) -> Result<TrackInfo, String> {
            Ok(TrackInfo::default())
        }
        fn start_track(&mut self, _track: usize) -> Result<(), String> {
            Ok(())
        }
        fn set_fade(&mut self, _length_ms: u32) {}
        fn track_ended(&self) -> bool {
            false
        }
        fn generate(&mut self, out: &mut [i16]) -> Result<(), String> {
            if self.fail {
                return Err("generation failed".into());
            }
            out.fill(7);
            Ok(())
        }
        fn set_tempo(&mut self, _tempo: f64) {}
        fn set_stereo_depth(&mut self, _depth: f64) {}
        fn enable_accuracy(&mut self, _enabled: bool) {}
        fn mute_voices(&mut self, _mask: i32) {}
        fn ignore_silence(&mut self, _ignore: bool) {}
    }

    #[test]
    fn buffer_size_law() {
        for rate in [8_000u32, 11_025, 22_050, 44_100, 48_000, 96_000, 192_000] {
            let frames = buffer_frame_count(rate);
            assert!(frames >= MIN_BUFFER_FRAMES, "floor violated at {rate}");
            assert!(frames.is_power_of_two(), "not a power of two at {rate}");
            assert!(
                frames >= rate as usize * 2 / FILL_RATE as usize,
                "too small for 1/{FILL_RATE}s at {rate}"
            );
        }
        assert_eq!(buffer_frame_count(44_100), 2_048);
        assert_eq!(buffer_frame_count(8_000), 512);
    }

    #[test]
    fn fill_is_silence_without_emulator() {
        let mut state = AudioState::new();
        state.set_enabled(true);
        let mut buf = [123i16; 64];
        state.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0));
    }

    #[test]
    fn fill_is_silence_while_disabled() {
        let mut state = AudioState::new();
        state.bind(Box::new(NoisyEmu { fail: false }));
        let mut buf = [123i16; 64];
        state.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0));
    }

    #[test]
    fn fill_generates_when_enabled() {
        let mut state = AudioState::new();
        state.bind(Box::new(NoisyEmu { fail: false }));
        state.set_enabled(true);
        let mut buf = [0i16; 64];
        state.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 7));
    }

    #[test]
    fn generation_errors_are_swallowed() {
        let mut state = AudioState::new();
        state.bind(Box::new(NoisyEmu { fail: true }));
        state.set_enabled(true);
        let mut buf = [0i16; 64];
        state.fill(&mut buf);
    }
}
