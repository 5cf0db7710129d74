//! Playback controller: owns one emulator instance and one audio backend.
//!
//! All methods are called from the control thread and complete
//! synchronously. The audio thread only ever reaches the emulator through
//! [`AudioState::fill`]; every mutation here first stops the backend (a
//! draining stop, see [`AudioBackend`]) so the two never touch the emulator
//! concurrently.
//!
//! [`AudioState::fill`]: crate::audio::AudioState::fill

use crate::audio::{buffer_frame_count, AudioBackend, AudioState, RodioBackend, SharedAudioState};
use crate::emu::{ChipEmulator, TrackInfo};
use crate::error::{PlayerError, Result};
use crate::playlist::companion_playlist_path;
use std::path::{Path, PathBuf};

/// Factory opening an emulator instance for a file at a sample rate.
///
/// The error string is the emulator library's message, surfaced unchanged.
pub type EmulatorOpener =
    Box<dyn Fn(&Path, u32) -> std::result::Result<Box<dyn ChipEmulator>, String> + Send>;

/// Coordinates one [`ChipEmulator`] with one [`AudioBackend`].
///
/// Exposes file loading, track switching, pause/resume, end-of-track
/// polling and live parameter adjustment as a single synchronous API.
pub struct Player<B: AudioBackend> {
    backend: B,
    state: SharedAudioState,
    opener: EmulatorOpener,
    sample_rate: u32,
    paused: bool,
    file_path: Option<PathBuf>,
    track_info: Option<TrackInfo>,
}

impl Player<RodioBackend> {
    /// Open the default audio device at `sample_rate` and register the
    /// sample-fill source.
    ///
    /// The buffer covers roughly 1/45th of a second, rounded up to a power
    /// of two with a floor of 512 frames. Fails with
    /// [`PlayerError::AudioInit`] carrying the backend's message when the
    /// device cannot be opened.
    pub fn new(sample_rate: u32, opener: EmulatorOpener) -> Result<Self> {
        let state = AudioState::new_shared();
        let backend =
            RodioBackend::open(sample_rate, buffer_frame_count(sample_rate), state.clone())
                .map_err(PlayerError::AudioInit)?;
        Ok(Self::with_backend(backend, state, sample_rate, opener))
    }
}

impl<B: AudioBackend> Player<B> {
    /// Assemble a player around an already-open backend and its shared
    /// state. Entry point for tests and alternative backends.
    pub fn with_backend(
        backend: B,
        state: SharedAudioState,
        sample_rate: u32,
        opener: EmulatorOpener,
    ) -> Self {
        Player {
            backend,
            state,
            opener,
            sample_rate,
            paused: false,
            file_path: None,
            track_info: None,
        }
    }

    /// The sample rate the backend was opened with.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Path of the most recently loaded file.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// True once a file has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.state.lock().is_bound()
    }

    /// Load a music file, replacing any previously loaded one.
    ///
    /// Tears down the current emulator instance first, so on failure the
    /// player is back in the "no file loaded" state. A sibling `.m3u`
    /// playlist is picked up best-effort; its absence never surfaces.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        self.file_path = Some(path.to_path_buf());

        self.stop();

        let emu = (self.opener)(path, self.sample_rate).map_err(PlayerError::FileOpen)?;

        let mut state = self.state.lock();
        state.bind(emu);
        if let Some(emu) = state.emu_mut() {
            let m3u = companion_playlist_path(path);
            let _ = emu.load_companion_playlist(&m3u); // best-effort, ignore error
        }

        Ok(())
    }

    /// (Re)start playing a track, numbered 0 to `track_count() - 1`.
    ///
    /// No-op when no file is loaded. On success the paused flag is cleared
    /// and the backend is running again.
    pub fn start_track(&mut self, track: usize) -> Result<()> {
        self.begin_track(track, true)
    }

    /// Prepare a track exactly like [`start_track`](Self::start_track) but
    /// leave the backend stopped; nothing becomes audible.
    pub fn cue_track(&mut self, track: usize) -> Result<()> {
        self.begin_track(track, false)
    }

    fn begin_track(&mut self, track: usize, audible: bool) -> Result<()> {
        // Fresh metadata first: a bad index fails here, before the play
        // position changes, leaving the previous track untouched.
        self.track_info = None;
        let info = match self.state.lock().emu() {
            Some(emu) => emu.track_info(track).map_err(PlayerError::TrackInfo)?,
            None => return Ok(()),
        };

        // Sound must not be running when operating on the emulator.
        self.backend.stop();

        let length = info.effective_length_ms();
        {
            let mut state = self.state.lock();
            let Some(emu) = state.emu_mut() else {
                return Ok(());
            };
            emu.start_track(track).map_err(PlayerError::TrackStart)?;
            emu.set_fade(length);
        }

        let mut info = info;
        info.length_ms = length as i32;
        self.track_info = Some(info);
        self.paused = false;
        if audible {
            self.backend.start();
        }
        Ok(())
    }

    /// Stop playing and release the emulator instance. Idempotent.
    pub fn stop(&mut self) {
        self.backend.stop();
        self.state.lock().unbind();
        self.track_info = None;
    }

    /// Number of tracks in the current file, or 0 if no file is loaded.
    pub fn track_count(&self) -> usize {
        self.state.lock().emu().map_or(0, |emu| emu.track_count())
    }

    /// True if the current track has played through its fade.
    ///
    /// Polled by the caller; the player pushes no event. False when no file
    /// is loaded.
    pub fn track_ended(&self) -> bool {
        self.state.lock().emu().is_some_and(|emu| emu.track_ended())
    }

    /// Metadata snapshot of the track started last, with its play length
    /// resolved. None until a track has been started on the current file.
    pub fn current_track_info(&self) -> Option<&TrackInfo> {
        self.track_info.as_ref()
    }

    /// Query metadata for `track` without starting it.
    pub fn track_info(&self, track: usize) -> Result<TrackInfo> {
        match self.state.lock().emu() {
            Some(emu) => emu.track_info(track).map_err(PlayerError::TrackInfo),
            None => Err(PlayerError::TrackInfo("no file loaded".into())),
        }
    }

    /// Pause or resume the current track.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.backend.stop();
        } else {
            self.backend.start();
        }
    }

    /// True while paused by the user.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // Parameter changes must not race the callback thread. While the user
    // has playback paused the backend stays untouched and the change takes
    // effect on the next resume.
    fn suspend(&mut self) {
        if !self.paused {
            self.backend.stop();
        }
    }

    fn resume(&mut self) {
        if !self.paused {
            self.backend.start();
        }
    }

    /// Set tempo, where 0.5 = half speed, 1.0 = normal, 2.0 = double speed.
    pub fn set_tempo(&mut self, tempo: f64) {
        self.suspend();
        if let Some(emu) = self.state.lock().emu_mut() {
            emu.set_tempo(tempo);
        }
        self.resume();
    }

    /// Set stereo depth, where 0.0 = none and 1.0 = maximum.
    pub fn set_stereo_depth(&mut self, depth: f64) {
        self.suspend();
        if let Some(emu) = self.state.lock().emu_mut() {
            emu.set_stereo_depth(depth);
        }
        self.resume();
    }

    /// Enable accurate (slower) sound emulation.
    pub fn enable_accuracy(&mut self, enabled: bool) {
        self.suspend();
        if let Some(emu) = self.state.lock().emu_mut() {
            emu.enable_accuracy(enabled);
        }
        self.resume();
    }

    /// Set the voice muting bitmask.
    ///
    /// Silence-ignoring follows the mask: enabled while any voice is muted
    /// so end-of-track detection stays meaningful, disabled at mask 0.
    pub fn mute_voices(&mut self, mask: i32) {
        self.suspend();
        if let Some(emu) = self.state.lock().emu_mut() {
            emu.mute_voices(mask);
            emu.ignore_silence(mask != 0);
        }
        self.resume();
    }
}

impl<B: AudioBackend> Drop for Player<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
