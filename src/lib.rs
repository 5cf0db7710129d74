//! NSF/NSFE chiptune playback control core.
//!
//! This crate drives an external sound-chip emulator (Game Music Emu) and a
//! platform audio output device from a command-line front-end. Chip emulation
//! itself is delegated through the [`ChipEmulator`] capability trait; the
//! crate owns everything around it: track lifecycle and timing, the bridge
//! from the pull-based audio callback to the emulator's sample generator, and
//! glitch-free coordination of live parameter changes (tempo, stereo depth,
//! muting) with the audio thread.
//!
//! # Crate feature flags
//! - `gme` (opt-in): Game Music Emu backend over FFI (links the system
//!   `libgme`); without it the library and tests build everywhere but the
//!   CLI cannot open music files.
//!
//! # Quick start
//! ```no_run
//! # #[cfg(feature = "gme")]
//! # {
//! use nsf_replayer::{Player, gme::open_emulator, DEFAULT_SAMPLE_RATE};
//!
//! let mut player = Player::new(DEFAULT_SAMPLE_RATE, Box::new(open_emulator)).unwrap();
//! player.load_file("song.nsf".as_ref()).unwrap();
//! player.start_track(0).unwrap();
//! while !player.track_ended() {
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! # }
//! ```

#![warn(missing_docs)]

pub mod audio;
pub mod emu;
pub mod error;
#[cfg(feature = "gme")]
pub mod gme;
pub mod player;
pub mod playlist;

pub use audio::{
    buffer_frame_count, AudioBackend, AudioState, RodioBackend, SharedAudioState,
    DEFAULT_SAMPLE_RATE,
};
pub use emu::{ChipEmulator, TrackInfo, FALLBACK_TRACK_LENGTH_MS};
pub use error::{PlayerError, Result};
pub use player::{EmulatorOpener, Player};
pub use playlist::companion_playlist_path;
