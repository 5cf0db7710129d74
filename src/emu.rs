//! Capability interface of the external sound-chip emulator.
//!
//! The emulator is an externally-owned opaque resource; the player never
//! assumes anything about its representation and only talks to it through
//! [`ChipEmulator`]. The production implementation lives in [`crate::gme`]
//! (feature `gme`); tests substitute scripted implementations.

/// Fade length programmed when neither the file nor its intro/loop data
/// provide a track length: 2.5 minutes.
pub const FALLBACK_TRACK_LENGTH_MS: u32 = 150_000;

/// Metadata snapshot for one track, taken when the track starts.
///
/// Display fields may be empty. Times are in milliseconds; values `<= 0`
/// mean "unknown", matching the emulator library's `gme_info_t` convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    /// Emulated system (e.g. "Nintendo NES").
    pub system: String,
    /// Game title.
    pub game: String,
    /// Song name.
    pub song: String,
    /// Author/composer name.
    pub author: String,
    /// Copyright string.
    pub copyright: String,
    /// Freeform comment.
    pub comment: String,
    /// Person who ripped the file.
    pub dumper: String,
    /// Total length, if the file specifies it.
    pub length_ms: i32,
    /// Length of the song up to the looping section.
    pub intro_length_ms: i32,
    /// Length of the looping section.
    pub loop_length_ms: i32,
}

impl TrackInfo {
    /// Resolve the length to play before fading out.
    ///
    /// Precedence: the reported length if positive, else intro plus two
    /// passes of the loop if that sum is positive, else
    /// [`FALLBACK_TRACK_LENGTH_MS`]. Always positive.
    pub fn effective_length_ms(&self) -> u32 {
        if self.length_ms > 0 {
            return self.length_ms as u32;
        }
        let looped = self.intro_length_ms + self.loop_length_ms * 2;
        if looped > 0 {
            return looped as u32;
        }
        FALLBACK_TRACK_LENGTH_MS
    }
}

/// Object-safe handle to one open emulator instance bound to one music file.
///
/// Thread discipline: the player guarantees exclusive access for every call;
/// the audio thread only ever invokes [`generate`](Self::generate), and only
/// while not excluded by a pending backend stop.
pub trait ChipEmulator: Send {
    /// Load a companion `.m3u` playlist. Best-effort: callers discard the
    /// error, a missing or malformed playlist is not a failure.
    fn load_companion_playlist(&mut self, path: &std::path::Path) -> Result<(), String>;

    /// Number of tracks in the loaded file.
    fn track_count(&self) -> usize;

    /// Metadata for `track` without changing the play position.
    fn track_info(&self, track: usize) -> Result<TrackInfo, String>;

    /// Begin playback at `track` (0-based).
    fn start_track(&mut self, track: usize) -> Result<(), String>;

    /// Program the point at which the current track fades out and is then
    /// reported as ended.
    fn set_fade(&mut self, length_ms: u32);

    /// True once the current track has played through its fade.
    fn track_ended(&self) -> bool;

    /// Generate interleaved 16-bit stereo samples into `out`
    /// (`out.len() / 2` frames).
    fn generate(&mut self, out: &mut [i16]) -> Result<(), String>;

    /// Set tempo: 0.5 = half speed, 1.0 = normal, 2.0 = double speed.
    fn set_tempo(&mut self, tempo: f64);

    /// Set synthetic stereo widening, 0.0 (none) to 1.0 (maximum).
    fn set_stereo_depth(&mut self, depth: f64);

    /// Enable slower, more accurate sound emulation.
    fn enable_accuracy(&mut self, enabled: bool);

    /// Mute voices selected by `mask` (bit n mutes voice n).
    fn mute_voices(&mut self, mask: i32);

    /// Keep generating through silent stretches instead of ending the track.
    fn ignore_silence(&mut self, ignore: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(length: i32, intro: i32, looped: i32) -> TrackInfo {
        TrackInfo {
            length_ms: length,
            intro_length_ms: intro,
            loop_length_ms: looped,
            ..TrackInfo::default()
        }
    }

    #[test]
    fn reported_length_wins() {
        assert_eq!(info(30_000, 1_000, 2_000).effective_length_ms(), 30_000);
    }

    #[test]
    fn intro_plus_two_loops() {
        assert_eq!(info(0, 1_000, 2_000).effective_length_ms(), 5_000);
    }

    #[test]
    fn fallback_when_nothing_known() {
        assert_eq!(info(0, 0, 0).effective_length_ms(), FALLBACK_TRACK_LENGTH_MS);
    }

    #[test]
    fn unknown_markers_fall_through() {
        // gme reports -1 for unknown times
        assert_eq!(info(-1, -1, -1).effective_length_ms(), FALLBACK_TRACK_LENGTH_MS);
        assert_eq!(info(-1, 1_000, 2_000).effective_length_ms(), 5_000);
    }
}
