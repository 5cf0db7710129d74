//! Error types for playback control.

/// Error type for player operations.
///
/// Messages from the audio backend and the emulator library are carried
/// verbatim in the `String` payloads.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// The audio output device could not be opened.
    #[error("Audio init error: {0}")]
    AudioInit(String),

    /// The music file is missing, corrupt or not a supported format.
    #[error("File open error: {0}")]
    FileOpen(String),

    /// Track metadata could not be retrieved (usually an out-of-range index).
    #[error("Track info error: {0}")]
    TrackInfo(String),

    /// The emulator rejected starting the track.
    #[error("Track start error: {0}")]
    TrackStart(String),

    /// IO error from the filesystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for player operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
