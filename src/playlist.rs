//! Companion playlist path derivation.
//!
//! NSF files often ship with a same-named `.m3u` carrying track order and
//! labels. Loading it is a best-effort enhancement: the player derives the
//! path here and ignores every failure from the emulator's loader.

use std::path::{Path, PathBuf};

/// Longest path prefix considered when deriving the companion name, in
/// bytes. Longer paths are truncated; an accepted limitation, not an error.
pub const PLAYLIST_PATH_LIMIT: usize = 256;

/// Derive the sibling `.m3u` path for a music file.
///
/// The path string is capped at [`PLAYLIST_PATH_LIMIT`] bytes, then
/// everything from the last `.` on is replaced with `.m3u` (appended when
/// the path has no dot at all).
pub fn companion_playlist_path(path: &Path) -> PathBuf {
    let mut name = path.to_string_lossy().into_owned();
    if name.len() > PLAYLIST_PATH_LIMIT {
        let mut end = PLAYLIST_PATH_LIMIT;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    let stem_end = name.rfind('.').unwrap_or(name.len());
    name.truncate(stem_end);
    name.push_str(".m3u");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_extension() {
        assert_eq!(
            companion_playlist_path(Path::new("/music/zelda.nsf")),
            PathBuf::from("/music/zelda.m3u")
        );
    }

    #[test]
    fn appends_when_no_extension() {
        assert_eq!(
            companion_playlist_path(Path::new("/music/zelda")),
            PathBuf::from("/music/zelda.m3u")
        );
    }

    #[test]
    fn truncates_overlong_paths() {
        let long = format!("/music/{}.nsf", "a".repeat(300));
        let derived = companion_playlist_path(Path::new(&long));
        let derived = derived.to_string_lossy();
        assert!(derived.len() <= PLAYLIST_PATH_LIMIT + 4);
        assert!(derived.ends_with(".m3u"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = format!("/music/{}", "é".repeat(200));
        let derived = companion_playlist_path(Path::new(&long));
        assert!(derived.to_string_lossy().ends_with(".m3u"));
    }
}
