//! Game Music Emu backend.
//!
//! Binds the system `libgme` (the same library the classic C players link)
//! and adapts it to [`ChipEmulator`]. Only the narrow call set the player
//! needs is declared; the handle stays opaque.

use crate::emu::{ChipEmulator, TrackInfo};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_double, c_int, c_short};
use std::path::Path;

/// Opaque emulator handle from libgme.
#[repr(C)]
struct MusicEmu {
    _private: [u8; 0],
}

/// Track information record, layout of `gme_info_t` from gme.h 0.6.x.
/// Times are in milliseconds, -1 if unknown; strings are never null.
#[repr(C)]
struct GmeInfo {
    length: c_int,
    intro_length: c_int,
    loop_length: c_int,
    // play_length is gme's own resolved value; the player derives its own
    // from the three fields above.
    _play_length: c_int,
    _reserved_times: [c_int; 12],
    system: *const c_char,
    game: *const c_char,
    song: *const c_char,
    author: *const c_char,
    copyright: *const c_char,
    comment: *const c_char,
    dumper: *const c_char,
    _reserved_strings: [*const c_char; 9],
}

// gme_err_t: null on success, otherwise a static error string.
type GmeErr = *const c_char;

#[link(name = "gme")]
extern "C" {
    fn gme_open_file(path: *const c_char, out: *mut *mut MusicEmu, sample_rate: c_int) -> GmeErr;
    fn gme_delete(emu: *mut MusicEmu);
    fn gme_load_m3u(emu: *mut MusicEmu, path: *const c_char) -> GmeErr;
    fn gme_track_count(emu: *const MusicEmu) -> c_int;
    fn gme_track_info(emu: *const MusicEmu, out: *mut *mut GmeInfo, track: c_int) -> GmeErr;
    fn gme_free_info(info: *mut GmeInfo);
    fn gme_start_track(emu: *mut MusicEmu, track: c_int) -> GmeErr;
    fn gme_set_fade(emu: *mut MusicEmu, start_msec: c_int);
    fn gme_track_ended(emu: *const MusicEmu) -> c_int;
    fn gme_play(emu: *mut MusicEmu, count: c_int, out: *mut c_short) -> GmeErr;
    fn gme_set_tempo(emu: *mut MusicEmu, tempo: c_double);
    fn gme_set_stereo_depth(emu: *mut MusicEmu, depth: c_double);
    fn gme_enable_accuracy(emu: *mut MusicEmu, enabled: c_int);
    fn gme_mute_voices(emu: *mut MusicEmu, mask: c_int);
    fn gme_ignore_silence(emu: *mut MusicEmu, ignore: c_int);
}

fn check(err: GmeErr) -> Result<(), String> {
    if err.is_null() {
        Ok(())
    } else {
        // Safety: gme error strings are static, NUL-terminated C strings.
        Err(unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned())
    }
}

fn c_path(path: &Path) -> Result<CString, String> {
    CString::new(path.to_string_lossy().as_bytes())
        .map_err(|_| format!("path contains NUL byte: {}", path.display()))
}

fn field(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // Safety: non-null gme_info_t strings are valid C strings owned by the
    // info record for its lifetime.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// One open libgme instance bound to one music file.
pub struct GmeEmulator {
    emu: *mut MusicEmu,
}

// The raw handle is confined to the player's state mutex; libgme has no
// thread affinity as long as calls do not overlap.
unsafe impl Send for GmeEmulator {}

impl GmeEmulator {
    /// Open `path` at `sample_rate`, autodetecting the file format.
    pub fn open(path: &Path, sample_rate: u32) -> Result<Self, String> {
        let c_path = c_path(path)?;
        let mut emu: *mut MusicEmu = std::ptr::null_mut();
        check(unsafe { gme_open_file(c_path.as_ptr(), &mut emu, sample_rate as c_int) })?;
        Ok(GmeEmulator { emu })
    }
}

impl Drop for GmeEmulator {
    fn drop(&mut self) {
        unsafe { gme_delete(self.emu) };
    }
}

impl ChipEmulator for GmeEmulator {
    fn load_companion_playlist(&mut self, path: &Path) -> Result<(), String> {
        let c_path = c_path(path)?;
        check(unsafe { gme_load_m3u(self.emu, c_path.as_ptr()) })
    }

    fn track_count(&self) -> usize {
        unsafe { gme_track_count(self.emu) }.max(0) as usize
    }

    fn track_info(&self, track: usize) -> Result<TrackInfo, String> {
        let mut raw: *mut GmeInfo = std::ptr::null_mut();
        check(unsafe { gme_track_info(self.emu, &mut raw, track as c_int) })?;
        if raw.is_null() {
            return Err("no track info available".into());
        }
        // Safety: gme_track_info succeeded, raw points to a live gme_info_t
        // that we free exactly once below.
        let info = unsafe {
            let r = &*raw;
            TrackInfo {
                system: field(r.system),
                game: field(r.game),
                song: field(r.song),
                author: field(r.author),
                copyright: field(r.copyright),
                comment: field(r.comment),
                dumper: field(r.dumper),
                length_ms: r.length,
                intro_length_ms: r.intro_length,
                loop_length_ms: r.loop_length,
            }
        };
        unsafe { gme_free_info(raw) };
        Ok(info)
    }

    fn start_track(&mut self, track: usize) -> Result<(), String> {
        check(unsafe { gme_start_track(self.emu, track as c_int) })
    }

    fn set_fade(&mut self, length_ms: u32) {
        unsafe { gme_set_fade(self.emu, length_ms as c_int) };
    }

    fn track_ended(&self) -> bool {
        unsafe { gme_track_ended(self.emu) } != 0
    }

    fn generate(&mut self, out: &mut [i16]) -> Result<(), String> {
        check(unsafe { gme_play(self.emu, out.len() as c_int, out.as_mut_ptr()) })
    }

    fn set_tempo(&mut self, tempo: f64) {
        unsafe { gme_set_tempo(self.emu, tempo) };
    }

    fn set_stereo_depth(&mut self, depth: f64) {
        unsafe { gme_set_stereo_depth(self.emu, depth) };
    }

    fn enable_accuracy(&mut self, enabled: bool) {
        unsafe { gme_enable_accuracy(self.emu, enabled as c_int) };
    }

    fn mute_voices(&mut self, mask: i32) {
        unsafe { gme_mute_voices(self.emu, mask as c_int) };
    }

    fn ignore_silence(&mut self, ignore: bool) {
        unsafe { gme_ignore_silence(self.emu, ignore as c_int) };
    }
}

/// [`crate::EmulatorOpener`]-compatible factory for the gme backend.
pub fn open_emulator(
    path: &Path,
    sample_rate: u32,
) -> Result<Box<dyn ChipEmulator>, String> {
    Ok(Box::new(GmeEmulator::open(path, sample_rate)?))
}
