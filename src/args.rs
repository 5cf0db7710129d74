//! Command-line argument parsing for the NSF replayer CLI.

use std::env;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Music file to play.
    pub file_path: Option<PathBuf>,
    /// Track to start with (0-based).
    pub start_track: usize,
    /// Print metadata for every track instead of playing.
    pub info_only: bool,
    /// Stop after the starting track ends instead of advancing.
    pub single_track: bool,
    /// Whether help was requested.
    pub show_help: bool,
    /// Whether parsing hit an invalid argument (exit nonzero).
    pub invalid: bool,
}

impl CliArgs {
    /// Parse arguments from the command line.
    pub fn parse() -> Self {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(args: impl Iterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        let mut iter = args;

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => {
                    parsed.show_help = true;
                }
                "--info" | "-i" => {
                    parsed.info_only = true;
                }
                "--single" | "-s" => {
                    parsed.single_track = true;
                }
                "--track" | "-t" => match iter.next() {
                    Some(value) => parsed.set_track(&value),
                    None => {
                        eprintln!("--track requires a track number");
                        parsed.fail();
                    }
                },
                _ if arg.starts_with("--track=") => {
                    let value = arg["--track=".len()..].to_string();
                    parsed.set_track(&value);
                }
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    eprintln!("Unknown flag: {}", arg);
                    parsed.fail();
                }
                _ => {
                    if parsed.file_path.is_some() {
                        eprintln!("Only one input file may be given");
                        parsed.fail();
                    } else {
                        parsed.file_path = Some(PathBuf::from(arg));
                    }
                }
            }
        }

        if !parsed.show_help && parsed.file_path.is_none() {
            parsed.fail();
        }
        parsed
    }

    fn set_track(&mut self, value: &str) {
        match value.parse::<usize>() {
            Ok(track) => self.start_track = track,
            Err(_) => {
                eprintln!("Invalid track number: {}", value);
                self.fail();
            }
        }
    }

    fn fail(&mut self) {
        self.show_help = true;
        self.invalid = true;
    }

    /// Print help text to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage:\n  nsf-replayer [options] <file.nsf>\n\n\
             Options:\n\
             \x20 -t, --track <n>   Start at track n, counted from 0 (default 0)\n\
             \x20 -i, --info        Print metadata for every track, do not play\n\
             \x20 -s, --single      Stop after the starting track ends\n\
             \x20 -h, --help        Show this help\n\n\
             Plays NSF/NSFE files (and every other format Game Music Emu\n\
             understands) through the default audio device. A sibling .m3u\n\
             playlist with the same base name is picked up automatically.\n"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn positional_file_and_defaults() {
        let args = parse(&["song.nsf"]);
        assert_eq!(args.file_path, Some(PathBuf::from("song.nsf")));
        assert_eq!(args.start_track, 0);
        assert!(!args.info_only && !args.single_track && !args.show_help);
    }

    #[test]
    fn track_flag_forms() {
        assert_eq!(parse(&["-t", "3", "song.nsf"]).start_track, 3);
        assert_eq!(parse(&["--track=5", "song.nsf"]).start_track, 5);
    }

    #[test]
    fn missing_file_is_invalid() {
        let args = parse(&[]);
        assert!(args.show_help && args.invalid);
    }

    #[test]
    fn bad_track_number_is_invalid() {
        let args = parse(&["--track", "x", "song.nsf"]);
        assert!(args.invalid);
    }

    #[test]
    fn help_without_file_is_not_an_error() {
        let args = parse(&["--help"]);
        assert!(args.show_help && !args.invalid);
    }
}
