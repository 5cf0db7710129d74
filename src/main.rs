#[cfg(not(feature = "gme"))]
fn main() {
    eprintln!(
        "nsf-replayer was built without the \"gme\" feature. Rebuild with `--features gme` to enable playback."
    );
    std::process::exit(1);
}

#[cfg(feature = "gme")]
mod args;

#[cfg(feature = "gme")]
mod cli {
    use crate::args::CliArgs;
    use nsf_replayer::gme::open_emulator;
    use nsf_replayer::{Player, Result, TrackInfo, DEFAULT_SAMPLE_RATE};
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    /// How often the control loop polls for end-of-track.
    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    fn print_track(track: usize, info: &TrackInfo) {
        let length_ms = info.effective_length_ms();
        let name = if info.song.is_empty() {
            "(untitled)"
        } else {
            info.song.as_str()
        };
        println!(
            "Track {:3}: {}  [{}:{:02}]",
            track,
            name,
            length_ms / 60_000,
            length_ms / 1_000 % 60
        );
        if !info.author.is_empty() {
            println!("           by {}", info.author);
        }
    }

    pub fn run(file: &Path, args: &CliArgs) -> Result<()> {
        let mut player = Player::new(DEFAULT_SAMPLE_RATE, Box::new(open_emulator))?;
        player.load_file(file)?;

        let count = player.track_count();
        println!("Loaded {} ({} tracks)", file.display(), count);
        if let Ok(info) = player.track_info(0) {
            if !info.game.is_empty() {
                println!("{}", info.game);
            }
            if !info.copyright.is_empty() {
                println!("{}", info.copyright);
            }
        }
        println!();

        if args.info_only {
            for track in 0..count {
                print_track(track, &player.track_info(track)?);
            }
            return Ok(());
        }

        let mut track = args.start_track;
        player.start_track(track)?;
        if let Some(info) = player.current_track_info() {
            print_track(track, info);
        }

        loop {
            thread::sleep(POLL_INTERVAL);
            if !player.track_ended() {
                continue;
            }
            if args.single_track || track + 1 >= count {
                break;
            }
            track += 1;
            player.start_track(track)?;
            if let Some(info) = player.current_track_info() {
                print_track(track, info);
            }
        }

        player.stop();
        Ok(())
    }
}

#[cfg(feature = "gme")]
fn main() {
    let parsed = args::CliArgs::parse();
    if parsed.show_help {
        args::CliArgs::print_help();
        std::process::exit(if parsed.invalid { 1 } else { 0 });
    }
    let Some(ref file) = parsed.file_path else {
        args::CliArgs::print_help();
        std::process::exit(1);
    };

    if let Err(err) = cli::run(file, &parsed) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
