/*!
invaders8080 CLI - Loads the four arcade ROM files, runs the machine
headless for a given number of video frames, and optionally writes a
per-instruction trace log. There is no video/audio frontend here
(spec.md's Non-goals exclude one); this binary exists to drive and
observe the emulation core, the way a hardware test jig would.
*/

use std::path::PathBuf;
use std::process::ExitCode;

use getopts::Options;
use invaders8080::machine::ArcadeMachine;
use invaders8080::trace::TraceLog;
use invaders8080::EmuError;

const DEFAULT_FRAMES: u32 = 60;

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {program} --rom-dir DIR [options]");
    print!("{}", opts.usage(&brief));
}

fn run() -> Result<(), EmuError> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("r", "rom-dir", "directory containing the four ROM files", "DIR");
    opts.optopt("f", "frames", "number of video frames to run", "N");
    opts.optopt("t", "trace-log", "write a per-instruction trace to this file", "PATH");
    opts.optflag("h", "help", "print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            print_usage(&program, &opts);
            std::process::exit(1);
        }
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return Ok(());
    }

    let rom_dir = match matches.opt_str("r") {
        Some(dir) => PathBuf::from(dir),
        None => {
            print_usage(&program, &opts);
            std::process::exit(1);
        }
    };

    let frames: u32 = matches
        .opt_str("f")
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut trace_log = match matches.opt_str("t") {
        Some(path) => {
            let path = PathBuf::from(path);
            let log = TraceLog::create(&path)
                .map_err(|source| EmuError::TraceLogOpen { path, source })?;
            Some(log)
        }
        None => None,
    };

    log::info!("loading ROMs from {}", rom_dir.display());
    let mut machine = ArcadeMachine::load(&rom_dir)?;
    machine.cpu.int_enable = true;

    for frame in 0..frames {
        if let Some(log) = trace_log.as_mut() {
            log.record(&machine.cpu).ok();
        }
        machine.run_frame()?;
        log::debug!("frame {frame} complete, total_cycles={}", machine.cpu.total_cycles);
    }

    if let Some(log) = trace_log.as_mut() {
        log.flush().ok();
    }

    log::info!("ran {frames} frames cleanly");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ (EmuError::RomOpen { .. } | EmuError::RomTruncated { .. })) => {
            eprintln!("error: failed to load ROM image: {err}");
            ExitCode::from(1)
        }
        Err(err @ EmuError::TraceLogOpen { .. }) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
        Err(err @ EmuError::UndefinedOpcode { .. }) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
