use std::env;
use std::fs;
use std::path::Path;
use std::process;

use getopts::Options;
use log::info;

use pcbetch::render::{Pcb, Platform, RenderSurface};

const FRAMES: u32 = 50;

fn usage(prg: &str, opts: Options)
{
    let brief = format!("Usage: {} [options]", prg);
    print!("{}", opts.usage(&brief));
}

// Sweep the arm and slide the carriage over a board with a diagonal etched
fn render_sweep(dir: &Path) -> pcbetch::Result<()>
{
    let mut pcb = Pcb::new(50.0, 50.0);
    for i in 0..10 {
        pcb.etch_point(20.0 + i as f64, 20.0 + i as f64, 0.7);
    }
    let mut platform = Platform::new(pcb, 50.0);
    for frame in 0..FRAMES {
        let path = dir.join(format!("frame_{:03}.png", frame));
        platform.render_frame(25.0 - frame as f64, frame as f64, &path)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();
    let mut opts = Options::new();
    opts.optopt("o", "output", "directory for the frames", "DIR");
    opts.optflag("h", "help", "print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            process::exit(1);
        }
    };
    if matches.opt_present("h") {
        usage(&program, opts);
        return;
    }
    let dir = matches.opt_str("output").unwrap_or_else(|| String::from("."));
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Failed to create {}: {}", dir, e);
        process::exit(1);
    }
    if let Err(e) = render_sweep(Path::new(&dir)) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
