use std::env;
use std::fs;
use std::process;

use getopts::Options;
use log::info;

use pcbetch::config::{self, EtcherConfig};
use pcbetch::etcher::{Etcher, DEFAULT_FRAME_PREFIX};
use pcbetch::render::{Pcb, Platform};
use pcbetch::script;

fn usage(prg: &str, opts: Options)
{
    let brief = format!("Usage: {} [options]", prg);
    print!("{}", opts.usage(&brief));
}

fn run(config: EtcherConfig, script_file: Option<String>, output_dir: String, prefix: String)
       -> pcbetch::Result<u32>
{
    let commands = match script_file {
        Some(file_name) => script::read_script(&file_name)?,
        None => script::demo_script()
    };
    if let Err(e) = fs::create_dir_all(&output_dir) {
        return Err(pcbetch::Error::Io {path: output_dir.into(), source: e});
    }
    let platform = Platform::new(Pcb::new(config.pcb_width, config.pcb_height),
                                 config.arm_length);
    let mut etcher = Etcher::new(config, platform)?;
    etcher.set_output(output_dir, &prefix);
    script::run_script(&mut etcher, &commands)?;
    info!("Simulated {:.1} s", etcher.timestamp());
    Ok(etcher.frame())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();
    let mut opts = Options::new();
    opts.optopt("c", "config", "etcher configuration file (JSON)", "FILE");
    opts.optopt("s", "script", "commands to run (JSON), default is a demo", "FILE");
    opts.optopt("o", "output", "directory for the frames", "DIR");
    opts.optopt("p", "prefix", "file name prefix of the frames", "PREFIX");
    opts.optflag("h", "help", "print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            usage(&program, opts);
            process::exit(1);
        }
    };
    if matches.opt_present("h") {
        usage(&program, opts);
        return;
    }

    let config = match matches.opt_str("config") {
        Some(file_name) => match config::read_config(&file_name) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => EtcherConfig::default()
    };

    let output_dir = matches.opt_str("output").unwrap_or_else(|| String::from("."));
    let prefix = matches.opt_str("prefix")
        .unwrap_or_else(|| String::from(DEFAULT_FRAME_PREFIX));

    match run(config, matches.opt_str("script"), output_dir, prefix) {
        Ok(frames) => println!("{} frames written", frames),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
