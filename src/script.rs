use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::etcher::Etcher;
use crate::render::RenderSurface;

/// One step of an etching program. In JSON each command is an object
/// tagged by `op`, e.g. `{"op": "moveTo", "x": 10, "y": 10}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command
{
    Home,
    MoveTo { x: f64, y: f64 },
    Move { dx: f64, dy: f64 },
    ToolDown,
    ToolUp,
    LastFrame
}

/// Home, then etch a staircase of five steps starting at (10, 10)
pub fn demo_script() -> Vec<Command>
{
    let mut script = vec![
        Command::Home,
        Command::MoveTo {x: 10.0, y: 10.0},
        Command::ToolDown
    ];
    for _ in 0..5 {
        script.push(Command::Move {dx: 5.0, dy: 0.0});
        script.push(Command::Move {dx: 0.0, dy: 5.0});
    }
    script.push(Command::LastFrame);
    script
}

pub fn parse_script<R: Read>(reader: R) -> std::result::Result<Vec<Command>, serde_json::Error>
{
    serde_json::from_reader(reader)
}

pub fn read_script<P: AsRef<Path>>(file_name: P) -> Result<Vec<Command>>
{
    let path = file_name.as_ref();
    let file = File::open(path).map_err(|e| Error::Io {path: path.to_path_buf(), source: e})?;
    parse_script(BufReader::new(file)).map_err(|e| Error::Parse {path: path.to_path_buf(), source: e})
}

pub fn run_command<S: RenderSurface>(etcher: &mut Etcher<S>, command: &Command) -> Result<()>
{
    match *command {
        Command::Home => etcher.home(),
        Command::MoveTo {x, y} => etcher.move_to(x, y),
        Command::Move {dx, dy} => etcher.move_rel(dx, dy),
        Command::ToolDown => {
            etcher.set_tool_down(true);
            Ok(())
        },
        Command::ToolUp => {
            etcher.set_tool_down(false);
            Ok(())
        },
        Command::LastFrame => etcher.last_frame()
    }
}

pub fn run_script<S: RenderSurface>(etcher: &mut Etcher<S>, script: &[Command]) -> Result<()>
{
    for command in script {
        info!("{:?} at t = {:.3} s", command, etcher.timestamp());
        run_command(etcher, command)?;
    }
    Ok(())
}
