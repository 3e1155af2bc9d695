use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::motor::Limits;

/// Fixed parameters of a simulation run. Read from JSON with camelCase
/// keys; any key left out keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EtcherConfig
{
    pub pcb_width: f64, // mm
    pub pcb_height: f64, // mm
    pub arm_length: f64, // mm, pivot to tool
    pub tool_size: f64, // mm, diameter of the tool head
    pub stepper_steps_per_second: f64,
    pub stepper_mm_per_step: f64,
    pub servo_degrees_per_second: f64,
    /// Minimum simulated time between two emitted frames (s)
    pub frame_rate: f64,
    /// Largest angle error (degrees) at which the servo counts as arrived
    pub accuracy: f64,
    /// Polls allowed while waiting for the servo before giving up
    pub max_settle_iterations: u32,
    /// Stop the run on the first frame that cannot be written
    pub abort_on_render_failure: bool
}

impl Default for EtcherConfig
{
    fn default() -> EtcherConfig
    {
        const PCB_WIDTH: f64 = 50.0;
        EtcherConfig {
            pcb_width: PCB_WIDTH,
            pcb_height: 50.0,
            arm_length: 1.5 * PCB_WIDTH,
            tool_size: 0.7,
            stepper_steps_per_second: 200.0,
            stepper_mm_per_step: 0.1,
            servo_degrees_per_second: 10.0,
            frame_rate: 1.0 / 30.0,
            accuracy: 0.1,
            max_settle_iterations: 100_000,
            abort_on_render_failure: true
        }
    }
}

fn positive(name: &str, v: f64) -> Result<()>
{
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be a positive number, got {}", name, v)))
    }
}

impl EtcherConfig
{
    /// Check the preconditions the controller relies on. A non-positive
    /// servo rate or frame interval would make the settle loop spin forever.
    pub fn validate(&self) -> Result<()>
    {
        positive("pcbWidth", self.pcb_width)?;
        positive("pcbHeight", self.pcb_height)?;
        positive("armLength", self.arm_length)?;
        positive("toolSize", self.tool_size)?;
        positive("stepperMmPerStep", self.stepper_mm_per_step)?;
        positive("servoDegreesPerSecond", self.servo_degrees_per_second)?;
        positive("frameRate", self.frame_rate)?;
        positive("accuracy", self.accuracy)?;
        if !(self.stepper_steps_per_second.is_finite() && self.stepper_steps_per_second >= 0.0) {
            return Err(Error::InvalidConfig(
                format!("stepperStepsPerSecond must not be negative, got {}",
                        self.stepper_steps_per_second)));
        }
        if self.arm_length < self.pcb_height / 2.0 {
            return Err(Error::InvalidConfig(
                format!("armLength {} mm can't reach half the PCB height ({} mm)",
                        self.arm_length, self.pcb_height / 2.0)));
        }
        if self.max_settle_iterations == 0 {
            return Err(Error::InvalidConfig(String::from("maxSettleIterations must be at least 1")));
        }
        Ok(())
    }

    /// Servo travel, just enough to cover the PCB height (degrees)
    pub fn servo_limits(&self) -> Limits
    {
        let angle = (self.pcb_height / 2.0 / self.arm_length).asin().to_degrees();
        Limits::new(-angle, angle)
    }

    /// Stepper travel, the PCB width (steps). Home is at the right limit.
    pub fn stepper_limits(&self) -> Limits
    {
        Limits::new(-(self.pcb_width / self.stepper_mm_per_step), 0.0)
    }
}

pub fn parse_config<R: Read>(reader: R) -> std::result::Result<EtcherConfig, serde_json::Error>
{
    serde_json::from_reader(reader)
}

pub fn read_config<P: AsRef<Path>>(file_name: P) -> Result<EtcherConfig>
{
    let path = file_name.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(Error::Io {path: path.to_path_buf(), source: e})
    };
    let config = match parse_config(BufReader::new(file)) {
        Ok(config) => config,
        Err(e) => return Err(Error::Parse {path: path.to_path_buf(), source: e})
    };
    config.validate()?;
    Ok(config)
}
