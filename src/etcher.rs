//! Controller for the whole etcher.
//!
//! The PCB sits on a carriage driven by the stepper (the X axis). Above it
//! an arm swung by the servo carries the tool, which gives the Y axis but
//! also pulls the tool along X as the arm turns. Moves are therefore always
//! made Y first, then X is corrected for wherever the arm ended up.
//!
//! Time is simulated. The controller owns the clock and advances it by the
//! time each stepper move takes, or in small increments while waiting for
//! the servo. Whenever the clock has moved a full frame interval a frame is
//! handed to the [`RenderSurface`].

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::EtcherConfig;
use crate::coords::Point;
use crate::error::{Error, Result};
use crate::motor::Motor;
use crate::render::RenderSurface;
use crate::servo::Servo;
use crate::stepper::Stepper;

pub const DEFAULT_FRAME_PREFIX: &str = "pcbetch";

pub fn close_enough(a: f64, b: f64, accuracy: f64) -> bool
{
    (a - b).abs() <= accuracy
}

pub struct Etcher<S: RenderSurface>
{
    config: EtcherConfig,
    stepper: Stepper,
    servo: Servo,
    surface: S,
    tool_down: bool,
    timestamp: f64,
    last_frame: f64,
    frame: u32,
    output_dir: PathBuf,
    frame_prefix: String
}

impl<S: RenderSurface> Etcher<S>
{
    pub fn new(config: EtcherConfig, surface: S) -> Result<Etcher<S>>
    {
        config.validate()?;
        let servo = Servo::new(config.servo_limits(), config.servo_degrees_per_second,
                               config.arm_length);
        let stepper = Stepper::new(config.stepper_limits(), config.stepper_steps_per_second,
                                   config.stepper_mm_per_step);
        Ok(Etcher {
            config,
            stepper,
            servo,
            surface,
            tool_down: false,
            timestamp: 0.0,
            last_frame: 0.0,
            frame: 0,
            output_dir: PathBuf::from("."),
            frame_prefix: String::from(DEFAULT_FRAME_PREFIX)
        })
    }

    /// Write frames as `<dir>/<prefix>_NNNN.png`
    pub fn set_output<P: Into<PathBuf>>(&mut self, dir: P, prefix: &str)
    {
        self.output_dir = dir.into();
        self.frame_prefix = String::from(prefix);
    }

    pub fn frame_path(&self, frame: u32) -> PathBuf
    {
        self.output_dir.join(format!("{}_{:04}.png", self.frame_prefix, frame))
    }

    pub fn output_dir(&self) -> &Path
    {
        &self.output_dir
    }

    pub fn config(&self) -> &EtcherConfig
    {
        &self.config
    }

    pub fn timestamp(&self) -> f64
    {
        self.timestamp
    }

    /// Number of frames emitted so far
    pub fn frame(&self) -> u32
    {
        self.frame
    }

    pub fn stepper(&self) -> &Stepper
    {
        &self.stepper
    }

    pub fn servo(&self) -> &Servo
    {
        &self.servo
    }

    pub fn surface(&self) -> &S
    {
        &self.surface
    }

    pub fn into_surface(self) -> S
    {
        self.surface
    }

    pub fn is_tool_down(&self) -> bool
    {
        self.tool_down
    }

    pub fn set_tool_down(&mut self, down: bool)
    {
        self.tool_down = down;
    }

    /// Position of the tool tip in mm. X runs along the carriage, Y from
    /// the edge of the PCB the arm reaches at its left limit.
    pub fn tool_position(&mut self) -> Point
    {
        let arm = self.servo.distance(self.timestamp);
        Point::new(self.config.pcb_width + self.stepper.distance(self.timestamp) - arm.x,
                   self.config.pcb_height / 2.0 + arm.y)
    }

    fn advance(&mut self, seconds: f64)
    {
        debug_assert!(seconds >= 0.0);
        self.timestamp += seconds;
    }

    /// Etch at the tool if it is down, then emit a frame if a frame interval
    /// has passed since the last one.
    pub fn render_frame(&mut self) -> Result<()>
    {
        if self.tool_down {
            let tool = self.tool_position();
            // The bitmap has its origin in the top left corner
            self.surface.etch_point(tool.x, self.config.pcb_height - tool.y,
                                    self.config.tool_size);
        }
        if self.timestamp - self.last_frame < self.config.frame_rate {
            return Ok(());
        }
        let angle = self.servo.position_at(self.timestamp);
        let position = -self.stepper.distance(self.timestamp);
        let path = self.frame_path(self.frame);
        match self.surface.render_frame(angle, position, &path) {
            Ok(()) => info!("Frame {} at t = {:.3} s: angle = {:.2}, position = {:.1}",
                            self.frame, self.timestamp, angle, position),
            Err(e) if !self.config.abort_on_render_failure => warn!("Frame {} dropped: {}", self.frame, e),
            Err(e) => return Err(e)
        }
        self.frame += 1;
        self.last_frame = self.timestamp;
        Ok(())
    }

    /// Force out a final frame so the last movements are captured
    pub fn last_frame(&mut self) -> Result<()>
    {
        self.advance(2.0 * self.config.frame_rate);
        self.render_frame()
    }

    /// Move to the edge of the PCB reached by the arm at its left limit,
    /// then run the carriage as far as it goes.
    pub fn home(&mut self) -> Result<()>
    {
        self.move_to_y(0.0)?;
        self.move_to_x(0.0)
    }

    /// Swing the arm so the tool is at `y` mm and wait for the servo to get
    /// there. The servo moves in the background, so the clock is stepped
    /// in tenths of a frame until it has arrived.
    pub fn move_to_y(&mut self, y: f64) -> Result<()>
    {
        debug!("Moving to Y = {}", y);
        let ratio = (y - self.config.pcb_height / 2.0) / self.config.arm_length;
        if !(-1.0..=1.0).contains(&ratio) {
            return Err(Error::Unreachable {y});
        }
        let angle = ratio.asin().to_degrees();
        let current = self.servo.position_at(self.timestamp);
        self.servo.move_by(angle - current, self.timestamp);

        let poll = self.config.frame_rate / 10.0;
        let mut iterations = 0;
        while !close_enough(self.servo.position_at(self.timestamp), angle, self.config.accuracy) {
            if !self.servo.is_moving() {
                // Stopped at a limit short of the target
                return Err(Error::Unreachable {y});
            }
            if iterations >= self.config.max_settle_iterations {
                return Err(Error::NotConverged {target: angle, iterations});
            }
            self.advance(poll);
            iterations += 1;
            self.render_frame()?;
        }
        Ok(())
    }

    /// Step the carriage until the tool is at `x` mm, taking the current
    /// arm angle into account. Stops short by less than a step.
    pub fn move_to_x(&mut self, x: f64) -> Result<()>
    {
        let current = self.tool_position().x;
        let delta = ((x - current) / self.config.stepper_mm_per_step) as i64;
        debug!("Moving to X = {} ({} steps)", x, delta);
        let step = if delta < 0 { -1.0 } else { 1.0 };
        self.take_steps(step, delta.unsigned_abs())
    }

    /// Take up to `count` single steps, stopping at the limit switch
    fn take_steps(&mut self, step: f64, count: u64) -> Result<()>
    {
        let limits = self.stepper.limits();
        let position = self.stepper.position();
        let room = if step < 0.0 {
            position - limits.left
        } else {
            limits.right - position
        };
        // A last partial step reaches a limit that is not a whole step away
        let count = count.min(room.max(0.0).ceil() as u64);
        for _ in 0..count {
            let elapsed = self.stepper.move_by(step, self.timestamp);
            self.advance(elapsed);
            self.render_frame()?;
        }
        Ok(())
    }

    /// Move to (`x`, `y`) mm
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<()>
    {
        self.move_to_y(y)?;
        self.move_to_x(x)
    }

    /// Move `dx`, `dy` mm in a straight line from the current position.
    ///
    /// Any Y component swings the arm, which curves the path, so the line
    /// is split into waypoints half a tool width apart. That keeps the
    /// etched points overlapping.
    pub fn move_rel(&mut self, dx: f64, dy: f64) -> Result<()>
    {
        let mm_per_step = self.config.stepper_mm_per_step;
        if dy == 0.0 {
            let step = if dx > 0.0 { 1.0 } else { -1.0 };
            return self.take_steps(step, (dx / mm_per_step).abs() as u64);
        }
        let start = self.tool_position();
        let steps = (dx.hypot(dy) / (self.config.tool_size / 2.0)).ceil() as u32;
        let delta = Point::new(dx, dy) * (1.0 / steps as f64);
        debug!("Line from {} by ({}, {}) in {} waypoints", start, dx, dy, steps);
        for step in 0..steps {
            let p = start + delta * step as f64;
            self.move_to_y(p.y)?;
            self.move_to_x(p.x)?;
        }
        self.move_to_y(start.y + dy)?;
        self.move_to_x(start.x + dx)
    }
}
