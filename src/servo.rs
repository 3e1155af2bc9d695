use crate::coords::Point;
use crate::motor::{Limits, Motor};

/// Servo swinging the etching arm. Position is the arm angle in degrees,
/// 0 being the arm perpendicular to the linear axis.
///
/// A move only sets a target; the arm then turns towards it at a constant
/// rate and the position has to be sampled with [`Motor::position_at`].
#[derive(Debug, Clone)]
pub struct Servo
{
    limits: Limits,
    position: f64,
    degrees_per_second: f64,
    arm_length: f64,
    moving: bool,
    move_start: f64,
    target: f64
}

impl Servo
{
    /// # Panics
    ///
    /// If `degrees_per_second` is not a positive number, as the servo would
    /// never reach a target.
    pub fn new(limits: Limits, degrees_per_second: f64, arm_length: f64) -> Servo
    {
        assert!(degrees_per_second > 0.0,
                "servo rate must be positive, got {}", degrees_per_second);
        Servo {
            limits,
            position: 0.0,
            degrees_per_second,
            arm_length,
            moving: false,
            move_start: 0.0,
            target: 0.0
        }
    }

    pub fn is_moving(&self) -> bool
    {
        self.moving
    }

    pub fn target(&self) -> f64
    {
        self.target
    }

    pub fn arm_length(&self) -> f64
    {
        self.arm_length
    }

    pub fn degrees_per_second(&self) -> f64
    {
        self.degrees_per_second
    }
}

impl Motor for Servo
{
    /// Offset of the arm tip from where it is at 0 degrees, (-dx, dy)
    type Distance = Point;

    fn limits(&self) -> Limits
    {
        self.limits
    }

    fn position(&self) -> f64
    {
        self.position
    }

    fn position_at(&mut self, timestamp: f64) -> f64
    {
        if !self.moving {
            return self.position;
        }
        let delta = (timestamp - self.move_start).max(0.0) * self.degrees_per_second;
        let position = if self.target < self.position {
            self.position - delta
        } else {
            self.position + delta
        };
        // Reached or passed the target when the side of the target changes
        if (self.position - self.target) * (position - self.target) <= 0.0 {
            self.position = self.target;
            self.moving = false;
            return self.position;
        }
        position
    }

    fn distance(&mut self, timestamp: f64) -> Point
    {
        let angle = self.position_at(timestamp);
        let (sin, cos) = angle.abs().to_radians().sin_cos();
        let dx = self.arm_length - self.arm_length * cos;
        let dy = if angle < 0.0 {
            -self.arm_length * sin
        } else {
            self.arm_length * sin
        };
        Point::new(-dx, dy)
    }

    fn move_by(&mut self, offset: f64, timestamp: f64) -> f64
    {
        self.position = self.position_at(timestamp);
        self.target = self.limits.clamp(self.position + offset);
        self.moving = true;
        self.move_start = timestamp;
        log::debug!("Servo: position = {}, target = {}", self.position, self.target);
        0.0
    }
}
