use crate::motor::{Limits, Motor};

/// Stepper motor driving the linear axis. Position is counted in steps and
/// changes at once when moved.
#[derive(Debug, Clone)]
pub struct Stepper
{
    limits: Limits,
    position: f64,
    steps_per_second: f64,
    mm_per_step: f64
}

impl Stepper
{
    pub fn new(limits: Limits, steps_per_second: f64, mm_per_step: f64) -> Stepper
    {
        Stepper {limits, position: 0.0, steps_per_second, mm_per_step}
    }

    pub fn steps_per_second(&self) -> f64
    {
        self.steps_per_second
    }

    pub fn mm_per_step(&self) -> f64
    {
        self.mm_per_step
    }
}

impl Motor for Stepper
{
    type Distance = f64;

    fn limits(&self) -> Limits
    {
        self.limits
    }

    fn position(&self) -> f64
    {
        self.position
    }

    fn position_at(&mut self, _timestamp: f64) -> f64
    {
        self.position
    }

    fn distance(&mut self, timestamp: f64) -> f64
    {
        self.position_at(timestamp) * self.mm_per_step
    }

    /// The elapsed time is charged for the steps actually taken, so a move
    /// cut short by a limit only costs the part that was travelled.
    fn move_by(&mut self, offset: f64, _timestamp: f64) -> f64
    {
        let start = self.position;
        self.position = self.limits.clamp(start + offset);
        (self.steps_per_second * (self.position - start)).abs()
    }
}
