//! Common model for the motors driving the etcher axes.
//!
//! Motors are moved by a relative offset and never travel past their limit
//! switches. Negative offsets move left, positive offsets move right. Moves
//! that would cross a limit are silently cut short; callers that care can
//! check [`Motor::at_left_limit`] and [`Motor::at_right_limit`] afterwards.

/// Inclusive travel range of a motor, in the motor's own units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits
{
    pub left: f64,
    pub right: f64
}

impl Limits
{
    pub fn new(left: f64, right: f64) -> Limits
    {
        assert!(left <= right, "left limit {} beyond right limit {}", left, right);
        Limits {left, right}
    }

    pub fn clamp(&self, position: f64) -> f64
    {
        if position < self.left {
            self.left
        } else if position > self.right {
            self.right
        } else {
            position
        }
    }

    pub fn contains(&self, position: f64) -> bool
    {
        self.left <= position && position <= self.right
    }
}

pub trait Motor
{
    /// Physical displacement reported by [`Motor::distance`]. Linear axes
    /// report a scalar, rotary axes a 2D offset.
    type Distance;

    fn limits(&self) -> Limits;

    /// Last committed position, ignoring any motion in progress
    fn position(&self) -> f64;

    fn at_left_limit(&self) -> bool
    {
        self.position() <= self.limits().left
    }

    fn at_right_limit(&self) -> bool
    {
        self.position() >= self.limits().right
    }

    /// Position at `timestamp` (seconds of simulated time). Motors that move
    /// in the background settle here once they reach their target.
    fn position_at(&mut self, timestamp: f64) -> f64;

    /// Position expressed as a physical distance in mm
    fn distance(&mut self, timestamp: f64) -> Self::Distance;

    /// Move `offset` units from the position at `timestamp`.
    ///
    /// Returns the time in seconds the move occupies, or 0 if it runs in the
    /// background. In the latter case poll [`Motor::position_at`] to follow
    /// the motion.
    fn move_by(&mut self, offset: f64, timestamp: f64) -> f64;
}

#[test]
fn test_limits()
{
    let limits = Limits::new(-500.0, 0.0);
    assert_eq!(limits.clamp(-600.0), -500.0);
    assert_eq!(limits.clamp(20.0), 0.0);
    assert_eq!(limits.clamp(-12.5), -12.5);
    assert!(limits.contains(-500.0));
    assert!(limits.contains(0.0));
    assert!(!limits.contains(0.1));
}
