use std::path::Path;

use super::recording_surface::RecordingSurface;
use crate::config::EtcherConfig;
use crate::error::Error;
use crate::etcher::{close_enough, Etcher};
use crate::motor::Motor;

fn etcher() -> Etcher<RecordingSurface>
{
    Etcher::new(EtcherConfig::default(), RecordingSurface::default()).unwrap()
}

#[test]
fn test_close_enough()
{
    assert!(close_enough(1.0, 1.05, 0.1));
    assert!(close_enough(-3.0, -3.1, 0.1 + 1e-9));
    assert!(!close_enough(0.0, 0.2, 0.1));
}

#[test]
fn test_rejects_bad_config()
{
    let mut config = EtcherConfig::default();
    config.servo_degrees_per_second = 0.0;
    assert!(matches!(Etcher::new(config, RecordingSurface::default()),
                     Err(Error::InvalidConfig(_))));
}

#[test]
fn test_initial_position()
{
    let mut e = etcher();
    let p = e.tool_position();
    assert_eq!(p.x, 50.0);
    assert_eq!(p.y, 25.0);
    assert_eq!(e.timestamp(), 0.0);
    assert!(!e.is_tool_down());
}

#[test]
fn test_move_to_y_center()
{
    let mut e = etcher();
    e.move_to_y(25.0).unwrap();
    assert_eq!(e.timestamp(), 0.0);
    assert!(e.surface().frames.is_empty());
}

#[test]
fn test_move_to_y_settles()
{
    let mut e = etcher();
    e.move_to_y(0.0).unwrap();
    let poll = e.config().frame_rate / 10.0;
    assert!(e.timestamp() > 0.0);
    assert!(e.timestamp() < 10000.0 * poll);
    assert_abs_diff_eq!(e.tool_position().y, 0.0, epsilon = 0.2);

    let frames = &e.surface().frames;
    assert!(frames.len() > 40 && frames.len() < 70, "{} frames", frames.len());
    for pair in frames.windows(2) {
        assert!(pair[1].0 <= pair[0].0);
        assert_eq!(pair[1].1, 0.0);
    }
    assert_eq!(e.frame() as usize, frames.len());
}

#[test]
fn test_move_to_y_unreachable()
{
    let mut e = etcher();
    match e.move_to_y(200.0) {
        Err(Error::Unreachable {y}) => assert_eq!(y, 200.0),
        r => panic!("unexpected {:?}", r)
    }
    // Within asin range but beyond the servo limit
    assert!(matches!(e.move_to_y(100.0), Err(Error::Unreachable {..})));
    assert!(e.servo().at_right_limit());
}

#[test]
fn test_move_to_y_gives_up()
{
    let mut config = EtcherConfig::default();
    config.max_settle_iterations = 5;
    let mut e = Etcher::new(config, RecordingSurface::default()).unwrap();
    match e.move_to_y(0.0) {
        Err(Error::NotConverged {iterations, ..}) => assert_eq!(iterations, 5),
        r => panic!("unexpected {:?}", r)
    }
}

#[test]
fn test_move_to_x()
{
    let mut e = etcher();
    e.move_to_x(45.0).unwrap();
    assert_eq!(e.stepper().position(), -50.0);
    assert_eq!(e.timestamp(), 50.0 * 200.0);
    assert_abs_diff_eq!(e.tool_position().x, 45.0, epsilon = 1e-9);

    let frames = &e.surface().frames;
    assert_eq!(frames.len(), 50);
    assert_eq!(frames[0].2, Path::new(".").join("pcbetch_0000.png"));
    assert_eq!(frames[49].2, Path::new(".").join("pcbetch_0049.png"));
    assert_abs_diff_eq!(frames[49].1, 5.0, epsilon = 1e-9);
    assert!(e.surface().etched.is_empty());
}

#[test]
fn test_move_to_x_at_limit()
{
    let mut e = etcher();
    e.move_to_x(60.0).unwrap();
    assert!(e.stepper().at_right_limit());
    assert_eq!(e.timestamp(), 0.0);
    assert!(e.surface().frames.is_empty());
}

#[test]
fn test_steps_stop_at_limit()
{
    let mut e = etcher();
    e.set_tool_down(true);
    e.move_rel(-100.0, 0.0).unwrap();
    assert!(e.stepper().at_left_limit());
    assert_eq!(e.surface().etched.len(), 500);
    assert_eq!(e.surface().frames.len(), 500);
    assert_eq!(e.timestamp(), 500.0 * 200.0);
    // Further steps left would not move the carriage
    e.move_rel(-1.0, 0.0).unwrap();
    assert_eq!(e.surface().etched.len(), 500);
}

#[test]
fn test_far_x_target()
{
    let mut e = etcher();
    e.move_to_x(-1e12).unwrap();
    assert!(e.stepper().at_left_limit());
    assert_eq!(e.surface().frames.len(), 500);
    assert_abs_diff_eq!(e.tool_position().x, 0.0, epsilon = 1e-9);
}

#[test]
fn test_home()
{
    let mut e = etcher();
    e.home().unwrap();
    assert!(e.stepper().at_left_limit());
    assert!(e.servo().at_left_limit());
    assert!(!e.servo().is_moving());
}

#[test]
fn test_etch_while_stepping()
{
    let mut e = etcher();
    e.set_tool_down(true);
    e.move_rel(-1.0, 0.0).unwrap();
    let etched = &e.surface().etched;
    assert_eq!(etched.len(), 10);
    for (i, &(x, y, size)) in etched.iter().enumerate() {
        assert_abs_diff_eq!(x, 49.9 - 0.1 * i as f64, epsilon = 1e-9);
        assert_eq!(y, 25.0);
        assert_eq!(size, 0.7);
    }
}

#[test]
fn test_move_rel_line()
{
    let mut e = etcher();
    e.move_to(40.0, 25.0).unwrap();
    e.set_tool_down(true);
    e.move_rel(2.0, 5.0).unwrap();
    let p = e.tool_position();
    assert_abs_diff_eq!(p.x, 42.0, epsilon = 0.15);
    assert_abs_diff_eq!(p.y, 30.0, epsilon = 0.2);

    let etched = &e.surface().etched;
    assert!(!etched.is_empty());
    for &(x, y, _) in etched {
        // Bitmap y runs the other way
        assert!(y >= 19.7 && y <= 25.3, "y = {}", y);
        assert!(x >= 39.7 && x <= 42.3, "x = {}", x);
    }
}

#[test]
fn test_last_frame()
{
    let mut e = etcher();
    e.set_output("out", "run");
    assert_eq!(e.output_dir(), Path::new("out"));
    e.last_frame().unwrap();
    assert_relative_eq!(e.timestamp(), 2.0 / 30.0, max_relative = 0.0001);
    assert_eq!(e.frame(), 1);
    // No frame interval has passed since
    e.render_frame().unwrap();
    assert_eq!(e.frame(), 1);

    let frames = &e.surface().frames;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].0, 0.0);
    assert_eq!(frames[0].2, Path::new("out").join("run_0000.png"));
}

#[test]
fn test_render_failure()
{
    let mut surface = RecordingSurface::default();
    surface.fail = true;
    let mut e = Etcher::new(EtcherConfig::default(), surface).unwrap();
    let err = e.last_frame().unwrap_err();
    assert!(err.is_render_failure());
    assert_eq!(e.frame(), 0);

    let mut config = EtcherConfig::default();
    config.abort_on_render_failure = false;
    let mut surface = RecordingSurface::default();
    surface.fail = true;
    let mut e = Etcher::new(config, surface).unwrap();
    e.last_frame().unwrap();
    assert_eq!(e.frame(), 1);
    assert!(e.into_surface().frames.is_empty());
}
