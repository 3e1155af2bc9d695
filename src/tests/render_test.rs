use image::Rgb;

use crate::render::{Pcb, Platform, RenderSurface, PIXELS_PER_MM};

#[test]
fn test_etch_point()
{
    let mut pcb = Pcb::new(50.0, 40.0);
    assert_eq!((pcb.width(), pcb.height()), (50, 40));
    assert_eq!(pcb.image().dimensions(), (500, 400));
    assert!(!pcb.is_etched(20.0, 20.0));
    pcb.etch_point(20.0, 20.0, 0.7);
    assert!(pcb.is_etched(20.0, 20.0));
    assert!(pcb.is_etched(20.15, 19.85));
    assert!(!pcb.is_etched(20.5, 20.0));
    // Off the board is simply clipped
    pcb.etch_point(-1.0, 60.0, 5.0);
    assert!(!pcb.is_etched(-1.0, 60.0));
}

#[test]
fn test_compose()
{
    let platform = Platform::new(Pcb::new(50.0, 50.0), 75.0);
    assert_eq!(platform.dimensions(), (129, 58));
    let image = platform.compose(0.0, 0.0);
    assert_eq!(image.dimensions(), (129 * PIXELS_PER_MM, 58 * PIXELS_PER_MM));
    // Frame along the top, bottom and right
    assert_eq!(*image.get_pixel(5, 5), Rgb([0, 0, 255]));
    assert_eq!(*image.get_pixel(600, 575), Rgb([0, 0, 255]));
    assert_eq!(*image.get_pixel(1285, 500), Rgb([0, 0, 255]));
    // PCB at 4 mm from the left edge, below the frame
    assert_eq!(*image.get_pixel(45, 45), Rgb([0, 255, 0]));
    assert_eq!(*image.get_pixel(35, 45), Rgb([255, 255, 255]));
    // Level arm from the pivot at (127, 29) mm, pivot marked
    assert_eq!(*image.get_pixel(1000, 290), Rgb([128, 128, 128]));
    assert_eq!(*image.get_pixel(1270, 290), Rgb([0, 0, 0]));
    assert_eq!(*image.get_pixel(1000, 200), Rgb([255, 255, 255]));
}

#[test]
fn test_compose_moved()
{
    let mut platform = Platform::new(Pcb::new(50.0, 50.0), 75.0);
    platform.etch_point(10.0, 10.0, 1.0);
    assert!(platform.pcb().is_etched(10.0, 10.0));
    // Carriage moved 20 mm right, arm raised
    let image = platform.compose(19.0, 20.0);
    assert_eq!(*image.get_pixel(45, 45), Rgb([255, 255, 255]));
    assert_eq!(*image.get_pixel(245, 45), Rgb([0, 255, 0]));
    assert_eq!(*image.get_pixel(340, 140), Rgb([255, 0, 0]));
    // Arm tip above the pivot height
    let tip_y = 29.0 - 75.0 * 19f64.to_radians().sin();
    let tip_x = 127.0 - 75.0 * 19f64.to_radians().cos();
    let x = ((tip_x + 2.0) * PIXELS_PER_MM as f64) as u32;
    let y = (tip_y * PIXELS_PER_MM as f64) as u32;
    assert_eq!(*image.get_pixel(x, y), Rgb([128, 128, 128]));
}

#[test]
fn test_render_frame_file()
{
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame_0000.png");
    let mut platform = Platform::new(Pcb::new(20.0, 20.0), 30.0);
    platform.render_frame(-5.0, 3.0, &path).unwrap();
    let image = image::open(&path).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (540, 280));

    let bad = dir.path().join("missing").join("frame.png");
    let err = platform.render_frame(0.0, 0.0, &bad).unwrap_err();
    assert!(err.is_render_failure());
}
