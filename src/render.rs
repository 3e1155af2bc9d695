//! Image output for the etcher simulation.
//!
//! The controller only talks to a [`RenderSurface`]. [`Platform`] is the
//! image backed one: it keeps the etched PCB as a bitmap and composes a
//! full view of the machine for every frame. A video can be made from the
//! frames with e.g.
//! `ffmpeg -r 30 -i pcbetch_%04d.png -pix_fmt yuv420p pcbetch.mp4`

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::coords::{Point, Transform};
use crate::error::{Error, Result};

pub trait RenderSurface
{
    /// Mark the workpiece at (`x`, `y`) mm, measured from the top left
    /// corner of the PCB, with a tool of diameter `tool_size` mm
    fn etch_point(&mut self, x: f64, y: f64, tool_size: f64);

    /// Compose the whole machine with the arm at `angle` degrees and the
    /// PCB carriage moved `position` mm, and store it as `path`
    fn render_frame(&mut self, angle: f64, position: f64, path: &Path) -> Result<()>;
}

const COLOR_PCB: Rgb<u8> = Rgb([0, 255, 0]);
const COLOR_ETCH: Rgb<u8> = Rgb([255, 0, 0]);
const COLOR_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const COLOR_FRAME: Rgb<u8> = Rgb([0, 0, 255]);
const COLOR_ARM: Rgb<u8> = Rgb([128, 128, 128]);
const COLOR_POINT: Rgb<u8> = Rgb([0, 0, 0]);

pub const PIXELS_PER_MM: u32 = 10;
/// Width of the machine frame and of the arm (mm)
const WIDTH_FRAME: u32 = 4;

fn put_clipped(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>)
{
    let (w, h) = image.dimensions();
    if x >= 0 && y >= 0 && x < w as i64 && y < h as i64 {
        image.put_pixel(x as u32, y as u32, color);
    }
}

// Corners are inclusive
fn fill_rectangle(image: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>)
{
    let (w, h) = image.dimensions();
    for y in y0.max(0)..=y1.min(h as i64 - 1) {
        for x in x0.max(0)..=x1.min(w as i64 - 1) {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

// Ellipse inscribed in the inclusive bounding box
fn fill_ellipse(image: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>)
{
    let cx = (x0 + x1) as f64 / 2.0;
    let cy = (y0 + y1) as f64 / 2.0;
    let rx = ((x1 - x0) as f64 / 2.0).max(0.5);
    let ry = ((y1 - y0) as f64 / 2.0).max(0.5);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = (x as f64 - cx) / rx;
            let dy = (y as f64 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                put_clipped(image, x, y, color);
            }
        }
    }
}

// Every pixel within width/2 of the segment from `a` to `b`
fn draw_line(image: &mut RgbImage, a: Point, b: Point, width: f64, color: Rgb<u8>)
{
    let half = width / 2.0;
    let d = b - a;
    let len2 = d.x * d.x + d.y * d.y;
    let x0 = (a.x.min(b.x) - half).floor() as i64;
    let x1 = (a.x.max(b.x) + half).ceil() as i64;
    let y0 = (a.y.min(b.y) - half).floor() as i64;
    let y1 = (a.y.max(b.y) + half).ceil() as i64;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Point::new(x as f64, y as f64);
            let t = if len2 > 0.0 {
                (((p.x - a.x) * d.x + (p.y - a.y) * d.y) / len2).max(0.0).min(1.0)
            } else {
                0.0
            };
            if (p - (a + d * t)).length() <= half {
                put_clipped(image, x, y, color);
            }
        }
    }
}

fn paste(dest: &mut RgbImage, src: &RgbImage, x: i64, y: i64)
{
    for (sx, sy, pixel) in src.enumerate_pixels() {
        put_clipped(dest, x + sx as i64, y + sy as i64, *pixel);
    }
}

/// The workpiece, a bitmap of the PCB being etched
pub struct Pcb
{
    width: u32, // mm
    height: u32, // mm
    image: RgbImage
}

impl Pcb
{
    pub fn new(width: f64, height: f64) -> Pcb
    {
        let width = width as u32;
        let height = height as u32;
        Pcb {
            width,
            height,
            image: RgbImage::from_pixel(width * PIXELS_PER_MM, height * PIXELS_PER_MM, COLOR_PCB)
        }
    }

    pub fn width(&self) -> u32
    {
        self.width
    }

    pub fn height(&self) -> u32
    {
        self.height
    }

    pub fn image(&self) -> &RgbImage
    {
        &self.image
    }

    pub fn is_etched(&self, x: f64, y: f64) -> bool
    {
        let scale = PIXELS_PER_MM as f64;
        let (px, py) = ((x * scale) as i64, (y * scale) as i64);
        let (w, h) = self.image.dimensions();
        px >= 0 && py >= 0 && px < w as i64 && py < h as i64
            && *self.image.get_pixel(px as u32, py as u32) == COLOR_ETCH
    }

    pub fn etch_point(&mut self, x: f64, y: f64, tool_size: f64)
    {
        let scale = PIXELS_PER_MM as f64;
        let r = (tool_size * scale / 2.0) as i64;
        let cx = (x * scale) as i64;
        let cy = (y * scale) as i64;
        fill_ellipse(&mut self.image, cx - r, cy - r, cx + r, cy + r, COLOR_ETCH);
    }
}

/// The machine: frame, sliding PCB carriage and the servo arm
pub struct Platform
{
    pcb: Pcb,
    arm: u32 // mm
}

impl Platform
{
    pub fn new(pcb: Pcb, arm_length: f64) -> Platform
    {
        Platform {pcb, arm: arm_length as u32}
    }

    pub fn pcb(&self) -> &Pcb
    {
        &self.pcb
    }

    /// Size of a composed frame in mm
    pub fn dimensions(&self) -> (u32, u32)
    {
        (self.pcb.width + self.arm + WIDTH_FRAME,
         self.pcb.height + 2 * WIDTH_FRAME)
    }

    /// Compose the scene in memory
    pub fn compose(&self, angle: f64, position: f64) -> RgbImage
    {
        let (width, height) = self.dimensions();
        let s = PIXELS_PER_MM as i64;
        let (w, h, fw) = (width as i64, height as i64, WIDTH_FRAME as i64);
        let mut image = RgbImage::from_pixel(width * PIXELS_PER_MM, height * PIXELS_PER_MM,
                                             COLOR_BACKGROUND);
        fill_rectangle(&mut image, 0, 0, w * s, fw * s, COLOR_FRAME);
        fill_rectangle(&mut image, 0, (h - fw) * s, w * s, h * s, COLOR_FRAME);
        fill_rectangle(&mut image, (w - fw) * s, 0, w * s, h * s, COLOR_FRAME);

        let pcb_x = (width - self.arm - self.pcb.width) as f64 + position;
        paste(&mut image, &self.pcb.image,
              (pcb_x * PIXELS_PER_MM as f64) as i64, fw * s);

        let to_pixels = Transform::scale(PIXELS_PER_MM as f64);
        let pivot = Point::new(width as f64 - WIDTH_FRAME as f64 / 2.0, height as f64 / 2.0);
        let tip = Transform::translate(pivot.x, pivot.y)
            * Transform::rotate(angle.to_radians())
            * Point::new(-(self.arm as f64), 0.0);
        let pivot = to_pixels * pivot;
        draw_line(&mut image, pivot, to_pixels * tip,
                  (WIDTH_FRAME * PIXELS_PER_MM) as f64, COLOR_ARM);
        put_clipped(&mut image, pivot.x as i64, pivot.y as i64, COLOR_POINT);
        image
    }
}

impl RenderSurface for Platform
{
    fn etch_point(&mut self, x: f64, y: f64, tool_size: f64)
    {
        self.pcb.etch_point(x, y, tool_size);
    }

    fn render_frame(&mut self, angle: f64, position: f64, path: &Path) -> Result<()>
    {
        let image = self.compose(angle, position);
        image.save(path).map_err(|e| Error::Render {path: path.to_path_buf(), source: e})
    }
}
