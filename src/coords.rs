use std::fmt;

/// A position or offset in the plane, in millimeters unless stated otherwise
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point
{
    pub x: f64,
    pub y: f64
}

impl Point
{
    pub fn new(x: f64, y: f64) -> Point
    {
        Point {x, y}
    }

    pub fn length(&self) -> f64
    {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl fmt::Display for Point
{
    fn fmt(self: &Self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::ops::Add<Point> for Point {
    type Output = Point;
    fn add(self, v: Point) -> Point {
        Point { x: self.x + v.x,
                y: self.y + v.y}
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Point;
    fn sub(self, v: Point) -> Point {
        Point { x: self.x - v.x,
                y: self.y - v.y}
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;
    fn mul(self, s: f64) -> Point {
        Point { x: self.x * s,
                y: self.y * s}
    }
}

/// Affine transform stored as [a, b, c, d, e, f], mapping
/// (x, y) to (a*x + c*y + e, b*x + d*y + f)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub matrix : [f64;6]
}

fn matrix_mul(a: &[f64; 6], b: &[f64; 6]) -> [f64; 6]
{
    [a[0] * b[0] + a[2]*b[1],
     a[1] * b[0] + a[3]*b[1],
     a[0] * b[2] + a[2]*b[3],
     a[1] * b[2] + a[3]*b[3],
     a[0] * b[4] + a[2]*b[5] + a[4],
     a[1] * b[4] + a[3]*b[5] + a[5]]
}

impl Transform {
    pub fn translate(x: f64, y: f64) -> Transform {
        Transform{matrix:[1.0, 0.0, 0.0, 1.0, x, y]}
    }

    pub fn scale(s: f64) -> Transform {
        Transform{matrix:[s, 0.0, 0.0, s, 0.0, 0.0]}
    }

    /// Rotation by `a` radians. With the y axis pointing down (image
    /// coordinates) a positive angle turns clockwise on screen.
    pub fn rotate(a: f64) -> Transform {
        let (s,c) = a.sin_cos();
        Transform{matrix:[c, s, -s, c, 0.0, 0.0]}
    }
}

impl std::ops::Mul for Transform {
    type Output = Transform;
    fn mul(self, t: Self) -> Self {
        Transform  {matrix: matrix_mul(&self.matrix, &t.matrix)}
    }
}

impl std::ops::Mul<Point> for Transform {
    type Output = Point;
    fn mul(self, v: Point) -> Point {
        Point { x: self.matrix[0] * v.x + self.matrix[2] * v.y + self.matrix[4],
                y: self.matrix[1] * v.x + self.matrix[3] * v.y + self.matrix[5]}
    }
}

#[cfg(test)]
fn assert_matrix_eq(a:&[f64;6], b:&[f64;6])
{
    for (a,b) in a.iter().zip(b) {
        if (a-b).abs() > 1e-5 {
            panic!("{} != {}", a,b);
        }
    }
}

#[cfg(test)]
fn assert_transform_eq(a:&Transform, b:&Transform)
{
    assert_matrix_eq(&a.matrix, &b.matrix);
}

#[test]
fn test_transform()
{
    let t = Transform::translate(3.0, 4.0) * Transform::scale(2.0);
    assert_eq!(t * Point::new(1.0, 1.0), Point::new(5.0, 6.0));
    let t = Transform::scale(2.0) * Transform::translate(3.0, 4.0);
    assert_eq!(t * Point::new(1.0, 1.0), Point::new(8.0, 10.0));
    let back = Transform::rotate(0.7) * Transform::rotate(-0.7);
    assert_matrix_eq(&back.matrix, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_transform_eq(&(Transform::translate(1.0, 2.0) * Transform::translate(3.0, -4.0)),
                        &Transform::translate(4.0, -2.0));
    let a = Transform::translate(1.45, -12.7) * Transform::rotate(1.3) * Transform::scale(0.5);
    let b = Transform::scale(4.3) * Transform::translate(14.5, 2.7);
    let p = Point::new(-2.0, 9.5);
    let q = (a*b) * p;
    let r = a * (b * p);
    assert!((q - r).length() < 1e-9);
}

#[test]
fn test_arm_tip()
{
    // Arm of length 10 pointing left from a pivot at (20, 5)
    let pivot = Transform::translate(20.0, 5.0);
    let tip = pivot * Transform::rotate(0.0) * Point::new(-10.0, 0.0);
    assert_eq!(tip, Point::new(10.0, 5.0));
    let tip = pivot * Transform::rotate(std::f64::consts::FRAC_PI_2)
        * Point::new(-10.0, 0.0);
    assert!((tip.x - 20.0).abs() < 1e-9);
    assert!((tip.y + 5.0).abs() < 1e-9);
    let scaled = Transform::scale(10.0) * pivot * Point::new(0.0, 0.0);
    assert_eq!(scaled, Point::new(200.0, 50.0));
}
