//! Strongly-typed numeric primitives for site-map coordinates (zero-cost newtypes).
//!
//! World space is measured in [`Meters`], screen space in [`Px`]. The two never
//! mix without going through a [`Viewport`](crate::transform::Viewport).

use std::fmt;
use std::ops::{Add, Div, Sub};

use glam::{DVec2, dvec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Check that a value is finite and strictly positive.
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Length in world units (meters once the site scale is applied)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Meters(pub f64);

impl Meters {
    pub const ZERO: Meters = Meters(0.0);

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn min(self, other: Meters) -> Meters {
        Meters(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Meters) -> Meters {
        Meters(self.0.max(other.0))
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Meters) -> Meters { Meters(self.0 + rhs.0) }
}
impl Sub for Meters {
    type Output = Meters;
    fn sub(self, rhs: Meters) -> Meters { Meters(self.0 - rhs.0) }
}
impl Div<f64> for Meters {
    type Output = Meters;
    fn div(self, rhs: f64) -> Meters { Meters(self.0 / rhs) }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Device pixels as seen by the pointer and the renderer
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Px(pub f64);

impl Px {
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Angle in degrees
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Degrees(pub f64);

impl Degrees {
    pub fn from_radians(rad: f64) -> Degrees {
        Degrees(rad.to_degrees())
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self { Point { x, y } }
}

impl Point<Meters> {
    /// Calculate the midpoint between two points
    pub fn midpoint(self, other: Self) -> Self {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// View as a glam vector for math
    #[inline]
    pub fn to_vec(self) -> DVec2 {
        dvec2(self.x.0, self.y.0)
    }

    #[inline]
    pub fn from_vec(v: DVec2) -> Self {
        wpt(v.x, v.y)
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl BBox<Meters> {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Point { x: Meters(f64::MAX), y: Meters(f64::MAX) },
            max: Point { x: Meters(f64::MIN), y: Meters(f64::MIN) },
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x.0 > self.max.x.0 || self.min.y.0 > self.max.y.0
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point<Meters>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> Meters { self.max.x - self.min.x }

    pub fn height(&self) -> Meters { self.max.y - self.min.y }

    pub fn center(&self) -> Point<Meters> {
        self.min.midpoint(self.max)
    }
}

impl Default for BBox<Meters> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient aliases
pub type WorldPoint = Point<Meters>;
pub type ScreenPoint = Point<Px>;
pub type WorldBox = BBox<Meters>;

/// Shorthand for a world-space point
pub fn wpt(x: f64, y: f64) -> WorldPoint {
    Point::new(Meters(x), Meters(y))
}

/// Shorthand for a screen-space point
pub fn spt(x: f64, y: f64) -> ScreenPoint {
    Point::new(Px(x), Px(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Meters tests ====================

    #[test]
    fn meters_arithmetic() {
        let a = Meters(3.0);
        let b = Meters(2.0);

        assert_eq!(a + b, Meters(5.0));
        assert_eq!(a - b, Meters(1.0));
        assert_eq!(a / 2.0, Meters(1.5));
        assert_eq!(a.min(b), b);
        assert_eq!(a.max(b), a);
    }

    #[test]
    fn check_positive_classifies() {
        assert_eq!(check_positive(2.5), Ok(2.5));
        assert_eq!(check_positive(0.0), Err(NumericError::Zero));
        assert_eq!(check_positive(-1.0), Err(NumericError::Negative));
        assert_eq!(check_positive(f64::NAN), Err(NumericError::NaN));
        assert_eq!(check_positive(f64::INFINITY), Err(NumericError::Infinite));
    }

    // ==================== Point tests ====================

    #[test]
    fn point_vec_conversion() {
        let p = wpt(1.5, -2.0);
        assert_eq!(WorldPoint::from_vec(p.to_vec()), p);
    }

    // ==================== BBox tests ====================

    #[test]
    fn bbox_new_is_empty() {
        assert!(WorldBox::new().is_empty());
    }

    #[test]
    fn bbox_expand_and_measure() {
        let mut bb = WorldBox::new();
        bb.expand_point(wpt(1.0, 2.0));
        bb.expand_point(wpt(5.0, 8.0));

        assert!(!bb.is_empty());
        assert_eq!(bb.width(), Meters(4.0));
        assert_eq!(bb.height(), Meters(6.0));
        assert_eq!(bb.center(), wpt(3.0, 5.0));
    }
}
