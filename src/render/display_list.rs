//! A [`RenderSurface`] that records what it is asked to draw

use std::fmt;

use super::label::fmt_num;
use super::{RenderSurface, Tone};
use crate::transform::Viewport;
use crate::types::{Meters, Point, Px, WorldPoint};

/// Coordinate newtypes a display list can hold
pub trait Coord: Copy {
    fn raw(self) -> f64;
}

impl Coord for Meters {
    fn raw(self) -> f64 {
        self.0
    }
}

impl Coord for Px {
    fn raw(self) -> f64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem<T> {
    Point { at: Point<T>, tone: Tone },
    Polyline { points: Vec<Point<T>>, tone: Tone },
    Polygon { points: Vec<Point<T>>, tone: Tone },
    Label { at: Point<T>, text: String, tone: Tone },
}

impl<T: Copy> DisplayItem<T> {
    fn map<U>(&self, f: impl Fn(Point<T>) -> Point<U>) -> DisplayItem<U> {
        match self {
            DisplayItem::Point { at, tone } => DisplayItem::Point { at: f(*at), tone: *tone },
            DisplayItem::Polyline { points, tone } => {
                DisplayItem::Polyline { points: points.iter().map(|p| f(*p)).collect(), tone: *tone }
            }
            DisplayItem::Polygon { points, tone } => {
                DisplayItem::Polygon { points: points.iter().map(|p| f(*p)).collect(), tone: *tone }
            }
            DisplayItem::Label { at, text, tone } => DisplayItem::Label { at: f(*at), text: text.clone(), tone: *tone },
        }
    }
}

/// Recorded primitives, world space by default
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayList<T = Meters> {
    items: Vec<DisplayItem<T>>,
}

impl<T> Default for DisplayList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> DisplayList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[DisplayItem<T>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl DisplayList<Meters> {
    /// Project every primitive through the viewport
    pub fn to_screen(&self, viewport: &Viewport) -> DisplayList<Px> {
        DisplayList { items: self.items.iter().map(|item| item.map(|p| viewport.world_to_screen(p))).collect() }
    }
}

impl RenderSurface for DisplayList<Meters> {
    fn point(&mut self, at: WorldPoint, tone: Tone) {
        self.items.push(DisplayItem::Point { at, tone });
    }

    fn polyline(&mut self, points: &[WorldPoint], tone: Tone) {
        self.items.push(DisplayItem::Polyline { points: points.to_vec(), tone });
    }

    fn polygon(&mut self, points: &[WorldPoint], tone: Tone) {
        self.items.push(DisplayItem::Polygon { points: points.to_vec(), tone });
    }

    fn label(&mut self, at: WorldPoint, text: &str, tone: Tone) {
        self.items.push(DisplayItem::Label { at, text: text.to_string(), tone });
    }
}

fn write_point<T: Coord>(f: &mut fmt::Formatter<'_>, p: Point<T>) -> fmt::Result {
    write!(f, "{},{}", fmt_num(p.x.raw()), fmt_num(p.y.raw()))
}

fn write_path<T: Coord>(f: &mut fmt::Formatter<'_>, points: &[Point<T>]) -> fmt::Result {
    for p in points {
        f.write_str(" ")?;
        write_point(f, *p)?;
    }
    Ok(())
}

impl<T: Coord> fmt::Display for DisplayItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayItem::Point { at, tone } => {
                write!(f, "point {tone} ")?;
                write_point(f, *at)
            }
            DisplayItem::Polyline { points, tone } => {
                write!(f, "polyline {tone}")?;
                write_path(f, points)
            }
            DisplayItem::Polygon { points, tone } => {
                write!(f, "polygon {tone}")?;
                write_path(f, points)
            }
            DisplayItem::Label { at, text, tone } => {
                write!(f, "label {tone} ")?;
                write_point(f, *at)?;
                write!(f, " {text:?}")
            }
        }
    }
}

/// One primitive per line
impl<T: Coord> fmt::Display for DisplayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
