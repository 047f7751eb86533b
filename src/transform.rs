//! World ↔ screen mapping under pan and zoom.
//!
//! `screen = world * zoom + pan`. Zoom clamping is a UI concern; any finite
//! positive zoom is accepted here.

use crate::defaults;
use crate::errors::ConfigError;
use crate::types::{Point, Px, ScreenPoint, WorldPoint, check_positive, spt, wpt};

/// Pan offset in screen pixels
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

impl Pan {
    pub fn new(x: f64, y: f64) -> Self {
        Pan { x, y }
    }
}

/// A validated (zoom, pan) pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan: Pan,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { zoom: 1.0, pan: Pan::default() }
    }
}

fn validate_zoom(zoom: f64) -> Result<f64, ConfigError> {
    check_positive(zoom).map_err(|_| ConfigError::InvalidZoom { value: zoom })
}

impl Viewport {
    /// Create a viewport, rejecting zoom ≤ 0, NaN and infinities
    pub fn try_new(zoom: f64, pan: Pan) -> Result<Self, ConfigError> {
        Ok(Viewport { zoom: validate_zoom(zoom)?, pan })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    pub fn world_to_screen(&self, p: WorldPoint) -> ScreenPoint {
        spt(p.x.0 * self.zoom + self.pan.x, p.y.0 * self.zoom + self.pan.y)
    }

    pub fn screen_to_world(&self, s: ScreenPoint) -> WorldPoint {
        wpt((s.x.0 - self.pan.x) / self.zoom, (s.y.0 - self.pan.y) / self.zoom)
    }

    /// Shift the view by a screen-space delta (drag to pan)
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Multiply zoom by `factor` while keeping the world point under `anchor` fixed.
    ///
    /// The resulting zoom is clamped to the UI range.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, factor: f64) -> Result<(), ConfigError> {
        let factor = validate_zoom(factor)?;
        let pinned = self.screen_to_world(anchor);
        self.zoom = defaults::clamp_zoom(self.zoom * factor);
        self.pan.x = anchor.x.0 - pinned.x.0 * self.zoom;
        self.pan.y = anchor.y.0 - pinned.y.0 * self.zoom;
        Ok(())
    }
}

/// Map a world point to screen space.
pub fn world_to_screen(p: WorldPoint, zoom: f64, pan: Pan) -> Result<ScreenPoint, ConfigError> {
    Ok(Viewport::try_new(zoom, pan)?.world_to_screen(p))
}

/// Map a screen point back to world space.
pub fn screen_to_world(s: Point<Px>, zoom: f64, pan: Pan) -> Result<WorldPoint, ConfigError> {
    Ok(Viewport::try_new(zoom, pan)?.screen_to_world(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn world_to_screen_applies_zoom_then_pan() {
        let s = world_to_screen(wpt(2.0, 3.0), 2.0, Pan::new(10.0, -5.0)).unwrap();
        assert_eq!(s, spt(14.0, 1.0));
    }

    #[test]
    fn screen_to_world_inverts() {
        let w = screen_to_world(spt(14.0, 1.0), 2.0, Pan::new(10.0, -5.0)).unwrap();
        assert_eq!(w, wpt(2.0, 3.0));
    }

    #[test]
    fn round_trip_across_zoom_range() {
        let pans = [Pan::new(0.0, 0.0), Pan::new(-340.5, 128.25), Pan::new(1e4, -7e3)];
        let points = [wpt(0.0, 0.0), wpt(12.345, -6.789), wpt(-1500.0, 2200.5), wpt(0.001, 0.002)];
        let mut zoom = 0.1;
        while zoom <= 5.0 {
            for pan in pans {
                let vp = Viewport::try_new(zoom, pan).unwrap();
                for p in points {
                    let back = vp.screen_to_world(vp.world_to_screen(p));
                    assert!(rel_close(back.x.0, p.x.0), "x drift at zoom {zoom}: {back:?} vs {p:?}");
                    assert!(rel_close(back.y.0, p.y.0), "y drift at zoom {zoom}: {back:?} vs {p:?}");
                }
            }
            zoom += 0.35;
        }
    }

    #[test]
    fn rejects_non_positive_zoom() {
        assert_eq!(
            world_to_screen(wpt(1.0, 1.0), 0.0, Pan::default()),
            Err(ConfigError::InvalidZoom { value: 0.0 })
        );
        assert!(Viewport::try_new(-2.0, Pan::default()).is_err());
        assert!(Viewport::try_new(f64::NAN, Pan::default()).is_err());
    }

    #[test]
    fn accepts_zoom_outside_ui_range() {
        assert!(Viewport::try_new(50.0, Pan::default()).is_ok());
        assert!(Viewport::try_new(0.01, Pan::default()).is_ok());
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut vp = Viewport::try_new(1.0, Pan::new(20.0, 30.0)).unwrap();
        let anchor = spt(200.0, 150.0);
        let before = vp.screen_to_world(anchor);
        vp.zoom_at(anchor, 2.0).unwrap();
        assert_eq!(vp.zoom(), 2.0);
        let after = vp.screen_to_world(anchor);
        assert!(rel_close(after.x.0, before.x.0));
        assert!(rel_close(after.y.0, before.y.0));
    }

    #[test]
    fn zoom_at_clamps_to_ui_range() {
        let mut vp = Viewport::default();
        vp.zoom_at(spt(0.0, 0.0), 100.0).unwrap();
        assert_eq!(vp.zoom(), defaults::MAX_ZOOM);
    }

    #[test]
    fn pan_by_accumulates() {
        let mut vp = Viewport::default();
        vp.pan_by(5.0, -3.0);
        vp.pan_by(1.0, 1.0);
        assert_eq!(vp.pan(), Pan::new(6.0, -2.0));
    }
}
