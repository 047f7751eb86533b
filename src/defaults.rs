//! Default settings for the measurement canvas

use crate::units::Unit;

/// Smallest zoom the UI allows
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom the UI allows
pub const MAX_ZOOM: f64 = 5.0;
/// Grid cell edge in world units
pub const GRID_SIZE: f64 = 1.0;
/// Fraction above a rule minimum that still reports a warning
pub const WARNING_MARGIN: f64 = 0.10;
/// Decimal places for value labels
pub const LABEL_PRECISION: usize = 2;
/// Unit assigned to new measurements
pub const UNIT: Unit = Unit::Meters;
/// Meters per world unit
pub const SCALE: f64 = 1.0;

/// Clamp a requested zoom to the range the UI exposes.
///
/// The transform itself accepts any positive zoom; clamping is a UI policy.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_zoom_bounds() {
        assert_eq!(clamp_zoom(0.01), MIN_ZOOM);
        assert_eq!(clamp_zoom(2.0), 2.0);
        assert_eq!(clamp_zoom(50.0), MAX_ZOOM);
        assert_eq!(clamp_zoom(f64::NAN), MIN_ZOOM);
    }
}
