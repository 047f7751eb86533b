//! Grid snapping to the nearest cell intersection.

use crate::defaults;
use crate::errors::ConfigError;
use crate::types::{WorldPoint, check_positive, wpt};

fn validate_cell(cell_size: f64) -> Result<f64, ConfigError> {
    check_positive(cell_size).map_err(|_| ConfigError::InvalidGridSize { value: cell_size })
}

/// Round each coordinate of `p` to the nearest multiple of `cell_size`.
pub fn snap(p: WorldPoint, cell_size: f64) -> Result<WorldPoint, ConfigError> {
    let cell = validate_cell(cell_size)?;
    Ok(snap_unchecked(p, cell))
}

fn snap_unchecked(p: WorldPoint, cell: f64) -> WorldPoint {
    wpt((p.x.0 / cell).round() * cell, (p.y.0 / cell).round() * cell)
}

/// Grid cell size plus the user's "snap to grid" toggle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSettings {
    cell_size: f64,
    pub snap_enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self { cell_size: defaults::GRID_SIZE, snap_enabled: true }
    }
}

impl GridSettings {
    pub fn try_new(cell_size: f64, snap_enabled: bool) -> Result<Self, ConfigError> {
        Ok(Self { cell_size: validate_cell(cell_size)?, snap_enabled })
    }

    /// Grid with snapping switched off
    pub fn disabled() -> Self {
        Self { snap_enabled: false, ..Self::default() }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Snap when enabled, identity otherwise
    pub fn apply(&self, p: WorldPoint) -> WorldPoint {
        if self.snap_enabled {
            snap_unchecked(p, self.cell_size)
        } else {
            p
        }
    }
}
