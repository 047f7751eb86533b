//! Pointer-event façade tying the session, the store and the viewport together.
//!
//! A host forwards raw pointer events here and redraws from [`MeasureCanvas::snapshot`].
//! Exact-count tools (distance, clearance, angle) finish on their last click;
//! area and perimeter finish on [`MeasureCanvas::close_shape`].

use crate::defaults;
use crate::errors::CanvasError;
use crate::grid::GridSettings;
use crate::log::{debug, info};
use crate::measurement::{self, Measurement, MeasurementKind};
use crate::render::{InProgress, Snapshot};
use crate::session::{DrawingSession, PointerMap, Preview};
use crate::store::MeasurementStore;
use crate::transform::Viewport;
use crate::types::ScreenPoint;
use crate::units::Unit;

/// What a pointer-down did
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    /// A point was committed; the value is in the canvas unit
    Progress(Preview),
    /// The last point of an exact-count tool completed and stored a measurement
    Completed(Measurement),
}

#[derive(Debug)]
pub struct MeasureCanvas {
    store: MeasurementStore,
    session: DrawingSession,
    pointer: PointerMap,
    tool: Option<MeasurementKind>,
    unit: Unit,
    precision: usize,
}

impl MeasureCanvas {
    pub fn new(store: MeasurementStore) -> Self {
        Self {
            store,
            session: DrawingSession::new(),
            pointer: PointerMap::default(),
            tool: None,
            unit: defaults::UNIT,
            precision: defaults::LABEL_PRECISION,
        }
    }

    /// Decimal places used for labels
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Unit new measurements are expressed in
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.pointer.viewport = viewport;
        self
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MeasurementStore {
        &mut self.store
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn viewport(&self) -> &Viewport {
        &self.pointer.viewport
    }

    pub fn grid(&self) -> &GridSettings {
        &self.pointer.grid
    }

    pub fn tool(&self) -> Option<MeasurementKind> {
        self.tool
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Switch tools. Picking a different tool abandons the shape in progress.
    pub fn select_tool(&mut self, tool: Option<MeasurementKind>) {
        if tool != self.tool && self.session.is_active() {
            debug!(from = ?self.tool, to = ?tool, "tool switch cancels drawing");
            self.cancel_drawing();
        }
        self.tool = tool;
    }

    pub fn pointer_down(&mut self, screen: ScreenPoint) -> Result<CanvasEvent, CanvasError> {
        let kind = self.tool.ok_or(CanvasError::NoToolSelected)?;
        let preview = if self.session.is_active() {
            self.session.add_point(screen, &self.pointer)?
        } else {
            self.session.begin_at(kind, screen, &self.pointer)?
        };
        if kind.is_exact_count() && preview.full {
            return Ok(CanvasEvent::Completed(self.finish()?));
        }
        Ok(CanvasEvent::Progress(self.scaled(kind, preview)))
    }

    /// Hover preview while drawing; `None` when idle
    pub fn pointer_move(&mut self, screen: ScreenPoint) -> Option<Preview> {
        let kind = self.session.kind()?;
        let preview = self.session.hover(screen, &self.pointer).ok()?;
        Some(self.scaled(kind, preview))
    }

    /// Explicitly finish the current shape
    pub fn close_shape(&mut self) -> Result<Measurement, CanvasError> {
        self.finish()
    }

    /// Abandon the shape in progress; returns whether anything was cancelled
    pub fn escape(&mut self) -> bool {
        if self.session.is_active() {
            self.cancel_drawing();
            true
        } else {
            false
        }
    }

    /// Swap in another site map's store, returning the previous one
    pub fn switch_site_map(&mut self, store: MeasurementStore) -> MeasurementStore {
        self.cancel_drawing();
        info!(site_map = store.context().site_map_id(), "site map switched");
        std::mem::replace(&mut self.store, store)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pointer.viewport.pan_by(dx, dy);
    }

    pub fn zoom_at(&mut self, anchor: ScreenPoint, factor: f64) -> Result<(), CanvasError> {
        self.pointer.viewport.zoom_at(anchor, factor)?;
        Ok(())
    }

    pub fn set_grid(&mut self, grid: GridSettings) {
        self.pointer.grid = grid;
    }

    /// Everything a renderer needs for one frame
    pub fn snapshot(&self) -> Snapshot {
        let in_progress = self.session.kind().map(|kind| {
            let mut points = self.session.points().to_vec();
            let hover = self.session.hover_point();
            if !self.session.is_full() {
                points.extend(hover);
            }
            let preview_value =
                measurement::compute_value(kind, &points, self.store.context().meters_per_unit(), self.unit);
            InProgress { kind, points: self.session.points().to_vec(), hover, preview_value, unit: self.unit }
        });
        Snapshot { completed: self.store.measurements().to_vec(), in_progress }
    }

    fn finish(&mut self) -> Result<Measurement, CanvasError> {
        let draft = self.session.complete()?.with_unit(self.unit);
        Ok(self.store.create(draft)?)
    }

    fn cancel_drawing(&mut self) {
        if self.session.cancel().is_err() {
            debug!("nothing to cancel");
        }
    }

    fn scaled(&self, kind: MeasurementKind, preview: Preview) -> Preview {
        let value = measurement::express(
            preview.value,
            kind.dimension(),
            self.store.context().meters_per_unit(),
            self.unit,
        );
        Preview { value, ..preview }
    }
}
