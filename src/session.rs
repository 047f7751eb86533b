//! Drawing session: the state machine that collects points for one measurement.
//!
//! # States
//!
//! - **Idle**: nothing in progress.
//! - **Collecting**: a tool kind, the committed points, and an optional hover
//!   point used only for the live preview.
//!
//! `begin` moves Idle → Collecting. `complete` and `cancel` both return to
//! Idle; only `complete` produces a [`MeasurementDraft`]. A failed `complete`
//! leaves the session collecting so the user can keep clicking.

use crate::errors::SessionError;
use crate::geometry;
use crate::grid::GridSettings;
use crate::log::debug;
use crate::measurement::{MeasurementDraft, MeasurementKind};
use crate::transform::Viewport;
use crate::types::{ScreenPoint, WorldPoint};

/// How raw pointer positions become world points: unproject, then snap
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerMap {
    pub viewport: Viewport,
    pub grid: GridSettings,
}

impl PointerMap {
    pub fn new(viewport: Viewport, grid: GridSettings) -> Self {
        Self { viewport, grid }
    }

    pub fn to_world(&self, screen: ScreenPoint) -> WorldPoint {
        self.grid.apply(self.viewport.screen_to_world(screen))
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
enum State {
    #[default]
    Idle,
    Collecting {
        kind: MeasurementKind,
        points: Vec<WorldPoint>,
        hover: Option<WorldPoint>,
    },
}

/// Live feedback after a pointer event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preview {
    /// Kernel output over the committed points plus the hover point
    pub value: f64,
    /// Committed point count
    pub points: usize,
    /// The tool's maximum is reached
    pub full: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawingSession {
    state: State,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Collecting { .. })
    }

    /// Tool kind being drawn, if collecting
    pub fn kind(&self) -> Option<MeasurementKind> {
        match &self.state {
            State::Collecting { kind, .. } => Some(*kind),
            State::Idle => None,
        }
    }

    /// Committed points (empty when idle)
    pub fn points(&self) -> &[WorldPoint] {
        match &self.state {
            State::Collecting { points, .. } => points,
            State::Idle => &[],
        }
    }

    pub fn hover_point(&self) -> Option<WorldPoint> {
        match &self.state {
            State::Collecting { hover, .. } => *hover,
            State::Idle => None,
        }
    }

    /// Enough points to complete
    pub fn is_ready(&self) -> bool {
        match &self.state {
            State::Collecting { kind, points, .. } => kind.accepts_count(effective_count(*kind, points)),
            State::Idle => false,
        }
    }

    /// The tool's maximum is reached; exact-count tools complete here
    pub fn is_full(&self) -> bool {
        match &self.state {
            State::Collecting { kind, points, .. } => kind.max_points().is_some_and(|max| points.len() >= max),
            State::Idle => false,
        }
    }

    /// Preview value over committed points plus the hover point.
    ///
    /// The hover point is ignored once the tool is full.
    pub fn preview(&self) -> Option<f64> {
        let State::Collecting { kind, points, hover } = &self.state else {
            return None;
        };
        let value = match hover {
            Some(h) if !self.is_full() => {
                let mut with_hover = Vec::with_capacity(points.len() + 1);
                with_hover.extend_from_slice(points);
                with_hover.push(*h);
                geometry::measure(*kind, &with_hover)
            }
            _ => geometry::measure(*kind, points),
        };
        Some(value)
    }

    fn preview_snapshot(&self) -> Preview {
        Preview {
            value: self.preview().unwrap_or(0.0),
            points: self.points().len(),
            full: self.is_full(),
        }
    }

    pub fn begin(&mut self, kind: MeasurementKind) -> Result<(), SessionError> {
        if let State::Collecting { kind: active, .. } = &self.state {
            return Err(SessionError::SessionAlreadyActive { kind: *active });
        }
        debug!(%kind, "drawing session begin");
        self.state = State::Collecting { kind, points: Vec::new(), hover: None };
        Ok(())
    }

    /// Begin and place the first point from the initiating pointer-down
    pub fn begin_at(
        &mut self,
        kind: MeasurementKind,
        first: ScreenPoint,
        pointer: &PointerMap,
    ) -> Result<Preview, SessionError> {
        self.begin(kind)?;
        self.add_point(first, pointer)
    }

    /// Commit a pointer position as the next vertex
    pub fn add_point(&mut self, raw: ScreenPoint, pointer: &PointerMap) -> Result<Preview, SessionError> {
        let world = pointer.to_world(raw);
        self.add_world_point(world)
    }

    /// Commit an already-resolved world point
    pub fn add_world_point(&mut self, world: WorldPoint) -> Result<Preview, SessionError> {
        let full = self.is_full();
        let State::Collecting { kind, points, hover } = &mut self.state else {
            return Err(SessionError::SessionNotActive);
        };
        if full {
            return Err(SessionError::InvalidPointCount {
                kind: *kind,
                got: points.len() + 1,
                expected: kind.expected_points(),
            });
        }
        points.push(world);
        *hover = None;
        debug!(kind = %kind, count = points.len(), x = world.x.0, y = world.y.0, "point added");
        Ok(self.preview_snapshot())
    }

    /// Track the pointer without committing it
    pub fn hover(&mut self, raw: ScreenPoint, pointer: &PointerMap) -> Result<Preview, SessionError> {
        let world = pointer.to_world(raw);
        let State::Collecting { hover, .. } = &mut self.state else {
            return Err(SessionError::SessionNotActive);
        };
        *hover = Some(world);
        Ok(self.preview_snapshot())
    }

    /// Finish the shape, returning the draft and going idle.
    ///
    /// Area and perimeter count distinct positions and collapse repeated
    /// vertices; other tools keep every point and let the kernel degrade to zero.
    pub fn complete(&mut self) -> Result<MeasurementDraft, SessionError> {
        let State::Collecting { kind, points, .. } = &self.state else {
            return Err(SessionError::SessionNotActive);
        };
        let kind = *kind;
        let got = effective_count(kind, points);
        if !kind.accepts_count(got) {
            return Err(SessionError::InvalidPointCount { kind, got, expected: kind.expected_points() });
        }
        let final_points = if kind.requires_distinct_points() {
            geometry::collapse_duplicates(points)
        } else {
            points.clone()
        };
        debug!(%kind, count = final_points.len(), "drawing session complete");
        self.state = State::Idle;
        Ok(MeasurementDraft::new(kind, final_points))
    }

    /// Discard everything collected so far
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if !self.is_active() {
            return Err(SessionError::SessionNotActive);
        }
        debug!(count = self.points().len(), "drawing session cancelled");
        self.state = State::Idle;
        Ok(())
    }
}

fn effective_count(kind: MeasurementKind, points: &[WorldPoint]) -> usize {
    if kind.requires_distinct_points() {
        geometry::distinct_vertex_count(points)
    } else {
        points.len()
    }
}
