//! Drawing measurements onto a host surface
//!
//! This module is organized into submodules:
//! - `label`: value formatting for labels
//! - `display_list`: a recording surface for tests and headless hosts
//!
//! The engine never draws pixels itself. A host implements [`RenderSurface`]
//! and feeds it a [`Snapshot`] through [`draw_snapshot`]; all coordinates
//! handed to the surface are in world space.

pub mod display_list;
pub mod label;

pub use display_list::{DisplayItem, DisplayList};
pub use label::format_value;

use std::fmt;

use crate::compliance::ComplianceStatus;
use crate::geometry;
use crate::measurement::{Measurement, MeasurementKind};
use crate::types::{WorldBox, WorldPoint};
use crate::units::Unit;

/// Styling hint for a primitive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    Normal,
    /// The shape still being drawn
    Preview,
    Warning,
    Violation,
}

impl Tone {
    /// Tone from a measurement's attached verdict
    pub fn of(measurement: &Measurement) -> Tone {
        match measurement.compliance().map(|c| c.status) {
            Some(ComplianceStatus::Violation) => Tone::Violation,
            Some(ComplianceStatus::Warning) => Tone::Warning,
            Some(ComplianceStatus::Compliant) | None => Tone::Normal,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Normal => "normal",
            Tone::Preview => "preview",
            Tone::Warning => "warning",
            Tone::Violation => "violation",
        };
        f.write_str(name)
    }
}

/// The shape being drawn, as of the last pointer event
#[derive(Clone, Debug, PartialEq)]
pub struct InProgress {
    pub kind: MeasurementKind,
    /// Committed points
    pub points: Vec<WorldPoint>,
    pub hover: Option<WorldPoint>,
    /// Value over committed points plus hover, in `unit`
    pub preview_value: f64,
    pub unit: Unit,
}

/// One frame's worth of state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub completed: Vec<Measurement>,
    pub in_progress: Option<InProgress>,
}

impl Snapshot {
    /// World extent of everything drawn, hover included; `None` for an empty frame
    pub fn bounds(&self) -> Option<WorldBox> {
        let mut bb = WorldBox::new();
        for m in &self.completed {
            for p in m.points() {
                bb.expand_point(p.pos);
            }
        }
        if let Some(live) = &self.in_progress {
            for p in live.points.iter().chain(live.hover.iter()) {
                bb.expand_point(*p);
            }
        }
        if bb.is_empty() { None } else { Some(bb) }
    }
}

/// Host drawing backend; receives world-space primitives
pub trait RenderSurface {
    fn point(&mut self, at: WorldPoint, tone: Tone);
    fn polyline(&mut self, points: &[WorldPoint], tone: Tone);
    fn polygon(&mut self, points: &[WorldPoint], tone: Tone);
    fn label(&mut self, at: WorldPoint, text: &str, tone: Tone);
}

/// Emit every completed measurement, then the in-progress shape on top
pub fn draw_snapshot(snapshot: &Snapshot, precision: usize, surface: &mut dyn RenderSurface) {
    for m in &snapshot.completed {
        let tone = Tone::of(m);
        let points = m.positions();
        draw_shape(m.kind(), &points, tone, surface);
        for p in &points {
            surface.point(*p, tone);
        }
        if let Some(at) = label_anchor(m.kind(), &points) {
            surface.label(at, &format_value(m.value(), m.unit(), m.kind(), precision), tone);
        }
    }

    if let Some(live) = &snapshot.in_progress {
        let mut path = live.points.clone();
        path.extend(live.hover);
        // not closed until the user closes it
        surface.polyline(&path, Tone::Preview);
        for p in &live.points {
            surface.point(*p, Tone::Preview);
        }
        if path.len() >= 2 {
            if let Some(at) = label_anchor(live.kind, &path) {
                let text = format_value(live.preview_value, live.unit, live.kind, precision);
                surface.label(at, &text, Tone::Preview);
            }
        }
    }
}

fn draw_shape(kind: MeasurementKind, points: &[WorldPoint], tone: Tone, surface: &mut dyn RenderSurface) {
    if kind.is_closed() {
        surface.polygon(points, tone);
    } else {
        surface.polyline(points, tone);
    }
}

/// Midpoint for two-point tools, the vertex for angles, centroid for polygons
pub fn label_anchor(kind: MeasurementKind, points: &[WorldPoint]) -> Option<WorldPoint> {
    match kind {
        MeasurementKind::Distance | MeasurementKind::Clearance => match points {
            [a, b, ..] => Some(a.midpoint(*b)),
            _ => points.first().copied(),
        },
        MeasurementKind::Angle => points.get(1).or(points.first()).copied(),
        MeasurementKind::Area | MeasurementKind::Perimeter => geometry::centroid(points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementDraft;
    use crate::store::{MeasurementStore, SiteMapContext};
    use crate::types::wpt;
    use insta::assert_snapshot;

    fn snapshot_of(drafts: Vec<MeasurementDraft>) -> Snapshot {
        let mut store = MeasurementStore::new(SiteMapContext::new("s"));
        let completed = drafts.into_iter().map(|d| store.create(d).unwrap()).collect();
        Snapshot { completed, in_progress: None }
    }

    #[test]
    fn tones_follow_compliance() {
        let snap = snapshot_of(vec![
            MeasurementDraft::new(MeasurementKind::Distance, vec![wpt(0.0, 0.0), wpt(5.0, 0.0)]),
            MeasurementDraft::new(MeasurementKind::Distance, vec![wpt(0.0, 0.0), wpt(3.8, 0.0)]),
            MeasurementDraft::new(MeasurementKind::Clearance, vec![wpt(0.0, 0.0), wpt(1.0, 0.0)]),
        ]);
        let tones: Vec<Tone> = snap.completed.iter().map(Tone::of).collect();
        assert_eq!(tones, vec![Tone::Normal, Tone::Warning, Tone::Violation]);
    }

    #[test]
    fn label_anchors() {
        let tri = [wpt(0.0, 0.0), wpt(3.0, 0.0), wpt(0.0, 3.0)];
        assert_eq!(label_anchor(MeasurementKind::Distance, &tri), Some(wpt(1.5, 0.0)));
        assert_eq!(label_anchor(MeasurementKind::Angle, &tri), Some(wpt(3.0, 0.0)));
        assert_eq!(label_anchor(MeasurementKind::Area, &tri), Some(wpt(1.0, 1.0)));
        assert_eq!(label_anchor(MeasurementKind::Area, &[]), None);
    }

    #[test]
    fn draws_completed_shapes() {
        let snap = snapshot_of(vec![
            MeasurementDraft::new(MeasurementKind::Distance, vec![wpt(0.0, 0.0), wpt(5.0, 0.0)]),
            MeasurementDraft::new(MeasurementKind::Area, vec![wpt(0.0, 0.0), wpt(2.0, 0.0), wpt(2.0, 2.0), wpt(0.0, 2.0)]),
        ]);
        let mut list: DisplayList = DisplayList::new();
        draw_snapshot(&snap, 2, &mut list);
        assert_snapshot!(list.to_string(), @r#"
        polyline normal 0,0 5,0
        point normal 0,0
        point normal 5,0
        label normal 2.5,0 "5.00 m"
        polygon normal 0,0 2,0 2,2 0,2
        point normal 0,0
        point normal 2,0
        point normal 2,2
        point normal 0,2
        label normal 1,1 "4.00 m²"
        "#);
    }

    #[test]
    fn draws_preview_with_hover() {
        let snap = Snapshot {
            completed: Vec::new(),
            in_progress: Some(InProgress {
                kind: MeasurementKind::Perimeter,
                points: vec![wpt(0.0, 0.0), wpt(4.0, 0.0)],
                hover: Some(wpt(4.0, 3.0)),
                preview_value: 12.0,
                unit: Unit::Meters,
            }),
        };
        let mut list: DisplayList = DisplayList::new();
        draw_snapshot(&snap, 1, &mut list);
        assert_snapshot!(list.to_string(), @r#"
        polyline preview 0,0 4,0 4,3
        point preview 0,0
        point preview 4,0
        label preview 2.66667,1 "12.0 m"
        "#);
    }

    #[test]
    fn bounds_cover_completed_and_hover() {
        assert_eq!(Snapshot::default().bounds(), None);

        let mut snap = snapshot_of(vec![MeasurementDraft::new(
            MeasurementKind::Distance,
            vec![wpt(-1.0, 2.0), wpt(3.0, 2.0)],
        )]);
        snap.in_progress = Some(InProgress {
            kind: MeasurementKind::Distance,
            points: vec![wpt(0.0, 0.0)],
            hover: Some(wpt(1.0, 6.0)),
            preview_value: 0.0,
            unit: Unit::Meters,
        });
        let bb = snap.bounds().unwrap();
        assert_eq!(bb.min, wpt(-1.0, 0.0));
        assert_eq!(bb.max, wpt(3.0, 6.0));
        assert_eq!(bb.center(), wpt(1.0, 3.0));
    }

    #[test]
    fn single_point_preview_has_no_label() {
        let snap = Snapshot {
            completed: Vec::new(),
            in_progress: Some(InProgress {
                kind: MeasurementKind::Distance,
                points: vec![wpt(1.0, 1.0)],
                hover: None,
                preview_value: 0.0,
                unit: Unit::Meters,
            }),
        };
        let mut list: DisplayList = DisplayList::new();
        draw_snapshot(&snap, 2, &mut list);
        assert_eq!(list.len(), 2);
    }
}
