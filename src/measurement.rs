//! Measurement data model.
//!
//! A [`Measurement`] only exists once its point-count contract is satisfied;
//! its fields are private so `value` can only change together with `points`.

use std::fmt;

use crate::compliance::ComplianceCheck;
use crate::geometry;
use crate::types::WorldPoint;
use crate::units::{self, Dimension, Unit};

/// The closed set of measurement tools
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MeasurementKind {
    Distance,
    Area,
    Perimeter,
    Angle,
    /// A distance checked against clearance rules
    Clearance,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 5] = [
        MeasurementKind::Distance,
        MeasurementKind::Area,
        MeasurementKind::Perimeter,
        MeasurementKind::Angle,
        MeasurementKind::Clearance,
    ];

    pub const fn min_points(self) -> usize {
        match self {
            MeasurementKind::Distance | MeasurementKind::Clearance => 2,
            MeasurementKind::Area | MeasurementKind::Perimeter | MeasurementKind::Angle => 3,
        }
    }

    /// `None` means unbounded
    pub const fn max_points(self) -> Option<usize> {
        match self {
            MeasurementKind::Distance | MeasurementKind::Clearance => Some(2),
            MeasurementKind::Angle => Some(3),
            MeasurementKind::Area | MeasurementKind::Perimeter => None,
        }
    }

    /// Exact-count tools finish on their last click; polygons are closed explicitly
    pub const fn is_exact_count(self) -> bool {
        matches!(self.max_points(), Some(max) if max == self.min_points())
    }

    /// Polygon tools need distinct vertices; duplicates are collapsed on completion
    pub const fn requires_distinct_points(self) -> bool {
        matches!(self, MeasurementKind::Area | MeasurementKind::Perimeter)
    }

    /// Whether the shape is drawn closed
    pub const fn is_closed(self) -> bool {
        self.requires_distinct_points()
    }

    pub fn accepts_count(self, count: usize) -> bool {
        count >= self.min_points() && self.max_points().is_none_or(|max| count <= max)
    }

    /// Human-readable point contract, e.g. "exactly 2" or "at least 3"
    pub fn expected_points(self) -> String {
        match self.max_points() {
            Some(max) if max == self.min_points() => format!("exactly {max}"),
            Some(max) => format!("{} to {max}", self.min_points()),
            None => format!("at least {}", self.min_points()),
        }
    }

    pub const fn dimension(self) -> Dimension {
        match self {
            MeasurementKind::Distance | MeasurementKind::Perimeter | MeasurementKind::Clearance => {
                Dimension::Length
            }
            MeasurementKind::Area => Dimension::Area,
            MeasurementKind::Angle => Dimension::Angle,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementKind::Distance => "distance",
            MeasurementKind::Area => "area",
            MeasurementKind::Perimeter => "perimeter",
            MeasurementKind::Angle => "angle",
            MeasurementKind::Clearance => "clearance",
        };
        f.write_str(name)
    }
}

/// Store-assigned measurement identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementId(pub String);

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MeasurementId {
    fn from(s: &str) -> Self {
        MeasurementId(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointId(pub String);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vertex owned by exactly one measurement
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SitePoint {
    pub id: PointId,
    pub pos: WorldPoint,
}

/// Input to [`MeasurementStore::create`](crate::store::MeasurementStore::create)
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementDraft {
    pub kind: MeasurementKind,
    pub points: Vec<WorldPoint>,
    pub unit: Unit,
    pub label: Option<String>,
}

impl MeasurementDraft {
    pub fn new(kind: MeasurementKind, points: Vec<WorldPoint>) -> Self {
        Self { kind, points, unit: crate::defaults::UNIT, label: None }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Partial update for [`MeasurementStore::update`](crate::store::MeasurementStore::update)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasurementPatch {
    pub label: Option<String>,
    pub unit: Option<Unit>,
    pub points: Option<Vec<WorldPoint>>,
}

impl MeasurementPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), ..Self::default() }
    }

    pub fn unit(unit: Unit) -> Self {
        Self { unit: Some(unit), ..Self::default() }
    }

    pub fn points(points: Vec<WorldPoint>) -> Self {
        Self { points: Some(points), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.unit.is_none() && self.points.is_none()
    }
}

/// Kernel output for `points`, scaled from world units into `unit`.
///
/// `meters_per_unit` is the site-map scale. With a scale of 1 and a unit of
/// meters the kernel value passes through untouched.
pub fn compute_value(kind: MeasurementKind, points: &[WorldPoint], meters_per_unit: f64, unit: Unit) -> f64 {
    express(geometry::measure(kind, points), kind.dimension(), meters_per_unit, unit)
}

/// Re-express a raw kernel value (world units) in `unit`
pub fn express(raw: f64, dim: Dimension, meters_per_unit: f64, unit: Unit) -> f64 {
    let meters = if meters_per_unit == 1.0 {
        raw
    } else {
        raw * meters_per_unit.powi(dim.power())
    };
    units::from_meters(meters, unit, dim)
}

/// One completed geometric assertion on the site map
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    id: MeasurementId,
    kind: MeasurementKind,
    points: Vec<SitePoint>,
    value: f64,
    unit: Unit,
    label: String,
    compliance: Option<ComplianceCheck>,
}

impl Measurement {
    /// Assemble a measurement; the store guarantees the invariants
    pub(crate) fn new(
        id: MeasurementId,
        kind: MeasurementKind,
        points: Vec<SitePoint>,
        value: f64,
        unit: Unit,
        label: String,
    ) -> Self {
        Self { id, kind, points, value, unit, label, compliance: None }
    }

    pub fn id(&self) -> &MeasurementId {
        &self.id
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn points(&self) -> &[SitePoint] {
        &self.points
    }

    /// Vertex positions in order
    pub fn positions(&self) -> Vec<WorldPoint> {
        self.points.iter().map(|p| p.pos).collect()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn compliance(&self) -> Option<&ComplianceCheck> {
        self.compliance.as_ref()
    }

    pub(crate) fn set_points(&mut self, points: Vec<SitePoint>, value: f64) {
        self.points = points;
        self.value = value;
    }

    pub(crate) fn set_value_in(&mut self, value: f64, unit: Unit) {
        self.value = value;
        self.unit = unit;
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    pub(crate) fn set_compliance(&mut self, compliance: Option<ComplianceCheck>) {
        self.compliance = compliance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::wpt;

    #[test]
    fn point_contracts() {
        assert!(MeasurementKind::Distance.accepts_count(2));
        assert!(!MeasurementKind::Distance.accepts_count(1));
        assert!(!MeasurementKind::Distance.accepts_count(3));
        assert!(MeasurementKind::Angle.accepts_count(3));
        assert!(!MeasurementKind::Angle.accepts_count(4));
        assert!(MeasurementKind::Area.accepts_count(3));
        assert!(MeasurementKind::Area.accepts_count(40));
        assert!(!MeasurementKind::Perimeter.accepts_count(2));
    }

    #[test]
    fn exact_count_tools() {
        let exact: Vec<_> = MeasurementKind::ALL.into_iter().filter(|k| k.is_exact_count()).collect();
        assert_eq!(
            exact,
            vec![MeasurementKind::Distance, MeasurementKind::Angle, MeasurementKind::Clearance]
        );
    }

    #[test]
    fn expected_points_wording() {
        assert_eq!(MeasurementKind::Clearance.expected_points(), "exactly 2");
        assert_eq!(MeasurementKind::Area.expected_points(), "at least 3");
    }

    #[test]
    fn compute_value_is_kernel_output_at_unit_scale() {
        let pts = [wpt(0.3, 0.1), wpt(2.9, 4.7)];
        let kernel = geometry::distance(pts[0], pts[1]).raw();
        assert_eq!(compute_value(MeasurementKind::Distance, &pts, 1.0, Unit::Meters), kernel);
    }

    #[test]
    fn compute_value_applies_scale_and_unit() {
        let pts = [wpt(0.0, 0.0), wpt(10.0, 0.0)];
        // 10 world units at 0.5 m each = 5 m = 500 cm
        let v = compute_value(MeasurementKind::Distance, &pts, 0.5, Unit::Centimeters);
        assert!((v - 500.0).abs() < 1e-9);

        let sq = [wpt(0.0, 0.0), wpt(2.0, 0.0), wpt(2.0, 2.0), wpt(0.0, 2.0)];
        // 4 square world units at 0.5 m each = 1 m²
        let a = compute_value(MeasurementKind::Area, &sq, 0.5, Unit::Meters);
        assert!((a - 1.0).abs() < 1e-12);
    }

    #[test]
    fn angle_ignores_scale() {
        let pts = [wpt(1.0, 0.0), wpt(0.0, 0.0), wpt(0.0, 1.0)];
        let v = compute_value(MeasurementKind::Angle, &pts, 3.0, Unit::Feet);
        assert!((v - 90.0).abs() < 1e-9);
    }
}
