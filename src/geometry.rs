//! Geometry kernel: distance, shoelace area, perimeter and vertex angle.
//!
//! Every function here is pure and runs on each pointer move for live preview,
//! so none of them fail. Degenerate input measures as zero.

use glam::DVec2;

use crate::measurement::MeasurementKind;
use crate::types::{Degrees, Meters, WorldPoint};

/// Squared length below which two points count as coincident
const COINCIDENT_EPS_SQ: f64 = 1e-24;

fn coincident(a: DVec2, b: DVec2) -> bool {
    a.distance_squared(b) <= COINCIDENT_EPS_SQ
}

/// Euclidean distance between two points
pub fn distance(a: WorldPoint, b: WorldPoint) -> Meters {
    let (a, b) = (a.to_vec(), b.to_vec());
    if coincident(a, b) {
        return Meters::ZERO;
    }
    Meters(a.distance(b))
}

/// Number of distinct positions among `points`, wherever repeats occur.
///
/// Quadratic, but polygons drawn by hand stay small.
pub fn distinct_vertex_count(points: &[WorldPoint]) -> usize {
    let mut seen: Vec<DVec2> = Vec::with_capacity(points.len());
    for p in points {
        let v = p.to_vec();
        if !seen.iter().any(|&s| coincident(s, v)) {
            seen.push(v);
        }
    }
    seen.len()
}

/// Drop consecutive duplicate vertices, treating the list as a closed ring.
pub fn collapse_duplicates(points: &[WorldPoint]) -> Vec<WorldPoint> {
    let mut out: Vec<WorldPoint> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(last) if coincident(last.to_vec(), p.to_vec()) => {}
            _ => out.push(p),
        }
    }
    while out.len() > 1 && coincident(out[0].to_vec(), out[out.len() - 1].to_vec()) {
        out.pop();
    }
    out
}

/// Shoelace area of the closed polygon, in square world units.
///
/// Self-intersecting input is not detected; it yields a numerically valid but
/// geometrically meaningless value.
pub fn polygon_area(points: &[WorldPoint]) -> f64 {
    if distinct_vertex_count(points) < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i].to_vec();
            let b = points[(i + 1) % n].to_vec();
            a.perp_dot(b)
        })
        .sum();
    0.5 * twice.abs()
}

/// Sum of edge lengths including the closing edge back to the first vertex.
pub fn polygon_perimeter(points: &[WorldPoint]) -> Meters {
    if distinct_vertex_count(points) < 3 {
        return Meters::ZERO;
    }
    let n = points.len();
    (0..n).fold(Meters::ZERO, |acc, i| acc + distance(points[i], points[(i + 1) % n]))
}

/// Angle at `vertex` between the rays towards `a` and `b`, in [0, 180].
///
/// A zero-length ray yields 0° rather than NaN.
pub fn vertex_angle(a: WorldPoint, vertex: WorldPoint, b: WorldPoint) -> Degrees {
    let v = vertex.to_vec();
    let (u, w) = (a.to_vec() - v, b.to_vec() - v);
    if u.length_squared() <= COINCIDENT_EPS_SQ || w.length_squared() <= COINCIDENT_EPS_SQ {
        return Degrees(0.0);
    }
    Degrees::from_radians(u.perp_dot(w).abs().atan2(u.dot(w)))
}

/// Vertex average, used to anchor polygon labels
pub fn centroid(points: &[WorldPoint]) -> Option<WorldPoint> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(DVec2::ZERO, |acc, p| acc + p.to_vec());
    Some(WorldPoint::from_vec(sum / points.len() as f64))
}

/// Raw kernel output for `kind` in world units (square units for area, degrees for angle).
///
/// Too few points measure as zero so a half-drawn shape can still be previewed.
pub fn measure(kind: MeasurementKind, points: &[WorldPoint]) -> f64 {
    match kind {
        MeasurementKind::Distance | MeasurementKind::Clearance => match points {
            [a, b, ..] => distance(*a, *b).raw(),
            _ => 0.0,
        },
        MeasurementKind::Area => polygon_area(points),
        MeasurementKind::Perimeter => polygon_perimeter(points).raw(),
        MeasurementKind::Angle => match points {
            [a, v, b, ..] => vertex_angle(*a, *v, *b).raw(),
            _ => 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::wpt;

    fn unit_square() -> Vec<WorldPoint> {
        vec![wpt(0.0, 0.0), wpt(1.0, 0.0), wpt(1.0, 1.0), wpt(0.0, 1.0)]
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== distance ====================

    #[test]
    fn distance_three_four_five() {
        assert_eq!(distance(wpt(0.0, 0.0), wpt(3.0, 4.0)), Meters(5.0));
    }

    #[test]
    fn distance_is_symmetric() {
        let pts = [wpt(0.0, 0.0), wpt(1.5, -2.25), wpt(-7.0, 3.125), wpt(1e3, 1e-3)];
        for a in pts {
            for b in pts {
                assert_eq!(distance(a, b), distance(b, a));
            }
        }
    }

    #[test]
    fn coincident_points_have_zero_distance() {
        assert_eq!(distance(wpt(2.0, 2.0), wpt(2.0, 2.0)), Meters::ZERO);
    }

    // ==================== area / perimeter ====================

    #[test]
    fn unit_square_area_and_perimeter() {
        let sq = unit_square();
        assert_eq!(polygon_area(&sq), 1.0);
        assert_eq!(polygon_perimeter(&sq), Meters(4.0));
    }

    #[test]
    fn area_ignores_winding() {
        let mut sq = unit_square();
        sq.reverse();
        assert_eq!(polygon_area(&sq), 1.0);
    }

    #[test]
    fn triangle_area() {
        let tri = [wpt(0.0, 0.0), wpt(4.0, 0.0), wpt(0.0, 3.0)];
        assert!(close(polygon_area(&tri), 6.0));
        assert!(close(polygon_perimeter(&tri).raw(), 12.0));
    }

    #[test]
    fn fewer_than_three_distinct_points_is_zero() {
        let pts = [wpt(0.0, 0.0), wpt(1.0, 0.0), wpt(1.0, 0.0), wpt(0.0, 0.0)];
        assert_eq!(distinct_vertex_count(&pts), 2);
        assert_eq!(polygon_area(&pts), 0.0);
        assert_eq!(polygon_perimeter(&pts), Meters::ZERO);
        assert_eq!(polygon_area(&pts[..2]), 0.0);
    }

    #[test]
    fn alternating_pair_is_degenerate() {
        let pts = [wpt(0.0, 0.0), wpt(3.0, 0.0), wpt(0.0, 0.0), wpt(3.0, 0.0)];
        assert_eq!(distinct_vertex_count(&pts), 2);
        assert_eq!(polygon_perimeter(&pts), Meters::ZERO);
        assert_eq!(polygon_area(&pts), 0.0);
        assert_eq!(measure(MeasurementKind::Perimeter, &pts), 0.0);
    }

    #[test]
    fn duplicate_vertex_does_not_change_area() {
        let pts = [wpt(0.0, 0.0), wpt(1.0, 0.0), wpt(1.0, 0.0), wpt(1.0, 1.0), wpt(0.0, 1.0)];
        assert_eq!(polygon_area(&pts), 1.0);
        assert_eq!(polygon_perimeter(&pts), Meters(4.0));
    }

    #[test]
    fn collapse_duplicates_closes_ring() {
        let pts = [wpt(0.0, 0.0), wpt(0.0, 0.0), wpt(2.0, 0.0), wpt(2.0, 2.0), wpt(0.0, 0.0)];
        assert_eq!(collapse_duplicates(&pts), vec![wpt(0.0, 0.0), wpt(2.0, 0.0), wpt(2.0, 2.0)]);
    }

    // ==================== angle ====================

    #[test]
    fn right_angle() {
        let a = vertex_angle(wpt(1.0, 0.0), wpt(0.0, 0.0), wpt(0.0, 1.0));
        assert!(close(a.raw(), 90.0), "got {a}");
    }

    #[test]
    fn straight_and_folded_angles() {
        let straight = vertex_angle(wpt(-1.0, 0.0), wpt(0.0, 0.0), wpt(1.0, 0.0));
        assert!(close(straight.raw(), 180.0));
        let folded = vertex_angle(wpt(1.0, 0.0), wpt(0.0, 0.0), wpt(2.0, 0.0));
        assert!(close(folded.raw(), 0.0));
    }

    #[test]
    fn angle_is_unsigned() {
        let cw = vertex_angle(wpt(0.0, 1.0), wpt(0.0, 0.0), wpt(1.0, 0.0));
        let ccw = vertex_angle(wpt(1.0, 0.0), wpt(0.0, 0.0), wpt(0.0, 1.0));
        assert_eq!(cw, ccw);
    }

    #[test]
    fn zero_length_ray_is_zero_degrees() {
        let a = vertex_angle(wpt(0.0, 0.0), wpt(0.0, 0.0), wpt(0.0, 1.0));
        assert_eq!(a, Degrees(0.0));
        assert!(!a.raw().is_nan());
    }

    // ==================== dispatch ====================

    #[test]
    fn measure_dispatches_by_kind() {
        let sq = unit_square();
        assert_eq!(measure(MeasurementKind::Area, &sq), 1.0);
        assert_eq!(measure(MeasurementKind::Perimeter, &sq), 4.0);
        assert_eq!(measure(MeasurementKind::Distance, &sq[..2]), 1.0);
        assert_eq!(measure(MeasurementKind::Clearance, &sq[..2]), 1.0);
        assert!(close(measure(MeasurementKind::Angle, &sq[..3]), 90.0));
    }

    #[test]
    fn measure_with_too_few_points_is_zero() {
        let one = [wpt(1.0, 1.0)];
        for kind in MeasurementKind::ALL {
            assert_eq!(measure(kind, &one), 0.0);
            assert_eq!(measure(kind, &[]), 0.0);
        }
    }

    #[test]
    fn centroid_of_square() {
        assert_eq!(centroid(&unit_square()), Some(wpt(0.5, 0.5)));
        assert_eq!(centroid(&[]), None);
    }
}
