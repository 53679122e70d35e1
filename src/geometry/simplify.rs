//! Polyline simplification: a Douglas-Peucker reduction with a meters-based
//! tolerance, followed by a uniform decimation pass capping the output size.
//!
//! The output is always an ordered subsequence of the input, and the first
//! and last points always survive. This is the transformation applied to raw
//! route geometry before it is rendered or persisted.

use super::point::{LatLon, Point};
use super::projection::FlatProjection;

/// Parameters controlling [`simplify`].
#[derive(Clone, Copy, Debug)]
pub struct SimplifyParams {
    /// Maximum perpendicular deviation, in meters, a removed point may have
    /// from the simplified segment. Clamped to zero when negative.
    pub tolerance_meters: f64,
    /// Ceiling on the output point count, enforced by decimation after the
    /// tolerance-based reduction. Clamped to 2, since both anchors are always
    /// kept. The stride rounding may keep one extra point in rare cases.
    pub max_points: usize,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self {
            tolerance_meters: 10.0,
            max_points: 400,
        }
    }
}

/// Reduces a dense polyline to a sparser one that stays within
/// `tolerance_meters` of the original, then caps the result to roughly
/// `max_points` points.
///
/// Inputs of at most 2 points are returned unchanged. This is a total
/// function: it never fails, whatever the coordinates.
pub fn simplify(points: &[LatLon], params: &SimplifyParams) -> Vec<LatLon> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let tolerance_meters = params.tolerance_meters.max(0.0);
    let max_points = params.max_points.max(2);

    let reduced = douglas_peucker(points, tolerance_meters);
    cap_points(reduced, max_points)
}

/// Tolerance-based reduction over the flat projection anchored at the first
/// point's latitude.
fn douglas_peucker(points: &[LatLon], tolerance_meters: f64) -> Vec<LatLon> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let projection = FlatProjection::new(points[0].lat);
    let xy: Vec<Point<f64>> = points.iter().map(|p| projection.project(p)).collect();

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    split(&xy, &mut keep, 0, n - 1, tolerance_meters);

    points
        .iter()
        .zip(&keep)
        .filter(|(_, &kept)| kept)
        .map(|(p, _)| *p)
        .collect()
}

/// Recursively splits the index range `[a, b]` at its most deviating interior
/// point, marking it as kept when it exceeds the tolerance.
///
/// The strict `>` comparison makes the first index win ties, so the output is
/// deterministic.
fn split(xy: &[Point<f64>], keep: &mut [bool], a: usize, b: usize, tolerance_meters: f64) {
    let mut max_dist = 0.0;
    let mut index = None;
    for i in (a + 1)..b {
        let d = segment_distance(&xy[i], &xy[a], &xy[b]);
        if d > max_dist {
            max_dist = d;
            index = Some(i);
        }
    }

    if let Some(index) = index {
        if max_dist > tolerance_meters {
            keep[index] = true;
            split(xy, keep, a, index, tolerance_meters);
            split(xy, keep, index, b, tolerance_meters);
        }
    }
}

/// Distance from `p` to the segment `[a, b]`, in meters.
///
/// The projection parameter is clamped to `[0, 1]`: this measures against the
/// segment, not the infinite line. A degenerate chord (both endpoints equal)
/// falls back to the distance to that single point.
fn segment_distance(p: &Point<f64>, a: &Point<f64>, b: &Point<f64>) -> f64 {
    if a.x == b.x && a.y == b.y {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);
    let px = a.x + t * dx;
    let py = a.y + t * dy;
    (p.x - px).hypot(p.y - py)
}

/// Uniform decimation enforcing the point-count ceiling.
///
/// Emits every `step`-th point, then appends the final point if the stride
/// skipped past it. The result can therefore exceed `max_points` by one; this
/// stride behavior is kept as-is for compatibility with persisted routes.
fn cap_points(points: Vec<LatLon>, max_points: usize) -> Vec<LatLon> {
    if points.len() <= max_points {
        return points;
    }

    let step = (points.len() as f64 / max_points as f64).ceil() as usize;
    let mut out = Vec::with_capacity(points.len() / step + 1);
    let mut last_emitted = 0;
    for i in (0..points.len()).step_by(step) {
        out.push(points[i]);
        last_emitted = i;
    }
    if last_emitted != points.len() - 1 {
        out.push(points[points.len() - 1]);
    }
    out
}
