//! Segment and polygon geometry
//!
//! Segments feed the ray sensor; convex polygons (`Shape`) give the exact
//! silhouettes used for overlap tests.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::rotate_degrees;

/// Relative tolerance under which two directions are treated as parallel
const PARALLEL_EPSILON: f64 = 1e-12;

/// A closed line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Whether `p` (assumed collinear) lies within the segment's bounding box
    fn spans(&self, p: DVec2) -> bool {
        p.x >= self.start.x.min(self.end.x)
            && p.x <= self.start.x.max(self.end.x)
            && p.y >= self.start.y.min(self.end.y)
            && p.y <= self.start.y.max(self.end.y)
    }
}

/// Why two segments produced no intersection point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoIntersection {
    /// Lines are parallel, coincident, or one of them has zero length
    Parallel,
    /// The segments do not touch
    Disjoint,
}

/// Euclidean distance
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Twice the signed area of (p, q, r); zero when collinear
#[inline]
fn orientation(p: DVec2, q: DVec2, r: DVec2) -> f64 {
    (q - p).perp_dot(r - p)
}

/// Segment intersection test. Touching counts: shared endpoints, an endpoint
/// lying on the other segment and collinear overlap all return true.
pub fn intersects(a: Segment, b: Segment) -> bool {
    let d1 = orientation(b.start, b.end, a.start);
    let d2 = orientation(b.start, b.end, a.end);
    let d3 = orientation(a.start, a.end, b.start);
    let d4 = orientation(a.start, a.end, b.end);

    let straddles_b = (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0);
    let straddles_a = (d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0);
    if straddles_a && straddles_b {
        return true;
    }

    (d1 == 0.0 && b.spans(a.start))
        || (d2 == 0.0 && b.spans(a.end))
        || (d3 == 0.0 && a.spans(b.start))
        || (d4 == 0.0 && a.spans(b.end))
}

/// Intersection of the infinite lines through (p1, p2) and (p3, p4).
///
/// Fails with [`NoIntersection::Parallel`] instead of returning a NaN or a
/// far-away point when the lines do not cross at a single point.
pub fn intersection_point(
    p1: DVec2,
    p2: DVec2,
    p3: DVec2,
    p4: DVec2,
) -> Result<DVec2, NoIntersection> {
    let r = p2 - p1;
    let s = p4 - p3;
    let denom = r.perp_dot(s);
    if denom.abs() <= PARALLEL_EPSILON * r.length() * s.length() || !denom.is_finite() {
        return Err(NoIntersection::Parallel);
    }

    let t = (p3 - p1).perp_dot(s) / denom;
    let point = p1 + r * t;
    if point.is_finite() {
        Ok(point)
    } else {
        Err(NoIntersection::Parallel)
    }
}

/// Crossing point of two segments, defined only when they actually touch.
pub fn segment_intersection(a: Segment, b: Segment) -> Result<DVec2, NoIntersection> {
    if !intersects(a, b) {
        return Err(NoIntersection::Disjoint);
    }
    intersection_point(a.start, a.end, b.start, b.end)
}

/// A closed convex quadrilateral silhouette.
///
/// Vertices run top-right, bottom-right, bottom-left, top-left for
/// axis-aligned rectangles, so edges come out right, bottom, left, top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub vertices: [DVec2; 4],
}

impl Shape {
    /// Axis-aligned rectangle from its top-left corner
    pub fn rect(origin: DVec2, width: f64, height: f64) -> Self {
        let right = origin.x + width;
        let bottom = origin.y + height;
        Self {
            vertices: [
                DVec2::new(right, origin.y),
                DVec2::new(right, bottom),
                DVec2::new(origin.x, bottom),
                origin,
            ],
        }
    }

    /// Axis-aligned rectangle from its centre
    pub fn centered_rect(center: DVec2, width: f64, height: f64) -> Self {
        Self::rect(center - DVec2::new(width, height) * 0.5, width, height)
    }

    /// Rectangle centred on `center` with its `length` side along `direction`
    pub fn oriented_rect(center: DVec2, direction: DVec2, length: f64, width: f64) -> Self {
        let along = direction * (length * 0.5);
        let across = rotate_degrees(direction, 90.0) * (width * 0.5);
        Self {
            vertices: [
                center + along - across,
                center + along + across,
                center - along + across,
                center - along - across,
            ],
        }
    }

    /// Edges in vertex order, closing back to the first vertex
    pub fn edges(&self) -> [Segment; 4] {
        let v = &self.vertices;
        [
            Segment::new(v[0], v[1]),
            Segment::new(v[1], v[2]),
            Segment::new(v[2], v[3]),
            Segment::new(v[3], v[0]),
        ]
    }

    /// Projection interval of the shape onto `axis`
    fn project(&self, axis: DVec2) -> (f64, f64) {
        self.vertices
            .iter()
            .map(|v| v.dot(axis))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            })
    }

    /// Exact overlap test (separating axis theorem).
    ///
    /// Silhouettes cover the half-open area a pixel mask would, so shapes
    /// that only share an edge or a corner do not overlap. Any shared
    /// interior, however thin, does.
    pub fn overlaps(&self, other: &Shape) -> bool {
        let axes = self
            .edges()
            .into_iter()
            .chain(other.edges())
            .map(|e| (e.end - e.start).perp())
            .filter(|axis| axis.length_squared() > 0.0);

        for axis in axes {
            let (a_lo, a_hi) = self.project(axis);
            let (b_lo, b_hi) = other.project(axis);
            if a_hi <= b_lo || b_hi <= a_lo {
                return false;
            }
        }
        true
    }
}
