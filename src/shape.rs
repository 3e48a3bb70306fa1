//! Two dimensional outlines that can be extruded into meshes.
//!
//! The path API follows the pen model common to canvas-style drawing: a
//! current point is tracked, `line_to` draws from it and `arc` takes its
//! center relative to it. A shape is an implicitly closed contour.

use std::f32::consts::TAU;

use glam::Vec2;
use thiserror::Error;

/// Default number of samples per curve; arcs take twice as many.
pub const DEFAULT_CURVE_SEGMENTS: usize = 12;

const EPSILON: f32 = 1e-6;

/// Errors raised while turning shapes into geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("shape coordinate is not finite")]
    NonFiniteCoordinate,
    #[error("shape needs at least 3 distinct points, found {0}")]
    TooFewPoints(usize),
    #[error("extrusion depth {0} must be finite and non-negative")]
    InvalidDepth(f32),
    #[error("extrusion needs at least one step")]
    ZeroSteps,
    #[error("curve segment count must be positive")]
    ZeroCurveSegments,
}

/// One segment of a shape outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line {
        from: Vec2,
        to: Vec2,
    },
    Arc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    },
}

impl Curve {
    pub fn point_at(&self, t: f32) -> Vec2 {
        match *self {
            Curve::Line { from, to } => {
                if t >= 1.0 {
                    to
                } else {
                    from.lerp(to, t)
                }
            }
            Curve::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                clockwise,
            } => {
                let angle = start_angle + t * arc_sweep(start_angle, end_angle, clockwise);
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            }
        }
    }

    pub fn start(&self) -> Vec2 {
        self.point_at(0.0)
    }

    pub fn end(&self) -> Vec2 {
        self.point_at(1.0)
    }

    fn divisions(&self, curve_segments: usize) -> usize {
        match self {
            Curve::Line { .. } => 1,
            Curve::Arc { .. } => curve_segments * 2,
        }
    }
}

/// Signed sweep of an arc, normalised the way canvas arcs are: a full turn
/// stays a full turn and clockwise arcs sweep negatively.
fn arc_sweep(start: f32, end: f32, clockwise: bool) -> f32 {
    let delta = end - start;
    if !delta.is_finite() {
        return f32::NAN;
    }
    let same_points = delta.abs() < f32::EPSILON;
    let mut delta = delta.rem_euclid(TAU);
    if delta < f32::EPSILON {
        delta = if same_points { 0.0 } else { TAU };
    }
    if clockwise && !same_points {
        delta = if delta == TAU { -TAU } else { delta - TAU };
    }
    delta
}

/// Closed 2D outline built from lines and arcs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    curves: Vec<Curve>,
    current: Vec2,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn current_point(&self) -> Vec2 {
        self.current
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.current = Vec2::new(x, y);
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        let to = Vec2::new(x, y);
        self.curves.push(Curve::Line {
            from: self.current,
            to,
        });
        self.current = to;
        self
    }

    /// Arc whose center is offset by `(x, y)` from the current point.
    pub fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    ) -> &mut Self {
        let center = self.current + Vec2::new(x, y);
        self.absarc(center.x, center.y, radius, start_angle, end_angle, clockwise)
    }

    /// Arc around an absolute center. A connecting line is inserted when the
    /// outline already has segments and does not end where the arc starts.
    pub fn absarc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    ) -> &mut Self {
        let curve = Curve::Arc {
            center: Vec2::new(x, y),
            radius,
            start_angle,
            end_angle,
            clockwise,
        };
        if !self.curves.is_empty() {
            let start = curve.start();
            if start != self.current {
                self.line_to(start.x, start.y);
            }
        }
        self.curves.push(curve);
        self.current = curve.end();
        self
    }

    /// Samples the outline into a contour without repeated consecutive
    /// points or a closing duplicate of the first point.
    pub fn extract_points(&self, curve_segments: usize) -> Result<Vec<Vec2>, GeometryError> {
        if curve_segments == 0 {
            return Err(GeometryError::ZeroCurveSegments);
        }
        let mut points: Vec<Vec2> = Vec::new();
        for curve in &self.curves {
            let divisions = curve.divisions(curve_segments);
            for step in 0..=divisions {
                let point = curve.point_at(step as f32 / divisions as f32);
                if !point.is_finite() {
                    return Err(GeometryError::NonFiniteCoordinate);
                }
                if points.last() == Some(&point) {
                    continue;
                }
                points.push(point);
            }
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        Ok(points)
    }
}

/// Shoelace area; positive for counter-clockwise contours.
pub fn signed_area(contour: &[Vec2]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|i| contour[i].perp_dot(contour[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Ear-clipping triangulation of a simple contour.
///
/// Returned triangles index into `contour` and are wound counter-clockwise
/// regardless of the contour's orientation.
pub fn triangulate(contour: &[Vec2]) -> Vec<[usize; 3]> {
    let n = contour.len();
    if n < 3 {
        return Vec::new();
    }
    let mut remaining: Vec<usize> = if signed_area(contour) >= 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };
    let mut triangles = Vec::with_capacity(n - 2);
    let mut cursor = 0;
    let mut misses = 0;

    while remaining.len() > 3 {
        let len = remaining.len();
        let prev = remaining[(cursor + len - 1) % len];
        let curr = remaining[cursor];
        let next = remaining[(cursor + 1) % len];
        if is_ear(contour, &remaining, prev, curr, next) {
            triangles.push([prev, curr, next]);
            remaining.remove(cursor);
            if cursor >= remaining.len() {
                cursor = 0;
            }
            misses = 0;
        } else {
            cursor = (cursor + 1) % len;
            misses += 1;
            if misses > len {
                // Degenerate remainder with no clean ear left.
                break;
            }
        }
    }

    for k in 1..remaining.len() - 1 {
        triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
    }
    triangles
}

fn is_ear(contour: &[Vec2], remaining: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let (a, b, c) = (contour[prev], contour[curr], contour[next]);
    if (b - a).perp_dot(c - b) <= 0.0 {
        return false;
    }
    remaining
        .iter()
        .filter(|&&k| k != prev && k != curr && k != next)
        .map(|&k| contour[k])
        .filter(|p| [a, b, c].iter().all(|v| v.distance_squared(*p) > EPSILON * EPSILON))
        .all(|p| !inside_or_on(p, a, b, c))
}

fn inside_or_on(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).perp_dot(p - a) >= 0.0
        && (c - b).perp_dot(p - b) >= 0.0
        && (a - c).perp_dot(p - c) >= 0.0
}
