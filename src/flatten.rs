// Copyright 2025 Lars Brubaker
// License: MIT
//
// Cubic Bezier flattening for `Scanner::add_curve`.
//
// The scanner only consumes the parameter values a flattener picks; each
// resulting edge remembers the span of the curve it stands for.

use crate::geom::Point;

/// Fewest and most line segments one cubic is cut into.
pub const MIN_STEPS: usize = 4;
pub const MAX_STEPS: usize = 256;

/// A cubic Bezier in caller space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier {
    pub points: [Point; 4],
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        CubicBezier {
            points: [p0, p1, p2, p3],
        }
    }

    /// Evaluates the curve at `t`. Exact at both ends.
    pub fn eval(&self, t: f64) -> Point {
        let [p0, p1, p2, p3] = self.points;
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * p0.x + b * p1.x + c * p2.x + d * p3.x,
            a * p0.y + b * p1.y + c * p2.y + d * p3.y,
        )
    }

    /// Length of the control polygon, an upper bound on the arc length.
    pub fn control_polygon_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum()
    }
}

/// Picks the parameter values at which a cubic is cut into line segments.
pub trait CurveFlattener {
    /// Appends increasing parameters in (0, 1] to `out`, ending with 1.0.
    fn flatten(&self, curve: &CubicBezier, tolerance: f64, out: &mut Vec<f64>);
}

/// Cuts the curve into equal parameter steps; the step count grows with the
/// control polygon length relative to the tolerance.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformFlattener;

impl UniformFlattener {
    pub fn step_count(curve: &CubicBezier, tolerance: f64) -> usize {
        let tolerance = if tolerance > 0.0 { tolerance } else { 0.25 };
        let steps = (curve.control_polygon_length() * 0.25 / tolerance).round();
        if steps.is_finite() {
            (steps as usize).clamp(MIN_STEPS, MAX_STEPS)
        } else {
            MAX_STEPS
        }
    }
}

impl CurveFlattener for UniformFlattener {
    fn flatten(&self, curve: &CubicBezier, tolerance: f64, out: &mut Vec<f64>) {
        let n = Self::step_count(curve, tolerance);
        let step = 1.0 / n as f64;
        out.extend((1..n).map(|i| i as f64 * step));
        out.push(1.0);
    }
}
