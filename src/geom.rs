// Copyright 2025 Lars Brubaker
// License: MIT
//
// Exact geometry on the scan workspace.
//
// Workspace coordinates are integers bounded by MAX_WORKSPACE_COORD, so every
// orientation test fits an i64 and every intersection numerator fits an i128.
// Sweep order puts larger y first, then larger x.

use core::cmp::Ordering;

use crate::error::{ScanError, ScanResult};

/// Largest magnitude a workspace coordinate may take.
pub const MAX_WORKSPACE_COORD: i64 = 1 << 29;

/// A point in the integer scan workspace.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        IPoint { x, y }
    }

    #[inline]
    pub fn to_f64(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// A point in caller space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Orders two workspace points by sweep position: `Less` means `u` is reached first.
#[inline]
pub fn sweep_cmp(u: IPoint, v: IPoint) -> Ordering {
    v.y.cmp(&u.y).then(v.x.cmp(&u.x))
}

/// Returns true if u is reached strictly before v.
#[inline]
pub fn sweep_before(u: IPoint, v: IPoint) -> bool {
    u.y > v.y || (u.y == v.y && u.x > v.x)
}

/// Returns true if u is reached no later than v.
#[inline]
pub fn sweep_leq(u: IPoint, v: IPoint) -> bool {
    u.y > v.y || (u.y == v.y && u.x >= v.x)
}

/// Twice the signed area of (a, b, c). Positive when c lies left of the
/// directed line a -> b.
#[inline]
pub fn orient(a: IPoint, b: IPoint, c: IPoint) -> i64 {
    let (ax, ay) = (a.x as i64, a.y as i64);
    (b.x as i64 - ax) * (c.y as i64 - ay) - (b.y as i64 - ay) * (c.x as i64 - ax)
}

/// Integer division rounding to nearest, ties away from zero.
pub fn div_round(n: i128, d: i128) -> i128 {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    if n >= 0 {
        (n + d / 2) / d
    } else {
        -((-n + d / 2) / d)
    }
}

/// A proper crossing of two workspace segments.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Crossing {
    /// The crossing rounded to the workspace grid.
    pub point: IPoint,
    /// True when the crossing lands exactly on a grid point.
    pub exact: bool,
}

/// Returns true if segments (a0, a1) and (b0, b1) cross at a point interior
/// to both. Touching at an endpoint and collinear overlap do not count.
pub fn crosses(a0: IPoint, a1: IPoint, b0: IPoint, b1: IPoint) -> bool {
    let o1 = orient(a0, a1, b0).signum();
    let o2 = orient(a0, a1, b1).signum();
    if o1 * o2 >= 0 {
        return false;
    }
    let o3 = orient(b0, b1, a0).signum();
    let o4 = orient(b0, b1, a1).signum();
    o3 * o4 < 0
}

/// Computes the proper crossing of two workspace segments, if any.
pub fn crossing(a0: IPoint, a1: IPoint, b0: IPoint, b1: IPoint) -> Option<Crossing> {
    if !crosses(a0, a1, b0, b1) {
        return None;
    }
    let (dax, day) = (a1.x as i64 - a0.x as i64, a1.y as i64 - a0.y as i64);
    let (dbx, dby) = (b1.x as i64 - b0.x as i64, b1.y as i64 - b0.y as i64);
    let den = dax * dby - day * dbx;
    if den == 0 {
        return None;
    }
    let (wx, wy) = (b0.x as i64 - a0.x as i64, b0.y as i64 - a0.y as i64);
    let num = (wx * dby - wy * dbx) as i128;
    let den = den as i128;

    let x_num = a0.x as i128 * den + dax as i128 * num;
    let y_num = a0.y as i128 * den + day as i128 * num;
    let exact = x_num % den == 0 && y_num % den == 0;

    // A proper crossing lies inside both bounding boxes, whose corners are
    // grid points, so the rounded result stays in i32 range.
    let x = div_round(x_num, den) as i32;
    let y = div_round(y_num, den) as i32;
    Some(Crossing {
        point: IPoint::new(x, y),
        exact,
    })
}

/// Intersects the infinite lines through (a0, a1) and (b0, b1) in floating
/// point. Returns None for parallel lines.
pub fn line_intersection(a0: IPoint, a1: IPoint, b0: IPoint, b1: IPoint) -> Option<(f64, f64)> {
    let (ax, ay) = a0.to_f64();
    let (dax, day) = (a1.x as f64 - ax, a1.y as f64 - ay);
    let (dbx, dby) = (b1.x as f64 - b0.x as f64, b1.y as f64 - b0.y as f64);
    let den = dax * dby - day * dbx;
    if den == 0.0 {
        return None;
    }
    let (wx, wy) = (b0.x as f64 - ax, b0.y as f64 - ay);
    let t = (wx * dby - wy * dbx) / den;
    Some((ax + dax * t, ay + day * t))
}

/// Axis-aligned bounds of caller-space points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn empty() -> Self {
        Bounds {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn add(&mut self, p: Point) {
        if p.x < self.min.x { self.min.x = p.x; }
        if p.x > self.max.x { self.max.x = p.x; }
        if p.y < self.min.y { self.min.y = p.y; }
        if p.y > self.max.y { self.max.y = p.y; }
    }

    pub fn center(&self) -> Point {
        if self.is_empty() {
            return Point::default();
        }
        Point::new(self.min.x / 2.0 + self.max.x / 2.0, self.min.y / 2.0 + self.max.y / 2.0)
    }
}

/// Maps caller space onto the integer workspace and back.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    center: Point,
    resolution: f64,
}

impl Transform {
    /// The center is snapped to a multiple of `1 / resolution`, so input
    /// already on that grid maps onto workspace points without rounding.
    pub fn new(center: Point, resolution: f64) -> Self {
        let snap = |v: f64| (v * resolution).round() / resolution;
        Transform {
            center: Point::new(snap(center.x), snap(center.y)),
            resolution,
        }
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Rounds a caller point into the workspace, rejecting anything that does
    /// not fit the fixed-precision range.
    pub fn to_workspace(&self, p: Point) -> ScanResult<IPoint> {
        let x = ((p.x - self.center.x) * self.resolution).round();
        let y = ((p.y - self.center.y) * self.resolution).round();
        let limit = MAX_WORKSPACE_COORD as f64;
        if !x.is_finite() || !y.is_finite() || x.abs() > limit || y.abs() > limit {
            return Err(ScanError::BadNumber { x: p.x, y: p.y });
        }
        Ok(IPoint::new(x as i32, y as i32))
    }

    /// Maps workspace coordinates (possibly fractional) back to caller space.
    pub fn to_caller(&self, x: f64, y: f64) -> Point {
        Point::new(x / self.resolution + self.center.x, y / self.resolution + self.center.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> IPoint {
        IPoint::new(x, y)
    }

    #[test]
    fn sweep_order_is_y_descending_then_x_descending() {
        assert!(sweep_before(p(0, 10), p(0, 0)));
        assert!(sweep_before(p(5, 0), p(1, 0)));
        assert!(!sweep_before(p(1, 0), p(1, 0)));
        assert!(sweep_leq(p(1, 0), p(1, 0)));
        assert_eq!(sweep_cmp(p(3, 3), p(-100, 2)), Ordering::Less);
        assert_eq!(sweep_cmp(p(3, 3), p(4, 3)), Ordering::Greater);
    }

    #[test]
    fn orient_sign() {
        assert!(orient(p(0, 0), p(10, 0), p(5, 5)) > 0);
        assert!(orient(p(0, 0), p(10, 0), p(5, -5)) < 0);
        assert_eq!(orient(p(0, 0), p(10, 0), p(20, 0)), 0);
    }

    #[test]
    fn div_round_nearest() {
        assert_eq!(div_round(7, 2), 4);
        assert_eq!(div_round(-7, 2), -4);
        assert_eq!(div_round(5, 3), 2);
        assert_eq!(div_round(4, 3), 1);
        assert_eq!(div_round(4, -3), -1);
        assert_eq!(div_round(0, 5), 0);
    }

    #[test]
    fn crossing_exact_center() {
        let c = crossing(p(0, 0), p(10, 10), p(0, 10), p(10, 0)).unwrap();
        assert_eq!(c.point, p(5, 5));
        assert!(c.exact);
    }

    #[test]
    fn crossing_rounded() {
        // Diagonals of a 3x3 box meet at (1.5, 1.5).
        let c = crossing(p(0, 0), p(3, 3), p(0, 3), p(3, 0)).unwrap();
        assert!(!c.exact);
        assert_eq!(c.point, p(2, 2));
    }

    #[test]
    fn touching_is_not_crossing() {
        assert!(crossing(p(0, 0), p(10, 10), p(10, 10), p(20, 0)).is_none());
        assert!(crossing(p(0, 0), p(10, 10), p(5, 5), p(20, 0)).is_none());
        assert!(crossing(p(0, 0), p(10, 0), p(2, 0), p(8, 0)).is_none());
    }

    #[test]
    fn line_intersection_parallel() {
        assert!(line_intersection(p(0, 0), p(10, 0), p(0, 1), p(10, 1)).is_none());
        let (x, y) = line_intersection(p(0, 0), p(3, 3), p(0, 3), p(3, 0)).unwrap();
        assert!((x - 1.5).abs() < 1e-12 && (y - 1.5).abs() < 1e-12);
    }

    #[test]
    fn transform_round_trip() {
        let t = Transform::new(Point::new(5.0, 5.0), 256.0);
        let w = t.to_workspace(Point::new(10.0, 0.0)).unwrap();
        assert_eq!(w, p(1280, -1280));
        let back = t.to_caller(w.x as f64, w.y as f64);
        assert_eq!(back, Point::new(10.0, 0.0));
    }

    #[test]
    fn transform_center_sits_on_the_grid() {
        let t = Transform::new(Point::new(0.3, -0.7), 1.0);
        assert_eq!(t.to_caller(0.0, 0.0), Point::new(0.0, -1.0));
        assert_eq!(t.to_workspace(Point::new(1.0, 1.0)).unwrap(), p(1, 2));

        let t = Transform::new(Point::new(-1.0, 1.5), 1.0);
        assert_eq!(t.to_workspace(Point::new(0.0, 1.0)).unwrap(), p(1, -1));
        assert_eq!(t.to_workspace(Point::new(0.0, 2.0)).unwrap(), p(1, 0));
    }

    #[test]
    fn transform_rejects_out_of_range() {
        let t = Transform::new(Point::default(), 256.0);
        assert!(matches!(
            t.to_workspace(Point::new(1.0e7, 0.0)),
            Err(ScanError::BadNumber { .. })
        ));
        assert!(t.to_workspace(Point::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn bounds_center() {
        let mut b = Bounds::empty();
        assert!(b.is_empty());
        b.add(Point::new(-2.0, 4.0));
        b.add(Point::new(6.0, 0.0));
        assert_eq!(b.center(), Point::new(2.0, 2.0));
    }
}
