// Copyright 2025 Lars Brubaker
// Shared test utilities for edgescan tests.

#![allow(dead_code)]

use edgescan::{CombineMode, FillMode, Point, ScanConfig, Scanner};

pub fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Axis-aligned rectangle, counter-clockwise.
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    pts(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Shoelace area of a closed polygon; positive when counter-clockwise.
pub fn polygon_signed_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    let mut twice = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}

/// Scans `figures` as a single shape under `mode`.
pub fn scan_one(figures: &[Vec<Point>], mode: FillMode, config: ScanConfig) -> Scanner {
    let mut s = Scanner::new(config);
    s.set_fill_mode(mode).unwrap();
    for f in figures {
        s.add_contour(f, true).unwrap();
    }
    s.scan().unwrap_or_else(|e| panic!("scan failed: {}", e));
    s
}

/// Scans two shapes combined with `combine`, both under `mode`.
pub fn scan_two(
    a: &[Vec<Point>],
    b: &[Vec<Point>],
    mode: FillMode,
    combine: CombineMode,
    config: ScanConfig,
) -> Scanner {
    let mut s = Scanner::new(config.with_combine(combine));
    s.set_fill_mode(mode).unwrap();
    for f in a {
        s.add_contour(f, true).unwrap();
    }
    s.set_shape(1).unwrap();
    s.set_fill_mode(mode).unwrap();
    for f in b {
        s.add_contour(f, true).unwrap();
    }
    s.scan().unwrap_or_else(|e| panic!("scan failed: {}", e));
    s
}

pub fn assert_area_approx(actual: f64, expected: f64, tolerance: f64, label: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{}: expected area ~{}, got {} (diff={})",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}

fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True when the open segments `a0a1` and `b0b1` cross at a single interior
/// point. Values within `eps` of zero count as touching.
fn properly_cross(a0: Point, a1: Point, b0: Point, b1: Point, eps: f64) -> bool {
    let d0 = orient(a0, a1, b0);
    let d1 = orient(a0, a1, b1);
    let d2 = orient(b0, b1, a0);
    let d3 = orient(b0, b1, a1);
    let strict = |v: f64| v.abs() > eps;
    strict(d0)
        && strict(d1)
        && strict(d2)
        && strict(d3)
        && (d0 > 0.0) != (d1 > 0.0)
        && (d2 > 0.0) != (d3 > 0.0)
}

/// Checks the structural guarantees of a finished scan: every chain has an
/// edge, runs down the page, and no two output edges cross. Checked on the
/// grid points the topology was built from.
pub fn verify_valid_output(s: &Scanner) {
    let mut edges: Vec<(Point, Point)> = Vec::new();

    for chain in s.chains() {
        let points: Vec<Point> = chain.vertices().map(|v| v.grid).collect();
        assert!(points.len() >= 2, "chain without an edge: {:?}", chain);
        for w in points.windows(2) {
            let (a, b) = (w[0], w[1]);
            assert!(
                b.y < a.y || (b.y == a.y && b.x < a.x),
                "chain goes up the page at {:?} -> {:?}",
                a,
                b
            );
            edges.push((a, b));
        }
    }

    let eps = 1e-12;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (a0, a1) = edges[i];
            let (b0, b1) = edges[j];
            assert!(
                !properly_cross(a0, a1, b0, b1, eps),
                "output edges cross: {:?}-{:?} and {:?}-{:?}",
                a0,
                a1,
                b0,
                b1
            );
        }
    }
}

/// Filled area of `figures` under `mode`, computed without the scanner.
///
/// The plane is cut into vertical slabs at every vertex and every pairwise
/// edge intersection. No two edges cross inside a slab, so the filled height
/// at the slab's middle times its width is exact.
pub fn reference_area(figures: &[Vec<Point>], mode: FillMode) -> f64 {
    let mut edges: Vec<(Point, Point)> = Vec::new();
    for f in figures {
        for i in 0..f.len() {
            let (a, b) = (f[i], f[(i + 1) % f.len()]);
            if a != b {
                edges.push((a, b));
            }
        }
    }

    let mut xs: Vec<f64> = edges.iter().flat_map(|&(a, b)| [a.x, b.x]).collect();
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let ((a0, a1), (b0, b1)) = (edges[i], edges[j]);
            let (dax, day) = (a1.x - a0.x, a1.y - a0.y);
            let (dbx, dby) = (b1.x - b0.x, b1.y - b0.y);
            let den = dax * dby - day * dbx;
            if den == 0.0 {
                continue;
            }
            let (wx, wy) = (b0.x - a0.x, b0.y - a0.y);
            let t = (wx * dby - wy * dbx) / den;
            let u = (wx * day - wy * dax) / den;
            if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
                xs.push(a0.x + dax * t);
            }
        }
    }
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let mut area = 0.0;
    let mut hits: Vec<(f64, i32)> = Vec::new();
    for w in xs.windows(2) {
        let (l, r) = (w[0], w[1]);
        let mid = 0.5 * (l + r);
        hits.clear();
        for &(a, b) in &edges {
            if a.x.min(b.x) < mid && mid < a.x.max(b.x) {
                let y = a.y + (b.y - a.y) * (mid - a.x) / (b.x - a.x);
                hits.push((y, if b.x > a.x { 1 } else { -1 }));
            }
        }
        hits.sort_by(|p, q| p.0.total_cmp(&q.0));
        let mut winding = 0;
        for k in 1..hits.len() {
            winding += hits[k - 1].1;
            let filled = match mode {
                FillMode::Alternate => winding % 2 != 0,
                FillMode::Winding => winding != 0,
            };
            if filled {
                area += (hits[k].0 - hits[k - 1].0) * (r - l);
            }
        }
    }
    area
}
