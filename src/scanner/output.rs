// Copyright 2025 Lars Brubaker
// Read-only views over a finished scan, in caller space.

use super::Scanner;
use crate::chain::{Chain, ChainFlags, ChainIdx, Side};
use crate::geom::Point;
use crate::pool::INVALID;
use crate::vertex::{CurveFragment, IntersectionLocation, IntersectionRecord, VertexFlags, VertexKind};

/// One output chain. Vertices run down the page, head to tail.
#[derive(Copy, Clone)]
pub struct ChainView<'a> {
    scanner: &'a Scanner,
    idx: ChainIdx,
}

impl<'a> ChainView<'a> {
    pub(super) fn new(scanner: &'a Scanner, idx: ChainIdx) -> Self {
        ChainView { scanner, idx }
    }

    fn chain(&self) -> &'a Chain {
        &self.scanner.pools.chains[self.idx]
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexView<'a>> + 'a {
        let scanner = self.scanner;
        scanner.pools.chain_vertices(self.idx).map(move |v| {
            let vert = &scanner.pools.verts[v];
            let (x, y) = vert.location();
            let t = &scanner.transform;
            VertexView {
                point: t.to_caller(x, y),
                grid: t.to_caller(vert.point.x as f64, vert.point.y as f64),
                kind: vert.kind,
                flags: vert.flags,
                curve: if vert.curve == INVALID {
                    None
                } else {
                    scanner.pools.curves.get(vert.curve)
                },
            }
        })
    }

    pub fn flags(&self) -> ChainFlags {
        self.chain().flags
    }

    pub fn side(&self) -> Side {
        self.chain().side()
    }

    /// Per-shape winding number just right of the chain.
    pub fn winding(&self) -> [i32; 2] {
        self.chain().winding
    }

    pub fn shape(&self) -> usize {
        self.chain().shape as usize
    }

    pub fn is_reversed(&self) -> bool {
        self.chain().is_reversed()
    }

    /// Not coincident, redundant or cancelled.
    pub fn is_boundary(&self) -> bool {
        self.chain().is_boundary()
    }

    /// Signed area between the chain and the y axis: positive for chains
    /// with fill on their left.
    pub fn area_contribution(&self) -> f64 {
        let mut sum = 0.0;
        let mut prev: Option<Point> = None;
        for v in self.vertices() {
            if let Some(a) = prev {
                sum += (a.x + v.point.x) * 0.5 * (a.y - v.point.y);
            }
            prev = Some(v.point);
        }
        match self.side() {
            Side::Right => sum,
            Side::Left => -sum,
        }
    }
}

impl core::fmt::Debug for ChainView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let points: Vec<(f64, f64)> = self.vertices().map(|v| (v.point.x, v.point.y)).collect();
        f.debug_struct("ChainView")
            .field("flags", &self.flags())
            .field("winding", &self.winding())
            .field("points", &points)
            .finish()
    }
}

/// One output vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VertexView<'a> {
    /// Best known location: the unrounded crossing for inexact vertices.
    pub point: Point,
    /// Grid point the sweep used for topology.
    pub grid: Point,
    pub kind: VertexKind,
    pub flags: VertexFlags,
    /// Curve span of the edge arriving at this vertex.
    pub curve: Option<&'a CurveFragment>,
}

impl VertexView<'_> {
    pub fn is_smooth(&self) -> bool {
        self.flags.contains(VertexFlags::SMOOTH)
    }

    pub fn closes_figure(&self) -> bool {
        self.flags.contains(VertexFlags::CLOSING_EDGE)
    }
}

/// A resolved crossing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionView {
    /// Unrounded location when known, else the grid point used for topology.
    pub point: Point,
    /// Grid point the edges were bent to.
    pub snapped: Point,
    pub exact: bool,
    pub location: IntersectionLocation,
}

impl IntersectionView {
    pub(super) fn new(scanner: &Scanner, rec: &IntersectionRecord) -> Self {
        let t = &scanner.transform;
        let snapped = t.to_caller(rec.point.x as f64, rec.point.y as f64);
        let point = match rec.approx {
            Some((x, y)) => t.to_caller(x, y),
            None => snapped,
        };
        IntersectionView {
            point,
            snapped,
            exact: rec.exact,
            location: rec.location,
        }
    }
}
