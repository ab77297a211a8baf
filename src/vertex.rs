// Copyright 2025 Lars Brubaker
// License: MIT
//
// Workspace vertices and the records hanging off them.
//
// A vertex sits in two link sets. `next`/`prev` is the chain order (down the
// page, head to tail). `seg_base`/`seg_tip` name the endpoints of the input
// segment the edge *leaving* this vertex was cut from, so an edge split many
// times by intersections still knows its original line.

use bitflags::bitflags;

use crate::flatten::CubicBezier;
use crate::geom::IPoint;
use crate::pool::INVALID;

/// Index into the vertex pool.
pub type VertexIdx = u32;

/// Index into the curve-fragment pool.
pub type CurveIdx = u32;

/// How a vertex came to exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum VertexKind {
    /// An input point (or a copy of one made by a split).
    #[default]
    Endpoint,
    /// A crossing that lands exactly on the workspace grid.
    ExactIntersection,
    /// A crossing rounded to the grid; `approx` carries the true location.
    Intersection,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VertexFlags: u8 {
        /// The caller asked for a smooth join at this point.
        const SMOOTH       = 0x01;
        /// The edge arriving at this vertex closes an open figure.
        const CLOSING_EDGE = 0x02;
    }
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub point: IPoint,
    /// Unrounded workspace location of an inexact intersection.
    pub approx: Option<(f64, f64)>,
    pub kind: VertexKind,
    pub flags: VertexFlags,
    /// Curve fragment of the edge arriving at this vertex, or INVALID.
    pub curve: CurveIdx,
    pub next: VertexIdx,
    pub prev: VertexIdx,
    pub seg_base: VertexIdx,
    pub seg_tip: VertexIdx,
}

impl Vertex {
    pub fn new(point: IPoint) -> Self {
        Vertex {
            point,
            approx: None,
            kind: VertexKind::Endpoint,
            flags: VertexFlags::empty(),
            curve: INVALID,
            next: INVALID,
            prev: INVALID,
            seg_base: INVALID,
            seg_tip: INVALID,
        }
    }

    #[inline]
    pub fn is_segment_endpoint(&self) -> bool {
        self.kind == VertexKind::Endpoint
    }

    #[inline]
    pub fn is_exact_intersection(&self) -> bool {
        self.kind == VertexKind::ExactIntersection
    }

    /// True when `point` is the vertex's true location.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.kind != VertexKind::Intersection
    }

    /// Location to report: the approximate point for inexact intersections,
    /// the grid point otherwise.
    pub fn location(&self) -> (f64, f64) {
        match self.approx {
            Some(a) if !self.is_exact() => a,
            _ => self.point.to_f64(),
        }
    }
}

/// Span of an input cubic that a flattened edge approximates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurveFragment {
    pub bezier: CubicBezier,
    pub t_start: f64,
    pub t_end: f64,
}

/// Where a crossing was placed relative to the two edges tested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntersectionLocation {
    /// Strictly inside both edges.
    Interior,
    /// Rounded onto (or before) the current sweep point, so it was moved there.
    AtSweepPoint,
    /// Clamped to the lower end of the left edge.
    AtLeftEnd,
    /// Clamped to the lower end of the right edge.
    AtRightEnd,
}

/// The outcome of testing two adjacent edges, each named by the base vertex
/// of its input segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionRecord {
    pub left_base: VertexIdx,
    pub right_base: VertexIdx,
    pub location: IntersectionLocation,
    /// Grid point used for topology.
    pub point: IPoint,
    /// Unrounded workspace point, used only for output.
    pub approx: Option<(f64, f64)>,
    pub exact: bool,
}
