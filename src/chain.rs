// Copyright 2025 Lars Brubaker
// License: MIT
//
// Chains: maximal runs of vertices monotone in sweep order, plus the graph
// surgery the sweep performs on them (split, insert, append).
//
// A chain's `cursor` is the upper vertex of its current edge; the edge runs
// from the cursor to `next(cursor)`. `winding` is the per-shape winding number
// of the region just right of the chain.

use bitflags::bitflags;

use crate::error::ScanResult;
use crate::geom::IPoint;
use crate::pool::{Pool, Pools, INVALID};
use crate::priorityq::INVALID_HANDLE;
use crate::vertex::{CurveIdx, Vertex, VertexFlags, VertexIdx, VertexKind};

/// Index into the chain pool.
pub type ChainIdx = u32;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChainFlags: u8 {
        /// Figure order runs up the page; the chain stores it top-down.
        const REVERSED          = 0x01;
        /// Shares its current edges with the chain to its right.
        const COINCIDENT        = 0x02;
        /// Its own shape is on the same side of it on both sides.
        const SELF_REDUNDANT    = 0x04;
        /// Coincident chains whose contributions sum to zero.
        const CANCELLED         = 0x08;
        /// The filled region lies left of the chain.
        const RIGHT_SIDE        = 0x10;
        /// Its own shape changes across it, the combined result does not.
        const BOOLEAN_REDUNDANT = 0x20;

        const CLASSIFICATION = Self::COINCIDENT.bits()
            | Self::SELF_REDUNDANT.bits()
            | Self::CANCELLED.bits()
            | Self::RIGHT_SIDE.bits()
            | Self::BOOLEAN_REDUNDANT.bits();
    }
}

/// Which side of the filled region a boundary chain bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// Fill lies to the right of the chain.
    Left,
    /// Fill lies to the left of the chain.
    Right,
}

#[derive(Clone, Debug)]
pub struct Chain {
    pub head: VertexIdx,
    pub tail: VertexIdx,
    pub cursor: VertexIdx,
    /// Active-list neighbours, INVALID at either end.
    pub left: ChainIdx,
    pub right: ChainIdx,
    pub flags: ChainFlags,
    pub shape: u8,
    pub winding: [i32; 2],
    /// Candidate-heap handle, INVALID_HANDLE when not queued.
    pub candidate: i32,
    pub active: bool,
    pub finished: bool,
}

impl Chain {
    pub fn new(head: VertexIdx, tail: VertexIdx, shape: u8, flags: ChainFlags) -> Self {
        Chain {
            head,
            tail,
            cursor: head,
            left: INVALID,
            right: INVALID,
            flags,
            shape,
            winding: [0; 2],
            candidate: INVALID_HANDLE,
            active: false,
            finished: false,
        }
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.flags.contains(ChainFlags::REVERSED)
    }

    /// Signed crossing count this chain adds, per shape, moving left to right.
    pub fn contribution(&self) -> [i32; 2] {
        let mut c = [0; 2];
        c[self.shape as usize] = if self.is_reversed() { -1 } else { 1 };
        c
    }

    /// Winding number of the region just left of the chain.
    pub fn left_winding(&self) -> [i32; 2] {
        let c = self.contribution();
        [self.winding[0] - c[0], self.winding[1] - c[1]]
    }

    pub fn is_boundary(&self) -> bool {
        !self.flags.intersects(
            ChainFlags::COINCIDENT
                | ChainFlags::SELF_REDUNDANT
                | ChainFlags::CANCELLED
                | ChainFlags::BOOLEAN_REDUNDANT,
        )
    }

    pub fn side(&self) -> Side {
        if self.flags.contains(ChainFlags::RIGHT_SIDE) {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// Walks a chain's vertices head to tail.
pub struct ChainVertices<'a> {
    verts: &'a Pool<Vertex>,
    curr: VertexIdx,
}

impl<'a> Iterator for ChainVertices<'a> {
    type Item = VertexIdx;

    fn next(&mut self) -> Option<VertexIdx> {
        if self.curr == INVALID {
            return None;
        }
        let v = self.curr;
        self.curr = self.verts[v].next;
        Some(v)
    }
}

impl Pools {
    pub fn chain_vertices(&self, c: ChainIdx) -> ChainVertices<'_> {
        ChainVertices {
            verts: &self.verts,
            curr: self.chains[c].head,
        }
    }

    #[inline]
    pub fn cursor_point(&self, c: ChainIdx) -> IPoint {
        self.verts[self.chains[c].cursor].point
    }

    /// Lower vertex of the chain's current edge, INVALID at the tail.
    #[inline]
    pub fn next_vertex(&self, c: ChainIdx) -> VertexIdx {
        self.verts[self.chains[c].cursor].next
    }

    /// Current edge as (upper, lower) points. At the tail both are the tail.
    pub fn edge(&self, c: ChainIdx) -> (IPoint, IPoint) {
        let cur = self.chains[c].cursor;
        let next = self.verts[cur].next;
        let p = self.verts[cur].point;
        if next == INVALID {
            (p, p)
        } else {
            (p, self.verts[next].point)
        }
    }

    /// Endpoints of the input segment the chain's current edge was cut from.
    pub fn segment(&self, c: ChainIdx) -> (IPoint, IPoint) {
        let v = &self.verts[self.chains[c].cursor];
        if v.seg_base == INVALID || v.seg_tip == INVALID {
            return self.edge(c);
        }
        (self.verts[v.seg_base].point, self.verts[v.seg_tip].point)
    }

    /// Inserts a vertex at `point` on the edge leaving `after`. The new vertex
    /// belongs to the same input segment and curve fragment as that edge.
    pub fn insert_vertex(
        &mut self,
        after: VertexIdx,
        point: IPoint,
        kind: VertexKind,
        approx: Option<(f64, f64)>,
    ) -> ScanResult<VertexIdx> {
        let prev = &self.verts[after];
        let next = prev.next;
        let (seg_base, seg_tip) = (prev.seg_base, prev.seg_tip);
        let (curve, closing) = if next == INVALID {
            (INVALID, VertexFlags::empty())
        } else {
            let n = &self.verts[next];
            (n.curve, n.flags & VertexFlags::CLOSING_EDGE)
        };
        let v = self.verts.alloc(Vertex {
            point,
            approx,
            kind,
            flags: closing,
            curve,
            next,
            prev: after,
            seg_base,
            seg_tip,
        })?;
        self.verts[after].next = v;
        if next != INVALID {
            self.verts[next].prev = v;
        }
        Ok(v)
    }

    /// Splits chain `c` at interior vertex `v`. `c` keeps the part above `v`;
    /// the returned chain starts at a copy of `v` and takes the old tail.
    pub fn split_chain(&mut self, c: ChainIdx, v: VertexIdx) -> ScanResult<ChainIdx> {
        let orig = self.verts[v].clone();
        let copy = self.verts.alloc(Vertex {
            flags: orig.flags - VertexFlags::CLOSING_EDGE,
            curve: INVALID,
            prev: INVALID,
            ..orig
        })?;
        if orig.next != INVALID {
            self.verts[orig.next].prev = copy;
        }
        let cut = &mut self.verts[v];
        cut.next = INVALID;
        cut.seg_base = INVALID;
        cut.seg_tip = INVALID;

        let old = &self.chains[c];
        let lower = Chain::new(copy, old.tail, old.shape, old.flags & ChainFlags::REVERSED);
        let lower = self.chains.alloc(lower)?;
        self.chains[c].tail = v;
        Ok(lower)
    }

    /// Joins `lower` onto the bottom of `upper`, whose tail sits on lower's
    /// head. Lower's head vertex is dropped and `lower` must not be used again.
    pub fn append_chain(&mut self, upper: ChainIdx, lower: ChainIdx) {
        let join = self.chains[upper].tail;
        let drop = self.chains[lower].head;
        let dropped = self.verts[drop].clone();
        {
            let j = &mut self.verts[join];
            j.next = dropped.next;
            j.seg_base = if dropped.seg_base == drop { join } else { dropped.seg_base };
            j.seg_tip = dropped.seg_tip;
            j.flags |= dropped.flags & VertexFlags::SMOOTH;
        }
        if dropped.next != INVALID {
            self.verts[dropped.next].prev = join;
        }
        self.chains[upper].tail = self.chains[lower].tail;
    }

    /// Allocates a vertex carrying an optional curve fragment for its
    /// arriving edge.
    pub fn new_vertex(&mut self, point: IPoint, flags: VertexFlags, curve: CurveIdx) -> ScanResult<VertexIdx> {
        let mut v = Vertex::new(point);
        v.flags = flags;
        v.curve = curve;
        self.verts.alloc(v)
    }
}
