// Copyright 2025 Lars Brubaker
// License: MIT
//
// Builds monotone chains from a stream of figure points and seeds the
// master heap with them.
//
// Each figure is cut at its local extrema in sweep order. A run that goes
// down the page becomes a chain in figure order; a run that goes up is
// stored top-down and flagged REVERSED. When a closed figure's first and
// last runs go the same way they are joined into one chain.

use log::trace;

use crate::chain::{Chain, ChainFlags, ChainIdx};
use crate::error::ScanResult;
use crate::geom::{sweep_before, IPoint, Point, Transform};
use crate::pool::{Pools, INVALID};
use crate::priorityq::{EventKey, PriorityQ};
use crate::vertex::{CurveFragment, CurveIdx, VertexFlags, VertexIdx};

pub struct ChainList {
    transform: Transform,
    shape: u8,
    /// Figure start point and its flags.
    start: IPoint,
    start_flags: VertexFlags,
    /// Most recent distinct point, and the vertex standing for it in the
    /// current chain (INVALID before the first edge).
    last: IPoint,
    last_flags: VertexFlags,
    last_vertex: VertexIdx,
    open: bool,
    /// Chains of the current figure, in creation order.
    figure: Vec<ChainIdx>,
    current: ChainIdx,
    /// Total chains handed to the master heap.
    emitted: usize,
}

impl ChainList {
    pub fn new(transform: Transform) -> Self {
        ChainList {
            transform,
            shape: 0,
            start: IPoint::default(),
            start_flags: VertexFlags::empty(),
            last: IPoint::default(),
            last_flags: VertexFlags::empty(),
            last_vertex: INVALID,
            open: false,
            figure: Vec::new(),
            current: INVALID,
            emitted: 0,
        }
    }

    pub fn chain_count(&self) -> usize {
        self.emitted
    }

    pub fn set_shape(&mut self, shape: u8) {
        self.shape = shape;
    }

    pub fn start_figure(&mut self, p: Point, smooth: bool) -> ScanResult<()> {
        let p = self.transform.to_workspace(p)?;
        self.start = p;
        self.start_flags = smooth_flag(smooth);
        self.last = p;
        self.last_flags = self.start_flags;
        self.last_vertex = INVALID;
        self.figure.clear();
        self.current = INVALID;
        self.open = true;
        Ok(())
    }

    /// Adds the next figure point. `curve` describes the edge arriving at it.
    pub fn add_vertex(
        &mut self,
        pools: &mut Pools,
        p: Point,
        curve: Option<CurveFragment>,
        smooth: bool,
    ) -> ScanResult<()> {
        let p = self.transform.to_workspace(p)?;
        self.push_point(pools, p, curve, smooth_flag(smooth), VertexFlags::empty())
    }

    fn push_point(
        &mut self,
        pools: &mut Pools,
        p: IPoint,
        curve: Option<CurveFragment>,
        flags: VertexFlags,
        edge_flags: VertexFlags,
    ) -> ScanResult<()> {
        if p == self.last {
            // Zero-length edge: keep the point, drop the edge.
            self.last_flags |= flags;
            if self.last_vertex == INVALID {
                self.start_flags |= flags;
            } else {
                pools.verts[self.last_vertex].flags |= flags;
            }
            return Ok(());
        }
        let curve: CurveIdx = match curve {
            Some(frag) => pools.curves.alloc(frag)?,
            None => INVALID,
        };
        let down = sweep_before(self.last, p);

        let extend = self.current != INVALID && pools.chains[self.current].is_reversed() != down;
        if extend {
            let c = self.current;
            if down {
                let tail = pools.chains[c].tail;
                let v = pools.new_vertex(p, flags | edge_flags, curve)?;
                link(pools, tail, v);
                pools.chains[c].tail = v;
                self.last_vertex = v;
            } else {
                let head = pools.chains[c].head;
                let v = pools.new_vertex(p, flags, INVALID)?;
                let old = &mut pools.verts[head];
                old.curve = curve;
                old.flags |= edge_flags;
                link(pools, v, head);
                let ch = &mut pools.chains[c];
                ch.head = v;
                ch.cursor = v;
                self.last_vertex = v;
            }
        } else {
            let from = pools.new_vertex(self.last, self.last_flags, INVALID)?;
            let c = if down {
                let to = pools.new_vertex(p, flags | edge_flags, curve)?;
                link(pools, from, to);
                self.last_vertex = to;
                pools.chains.alloc(Chain::new(from, to, self.shape, ChainFlags::empty()))?
            } else {
                let to = pools.new_vertex(p, flags, INVALID)?;
                let tail = &mut pools.verts[from];
                tail.curve = curve;
                tail.flags |= edge_flags;
                link(pools, to, from);
                self.last_vertex = to;
                pools.chains.alloc(Chain::new(to, from, self.shape, ChainFlags::REVERSED))?
            };
            self.figure.push(c);
            self.current = c;
        }
        self.last = p;
        self.last_flags = flags;
        Ok(())
    }

    /// Closes the figure (explicitly or implicitly for open figures), joins
    /// its first and last runs if they continue each other, and queues every
    /// chain by its head point.
    pub fn end_figure(
        &mut self,
        pools: &mut Pools,
        closed: bool,
        master: &mut PriorityQ<EventKey>,
    ) -> ScanResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        if self.figure.is_empty() {
            return Ok(());
        }
        if self.last != self.start {
            let edge = if closed {
                VertexFlags::empty()
            } else {
                VertexFlags::CLOSING_EDGE
            };
            self.push_point(pools, self.start, None, self.start_flags, edge)?;
        }

        let n = self.figure.len();
        if n >= 2 {
            let (first, last) = (self.figure[0], self.figure[n - 1]);
            let reversed = pools.chains[first].is_reversed();
            if reversed == pools.chains[last].is_reversed() {
                if reversed {
                    pools.append_chain(first, last);
                    self.figure.pop();
                } else {
                    pools.append_chain(last, first);
                    self.figure.remove(0);
                }
            }
        }

        for &c in &self.figure {
            let head = pools.chains[c].head;
            master.insert(EventKey {
                point: pools.verts[head].point,
                chain: c,
            });
        }
        self.emitted += self.figure.len();
        trace!(
            "figure closed={} chains={} shape={}",
            closed,
            self.figure.len(),
            self.shape
        );
        self.figure.clear();
        self.current = INVALID;
        Ok(())
    }
}

#[inline]
fn smooth_flag(smooth: bool) -> VertexFlags {
    if smooth {
        VertexFlags::SMOOTH
    } else {
        VertexFlags::empty()
    }
}

/// Links `upper -> lower` in chain order; the edge is its own input segment.
fn link(pools: &mut Pools, upper: VertexIdx, lower: VertexIdx) {
    let u = &mut pools.verts[upper];
    u.next = lower;
    u.seg_base = upper;
    u.seg_tip = lower;
    pools.verts[lower].prev = upper;
}
