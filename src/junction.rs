// Copyright 2025 Lars Brubaker
// License: MIT
//
// Event processing. At each distinct sweep point the junction gathers every
// chain whose current edge touches the point, splits them there so that only
// heads leave the point, classifies the heads left to right and splices them
// back into the active list. Crossings between the chains now adjacent are
// then resolved by bending both edges to a common grid point.

use core::cmp::Ordering;

use log::trace;

use crate::active::edge_side;
use crate::chain::ChainIdx;
use crate::error::{ScanError, ScanResult};
use crate::geom::{crosses, crossing, line_intersection, orient, sweep_before, sweep_leq, IPoint};
use crate::pool::INVALID;
use crate::priorityq::{EventKey, INVALID_HANDLE};
use crate::sweep::Sweep;
use crate::vertex::{IntersectionLocation, IntersectionRecord, VertexKind};

/// Chains taking part in one event, rebuilt at every sweep point.
#[derive(Clone, Debug)]
pub struct Junction {
    pub point: IPoint,
    /// Active chains just outside the run.
    pub left: ChainIdx,
    pub right: ChainIdx,
    /// Active chains whose current edge touches the point, left to right.
    pub run: Vec<ChainIdx>,
    /// Chains whose next vertex is the point (from the candidate heap).
    pub seeds: Vec<ChainIdx>,
    /// Chains leaving the point.
    pub heads: Vec<ChainIdx>,
    /// Chains ending at the point.
    pub tails: Vec<ChainIdx>,
    /// Adjacent pairs to test for crossings.
    pub(crate) pairs: Vec<(ChainIdx, ChainIdx)>,
}

impl Default for Junction {
    fn default() -> Self {
        Junction {
            point: IPoint::default(),
            left: INVALID,
            right: INVALID,
            run: Vec::new(),
            seeds: Vec::new(),
            heads: Vec::new(),
            tails: Vec::new(),
            pairs: Vec::new(),
        }
    }
}

impl Junction {
    fn reset(&mut self, p: IPoint) {
        self.point = p;
        self.left = INVALID;
        self.right = INVALID;
        self.run.clear();
        self.seeds.clear();
        self.heads.clear();
        self.tails.clear();
        self.pairs.clear();
    }
}

/// Largest distance, in workspace units, between a rounded crossing and the
/// unrounded one for the latter to be kept.
const MAX_APPROX_DRIFT: f64 = 1.0;

impl Sweep<'_> {
    pub(crate) fn process_junction(&mut self, p: IPoint) -> ScanResult<()> {
        self.collect(p)?;

        let lone = self.junction.heads.is_empty()
            && self.junction.run.len() == 1
            && self.junction.seeds.len() == 1;
        if lone {
            let c = self.junction.run[0];
            let next = self.pools.next_vertex(c);
            if next != self.pools.chains[c].tail {
                self.pools.chains[c].cursor = next;
                self.push_candidate(c)?;
                self.stats.lone_advances += 1;
                let (left, right) = (self.junction.left, self.junction.right);
                return self.resolve_crossings(&[(left, c), (c, right)]);
            }
        }

        self.split()?;
        trace!(
            "junction ({}, {}): tails={} heads={} left={} right={}",
            p.x,
            p.y,
            self.junction.tails.len(),
            self.junction.heads.len(),
            self.junction.left as i64,
            self.junction.right as i64
        );
        if (self.junction.tails.len() + self.junction.heads.len()) % 2 != 0 {
            return Err(ScanError::ScannerFailed("odd number of chains at a junction"));
        }
        self.flush()
    }

    // ─────── Collect ─────────────────────────────────────────────────────────

    fn collect(&mut self, p: IPoint) -> ScanResult<()> {
        self.junction.reset(p);

        while let Some(k) = self.candidates.minimum() {
            if k.point != p {
                break;
            }
            self.candidates.extract_min();
            self.pools.chains[k.chain].candidate = INVALID_HANDLE;
            self.junction.seeds.push(k.chain);
        }
        while let Some(k) = self.master.minimum() {
            if k.point != p {
                break;
            }
            self.master.extract_min();
            self.junction.heads.push(k.chain);
        }

        if let Some(&seed) = self.junction.seeds.first() {
            if !self.pools.chains[seed].active {
                return Err(ScanError::ScannerFailed("candidate chain is not active"));
            }
            let mut first = seed;
            loop {
                let l = self.pools.chains[first].left;
                if l == INVALID || edge_side(self.pools, l, p) != Ordering::Equal {
                    break;
                }
                first = l;
            }
            let mut c = first;
            loop {
                self.junction.run.push(c);
                let r = self.pools.chains[c].right;
                if r == INVALID || edge_side(self.pools, r, p) != Ordering::Equal {
                    break;
                }
                c = r;
            }
            let run = &self.junction.run;
            if self.junction.seeds.iter().any(|s| !run.contains(s)) {
                return Err(ScanError::ScannerFailed("junction chains are not contiguous"));
            }
            self.junction.left = self.pools.chains[first].left;
            self.junction.right = self.pools.chains[c].right;
        } else {
            let loc = self.active.locate(self.pools, p);
            self.junction.left = loc.left;
            self.junction.right = loc.right;
            if !loc.is_empty() {
                let mut c = loc.first;
                loop {
                    self.junction.run.push(c);
                    if c == loc.last {
                        break;
                    }
                    c = self.pools.chains[c].right;
                }
            }
        }
        Ok(())
    }

    // ─────── Split ───────────────────────────────────────────────────────────

    /// Takes the run out of the active list and cuts every chain in it at the
    /// junction point: the part above becomes a tail, the part below a head.
    fn split(&mut self) -> ScanResult<()> {
        let p = self.junction.point;
        let (Some(&first), Some(&last)) = (self.junction.run.first(), self.junction.run.last()) else {
            return Ok(());
        };
        for i in 0..self.junction.run.len() {
            let c = self.junction.run[i];
            let h = self.pools.chains[c].candidate;
            if h != INVALID_HANDLE {
                self.candidates.delete(h);
                self.pools.chains[c].candidate = INVALID_HANDLE;
            }
        }
        self.active.remove(&mut self.pools.chains, first, last);

        for i in 0..self.junction.run.len() {
            let c = self.junction.run[i];
            let chain = &self.pools.chains[c];
            let (cursor, head, tail) = (chain.cursor, chain.head, chain.tail);
            let next = self.pools.verts[cursor].next;
            if next == INVALID {
                return Err(ScanError::ScannerFailed("active chain has no current edge"));
            }

            let cut = if self.pools.verts[cursor].point == p {
                if cursor == head {
                    self.junction.heads.push(c);
                    continue;
                }
                cursor
            } else if self.pools.verts[next].point == p {
                if next == tail {
                    self.finish(c);
                    continue;
                }
                next
            } else {
                self.pools
                    .insert_vertex(cursor, p, VertexKind::ExactIntersection, None)?
            };
            let lower = self.pools.split_chain(c, cut)?;
            self.stats.splits += 1;
            self.finish(c);
            self.junction.heads.push(lower);
        }
        Ok(())
    }

    fn finish(&mut self, c: ChainIdx) {
        let chain = &mut self.pools.chains[c];
        chain.cursor = chain.tail;
        chain.finished = true;
        self.junction.tails.push(c);
        self.finished.push(c);
    }

    // ─────── Flush ───────────────────────────────────────────────────────────

    /// Orders the heads, classifies them and splices them in between the
    /// junction's neighbours.
    fn flush(&mut self) -> ScanResult<()> {
        let p = self.junction.point;
        let pools = &*self.pools;
        let mut heads = core::mem::take(&mut self.junction.heads);
        heads.sort_by(|&a, &b| {
            let da = pools.verts[pools.next_vertex(a)].point;
            let db = pools.verts[pools.next_vertex(b)].point;
            match orient(p, da, db) {
                o if o > 0 => Ordering::Less,
                o if o < 0 => Ordering::Greater,
                _ => {
                    let (ca, cb) = (&pools.chains[a], &pools.chains[b]);
                    (ca.shape, ca.is_reversed(), a).cmp(&(cb.shape, cb.is_reversed(), b))
                }
            }
        });

        let (left, right) = (self.junction.left, self.junction.right);
        self.active.insert(&mut self.pools.chains, left, right, &heads);

        let mut w = if left == INVALID {
            [0, 0]
        } else {
            self.pools.chains[left].winding
        };
        let mut start = 0;
        while start < heads.len() {
            let dir = self.pools.verts[self.pools.next_vertex(heads[start])].point;
            let mut end = start + 1;
            while end < heads.len() {
                let d = self.pools.verts[self.pools.next_vertex(heads[end])].point;
                if orient(p, dir, d) != 0 {
                    break;
                }
                end += 1;
            }
            w = self
                .rules
                .classify_group(&mut self.pools.chains, w, &heads[start..end]);
            start = end;
        }
        let expected = if right == INVALID {
            [0, 0]
        } else {
            self.pools.chains[right].left_winding()
        };
        if w != expected {
            return Err(ScanError::ScannerFailed("winding mismatch across junction"));
        }

        for &h in &heads {
            self.push_candidate(h)?;
        }
        let pairs = match (heads.first(), heads.last()) {
            (Some(&f), Some(&l)) => [(left, f), (l, right)],
            _ => [(left, right), (INVALID, INVALID)],
        };
        self.junction.heads = heads;
        self.resolve_crossings(&pairs)
    }

    /// Queues the chain's next vertex as its upcoming event.
    pub(crate) fn push_candidate(&mut self, c: ChainIdx) -> ScanResult<()> {
        let next = self.pools.next_vertex(c);
        if next == INVALID {
            return Err(ScanError::ScannerFailed("active chain has no current edge"));
        }
        let old = self.pools.chains[c].candidate;
        if old != INVALID_HANDLE {
            self.candidates.delete(old);
        }
        let handle = self.candidates.insert(EventKey {
            point: self.pools.verts[next].point,
            chain: c,
        });
        self.pools.chains[c].candidate = handle;
        Ok(())
    }

    // ─────── Crossings ───────────────────────────────────────────────────────

    /// Tests adjacent pairs for crossings until no bent chain produces new
    /// ones. Pairs that are no longer adjacent are skipped.
    fn resolve_crossings(&mut self, seed: &[(ChainIdx, ChainIdx)]) -> ScanResult<()> {
        let mut work = core::mem::take(&mut self.junction.pairs);
        work.clear();
        work.extend_from_slice(seed);
        let mut budget = 8 * (self.active.len() + 8);

        while let Some((a, b)) = work.pop() {
            if a == INVALID || b == INVALID {
                continue;
            }
            let (ca, cb) = (&self.pools.chains[a], &self.pools.chains[b]);
            if !ca.active || !cb.active || ca.right != b {
                continue;
            }
            if budget == 0 {
                self.junction.pairs = work;
                return Err(ScanError::ScannerFailed("crossing resolution did not settle"));
            }
            budget -= 1;
            if let Some((first, last)) = self.resolve_pair(a, b)? {
                work.push((self.pools.chains[first].left, first));
                work.push((last, self.pools.chains[last].right));
            }
        }
        self.junction.pairs = work;
        Ok(())
    }

    /// Resolves a crossing between adjacent chains `a` (left) and `b`. Chains
    /// lying on the same line as either edge are bent with it. Returns the
    /// outermost chains of the bent group, or None if nothing moved.
    fn resolve_pair(&mut self, a: ChainIdx, b: ChainIdx) -> ScanResult<Option<(ChainIdx, ChainIdx)>> {
        let p = self.junction.point;
        let (a0, a1) = self.pools.edge(a);
        let (b0, b1) = self.pools.edge(b);
        let Some(cross) = crossing(a0, a1, b0, b1) else {
            return Ok(None);
        };
        let left = self.overlap(a, true, (b0, b1));
        let right = self.overlap(b, false, (a0, a1));

        let mut x = cross.point;
        let mut location = IntersectionLocation::Interior;
        if !sweep_before(p, x) {
            x = p;
            location = IntersectionLocation::AtSweepPoint;
        } else {
            let (lower, at) = if sweep_before(left.end, right.end) {
                (left.end, IntersectionLocation::AtLeftEnd)
            } else {
                (right.end, IntersectionLocation::AtRightEnd)
            };
            if sweep_leq(lower, x) {
                x = lower;
                location = at;
            }
            // Chains ending short of the crossing keep the others on their
            // line until that end.
            let stop = match (left.stop, right.stop) {
                (Some(l), Some(r)) if sweep_before(r, l) => Some((l, IntersectionLocation::AtLeftEnd)),
                (_, Some(r)) => Some((r, IntersectionLocation::AtRightEnd)),
                (Some(l), None) => Some((l, IntersectionLocation::AtLeftEnd)),
                (None, None) => None,
            };
            if let Some((s, at)) = stop {
                if sweep_leq(x, s) {
                    x = s;
                    location = at;
                }
            }
            // Bending must not carry any edge across the sweep point.
            if !self.keeps_sides(&left, x) || !self.keeps_sides(&right, x) {
                x = p;
                location = IntersectionLocation::AtSweepPoint;
            }
        }

        let exact = cross.exact && x == cross.point;
        let approx = if exact {
            None
        } else {
            let (s0, s1) = self.pools.segment(a);
            let (t0, t1) = self.pools.segment(b);
            line_intersection(s0, s1, t0, t1).filter(|&(ax, ay)| {
                (ax - x.x as f64).abs() <= MAX_APPROX_DRIFT
                    && (ay - x.y as f64).abs() <= MAX_APPROX_DRIFT
            })
        };
        let kind = if exact {
            VertexKind::ExactIntersection
        } else {
            VertexKind::Intersection
        };

        let left_base = self.pools.verts[self.pools.chains[a].cursor].seg_base;
        let right_base = self.pools.verts[self.pools.chains[b].cursor].seg_base;
        self.pools.intersections.alloc(IntersectionRecord {
            left_base,
            right_base,
            location,
            point: x,
            approx,
            exact,
        })?;
        self.stats.crossings += 1;
        trace!(
            "crossing at ({}, {}) {:?} exact={} group={}+{}",
            x.x,
            x.y,
            location,
            exact,
            left.run.len(),
            right.run.len()
        );

        // At the sweep point the whole group meets; otherwise only the
        // chains reaching the crossing move.
        let mut bent = false;
        for side in [&left, &right] {
            let (members, via) = if x == p {
                (&side.run, None)
            } else {
                (&side.hits, side.via(x))
            };
            for &m in members {
                bent |= self.bend(m, via, x, kind, approx)?;
            }
        }
        Ok(bent.then_some((left.outer, right.outer)))
    }

    /// Gathers chain `c` and its neighbours on one side whose current edges
    /// lie on the same line, sorted by whether they reach `other`.
    fn overlap(&self, c: ChainIdx, leftward: bool, other: (IPoint, IPoint)) -> Overlap {
        let (c0, c1) = self.pools.edge(c);
        let mut run = vec![c];
        let mut outer = c;
        loop {
            let chain = &self.pools.chains[outer];
            let n = if leftward { chain.left } else { chain.right };
            if n == INVALID {
                break;
            }
            let (n0, n1) = self.pools.edge(n);
            if n0 == n1 || orient(c0, c1, n0) != 0 || orient(c0, c1, n1) != 0 {
                break;
            }
            run.push(n);
            outer = n;
        }

        let mut hits = Vec::with_capacity(run.len());
        let mut end = c1;
        let mut stop: Option<IPoint> = None;
        for &m in &run {
            let (m0, m1) = self.pools.edge(m);
            if crosses(m0, m1, other.0, other.1) {
                if sweep_before(m1, end) {
                    end = m1;
                }
                hits.push(m);
            } else if stop.map_or(true, |s| sweep_before(s, m1)) {
                stop = Some(m1);
            }
        }
        Overlap {
            run,
            hits,
            outer,
            end,
            stop,
        }
    }

    fn keeps_sides(&self, side: &Overlap, x: IPoint) -> bool {
        let p = self.junction.point;
        let to = side.via(x).unwrap_or(x);
        side.hits.iter().all(|&m| {
            let (m0, m1) = self.pools.edge(m);
            keeps_side(m0, m1, to, p)
        })
    }

    /// Cuts chain `c`'s current edge at `x`, passing through `via` first when
    /// it lies inside the edge: the chain now ends at `x` and the rest waits
    /// in the master heap. Returns false if nothing changed.
    fn bend(
        &mut self,
        c: ChainIdx,
        via: Option<IPoint>,
        x: IPoint,
        kind: VertexKind,
        approx: Option<(f64, f64)>,
    ) -> ScanResult<bool> {
        let cursor = self.pools.chains[c].cursor;
        let next = self.pools.verts[cursor].next;
        if next == INVALID {
            return Ok(false);
        }
        let (from, to) = (self.pools.verts[cursor].point, self.pools.verts[next].point);
        let mut at = cursor;
        if let Some(s) = via.filter(|&s| sweep_before(from, s) && sweep_before(s, to)) {
            at = self
                .pools
                .insert_vertex(cursor, s, VertexKind::ExactIntersection, None)?;
        }
        if self.pools.verts[at].point == x || to == x {
            if at != cursor {
                self.push_candidate(c)?;
            }
            return Ok(at != cursor);
        }
        let v = self.pools.insert_vertex(at, x, kind, approx)?;
        let lower = self.pools.split_chain(c, v)?;
        self.master.insert(EventKey { point: x, chain: lower });
        self.push_candidate(c)?;
        self.stats.splits += 1;
        Ok(true)
    }
}

/// Chains sharing one crossing edge's line, from the crossed chain outward.
struct Overlap {
    run: Vec<ChainIdx>,
    /// Members whose edge reaches the crossing.
    hits: Vec<ChainIdx>,
    outer: ChainIdx,
    /// Earliest lower end among the hits.
    end: IPoint,
    /// Latest lower end among the members that stop short.
    stop: Option<IPoint>,
}

impl Overlap {
    /// The point the hits must pass through on their way to `x`.
    fn via(&self, x: IPoint) -> Option<IPoint> {
        self.stop.filter(|&s| sweep_before(s, x))
    }
}

/// True if moving the lower end of edge `e0 -> e1` to `x` leaves the edge on
/// the same side of `p`. Edges starting at `p` always qualify.
fn keeps_side(e0: IPoint, e1: IPoint, x: IPoint, p: IPoint) -> bool {
    if e0 == p {
        return true;
    }
    let before = orient(e0, e1, p).signum();
    let after = orient(e0, x, p).signum();
    before == after
}
