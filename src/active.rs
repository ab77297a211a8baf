// Copyright 2025 Lars Brubaker
// License: MIT
//
// The active list: chains crossing the sweep line, linked left to right
// through their `left`/`right` fields. INVALID marks either end.

use core::cmp::Ordering;

use crate::chain::{Chain, ChainIdx};
use crate::geom::{orient, IPoint};
use crate::pool::{Pool, Pools, INVALID};

/// Where a point falls in the active list: `first..=last` is the run of
/// chains whose current edge touches the point (INVALID when empty), and
/// `left`/`right` are the chains just outside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub left: ChainIdx,
    pub first: ChainIdx,
    pub last: ChainIdx,
    pub right: ChainIdx,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.first == INVALID
    }
}

/// Where chain `c`'s current edge lies relative to `p`, which must be within
/// the edge's vertical span: `Less` if left of p, `Greater` if right,
/// `Equal` if the edge passes through p.
pub fn edge_side(pools: &Pools, c: ChainIdx, p: IPoint) -> Ordering {
    let (a, b) = pools.edge(c);
    if a == b {
        return a.x.cmp(&p.x).then(a.y.cmp(&p.y));
    }
    match orient(a, b, p) {
        o if o > 0 => Ordering::Less,
        o if o < 0 => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[derive(Clone, Debug)]
pub struct ActiveList {
    pub leftmost: ChainIdx,
    pub rightmost: ChainIdx,
    len: usize,
}

impl Default for ActiveList {
    fn default() -> Self {
        ActiveList::new()
    }
}

impl ActiveList {
    pub fn new() -> Self {
        ActiveList {
            leftmost: INVALID,
            rightmost: INVALID,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.leftmost == INVALID
    }

    /// Splices `run`, already ordered left to right, between the adjacent
    /// chains `left` and `right` (either may be INVALID for a list end).
    pub fn insert(&mut self, chains: &mut Pool<Chain>, left: ChainIdx, right: ChainIdx, run: &[ChainIdx]) {
        let mut prev = left;
        for &c in run {
            let ch = &mut chains[c];
            ch.left = prev;
            ch.active = true;
            if prev == INVALID {
                self.leftmost = c;
            } else {
                chains[prev].right = c;
            }
            prev = c;
        }
        if prev == INVALID {
            return;
        }
        chains[prev].right = right;
        if right == INVALID {
            self.rightmost = prev;
        } else {
            chains[right].left = prev;
        }
        self.len += run.len();
    }

    /// Unlinks the contiguous run `first..=last`.
    pub fn remove(&mut self, chains: &mut Pool<Chain>, first: ChainIdx, last: ChainIdx) {
        let left = chains[first].left;
        let right = chains[last].right;
        let mut c = first;
        loop {
            let ch = &mut chains[c];
            let next = ch.right;
            ch.left = INVALID;
            ch.right = INVALID;
            ch.active = false;
            self.len -= 1;
            if c == last || next == INVALID {
                break;
            }
            c = next;
        }
        if left == INVALID {
            self.leftmost = right;
        } else {
            chains[left].right = right;
        }
        if right == INVALID {
            self.rightmost = left;
        } else {
            chains[right].left = left;
        }
    }

    /// Linear scan for the chains whose current edge touches `p`, and the
    /// neighbours on either side.
    pub fn locate(&self, pools: &Pools, p: IPoint) -> Location {
        let mut loc = Location {
            left: INVALID,
            first: INVALID,
            last: INVALID,
            right: INVALID,
        };
        let mut c = self.leftmost;
        while c != INVALID {
            match edge_side(pools, c, p) {
                Ordering::Less => loc.left = c,
                Ordering::Equal => {
                    if loc.first == INVALID {
                        loc.first = c;
                    }
                    loc.last = c;
                }
                Ordering::Greater => {
                    loc.right = c;
                    break;
                }
            }
            c = pools.chains[c].right;
        }
        if !loc.is_empty() {
            loc.left = pools.chains[loc.first].left;
        }
        loc
    }

    pub fn iter<'a>(&self, chains: &'a Pool<Chain>) -> ActiveIter<'a> {
        ActiveIter {
            chains,
            curr: self.leftmost,
        }
    }
}

/// Walks the active list left to right.
pub struct ActiveIter<'a> {
    chains: &'a Pool<Chain>,
    curr: ChainIdx,
}

impl<'a> Iterator for ActiveIter<'a> {
    type Item = ChainIdx;

    fn next(&mut self) -> Option<ChainIdx> {
        if self.curr == INVALID {
            return None;
        }
        let c = self.curr;
        self.curr = self.chains[c].right;
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainFlags;
    use crate::pool::PoolLimits;
    use crate::vertex::VertexFlags;

    fn segment(pools: &mut Pools, a: (i32, i32), b: (i32, i32)) -> ChainIdx {
        let va = pools.new_vertex(IPoint::new(a.0, a.1), VertexFlags::empty(), INVALID).unwrap();
        let vb = pools.new_vertex(IPoint::new(b.0, b.1), VertexFlags::empty(), INVALID).unwrap();
        pools.verts[va].next = vb;
        pools.verts[vb].prev = va;
        pools.chains.alloc(Chain::new(va, vb, 0, ChainFlags::empty())).unwrap()
    }

    fn order(list: &ActiveList, pools: &Pools) -> Vec<ChainIdx> {
        list.iter(&pools.chains).collect()
    }

    #[test]
    fn insert_and_remove_runs() {
        let mut pools = Pools::new(PoolLimits::default());
        let cs: Vec<ChainIdx> = (0..4).map(|i| segment(&mut pools, (i, 10), (i, 0))).collect();
        let mut list = ActiveList::new();
        list.insert(&mut pools.chains, INVALID, INVALID, &[cs[0], cs[3]]);
        list.insert(&mut pools.chains, cs[0], cs[3], &[cs[1], cs[2]]);
        assert_eq!(order(&list, &pools), cs);
        assert_eq!(list.len(), 4);

        list.remove(&mut pools.chains, cs[1], cs[2]);
        assert_eq!(order(&list, &pools), vec![cs[0], cs[3]]);
        assert_eq!(pools.chains[cs[3]].left, cs[0]);
        assert!(!pools.chains[cs[1]].active);

        list.remove(&mut pools.chains, cs[0], cs[0]);
        assert_eq!(list.leftmost, cs[3]);
        list.remove(&mut pools.chains, cs[3], cs[3]);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn edge_side_signs() {
        let mut pools = Pools::new(PoolLimits::default());
        let c = segment(&mut pools, (0, 10), (10, 0));
        assert_eq!(edge_side(&pools, c, IPoint::new(9, 5)), Ordering::Less);
        assert_eq!(edge_side(&pools, c, IPoint::new(1, 5)), Ordering::Greater);
        assert_eq!(edge_side(&pools, c, IPoint::new(5, 5)), Ordering::Equal);
        let h = segment(&mut pools, (10, 0), (0, 0));
        assert_eq!(edge_side(&pools, h, IPoint::new(4, 0)), Ordering::Equal);
    }

    #[test]
    fn locate_finds_touching_run() {
        let mut pools = Pools::new(PoolLimits::default());
        let a = segment(&mut pools, (0, 10), (0, 0));
        let b = segment(&mut pools, (0, 10), (10, 0));
        let c = segment(&mut pools, (10, 10), (0, 0));
        let d = segment(&mut pools, (20, 10), (20, 0));
        let mut list = ActiveList::new();
        list.insert(&mut pools.chains, INVALID, INVALID, &[a, b, c, d]);

        let loc = list.locate(&pools, IPoint::new(5, 5));
        assert_eq!(loc, Location { left: a, first: b, last: c, right: d });

        let loc = list.locate(&pools, IPoint::new(15, 5));
        assert!(loc.is_empty());
        assert_eq!((loc.left, loc.right), (c, d));
    }
}
