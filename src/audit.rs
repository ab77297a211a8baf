// Copyright 2025 Lars Brubaker
// License: MIT
//
// Consistency pass run after every junction when the `audit` feature is on
// (always under test). It re-derives what the active list and the candidate
// heap should hold and reports the first disagreement.

use core::cmp::Ordering;

use crate::active::edge_side;
use crate::error::{ScanError, ScanResult};
use crate::geom::IPoint;
use crate::pool::INVALID;
use crate::priorityq::{EventKey, INVALID_HANDLE};
use crate::sweep::Sweep;

impl Sweep<'_> {
    pub(crate) fn audit(&self, p: IPoint) -> ScanResult<()> {
        let chains = &self.pools.chains;
        let mut prev = INVALID;
        let mut prev_side = Ordering::Less;
        let mut count = 0usize;

        for c in self.active.iter(chains) {
            let chain = &chains[c];
            if chain.left != prev {
                return Err(ScanError::ScannerFailed("active list links are not symmetric"));
            }
            if !chain.active || chain.finished {
                return Err(ScanError::ScannerFailed("inactive chain in the active list"));
            }

            let next = self.pools.next_vertex(c);
            if next == INVALID {
                return Err(ScanError::ScannerFailed("active chain has no current edge"));
            }
            let side = edge_side(self.pools, c, p);
            if side == Ordering::Equal
                && self.pools.cursor_point(c) != p
                && self.pools.verts[next].point != p
            {
                return Err(ScanError::ScannerFailed("unresolved chain through the sweep point"));
            }
            if side < prev_side {
                return Err(ScanError::ScannerFailed("active list out of order"));
            }

            if chain.candidate == INVALID_HANDLE {
                return Err(ScanError::ScannerFailed("active chain has no candidate event"));
            }
            let expected = EventKey {
                point: self.pools.verts[next].point,
                chain: c,
            };
            if self.candidates.key(chain.candidate) != Some(expected) {
                return Err(ScanError::ScannerFailed("candidate event does not match the chain"));
            }

            prev = c;
            prev_side = side;
            count += 1;
        }

        if prev != self.active.rightmost {
            return Err(ScanError::ScannerFailed("active list links are not symmetric"));
        }
        if count != self.active.len() {
            return Err(ScanError::ScannerFailed("active list length is stale"));
        }
        Ok(())
    }
}
