// Copyright 2025 Lars Brubaker
// License: MIT
//
// The sweep: pops events in sweep order from the master heap (chain
// activation) and the candidate heap (chain advancement), and hands each
// distinct event point to the junction logic in junction.rs.

use log::debug;

use crate::active::ActiveList;
use crate::chain::ChainIdx;
use crate::classify::FillRules;
use crate::error::{ScanError, ScanResult};
use crate::geom::IPoint;
use crate::junction::Junction;
use crate::pool::Pools;
use crate::priorityq::{EventKey, PriorityQ};

/// Counters collected while sweeping, reported in the scan summary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub events: usize,
    pub lone_advances: usize,
    pub splits: usize,
    pub crossings: usize,
}

pub struct Sweep<'a> {
    pub(crate) pools: &'a mut Pools,
    pub(crate) active: ActiveList,
    pub(crate) master: PriorityQ<EventKey>,
    pub(crate) candidates: PriorityQ<EventKey>,
    pub(crate) rules: FillRules,
    pub(crate) junction: Junction,
    /// Chains whose tail has been reached, in completion order.
    pub(crate) finished: Vec<ChainIdx>,
    pub(crate) stats: SweepStats,
}

impl<'a> Sweep<'a> {
    /// Takes the master heap as filled by the chain list (still in its
    /// pre-init phase).
    pub fn new(pools: &'a mut Pools, master: PriorityQ<EventKey>, rules: FillRules) -> Self {
        let capacity = pools.chains.len();
        Sweep {
            pools,
            active: ActiveList::new(),
            master,
            candidates: PriorityQ::new(capacity),
            rules,
            junction: Junction::default(),
            finished: Vec::with_capacity(capacity),
            stats: SweepStats::default(),
        }
    }

    /// Runs the sweep to completion.
    pub fn run(&mut self) -> ScanResult<()> {
        if !self.master.is_initialized() {
            self.master.init();
        }
        if !self.candidates.is_initialized() {
            self.candidates.init();
        }

        while let Some(p) = self.next_event() {
            self.process_junction(p)?;
            self.stats.events += 1;

            #[cfg(any(test, feature = "audit"))]
            self.audit(p)?;
        }

        if !self.active.is_empty() {
            return Err(ScanError::ScannerFailed("chains left active after the sweep"));
        }
        debug!(
            "sweep done: events={} lone={} splits={} crossings={} chains={}",
            self.stats.events,
            self.stats.lone_advances,
            self.stats.splits,
            self.stats.crossings,
            self.finished.len()
        );
        Ok(())
    }

    /// The earliest pending event point in either heap.
    fn next_event(&self) -> Option<IPoint> {
        match (self.master.minimum(), self.candidates.minimum()) {
            (Some(m), Some(c)) => Some(if m <= c { m.point } else { c.point }),
            (m, c) => m.or(c).map(|k| k.point),
        }
    }

    pub fn into_finished(self) -> (Vec<ChainIdx>, SweepStats) {
        (self.finished, self.stats)
    }
}
