// Copyright 2025 Lars Brubaker
// License: MIT
//
// Fixed-ceiling arenas for the scan graph.
//
// Entities are addressed by u32 index and never freed one by one; a pool is
// reset wholesale when the scanner is reset. INVALID = u32::MAX means "null".

use core::ops::{Index, IndexMut};

use crate::chain::Chain;
use crate::error::{ScanError, ScanResult};
use crate::vertex::{CurveFragment, IntersectionRecord, Vertex};

/// Null index shared by every pool.
pub const INVALID: u32 = u32::MAX;

/// An arena backed by a Vec with an allocation ceiling.
pub struct Pool<T> {
    items: Vec<T>,
    capacity: usize,
    name: &'static str,
}

impl<T> Pool<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: capacity.min(INVALID as usize),
            name,
        }
    }

    /// Allocate a new item, returning its index.
    pub fn alloc(&mut self, item: T) -> ScanResult<u32> {
        if self.items.len() >= self.capacity {
            return Err(ScanError::PoolExhausted {
                pool: self.name,
                capacity: self.capacity,
            });
        }
        let idx = self.items.len() as u32;
        self.items.push(item);
        Ok(idx)
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every entity at once.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Slots still allocated after a reset.
    #[cfg(test)]
    pub fn reserved(&self) -> usize {
        self.items.capacity()
    }
}

impl<T> Index<u32> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: u32) -> &T {
        &self.items[idx as usize]
    }
}

impl<T> IndexMut<u32> for Pool<T> {
    #[inline]
    fn index_mut(&mut self, idx: u32) -> &mut T {
        &mut self.items[idx as usize]
    }
}

/// Pool ceilings, one per entity kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolLimits {
    pub vertices: usize,
    pub chains: usize,
    pub curves: usize,
    pub intersections: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        PoolLimits {
            vertices: 1 << 22,
            chains: 1 << 21,
            curves: 1 << 20,
            intersections: 1 << 21,
        }
    }
}

/// Every arena one scan needs. Entities refer to each other only by index
/// into these pools.
pub struct Pools {
    pub verts: Pool<Vertex>,
    pub chains: Pool<Chain>,
    pub curves: Pool<CurveFragment>,
    pub intersections: Pool<IntersectionRecord>,
}

impl Pools {
    pub fn new(limits: PoolLimits) -> Self {
        Pools {
            verts: Pool::new("vertex", limits.vertices),
            chains: Pool::new("chain", limits.chains),
            curves: Pool::new("curve", limits.curves),
            intersections: Pool::new("intersection", limits.intersections),
        }
    }

    /// Drop every entity of the previous scan.
    pub fn reset(&mut self) {
        self.verts.reset();
        self.chains.reset();
        self.curves.reset();
        self.intersections.reset();
    }
}
