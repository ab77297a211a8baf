// Copyright 2025 Lars Brubaker
// License: MIT
//
// A two-phase priority queue:
//   Phase 1 (pre-init): inserts go into a key array that is sorted once.
//   Phase 2 (post-init): inserts go directly into a min-heap.
// Deletion is supported via handles. Negative handles index the sort array,
// positive ones the heap.
//
// The master heap (chain activation) fills phase 1 during ingestion; the
// candidate heap (chain advancement) is initialized empty and lives in phase 2.

use core::cmp::Ordering;

use crate::chain::ChainIdx;
use crate::geom::{sweep_cmp, IPoint};

pub const INVALID_HANDLE: i32 = i32::MAX;

/// A sweep event: a point and the chain it belongs to. Ordered by sweep
/// position, ties broken by chain index so extraction is deterministic.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventKey {
    pub point: IPoint,
    pub chain: ChainIdx,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        sweep_cmp(self.point, other.point).then(self.chain.cmp(&other.chain))
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct HandleElem<K> {
    key: Option<K>,
    /// Heap position while live, next free handle once released.
    node: i32,
}

/// A heap-based priority queue (used after initialization).
struct Heap<K> {
    /// nodes[1..=size] are active; nodes[0] unused. Stores handle indices.
    nodes: Vec<i32>,
    /// handles[0] is a placeholder so 0 can terminate the free list.
    handles: Vec<HandleElem<K>>,
    size: usize,
    free_list: i32,
    initialized: bool,
}

impl<K: Ord + Copy> Heap<K> {
    fn new(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(0);
        let mut handles = Vec::with_capacity(capacity + 1);
        handles.push(HandleElem { key: None, node: 0 });
        Heap {
            nodes,
            handles,
            size: 0,
            free_list: 0,
            initialized: false,
        }
    }

    #[inline]
    fn leq(&self, h1: i32, h2: i32) -> bool {
        self.handles[h1 as usize].key <= self.handles[h2 as usize].key
    }

    #[inline]
    fn place(&mut self, pos: usize, handle: i32) {
        self.nodes[pos] = handle;
        self.handles[handle as usize].node = pos as i32;
    }

    fn float_down(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child > self.size {
                break;
            }
            if child < self.size && self.leq(self.nodes[child + 1], self.nodes[child]) {
                child += 1;
            }
            let h_child = self.nodes[child];
            if self.leq(h_curr, h_child) {
                break;
            }
            self.place(curr, h_child);
            curr = child;
        }
        self.place(curr, h_curr);
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        while curr > 1 {
            let parent = curr >> 1;
            let h_parent = self.nodes[parent];
            if self.leq(h_parent, h_curr) {
                break;
            }
            self.place(curr, h_parent);
            curr = parent;
        }
        self.place(curr, h_curr);
    }

    fn init(&mut self) {
        for i in (1..=self.size).rev() {
            self.float_down(i);
        }
        self.initialized = true;
    }

    fn insert(&mut self, key: K) -> i32 {
        self.size += 1;
        let curr = self.size;
        if curr >= self.nodes.len() {
            self.nodes.resize(curr + 1, 0);
        }

        let handle = if self.free_list == 0 {
            self.handles.push(HandleElem { key: None, node: 0 });
            (self.handles.len() - 1) as i32
        } else {
            let f = self.free_list;
            self.free_list = self.handles[f as usize].node;
            f
        };

        self.handles[handle as usize].key = Some(key);
        self.place(curr, handle);

        if self.initialized {
            self.float_up(curr);
        }
        handle
    }

    fn release(&mut self, handle: i32) {
        let elem = &mut self.handles[handle as usize];
        elem.key = None;
        elem.node = self.free_list;
        self.free_list = handle;
    }

    fn extract_min(&mut self) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        let h_min = self.nodes[1];
        let min_key = self.handles[h_min as usize].key;

        let last = self.nodes[self.size];
        self.place(1, last);
        self.release(h_min);

        self.size -= 1;
        if self.size > 0 {
            self.float_down(1);
        }
        min_key
    }

    fn delete(&mut self, h_curr: i32) {
        debug_assert!(self.handles[h_curr as usize].key.is_some());
        let curr = self.handles[h_curr as usize].node as usize;

        let last = self.nodes[self.size];
        self.place(curr, last);
        self.size -= 1;

        if curr <= self.size {
            if curr <= 1 || self.leq(self.nodes[curr >> 1], self.nodes[curr]) {
                self.float_down(curr);
            } else {
                self.float_up(curr);
            }
        }
        self.release(h_curr);
    }

    #[inline]
    fn minimum(&self) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        self.handles[self.nodes[1] as usize].key
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// The combined priority queue (sort-array + heap).
pub struct PriorityQ<K> {
    heap: Heap<K>,
    /// Pre-init key storage; None marks a deleted or consumed entry.
    keys: Vec<Option<K>>,
    /// Indices into keys, sorted descending so the minimum sits at the end.
    order: Vec<usize>,
    size: usize,
    initialized: bool,
}

impl<K: Ord + Copy> PriorityQ<K> {
    pub fn new(capacity: usize) -> Self {
        PriorityQ {
            heap: Heap::new(capacity),
            keys: Vec::with_capacity(capacity),
            order: Vec::new(),
            size: 0,
            initialized: false,
        }
    }

    /// Sort the pre-init keys and switch to heap inserts.
    pub fn init(&mut self) {
        let keys = &self.keys;
        let mut order: Vec<usize> = (0..keys.len()).filter(|&i| keys[i].is_some()).collect();
        order.sort_unstable_by(|&a, &b| keys[b].cmp(&keys[a]));
        self.size = order.len();
        self.order = order;
        self.initialized = true;
        self.heap.init();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Insert a key. Returns a handle for `delete`.
    pub fn insert(&mut self, key: K) -> i32 {
        if self.initialized {
            return self.heap.insert(key);
        }
        self.keys.push(Some(key));
        -(self.keys.len() as i32)
    }

    #[inline]
    fn sort_min(&self) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        self.keys[self.order[self.size - 1]]
    }

    fn trim(&mut self) {
        while self.size > 0 && self.keys[self.order[self.size - 1]].is_none() {
            self.size -= 1;
        }
    }

    /// Remove and return the minimum key.
    pub fn extract_min(&mut self) -> Option<K> {
        let Some(sort_min) = self.sort_min() else {
            return self.heap.extract_min();
        };
        if let Some(heap_min) = self.heap.minimum() {
            if heap_min <= sort_min {
                return self.heap.extract_min();
            }
        }
        let slot = self.order[self.size - 1];
        self.keys[slot] = None;
        self.trim();
        Some(sort_min)
    }

    /// Peek at the minimum key without extracting.
    pub fn minimum(&self) -> Option<K> {
        match (self.sort_min(), self.heap.minimum()) {
            (Some(s), Some(h)) => Some(if h <= s { h } else { s }),
            (s, h) => s.or(h),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
            && self.heap.is_empty()
            && (self.initialized || self.keys.iter().all(Option::is_none))
    }

    /// The key a live handle refers to.
    pub fn key(&self, handle: i32) -> Option<K> {
        if handle >= 0 {
            return self.heap.handles.get(handle as usize).and_then(|h| h.key);
        }
        let curr = (-(handle + 1)) as usize;
        self.keys.get(curr).copied().flatten()
    }

    /// Delete the key with the given handle.
    pub fn delete(&mut self, handle: i32) {
        if handle >= 0 {
            self.heap.delete(handle);
            return;
        }
        let curr = (-(handle + 1)) as usize;
        debug_assert!(self.keys[curr].is_some());
        self.keys[curr] = None;
        if self.initialized {
            self.trim();
        }
    }
}
