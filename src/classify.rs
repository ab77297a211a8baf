// Copyright 2025 Lars Brubaker
// License: MIT
//
// Fill rules and chain classification.
//
// Classification runs over a group of coincident chains at once: the group is
// a single boundary in the plane, so the winding on its far side is the sum
// of every member's contribution.

use crate::chain::{Chain, ChainFlags, ChainIdx};
use crate::pool::Pool;

/// Per-shape rule turning a winding number into inside/outside.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Inside where the winding number is odd.
    #[default]
    Alternate,
    /// Inside where the winding number is nonzero.
    Winding,
}

impl FillMode {
    #[inline]
    pub fn is_inside(self, w: i32) -> bool {
        match self {
            FillMode::Alternate => w & 1 != 0,
            FillMode::Winding => w != 0,
        }
    }
}

/// How the inside tests of shape 0 and shape 1 combine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CombineMode {
    #[default]
    Union,
    Intersect,
    Xor,
    /// Shape 0 minus shape 1.
    Difference,
}

impl CombineMode {
    #[inline]
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            CombineMode::Union => a || b,
            CombineMode::Intersect => a && b,
            CombineMode::Xor => a != b,
            CombineMode::Difference => a && !b,
        }
    }
}

/// The fill rules of one scan.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct FillRules {
    pub modes: [FillMode; 2],
    pub combine: CombineMode,
}

impl FillRules {
    pub fn new(modes: [FillMode; 2], combine: CombineMode) -> Self {
        FillRules { modes, combine }
    }

    pub fn shape_inside(&self, shape: usize, w: [i32; 2]) -> bool {
        self.modes[shape].is_inside(w[shape])
    }

    /// Whether the region with winding `w` is filled.
    pub fn inside(&self, w: [i32; 2]) -> bool {
        self.combine
            .apply(self.shape_inside(0, w), self.shape_inside(1, w))
    }

    /// Classifies a group of coincident chains, ordered left to right, that
    /// separates a region of winding `left` from one of winding `right`.
    /// Returns the flags for the group's rightmost member; every other member
    /// is COINCIDENT.
    pub fn classify(&self, left: [i32; 2], right: [i32; 2]) -> ChainFlags {
        if left == right {
            return ChainFlags::CANCELLED;
        }
        let fill_left = self.inside(left);
        if fill_left != self.inside(right) {
            return if fill_left {
                ChainFlags::RIGHT_SIDE
            } else {
                ChainFlags::empty()
            };
        }
        let own_change = (0..2).any(|s| self.shape_inside(s, left) != self.shape_inside(s, right));
        if own_change {
            ChainFlags::BOOLEAN_REDUNDANT
        } else {
            ChainFlags::SELF_REDUNDANT
        }
    }

    /// Sets winding and classification on `group` given the winding just left
    /// of it, and returns the winding just right of it.
    pub fn classify_group(&self, chains: &mut Pool<Chain>, left: [i32; 2], group: &[ChainIdx]) -> [i32; 2] {
        let mut w = left;
        for (i, &c) in group.iter().enumerate() {
            let chain = &mut chains[c];
            let d = chain.contribution();
            w = [w[0] + d[0], w[1] + d[1]];
            chain.winding = w;
            chain.flags -= ChainFlags::CLASSIFICATION;
            chain.flags |= if i + 1 < group.len() {
                ChainFlags::COINCIDENT
            } else {
                self.classify(left, w)
            };
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::INVALID;

    fn chain(pool: &mut Pool<Chain>, shape: u8, reversed: bool) -> ChainIdx {
        let flags = if reversed { ChainFlags::REVERSED } else { ChainFlags::empty() };
        pool.alloc(Chain::new(INVALID, INVALID, shape, flags)).unwrap()
    }

    #[test]
    fn fill_modes() {
        assert!(FillMode::Alternate.is_inside(-1));
        assert!(!FillMode::Alternate.is_inside(2));
        assert!(FillMode::Winding.is_inside(2));
        assert!(!FillMode::Winding.is_inside(0));
    }

    #[test]
    fn boundary_sides() {
        let rules = FillRules::default();
        assert_eq!(rules.classify([0, 0], [1, 0]), ChainFlags::empty());
        assert_eq!(rules.classify([1, 0], [0, 0]), ChainFlags::RIGHT_SIDE);
    }

    #[test]
    fn nested_winding_is_self_redundant() {
        let rules = FillRules::new([FillMode::Winding; 2], CombineMode::Union);
        assert_eq!(rules.classify([1, 0], [2, 0]), ChainFlags::SELF_REDUNDANT);
        let alt = FillRules::default();
        assert_eq!(alt.classify([1, 0], [2, 0]), ChainFlags::RIGHT_SIDE);
    }

    #[test]
    fn boolean_redundant_when_other_shape_covers() {
        let rules = FillRules::new([FillMode::Winding; 2], CombineMode::Union);
        // Shape 0 starts inside shape 1: the union does not change.
        assert_eq!(rules.classify([0, 1], [1, 1]), ChainFlags::BOOLEAN_REDUNDANT);
        let isect = FillRules::new([FillMode::Winding; 2], CombineMode::Intersect);
        assert_eq!(isect.classify([0, 1], [1, 1]), ChainFlags::empty());
    }

    #[test]
    fn opposite_pair_cancels() {
        let rules = FillRules::new([FillMode::Winding; 2], CombineMode::Union);
        let mut pool = Pool::new("chain", 4);
        let group = [chain(&mut pool, 0, false), chain(&mut pool, 0, true)];
        let w = rules.classify_group(&mut pool, [0, 0], &group);
        assert_eq!(w, [0, 0]);
        assert!(pool[group[0]].flags.contains(ChainFlags::COINCIDENT));
        assert!(pool[group[1]].flags.contains(ChainFlags::CANCELLED));
    }

    #[test]
    fn duplicate_pair_is_one_boundary() {
        let rules = FillRules::new([FillMode::Winding; 2], CombineMode::Union);
        let mut pool = Pool::new("chain", 4);
        let group = [chain(&mut pool, 0, false), chain(&mut pool, 0, false)];
        let w = rules.classify_group(&mut pool, [0, 0], &group);
        assert_eq!(w, [2, 0]);
        assert_eq!(pool[group[0]].winding, [1, 0]);
        assert!(pool[group[1]].is_boundary());
        assert_eq!(pool[group[1]].flags, ChainFlags::empty());
    }
}
