// edgescan: exact-integer planar sweep producing side-classified edge chains
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod active;
#[cfg(any(test, feature = "audit"))]
mod audit;
pub mod chain;
pub mod chain_list;
pub mod classify;
pub mod error;
pub mod flatten;
pub mod geom;
pub mod junction;
pub mod pool;
pub mod priorityq;
pub mod scanner;
pub mod sweep;
pub mod vertex;

pub use chain::{ChainFlags, Side};
pub use classify::{CombineMode, FillMode};
pub use error::{ScanError, ScanResult};
pub use flatten::{CubicBezier, CurveFlattener, UniformFlattener};
pub use geom::{Point, MAX_WORKSPACE_COORD};
pub use scanner::{ChainView, IntersectionView, ScanConfig, ScanState, Scanner, VertexView};
pub use sweep::SweepStats;
pub use vertex::{CurveFragment, IntersectionLocation, VertexFlags, VertexKind};
