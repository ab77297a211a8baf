// Copyright 2025 Lars Brubaker
// License: MIT
//
// The scanner: public ingestion API, the scan driver and the post-scan
// output surface.
//
// Figures are recorded in caller space while ingesting. `scan` then fixes the
// workspace transform from their bounding box, replays them through the chain
// list and runs the sweep. A failed scan leaves no output behind.

mod output;

use log::{debug, warn};

use crate::chain::ChainIdx;
use crate::chain_list::ChainList;
use crate::classify::{CombineMode, FillMode, FillRules};
use crate::error::{ScanError, ScanResult};
use crate::flatten::{CubicBezier, CurveFlattener, UniformFlattener};
use crate::geom::{Bounds, Point, Transform};
use crate::pool::{PoolLimits, Pools};
use crate::priorityq::PriorityQ;
use crate::sweep::{Sweep, SweepStats};
use crate::vertex::CurveFragment;

pub use output::{ChainView, IntersectionView, VertexView};

// ─────────────────────────────── Configuration ───────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ScanConfig {
    /// Workspace units per caller unit.
    pub resolution: f64,
    /// Chord error allowed when flattening curves, in caller units.
    pub flatten_tolerance: f64,
    pub max_vertices: usize,
    pub max_chains: usize,
    pub max_curves: usize,
    pub max_intersections: usize,
    pub combine: CombineMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let limits = PoolLimits::default();
        ScanConfig {
            resolution: 256.0,
            flatten_tolerance: 0.25,
            max_vertices: limits.vertices,
            max_chains: limits.chains,
            max_curves: limits.curves,
            max_intersections: limits.intersections,
            combine: CombineMode::Union,
        }
    }
}

impl ScanConfig {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_flatten_tolerance(mut self, tolerance: f64) -> Self {
        self.flatten_tolerance = tolerance;
        self
    }

    pub fn with_max_vertices(mut self, n: usize) -> Self {
        self.max_vertices = n;
        self
    }

    pub fn with_max_chains(mut self, n: usize) -> Self {
        self.max_chains = n;
        self
    }

    pub fn with_max_curves(mut self, n: usize) -> Self {
        self.max_curves = n;
        self
    }

    pub fn with_max_intersections(mut self, n: usize) -> Self {
        self.max_intersections = n;
        self
    }

    pub fn with_combine(mut self, combine: CombineMode) -> Self {
        self.combine = combine;
        self
    }

    fn pool_limits(&self) -> PoolLimits {
        PoolLimits {
            vertices: self.max_vertices,
            chains: self.max_chains,
            curves: self.max_curves,
            intersections: self.max_intersections,
        }
    }
}

// ─────────────────────────────── Scanner ─────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Ingesting,
    Scanning,
    Done,
    Failed,
}

#[derive(Clone, Debug)]
struct FigurePoint {
    point: Point,
    /// Curve span of the edge arriving at this point.
    curve: Option<CurveFragment>,
    smooth: bool,
}

#[derive(Clone, Debug)]
struct Figure {
    shape: u8,
    points: Vec<FigurePoint>,
    closed: bool,
}

pub struct Scanner {
    config: ScanConfig,
    state: ScanState,
    fill_modes: [FillMode; 2],
    shape: u8,
    figures: Vec<Figure>,
    open: Option<Figure>,
    flattener: Box<dyn CurveFlattener>,
    params: Vec<f64>,
    pools: Pools,
    transform: Transform,
    finished: Vec<ChainIdx>,
    stats: SweepStats,
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new(ScanConfig::default())
    }
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        let pools = Pools::new(config.pool_limits());
        let transform = Transform::new(Point::default(), config.resolution);
        Scanner {
            config,
            state: ScanState::Idle,
            fill_modes: [FillMode::Alternate; 2],
            shape: 0,
            figures: Vec::new(),
            open: None,
            flattener: Box::new(UniformFlattener),
            params: Vec::new(),
            pools,
            transform,
            finished: Vec::new(),
            stats: SweepStats::default(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Replaces the curve flattener used by `add_curve`.
    pub fn set_flattener(&mut self, flattener: Box<dyn CurveFlattener>) {
        self.flattener = flattener;
    }

    fn check_ingesting(&self) -> ScanResult<()> {
        match self.state {
            ScanState::Idle | ScanState::Ingesting => Ok(()),
            _ => Err(ScanError::InvalidState("scan already ran; call reset first")),
        }
    }

    fn open_figure(&mut self) -> ScanResult<&mut Figure> {
        self.open
            .as_mut()
            .ok_or(ScanError::InvalidState("no open figure"))
    }

    /// Sets the fill mode of the shape currently being ingested.
    pub fn set_fill_mode(&mut self, mode: FillMode) -> ScanResult<()> {
        self.check_ingesting()?;
        self.fill_modes[self.shape as usize] = mode;
        Ok(())
    }

    /// Selects which shape (0 or 1) following figures belong to.
    pub fn set_shape(&mut self, shape: usize) -> ScanResult<()> {
        self.check_ingesting()?;
        if shape > 1 {
            return Err(ScanError::InvalidState("shape index must be 0 or 1"));
        }
        if self.open.is_some() {
            return Err(ScanError::InvalidState("cannot change shape inside a figure"));
        }
        self.shape = shape as u8;
        Ok(())
    }

    pub fn start_figure(&mut self, p: Point) -> ScanResult<()> {
        self.check_ingesting()?;
        if self.open.is_some() {
            return Err(ScanError::InvalidState("figure already open"));
        }
        if !p.is_finite() {
            return Err(ScanError::BadNumber { x: p.x, y: p.y });
        }
        self.state = ScanState::Ingesting;
        self.open = Some(Figure {
            shape: self.shape,
            points: vec![FigurePoint {
                point: p,
                curve: None,
                smooth: false,
            }],
            closed: false,
        });
        Ok(())
    }

    pub fn add_line(&mut self, p: Point) -> ScanResult<()> {
        self.check_ingesting()?;
        if !p.is_finite() {
            return Err(ScanError::BadNumber { x: p.x, y: p.y });
        }
        self.open_figure()?.points.push(FigurePoint {
            point: p,
            curve: None,
            smooth: false,
        });
        Ok(())
    }

    /// Adds a cubic Bezier from the current point through control points
    /// `p1`, `p2` to `p3`, flattened into line segments.
    pub fn add_curve(&mut self, p1: Point, p2: Point, p3: Point) -> ScanResult<()> {
        self.check_ingesting()?;
        for p in [p1, p2, p3] {
            if !p.is_finite() {
                return Err(ScanError::BadNumber { x: p.x, y: p.y });
            }
        }
        let tolerance = self.config.flatten_tolerance;
        let mut params = core::mem::take(&mut self.params);
        params.clear();
        let figure = self.open_figure()?;
        let p0 = figure.points.last().map(|fp| fp.point).unwrap_or_default();
        let bezier = CubicBezier::new(p0, p1, p2, p3);
        self.flattener.flatten(&bezier, tolerance, &mut params);

        let figure = self.open_figure()?;
        let mut t_start = 0.0;
        for &t in &params {
            let point = if t >= 1.0 { p3 } else { bezier.eval(t) };
            figure.points.push(FigurePoint {
                point,
                curve: Some(CurveFragment {
                    bezier,
                    t_start,
                    t_end: t,
                }),
                smooth: false,
            });
            t_start = t;
        }
        self.params = params;
        Ok(())
    }

    /// Marks the most recently added point as a smooth join.
    pub fn set_current_vertex_smooth(&mut self, smooth: bool) -> ScanResult<()> {
        self.check_ingesting()?;
        if let Some(last) = self.open_figure()?.points.last_mut() {
            last.smooth = smooth;
        }
        Ok(())
    }

    /// Ends the open figure. Open figures are closed implicitly; the closing
    /// edge is flagged in the output.
    pub fn end_figure(&mut self, closed: bool) -> ScanResult<()> {
        self.check_ingesting()?;
        let mut figure = self
            .open
            .take()
            .ok_or(ScanError::InvalidState("no open figure"))?;
        figure.closed = closed;
        self.figures.push(figure);
        Ok(())
    }

    /// Convenience for a polygon: one figure through `points`.
    pub fn add_contour(&mut self, points: &[Point], closed: bool) -> ScanResult<()> {
        let Some((&first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.start_figure(first)?;
        for &p in rest {
            self.add_line(p)?;
        }
        self.end_figure(closed)
    }

    /// Runs the sweep over every recorded figure.
    pub fn scan(&mut self) -> ScanResult<()> {
        self.check_ingesting()?;
        if self.open.is_some() {
            return Err(ScanError::InvalidState("figure still open"));
        }
        self.state = ScanState::Scanning;
        match self.run_scan() {
            Ok(()) => {
                self.state = ScanState::Done;
                debug!(
                    "scan done: figures={} chains={} vertices={} intersections={}",
                    self.figures.len(),
                    self.finished.len(),
                    self.pools.verts.len(),
                    self.pools.intersections.len()
                );
                Ok(())
            }
            Err(e) => {
                warn!("scan failed: {}", e);
                self.finished.clear();
                self.pools.reset();
                self.stats = SweepStats::default();
                self.state = ScanState::Failed;
                Err(e)
            }
        }
    }

    fn run_scan(&mut self) -> ScanResult<()> {
        let mut bounds = Bounds::empty();
        for figure in &self.figures {
            for fp in &figure.points {
                bounds.add(fp.point);
            }
        }
        self.transform = Transform::new(bounds.center(), self.config.resolution);
        self.pools.reset();
        self.finished.clear();

        let total_points: usize = self.figures.iter().map(|f| f.points.len()).sum();
        debug!(
            "scan start: figures={} points={} center=({}, {}) resolution={}",
            self.figures.len(),
            total_points,
            bounds.center().x,
            bounds.center().y,
            self.config.resolution
        );

        let mut master = PriorityQ::new(total_points);
        let mut list = ChainList::new(self.transform);
        for figure in &self.figures {
            let Some((first, rest)) = figure.points.split_first() else {
                continue;
            };
            list.set_shape(figure.shape);
            list.start_figure(first.point, first.smooth)?;
            for fp in rest {
                list.add_vertex(&mut self.pools, fp.point, fp.curve, fp.smooth)?;
            }
            list.end_figure(&mut self.pools, figure.closed, &mut master)?;
        }
        debug!("chain list built: chains={}", list.chain_count());

        let rules = FillRules::new(self.fill_modes, self.config.combine);
        let mut sweep = Sweep::new(&mut self.pools, master, rules);
        sweep.run()?;
        let (finished, stats) = sweep.into_finished();
        self.finished = finished;
        self.stats = stats;
        Ok(())
    }

    /// Drops every figure and all output; the scanner is ready for new input.
    /// Fill modes and the current shape are kept.
    pub fn reset(&mut self) {
        self.figures.clear();
        self.open = None;
        self.finished.clear();
        self.pools.reset();
        self.stats = SweepStats::default();
        self.state = ScanState::Idle;
    }

    // ─────────────────────────────── Output ──────────────────────────────────

    /// Every chain the scan produced, in completion order.
    pub fn chains(&self) -> impl Iterator<Item = ChainView<'_>> + '_ {
        self.finished.iter().map(move |&c| ChainView::new(self, c))
    }

    /// Every crossing the sweep resolved.
    pub fn intersections(&self) -> impl Iterator<Item = IntersectionView> + '_ {
        let count = if self.state == ScanState::Done {
            self.pools.intersections.len() as u32
        } else {
            0
        };
        (0..count).map(move |i| IntersectionView::new(self, &self.pools.intersections[i]))
    }

    /// Sum of the boundary chains' signed area contributions: the filled
    /// area under the scan's fill rules.
    pub fn filled_area(&self) -> f64 {
        self.chains()
            .filter(|c| c.is_boundary())
            .map(|c| c.area_contribution())
            .sum()
    }
}
