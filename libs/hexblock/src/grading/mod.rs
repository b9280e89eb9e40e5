//! # Grading Solver
//!
//! Maps an edge's length and boundary-layer parameters to an integer cell
//! count and the geometric distribution that realizes the length exactly.
//!
//! ## Cases
//!
//! - **Uniform** (`x1 = x2 = 0`): `N` comes from the target (count, cell size
//!   or configured default), clamped to at least one.
//! - **Single-sided** (one of `x1`, `x2` positive): the smallest `N` whose
//!   geometric series reaches `L`, then the ratio is re-solved so the series
//!   sums to `L` exactly with the requested first cell.
//! - **Double-sided**: two single-sided problems on `L/2`, reported as a
//!   two-segment descriptor.
//!
//! All validation happens before any series is evaluated; a rejected request
//! never produces a partial result.

mod series;

use crate::config::BlockingConfig;
use crate::error::GradingError;
use crate::graph::EdgeGrading;
use serde::Serialize;
use series::{fit_layer, min_cells, Layer};

// =============================================================================
// REQUEST
// =============================================================================

/// How the cell count of an edge is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CellTarget {
    /// Exact count for uniform edges; upper bound that must be met for graded
    /// edges, surplus cells spread over the layers.
    Count(u32),
    /// Uniform cell size, `N = round(L / dx)`. Graded edges ignore it.
    CellSize(f64),
    /// Configured default for uniform edges, minimal count for graded ones.
    #[default]
    Auto,
}

/// Grading problem for one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingRequest {
    /// Edge length, positive and finite.
    pub length: f64,
    /// Boundary-layer parameters in the edge's direction.
    pub grading: EdgeGrading,
    /// Cell count selection.
    pub target: CellTarget,
}

impl GradingRequest {
    /// Creates a request.
    pub fn new(length: f64, grading: EdgeGrading, target: CellTarget) -> Self {
        Self {
            length,
            grading,
            target,
        }
    }

    /// Uniform request for `cells` cells.
    pub fn uniform(length: f64, cells: u32) -> Self {
        Self::new(length, EdgeGrading::uniform(), CellTarget::Count(cells))
    }

    fn validate(&self) -> Result<(), GradingError> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(GradingError::InvalidLength(self.length));
        }
        self.grading.validate()?;
        if let CellTarget::CellSize(dx) = self.target {
            if !(dx.is_finite() && dx > 0.0) {
                return Err(GradingError::InvalidCellSize(dx));
            }
        }
        Ok(())
    }
}

// =============================================================================
// DESCRIPTOR
// =============================================================================

/// One geometric run of cells inside an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradedSegment {
    /// Length covered by the segment.
    pub length: f64,
    /// Number of cells in the segment.
    pub cells: u32,
    /// Size of the segment's first cell, in the edge's direction.
    pub first_cell: f64,
    /// Ratio between consecutive cells; below one when cells shrink.
    pub ratio: f64,
}

impl GradedSegment {
    fn from_layer(layer: Layer) -> Self {
        Self {
            length: layer.length(),
            cells: layer.cells,
            first_cell: layer.first,
            ratio: layer.ratio,
        }
    }

    fn layer(&self) -> Layer {
        Layer {
            first: self.first_cell,
            ratio: self.ratio,
            cells: self.cells,
        }
    }

    /// Size of the segment's last cell.
    pub fn last_cell(&self) -> f64 {
        self.layer().last()
    }

    /// Ratio of last to first cell.
    pub fn expansion(&self) -> f64 {
        self.ratio.powf(f64::from(self.cells.saturating_sub(1)))
    }
}

/// Realized cell distribution along one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingDescriptor {
    /// Total cell count.
    pub cells: u32,
    /// Segments from the edge's start to its end.
    pub segments: Vec<GradedSegment>,
}

impl GradingDescriptor {
    fn from_layers(layers: impl IntoIterator<Item = Layer>) -> Self {
        let segments: Vec<_> = layers.into_iter().map(GradedSegment::from_layer).collect();
        Self {
            cells: segments.iter().map(|s| s.cells).sum(),
            segments,
        }
    }

    fn uniform(length: f64, cells: u32) -> Self {
        Self::from_layers([Layer {
            first: length / f64::from(cells),
            ratio: 1.0,
            cells,
        }])
    }

    /// Sum of all cell sizes.
    pub fn realized_length(&self) -> f64 {
        self.segments.iter().map(|s| s.layer().length()).sum()
    }

    /// Every cell has the same size.
    pub fn is_uniform(&self) -> bool {
        self.segments.iter().all(|s| s.ratio == 1.0 || s.cells == 1)
    }

    /// Size of the first cell at the edge's start.
    pub fn first_cell(&self) -> Option<f64> {
        self.segments.first().map(|s| s.first_cell)
    }

    /// Size of the last cell at the edge's end.
    pub fn last_cell(&self) -> Option<f64> {
        self.segments.last().map(GradedSegment::last_cell)
    }

    /// The same distribution seen from the edge's end.
    ///
    /// # Examples
    /// ```
    /// use hexblock::{CellTarget, EdgeGrading, GradingRequest, GradingSolver};
    /// let solver = GradingSolver::default();
    /// let request = GradingRequest::new(10.0, EdgeGrading::start_layer(0.1, 1.2), CellTarget::Auto);
    /// let forward = solver.solve(&request).unwrap();
    /// let backward = forward.reversed();
    /// assert_eq!(backward.cells, forward.cells);
    /// assert!((backward.last_cell().unwrap() - 0.1).abs() < 1e-6);
    /// ```
    pub fn reversed(&self) -> Self {
        Self::from_layers(self.segments.iter().rev().map(|s| s.layer().reversed()))
    }

    /// `(length fraction, cell fraction, expansion ratio)` per segment, the
    /// form block mesh writers take for multi-grading.
    pub fn multi_grading(&self) -> Vec<(f64, f64, f64)> {
        let total_length = self.realized_length();
        let total_cells = f64::from(self.cells.max(1));
        self.segments
            .iter()
            .map(|s| {
                (
                    s.layer().length() / total_length,
                    f64::from(s.cells) / total_cells,
                    s.expansion(),
                )
            })
            .collect()
    }
}

// =============================================================================
// SOLVER
// =============================================================================

/// Per-edge grading solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradingSolver {
    config: BlockingConfig,
}

impl GradingSolver {
    /// Creates a solver with the given tolerances and limits.
    pub fn new(config: BlockingConfig) -> Self {
        Self { config }
    }

    /// Solves one request.
    ///
    /// # Errors
    /// Any [`GradingError`]: out-of-domain input, a first cell longer than its
    /// layer (half the edge when both ends are graded), a count too small for
    /// the boundary layers, or a count above the configured limit.
    pub fn solve(&self, request: &GradingRequest) -> Result<GradingDescriptor, GradingError> {
        request.validate()?;
        let GradingRequest {
            length,
            grading,
            target,
        } = *request;
        let max = self.config.max_cells_per_edge;

        if grading.is_uniform() {
            let cells = match target {
                CellTarget::Count(n) => n.max(1),
                CellTarget::CellSize(dx) => {
                    let n = (length / dx).round();
                    if n > f64::from(max) {
                        return Err(GradingError::TooManyCells { max });
                    }
                    (n as u32).max(1)
                }
                CellTarget::Auto => self.config.default_cells.max(1),
            };
            if cells > max {
                return Err(GradingError::TooManyCells { max });
            }
            return Ok(GradingDescriptor::uniform(length, cells));
        }

        let lengths = split_lengths(length, &grading);
        for ((first, _), &layer) in layer_params(&grading).into_iter().zip(&lengths) {
            if first > layer * (1.0 + self.config.tolerance) {
                return Err(GradingError::FirstCellTooLarge { first, layer });
            }
        }

        let (lengths, minimal) = self.minimal_layers(length, &grading, max)?;
        let required: u32 = minimal.iter().sum();
        if required > max {
            return Err(GradingError::TooManyCells { max });
        }
        let counts = match target {
            CellTarget::Count(n) if n < required => {
                return Err(GradingError::NonConvergent {
                    length,
                    cells: n,
                    required,
                });
            }
            CellTarget::Count(n) => {
                if n > max {
                    return Err(GradingError::TooManyCells { max });
                }
                spread_surplus(&minimal, n - required)
            }
            CellTarget::CellSize(_) | CellTarget::Auto => minimal,
        };
        Ok(self.assemble(&grading, &lengths, &counts))
    }

    /// Fits a fixed cell count onto an edge of `length`.
    ///
    /// Used where the count is dictated by the edge's group rather than by its
    /// own parameters, so a count below the minimal one is accepted and the
    /// effective ratio grows past the requested one instead.
    pub fn realize(
        &self,
        length: f64,
        grading: &EdgeGrading,
        cells: u32,
    ) -> Result<GradingDescriptor, GradingError> {
        GradingRequest::new(length, *grading, CellTarget::Count(cells)).validate()?;
        let cells = cells.max(1);
        if grading.is_uniform() || cells == 1 {
            return Ok(GradingDescriptor::uniform(length, cells));
        }
        let max = self.config.max_cells_per_edge;
        let (lengths, minimal) = match self.minimal_layers(length, grading, max) {
            Ok(found) => found,
            // The layer would need more cells than allowed: keep the count.
            Err(_) => (split_lengths(length, grading), vec![1; layer_count(grading)]),
        };
        let required: u32 = minimal.iter().sum();
        let counts = if cells >= required {
            spread_surplus(&minimal, cells - required)
        } else {
            shrink_proportionally(&minimal, cells)
        };
        Ok(self.assemble(grading, &lengths, &counts))
    }

    /// Smallest per-layer counts together with the layer lengths.
    fn minimal_layers(
        &self,
        length: f64,
        grading: &EdgeGrading,
        max: u32,
    ) -> Result<(Vec<f64>, Vec<u32>), GradingError> {
        let tolerance = self.config.tolerance;
        let lengths = split_lengths(length, grading);
        let counts = layer_params(grading)
            .into_iter()
            .zip(&lengths)
            .map(|((x, r), &l)| min_cells(l, x, r, tolerance, max))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((lengths, counts))
    }

    fn assemble(&self, grading: &EdgeGrading, lengths: &[f64], counts: &[u32]) -> GradingDescriptor {
        let BlockingConfig {
            tolerance,
            max_iterations,
            ..
        } = self.config;
        let fit = |l: f64, (x, r): (f64, f64), n: u32| fit_layer(l, x, r, n, tolerance, max_iterations);

        match (grading.x1 > 0.0, grading.x2 > 0.0) {
            (true, true) => GradingDescriptor::from_layers([
                fit(lengths[0], (grading.x1, grading.r1), counts[0]),
                fit(lengths[1], (grading.x2, grading.r2), counts[1]).reversed(),
            ]),
            (true, false) => GradingDescriptor::from_layers([fit(
                lengths[0],
                (grading.x1, grading.r1),
                counts[0],
            )]),
            _ => GradingDescriptor::from_layers([fit(
                lengths[0],
                (grading.x2, grading.r2),
                counts[0],
            )
            .reversed()]),
        }
    }
}

/// `(first cell, ratio)` of each boundary layer, start layer first.
fn layer_params(grading: &EdgeGrading) -> Vec<(f64, f64)> {
    [(grading.x1, grading.r1), (grading.x2, grading.r2)]
        .into_iter()
        .filter(|&(x, _)| x > 0.0)
        .collect()
}

fn layer_count(grading: &EdgeGrading) -> usize {
    layer_params(grading).len()
}

fn split_lengths(length: f64, grading: &EdgeGrading) -> Vec<f64> {
    if layer_count(grading) == 2 {
        vec![0.5 * length, 0.5 * length]
    } else {
        vec![length]
    }
}

/// Adds `extra` cells, the first layer taking the smaller half.
fn spread_surplus(minimal: &[u32], extra: u32) -> Vec<u32> {
    match minimal {
        [a, b] => vec![a + extra / 2, b + extra - extra / 2],
        _ => minimal.iter().map(|n| n + extra).collect(),
    }
}

/// Distributes `cells` over the layers in proportion to their minimal counts,
/// keeping at least one cell per layer.
fn shrink_proportionally(minimal: &[u32], cells: u32) -> Vec<u32> {
    match minimal {
        [a, b] if cells >= 2 => {
            let share = f64::from(cells) * f64::from(*a) / f64::from(a + b);
            let first = (share.round() as u32).clamp(1, cells - 1);
            vec![first, cells - first]
        }
        [_, _] => vec![1, 1],
        _ => vec![cells.max(1)],
    }
}
