//! Geometric series helpers behind the grading solver.
//!
//! A layer of `n` cells with first cell `x` and growth ratio `q` covers
//! `x·(qⁿ−1)/(q−1)`. The solver needs that sum in both directions: the
//! smallest `n` reaching a length, and the `(x, q)` pair realizing a length
//! exactly once `n` is fixed.

use crate::error::GradingError;

/// Ratios closer to one than this are summed as a uniform layer.
const UNIT_RATIO_BAND: f64 = 1.0e-12;

/// Sum of `n` terms of the series `1, q, q², …`.
pub(crate) fn growth_factor(ratio: f64, n: u32) -> f64 {
    if (ratio - 1.0).abs() < UNIT_RATIO_BAND {
        f64::from(n)
    } else {
        (ratio.powf(f64::from(n)) - 1.0) / (ratio - 1.0)
    }
}

/// Length covered by `n` cells starting at `first` and growing by `ratio`.
pub(crate) fn series_sum(first: f64, ratio: f64, n: u32) -> f64 {
    first * growth_factor(ratio, n)
}

/// Smallest cell count whose series reaches `length`.
///
/// Fails with [`GradingError::TooManyCells`] when the count would exceed `max`.
pub(crate) fn min_cells(
    length: f64,
    first: f64,
    ratio: f64,
    tolerance: f64,
    max: u32,
) -> Result<u32, GradingError> {
    if first >= length * (1.0 - tolerance) {
        return Ok(1);
    }
    let estimate = if (ratio - 1.0).abs() < UNIT_RATIO_BAND {
        (length / first * (1.0 - tolerance)).ceil()
    } else {
        ((1.0 + length * (ratio - 1.0) / first).ln() / ratio.ln() - tolerance).ceil()
    };
    if !estimate.is_finite() || estimate > f64::from(max) {
        return Err(GradingError::TooManyCells { max });
    }
    let mut n = (estimate as u32).max(1);
    // The closed form can land one short after rounding.
    while series_sum(first, ratio, n) < length * (1.0 - tolerance) {
        if n >= max {
            return Err(GradingError::TooManyCells { max });
        }
        n += 1;
    }
    Ok(n)
}

/// One geometric layer: `cells` cells starting at `first`, growing by `ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Layer {
    pub first: f64,
    pub ratio: f64,
    pub cells: u32,
}

impl Layer {
    pub(crate) fn length(&self) -> f64 {
        series_sum(self.first, self.ratio, self.cells)
    }

    /// Size of the final cell.
    pub(crate) fn last(&self) -> f64 {
        self.first * self.ratio.powf(f64::from(self.cells.saturating_sub(1)))
    }

    /// The same cells listed from the far end.
    pub(crate) fn reversed(self) -> Self {
        Self {
            first: self.last(),
            ratio: 1.0 / self.ratio,
            cells: self.cells,
        }
    }
}

/// Fits `n` cells onto `length`, starting from a first cell of `first` and a
/// growth of `ratio`.
///
/// When `n` cells of size `first` fit, the first cell is kept and the ratio is
/// solved by bisection (it may come out above `ratio` when `n` is below the
/// minimal count). Otherwise the ratio is kept and the first cell shrinks.
pub(crate) fn fit_layer(
    length: f64,
    first: f64,
    ratio: f64,
    n: u32,
    tolerance: f64,
    max_iterations: u32,
) -> Layer {
    if n <= 1 {
        return Layer {
            first: length,
            ratio: 1.0,
            cells: 1,
        };
    }
    if f64::from(n) * first <= length {
        let q = solve_ratio(length, first, n, tolerance, max_iterations);
        Layer {
            first: length / growth_factor(q, n),
            ratio: q,
            cells: n,
        }
    } else {
        Layer {
            first: length / growth_factor(ratio, n),
            ratio,
            cells: n,
        }
    }
}

/// Ratio `q ≥ 1` with `series_sum(first, q, n) == length`, assuming
/// `n·first ≤ length`.
fn solve_ratio(length: f64, first: f64, n: u32, tolerance: f64, max_iterations: u32) -> f64 {
    let target = length / first;
    let mut lo = 1.0_f64;
    let mut hi = 2.0_f64;
    let mut expansions = 0;
    while growth_factor(hi, n) < target && expansions < max_iterations {
        lo = hi;
        hi *= 2.0;
        expansions += 1;
    }
    for _ in 0..max_iterations {
        let mid = 0.5 * (lo + hi);
        let reached = growth_factor(mid, n);
        if (reached - target).abs() <= tolerance * target {
            return mid;
        }
        if reached < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
