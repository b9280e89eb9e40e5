//! Blocking configuration built on the shared `config` crate.
//!
//! The wrapper keeps the finder and solver decoupled from literal constants
//! and adds the one policy switch that is local to this crate: whether
//! unresolved edges fail a build.

use ::config::constants::{
    ConfigError, GlobalConfig, DEFAULT_CELLS, DEGENERACY_TOLERANCE, EPSILON_TOLERANCE,
    MAX_BISECTION_ITERATIONS, MAX_CELLS_PER_EDGE,
};

/// Configuration threaded through every blocking operation.
///
/// # Examples
/// ```
/// use hexblock::config::BlockingConfig;
/// let cfg = BlockingConfig::default();
/// assert!(cfg.tolerance > 0.0);
/// assert!(!cfg.strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockingConfig {
    /// Relative tolerance for realized lengths and minimal cell counts.
    pub tolerance: f64,
    /// Relative tolerance below which quads and hexahedra count as degenerate.
    pub degeneracy_tolerance: f64,
    /// Cell count for uniform edges without an explicit count.
    pub default_cells: u32,
    /// Largest cell count one edge may receive.
    pub max_cells_per_edge: u32,
    /// Iteration cap for the effective-ratio bisection.
    pub max_iterations: u32,
    /// Fail the build when any active edge is not part of a block.
    pub strict: bool,
}

impl BlockingConfig {
    /// Creates a new configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use hexblock::config::BlockingConfig;
    /// let cfg = BlockingConfig::new(1.0e-8, 20, 10_000).unwrap();
    /// assert_eq!(cfg.default_cells, 20);
    /// ```
    pub fn new(
        tolerance: f64,
        default_cells: u32,
        max_cells_per_edge: u32,
    ) -> Result<Self, BlockingConfigError> {
        GlobalConfig::new(tolerance, default_cells, max_cells_per_edge)
            .map(Self::from)
            .map_err(BlockingConfigError)
    }

    /// Returns a copy that fails builds leaving any edge unresolved.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

impl From<GlobalConfig> for BlockingConfig {
    fn from(cfg: GlobalConfig) -> Self {
        Self {
            tolerance: cfg.tolerance,
            degeneracy_tolerance: DEGENERACY_TOLERANCE,
            default_cells: cfg.default_cells,
            max_cells_per_edge: cfg.max_cells_per_edge,
            max_iterations: MAX_BISECTION_ITERATIONS,
            strict: false,
        }
    }
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            degeneracy_tolerance: DEGENERACY_TOLERANCE,
            default_cells: DEFAULT_CELLS,
            max_cells_per_edge: MAX_CELLS_PER_EDGE,
            max_iterations: MAX_BISECTION_ITERATIONS,
            strict: false,
        }
    }
}

/// Error wrapper for invalid blocking configuration.
#[derive(Debug, PartialEq)]
pub struct BlockingConfigError(ConfigError);

impl std::fmt::Display for BlockingConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for BlockingConfigError {}
