//! Centralized configuration values shared across the blocking pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PRECISION
// =============================================================================

/// Relative tolerance used when comparing realized and requested lengths.
///
/// # Examples
/// ```
/// use config::constants::EPSILON_TOLERANCE;
/// assert!(EPSILON_TOLERANCE < 1.0e-6);
/// ```
pub const EPSILON_TOLERANCE: f64 = 1.0e-9;

/// Relative tolerance below which a quad area or hexahedron volume is treated
/// as degenerate (scaled by the square or cube of the element size).
///
/// # Examples
/// ```
/// use config::constants::DEGENERACY_TOLERANCE;
/// assert!(DEGENERACY_TOLERANCE > 0.0);
/// ```
pub const DEGENERACY_TOLERANCE: f64 = 1.0e-10;

/// Iteration cap for the bisection used to fit an effective growth ratio.
///
/// # Examples
/// ```
/// use config::constants::MAX_BISECTION_ITERATIONS;
/// assert!(MAX_BISECTION_ITERATIONS >= 64);
/// ```
pub const MAX_BISECTION_ITERATIONS: u32 = 200;

// =============================================================================
// GRADING DEFAULTS
// =============================================================================

/// Cell count carried by an edge that was never graded explicitly.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_CELLS;
/// assert_eq!(DEFAULT_CELLS, 10);
/// ```
pub const DEFAULT_CELLS: u32 = 10;

/// Growth ratio carried by an edge that was never graded explicitly.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RATIO;
/// assert_eq!(DEFAULT_RATIO, 1.0);
/// ```
pub const DEFAULT_RATIO: f64 = 1.0;

/// Uniform cell size offered when a cell-size mapping has no explicit value.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_CELL_SIZE;
/// assert!(DEFAULT_CELL_SIZE > 0.0);
/// ```
pub const DEFAULT_CELL_SIZE: f64 = 1.0;

/// Upper bound on the number of cells a single edge may receive.
///
/// Protects the solver against runaway counts from tiny first-cell sizes.
///
/// # Examples
/// ```
/// use config::constants::MAX_CELLS_PER_EDGE;
/// assert!(MAX_CELLS_PER_EDGE >= 1_000);
/// ```
pub const MAX_CELLS_PER_EDGE: u32 = 1_000_000;

// =============================================================================
// BOUNDARY DEFAULTS
// =============================================================================

/// Patch name reported for faces that carry no boundary tag.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_PATCH_NAME;
/// assert!(!DEFAULT_PATCH_NAME.contains(' '));
/// ```
pub const DEFAULT_PATCH_NAME: &str = "defaultName";

// =============================================================================
// GLOBAL SNAPSHOT
// =============================================================================

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Relative tolerance propagated into the grading solver.
    pub tolerance: f64,
    /// Cell count used for uniform edges without an explicit count.
    pub default_cells: u32,
    /// Largest cell count the solver may produce for one edge.
    pub max_cells_per_edge: u32,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of every field.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-8, 12, 5_000).expect("valid config");
    /// assert_eq!(cfg.default_cells, 12);
    /// ```
    pub fn new(
        tolerance: f64,
        default_cells: u32,
        max_cells_per_edge: u32,
    ) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if default_cells == 0 {
            return Err(ConfigError::InvalidCells(default_cells));
        }
        if max_cells_per_edge < default_cells {
            return Err(ConfigError::InvalidCellLimit {
                limit: max_cells_per_edge,
                default_cells,
            });
        }
        Ok(Self {
            tolerance,
            default_cells,
            max_cells_per_edge,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            default_cells: DEFAULT_CELLS,
            max_cells_per_edge: MAX_CELLS_PER_EDGE,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is not inside `(0, 1)`.
    InvalidTolerance(f64),
    /// Raised when the default cell count is zero.
    InvalidCells(u32),
    /// Raised when the per-edge limit is below the default count.
    InvalidCellLimit {
        /// Requested limit.
        limit: u32,
        /// Default count the limit must admit.
        default_cells: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must lie in (0, 1): {value}")
            }
            ConfigError::InvalidCells(value) => {
                write!(f, "default_cells must be >= 1: {value}")
            }
            ConfigError::InvalidCellLimit {
                limit,
                default_cells,
            } => write!(
                f,
                "max_cells_per_edge ({limit}) must be >= default_cells ({default_cells})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
