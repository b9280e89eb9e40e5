//! # Config Crate
//!
//! Centralized configuration constants for the hexahedral blocking pipeline.
//! Tolerances, grading defaults and safety limits are defined here once so
//! the topology and grading code never scatters literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_CELLS, EPSILON_TOLERANCE};
//!
//! // Relative tolerance for comparing realized and requested edge lengths
//! let requested = 10.0_f64;
//! let realized = 10.0 + 1.0e-12;
//! assert!((realized - requested).abs() <= EPSILON_TOLERANCE * requested);
//!
//! // Cell count used when an edge carries no explicit count
//! let cells: Option<u32> = None;
//! assert_eq!(cells.unwrap_or(DEFAULT_CELLS), 10);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Validated Snapshots**: `GlobalConfig::new` rejects unusable values
//! - **Defaults match the editor**: cell count and ratios mirror the values a
//!   freshly initialized blocking sketch carries

pub mod constants;
