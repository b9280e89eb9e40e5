//! # Error Types
//!
//! Error types for blocking operations. Every condition in this crate is
//! local and non-fatal: errors are returned to the caller, the sketch stays
//! editable, and nothing here terminates the host.
//!
//! ## Error Policy
//!
//! - Out-of-domain grading input is rejected before the solver runs and the
//!   edge keeps its previous parameters
//! - A failed build leaves no partial topology behind
//! - Selection ambiguity and adjacency renumbering are reported as data
//!   (`SelectionWarning`, `IndexCorrection`), not as errors

use crate::config::BlockingConfigError;
use crate::graph::{EdgeId, VertexId};
use crate::topology::{BlockId, FaceId};
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the grading solver's input validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GradingError {
    /// Edge length is zero, negative or not finite.
    #[error("Edge length must be positive and finite: {0}")]
    InvalidLength(f64),

    /// A boundary cell size is negative.
    #[error("Boundary cell size must be >= 0: {0}")]
    NegativeCellSize(f64),

    /// A boundary cell size is NaN or infinite.
    #[error("Boundary cell size must be finite: {0}")]
    NonFiniteCellSize(f64),

    /// A boundary cell does not fit inside the layer it starts.
    #[error("First cell {first} exceeds its layer length {layer}")]
    FirstCellTooLarge {
        /// Requested first cell size.
        first: f64,
        /// Length available to the layer.
        layer: f64,
    },

    /// A growth ratio is below one or not finite.
    #[error("Growth ratio must be >= 1: {0}")]
    InvalidRatio(f64),

    /// A uniform cell size is zero, negative or not finite.
    #[error("Uniform cell size must be positive: {0}")]
    InvalidCellSize(f64),

    /// The requested cell count cannot cover the edge at the requested ratio.
    #[error("Series cannot reach length {length} within {cells} cells (needs {required})")]
    NonConvergent {
        /// Length to be covered.
        length: f64,
        /// Requested cell count.
        cells: u32,
        /// Smallest count that would cover the length.
        required: u32,
    },

    /// The grading would need more cells than the configured limit.
    #[error("Grading needs more than {max} cells")]
    TooManyCells {
        /// Configured per-edge limit.
        max: u32,
    },
}

/// Errors that can occur during blocking operations.
///
/// ## Example
///
/// ```rust
/// use hexblock::{BlockingError, BlockingSession, BuildOptions};
///
/// let mut session = BlockingSession::default();
/// match session.build(&BuildOptions::default()) {
///     Ok(report) => println!("{} blocks", report.blocks),
///     Err(BlockingError::TopologyInference { message, .. }) => eprintln!("{message}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum BlockingError {
    /// Vertex id outside the graph.
    #[error("Invalid vertex reference: {0:?}")]
    InvalidVertex(VertexId),

    /// Edge id outside the graph.
    #[error("Invalid edge reference: {0:?}")]
    InvalidEdge(EdgeId),

    /// A block names a vertex pair the sketch does not join.
    #[error("No edge joins {a:?} and {b:?}")]
    MissingEdge {
        /// First corner.
        a: VertexId,
        /// Second corner.
        b: VertexId,
    },

    /// Block id outside the current topology.
    #[error("Invalid block reference: {0:?}")]
    InvalidBlock(BlockId),

    /// Face id outside the current topology.
    #[error("Invalid face reference: {0:?}")]
    InvalidFace(FaceId),

    /// An edge may not connect a vertex to itself.
    #[error("Edge endpoints must differ: {0:?}")]
    SelfLoop(VertexId),

    /// The vertex pair is already connected.
    #[error("Edge {existing:?} already connects {a:?} and {b:?}")]
    DuplicateEdge {
        /// First endpoint.
        a: VertexId,
        /// Second endpoint.
        b: VertexId,
        /// Edge that already joins them.
        existing: EdgeId,
    },

    /// No self-consistent hexahedral decomposition could be derived.
    ///
    /// Carries the vertices and edges that no accepted block accounts for.
    #[error("Topology inference failed: {message}")]
    TopologyInference {
        /// Human-readable summary.
        message: String,
        /// Active vertices not covered by any block.
        unresolved_vertices: Vec<VertexId>,
        /// Active edges not covered by any block.
        unresolved_edges: Vec<EdgeId>,
    },

    /// Grading parameters were rejected.
    #[error("Grading rejected{}: {source}", .edge.map(|e| format!(" for {e:?}")).unwrap_or_default())]
    Grading {
        /// Edge the parameters were meant for, if any.
        edge: Option<EdgeId>,
        /// Underlying validation failure.
        #[source]
        source: GradingError,
    },

    /// The operation needs a topology but none has been built.
    #[error("No blocks have been built")]
    NotBuilt,

    /// Named edge group lookup failed.
    #[error("Unknown edge group name: {0}")]
    UnknownNamedGroup(String),

    /// Configuration values were rejected.
    #[error("Invalid configuration: {0}")]
    Config(#[from] BlockingConfigError),

    /// Payload serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BlockingError {
    /// Wraps a grading failure for a specific edge.
    pub fn grading(edge: EdgeId, source: GradingError) -> Self {
        Self::Grading {
            edge: Some(edge),
            source,
        }
    }
}

impl From<GradingError> for BlockingError {
    fn from(source: GradingError) -> Self {
        Self::Grading { edge: None, source }
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for blocking operations.
pub type BlockingResult<T> = Result<T, BlockingError>;

// =============================================================================
// TESTS
// =============================================================================
