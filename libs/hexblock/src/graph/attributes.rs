//! Typed per-edge and per-face attribute records.
//!
//! Every field has a defined default, so an edge or face the user never
//! touched reads as uniform grading with the default cell count.

use crate::error::GradingError;
use crate::graph::VertexId;
use crate::topology::GroupId;
use ::config::constants::{DEFAULT_CELLS, DEFAULT_CELL_SIZE, DEFAULT_RATIO};
use serde::Serialize;

/// How the cell count of an edge was specified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingType {
    /// Cell count entered directly.
    #[default]
    CellCount,
    /// Cell count derived from a uniform cell size.
    CellSize,
}

/// Boundary-layer grading of one edge, expressed in the edge's direction.
///
/// `x1`/`r1` describe the first cell and growth ratio at the start vertex,
/// `x2`/`r2` the same at the end vertex. A zero size means "no boundary
/// layer on that side".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeGrading {
    /// First cell size at the start vertex.
    pub x1: f64,
    /// First cell size at the end vertex.
    pub x2: f64,
    /// Growth ratio away from the start vertex.
    pub r1: f64,
    /// Growth ratio away from the end vertex.
    pub r2: f64,
}

impl EdgeGrading {
    /// Creates a grading record.
    pub fn new(x1: f64, x2: f64, r1: f64, r2: f64) -> Self {
        Self { x1, x2, r1, r2 }
    }

    /// Grading without boundary layers.
    pub fn uniform() -> Self {
        Self::new(0.0, 0.0, DEFAULT_RATIO, DEFAULT_RATIO)
    }

    /// Boundary layer at the start vertex only.
    pub fn start_layer(x1: f64, r1: f64) -> Self {
        Self::new(x1, 0.0, r1, DEFAULT_RATIO)
    }

    /// Boundary layer at the end vertex only.
    pub fn end_layer(x2: f64, r2: f64) -> Self {
        Self::new(0.0, x2, DEFAULT_RATIO, r2)
    }

    /// The same grading seen from the opposite end of the edge.
    ///
    /// # Examples
    /// ```
    /// use hexblock::EdgeGrading;
    /// let g = EdgeGrading::new(0.1, 0.0, 1.2, 1.0);
    /// assert_eq!(g.reversed().x2, 0.1);
    /// assert_eq!(g.reversed().reversed(), g);
    /// ```
    pub fn reversed(self) -> Self {
        Self::new(self.x2, self.x1, self.r2, self.r1)
    }

    /// Reverses the grading when `reverse` is set.
    pub fn oriented(self, reverse: bool) -> Self {
        if reverse {
            self.reversed()
        } else {
            self
        }
    }

    /// True when neither end carries a boundary layer.
    pub fn is_uniform(&self) -> bool {
        self.x1 == 0.0 && self.x2 == 0.0
    }

    /// Checks that sizes are finite and non-negative and ratios at least one.
    pub fn validate(&self) -> Result<(), GradingError> {
        for size in [self.x1, self.x2] {
            if !size.is_finite() {
                return Err(GradingError::NonFiniteCellSize(size));
            }
            if size < 0.0 {
                return Err(GradingError::NegativeCellSize(size));
            }
        }
        for ratio in [self.r1, self.r2] {
            if !(ratio.is_finite() && ratio >= 1.0) {
                return Err(GradingError::InvalidRatio(ratio));
            }
        }
        Ok(())
    }
}

impl Default for EdgeGrading {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Reference to a curve the edge should follow instead of a straight line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SnapRef(pub String);

impl SnapRef {
    /// Creates a snap reference from a curve name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Mutable attribute record carried by every edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeAttributes {
    /// How the cell count was specified.
    pub mapping: MappingType,
    /// Uniform cell size, meaningful with [`MappingType::CellSize`].
    pub cell_size: f64,
    /// Boundary-layer grading in the edge's direction.
    pub grading: EdgeGrading,
    /// Cell count, shared by the whole parallel group.
    pub cells: u32,
    /// Parallel group assigned by the last build.
    pub group: Option<GroupId>,
    /// Curve to follow, if any.
    pub snap: Option<SnapRef>,
}

impl Default for EdgeAttributes {
    fn default() -> Self {
        Self {
            mapping: MappingType::CellCount,
            cell_size: DEFAULT_CELL_SIZE,
            grading: EdgeGrading::uniform(),
            cells: DEFAULT_CELLS,
            group: None,
            snap: None,
        }
    }
}

/// Unordered quad of vertex ids, used to key face attributes so they survive
/// re-derivation of the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadKey([VertexId; 4]);

impl QuadKey {
    /// Builds the key from the face's vertices in any order.
    pub fn new(mut vertices: [VertexId; 4]) -> Self {
        vertices.sort_unstable();
        Self(vertices)
    }

    /// Sorted vertex ids.
    pub fn vertices(&self) -> [VertexId; 4] {
        self.0
    }
}

/// Mutable attribute record carried by every face of the sketch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceAttributes {
    /// Boundary patch the face belongs to.
    pub patch: Option<String>,
    /// Surface to project onto, if any.
    pub snap: Option<SnapRef>,
}
