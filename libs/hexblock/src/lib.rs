//! Hexahedral block-topology inference and edge grading.
//!
//! A user sketches the wireframe skeleton of a 3D domain: vertices and the
//! edges between them. This crate reconstructs the hexahedral blocks implied
//! by that skeleton, their shared-face adjacency, the sets of topologically
//! parallel edges that must share one cell count, and the per-edge geometric
//! grading a block mesher needs.
//!
//! All cross references are dense integer ids into arenas; nothing holds a
//! pointer to anything else. The [`session::BlockingSession`] value owns the
//! sketch and the derived topology and is threaded through every operation.
//!
//! ## Example
//!
//! ```rust
//! use hexblock::{BlockingSession, BuildOptions, Vec3};
//!
//! let mut session = BlockingSession::default();
//! let graph = session.graph_mut();
//! let mut ids = Vec::new();
//! for (x, y, z) in [
//!     (0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0),
//!     (0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 1.0), (0.0, 1.0, 1.0),
//! ] {
//!     ids.push(graph.add_vertex(Vec3::new(x, y, z)));
//! }
//! for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (5, 6),
//!                (6, 7), (7, 4), (0, 4), (1, 5), (2, 6), (3, 7)] {
//!     graph.add_edge(ids[a], ids[b]).unwrap();
//! }
//! let report = session.build(&BuildOptions::default()).unwrap();
//! assert_eq!(report.blocks, 1);
//! assert_eq!(session.topology().groups.len(), 3);
//! ```

pub mod collab;
pub mod config;
pub mod error;
pub mod export;
pub mod finder;
pub mod grading;
pub mod graph;
pub mod groups;
pub mod repair;
pub mod session;
pub mod topology;

#[cfg(test)]
mod fixtures;

pub use collab::{
    BoundaryTagger, CurveSnapper, NoSnapping, PatchRegistry, PatchTag, PatchType,
    PolylineSnapper, SnappedCurve,
};
pub use crate::config::BlockingConfig;
pub use error::{BlockingError, BlockingResult, GradingError};
pub use export::MeshPayload;
pub use finder::{BlockFinder, BuildOptions};
pub use grading::{CellTarget, GradedSegment, GradingDescriptor, GradingRequest, GradingSolver};
pub use graph::{
    EdgeAttributes, EdgeGrading, EdgeId, FaceAttributes, GraphModel, MappingType, QuadKey,
    SnapRef, VertexId,
};
pub use groups::EdgeGroupResolver;
pub use repair::{RepairReport, TopologyRepair};
pub use session::{BlockSelection, BlockingSession, BuildReport, SelectionWarning};
pub use topology::{
    Block, BlockId, BuildDiagnostics, EdgeGroup, Face, FaceId, GroupId, IndexCorrection, Topology,
};

/// Vector type used for every position in the crate.
pub use glam::DVec3 as Vec3;
