//! # Collaborator Ports
//!
//! Narrow interfaces to the parts of the host that the blocking core only
//! passes through: boundary patch naming and curve snapping. Each port has an
//! in-memory implementation so a session can export without a host attached.

mod curves;
mod patches;

pub use curves::{NoSnapping, PolylineSnapper, SnappedCurve};
pub use patches::{normalize_patch_name, PatchRegistry, PatchTag, PatchType};

use crate::error::BlockingResult;
use crate::graph::{EdgeId, FaceAttributes, GraphModel, SnapRef};
use crate::topology::Face;
use glam::DVec3;

/// Looks up the boundary patch of a face.
pub trait BoundaryTagger {
    /// Patch of `face`, or `None` for the default patch.
    fn tag(&self, face: &Face, attributes: &FaceAttributes) -> Option<PatchTag>;
}

/// Projects edges onto reference curves.
pub trait CurveSnapper {
    /// Points of the curve `snap` oriented from `from` towards `to`, or `None`
    /// when the edge stays straight.
    fn snap(&self, snap: &SnapRef, from: DVec3, to: DVec3) -> Option<SnappedCurve>;
}

/// Curve a snapped edge follows, walked in the edge's stored direction.
///
/// `None` for straight edges and for snaps the snapper cannot resolve.
pub fn edge_curve(
    graph: &GraphModel,
    edge: EdgeId,
    snapper: &dyn CurveSnapper,
) -> BlockingResult<Option<SnappedCurve>> {
    let record = graph.edge(edge)?;
    let Some(snap) = record.attributes.snap.as_ref() else {
        return Ok(None);
    };
    let (start, end) = record.endpoints();
    Ok(snapper
        .snap(snap, graph.position(start)?, graph.position(end)?)
        .filter(|c| c.length > 0.0))
}

/// Length the grading of `edge` has to cover: the arc length of its curve
/// when snapped, the straight distance otherwise.
pub fn edge_span(
    graph: &GraphModel,
    edge: EdgeId,
    snapper: &dyn CurveSnapper,
) -> BlockingResult<f64> {
    match edge_curve(graph, edge, snapper)? {
        Some(curve) => Ok(curve.length),
        None => graph.edge_length(edge),
    }
}
