//! Mesh Writer payload.
//!
//! Flattens a built session into plain records a block mesh writer can
//! consume: coordinates, enabled blocks with per-axis cell counts, visible
//! boundary faces with their patches, edge groups, directed gradings and
//! snapped curves. Every id in the payload is a graph vertex index.

use crate::collab::{edge_curve, BoundaryTagger, CurveSnapper, PatchTag, PatchType};
use crate::config::BlockingConfig;
use crate::error::{BlockingError, BlockingResult};
use crate::grading::{GradingDescriptor, GradingSolver};
use crate::graph::{EdgeId, GraphModel};
use crate::topology::Topology;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Enabled block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRecord {
    /// Block id in the topology
    pub id: u32,
    /// Corner vertex indices
    pub vertices: [u32; 8],
    /// Named cell zone
    pub region: Option<String>,
    /// Cells along block axes 0, 1 and 2
    pub cells: [u32; 3],
}

/// Visible face, wound outward from its enabled block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceRecord {
    /// Corner vertex indices
    pub vertices: [u32; 4],
    /// Patch name
    pub patch: String,
    /// Patch type
    #[serde(rename = "type")]
    pub kind: PatchType,
}

/// Faces sharing one patch name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchRecord {
    /// Patch name
    pub name: String,
    /// Patch type
    #[serde(rename = "type")]
    pub kind: PatchType,
    /// Member faces
    pub faces: Vec<[u32; 4]>,
}

/// Grading of an edge walked from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectedGrading {
    /// Start vertex
    pub from: u32,
    /// End vertex
    pub to: u32,
    /// Cell distribution in that direction
    pub grading: GradingDescriptor,
}

/// Curve followed by a snapped edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveRecord {
    /// Start vertex
    pub from: u32,
    /// End vertex
    pub to: u32,
    /// Points from `from` to `to`
    pub points: Vec<[f64; 3]>,
    /// Arc length
    pub length: f64,
}

/// Everything handed to the mesh writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshPayload {
    /// Vertex coordinates, indexed by vertex id
    pub vertices: Vec<[f64; 3]>,
    /// Enabled blocks
    pub blocks: Vec<BlockRecord>,
    /// Visible faces
    pub faces: Vec<FaceRecord>,
    /// Visible faces grouped by patch name
    pub patches: Vec<PatchRecord>,
    /// Edge groups as vertex pairs in stored direction
    pub edge_groups: Vec<Vec<(u32, u32)>>,
    /// Gradings of every enabled block edge, both directions
    pub gradings: Vec<DirectedGrading>,
    /// Snapped edges
    pub curves: Vec<CurveRecord>,
    /// Total number of hexahedral cells
    pub cell_count: u64,
}

impl MeshPayload {
    /// Assembles the payload from a built topology.
    ///
    /// # Errors
    /// [`BlockingError::NotBuilt`] without blocks,
    /// [`BlockingError::MissingEdge`] when `topology` was built from another
    /// sketch, or a grading failure for an edge whose stored parameters are
    /// out of domain.
    pub fn assemble(
        graph: &GraphModel,
        topology: &Topology,
        config: BlockingConfig,
        tagger: &dyn BoundaryTagger,
        snapper: &dyn CurveSnapper,
    ) -> BlockingResult<Self> {
        if topology.is_empty() {
            return Err(BlockingError::NotBuilt);
        }
        let solver = GradingSolver::new(config);
        let mut payload = MeshPayload {
            vertices: graph.positions().iter().map(|p| p.to_array()).collect(),
            ..Default::default()
        };

        let cells_of = |a, b| -> BlockingResult<u32> {
            let edge = graph
                .find_edge(a, b)
                .ok_or(BlockingError::MissingEdge { a, b })?;
            Ok(graph.edge_attributes(edge)?.cells)
        };

        let mut block_edges = BTreeSet::new();
        for (id, block) in topology.blocks().filter(|(_, b)| b.enabled) {
            let mut cells = [0u32; 3];
            for (axis, count) in cells.iter_mut().enumerate() {
                let (a, b) = block.edges_along(axis)[0];
                *count = cells_of(a, b)?;
            }
            payload.cell_count += cells.iter().map(|&c| u64::from(c)).product::<u64>();
            block_edges.extend(
                block
                    .edges()
                    .iter()
                    .filter_map(|&(a, b)| graph.find_edge(a, b)),
            );
            payload.blocks.push(BlockRecord {
                id: id.0,
                vertices: block.vertices.map(|v| v.0),
                region: block.region.clone(),
                cells,
            });
        }

        let mut patches: BTreeMap<String, PatchRecord> = BTreeMap::new();
        for (_, face) in topology.faces().filter(|(_, f)| f.enabled) {
            let attributes = graph.face_attributes(&face.key());
            let tag = tagger.tag(face, &attributes).unwrap_or_default();
            // Wind outward from whichever side is still enabled.
            let outward_from_neg = face
                .neg
                .and_then(|b| topology.block(b).ok())
                .map_or(false, |b| b.enabled);
            let mut vertices = face.vertices.map(|v| v.0);
            if !outward_from_neg {
                vertices.reverse();
            }
            let PatchTag { name, kind } = tag;
            patches
                .entry(name.clone())
                .or_insert_with(|| PatchRecord {
                    name: name.clone(),
                    kind,
                    faces: Vec::new(),
                })
                .faces
                .push(vertices);
            payload.faces.push(FaceRecord {
                vertices,
                patch: name,
                kind,
            });
        }
        payload.patches = patches.into_values().collect();

        payload.edge_groups = topology
            .groups
            .iter()
            .map(|g| {
                g.edges()
                    .filter_map(|e| graph.edge(e).ok())
                    .map(|e| (e.start().0, e.end().0))
                    .collect()
            })
            .collect();

        for edge_id in block_edges {
            payload.add_edge(graph, &solver, snapper, edge_id)?;
        }
        debug!(
            blocks = payload.blocks.len(),
            faces = payload.faces.len(),
            cells = payload.cell_count,
            "mesh payload assembled"
        );
        Ok(payload)
    }

    fn add_edge(
        &mut self,
        graph: &GraphModel,
        solver: &GradingSolver,
        snapper: &dyn CurveSnapper,
        edge_id: EdgeId,
    ) -> BlockingResult<()> {
        let edge = graph.edge(edge_id)?;
        let (start, end) = edge.endpoints();

        let curve = edge_curve(graph, edge_id, snapper)?;
        let length = match &curve {
            Some(c) => c.length,
            None => graph.edge_length(edge_id)?,
        };
        let attributes = &edge.attributes;
        let forward = solver
            .realize(length, &attributes.grading, attributes.cells)
            .map_err(|source| BlockingError::grading(edge_id, source))?;

        let backward = forward.reversed();
        self.gradings.push(DirectedGrading {
            from: start.0,
            to: end.0,
            grading: forward,
        });
        self.gradings.push(DirectedGrading {
            from: end.0,
            to: start.0,
            grading: backward,
        });

        if let Some(curve) = curve {
            self.curves.push(CurveRecord {
                from: start.0,
                to: end.0,
                points: curve.points.iter().map(|p| p.to_array()).collect(),
                length: curve.length,
            });
        }
        Ok(())
    }

    /// Grading of the edge walked from `from` to `to`
    pub fn grading(&self, from: u32, to: u32) -> Option<&GradingDescriptor> {
        self.gradings
            .iter()
            .find(|g| g.from == from && g.to == to)
            .map(|g| &g.grading)
    }

    /// Serializes the payload as pretty-printed JSON.
    pub fn to_json(&self) -> BlockingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
