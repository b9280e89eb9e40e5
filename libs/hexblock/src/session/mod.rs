//! # Blocking Session
//!
//! The explicit context every operation runs against: the user's sketch, the
//! topology derived from it by the last build, user-named edge sets and the
//! configuration. The host serializes commands; nothing here locks.
//!
//! ## Example
//!
//! ```rust
//! use hexblock::{
//!     BlockingSession, BuildOptions, CellTarget, EdgeGrading, EdgeId, GraphModel, NoSnapping,
//!     Vec3,
//! };
//!
//! let graph = GraphModel::from_parts(
//!     &[
//!         Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0),
//!         Vec3::new(4.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0),
//!         Vec3::new(0.0, 0.0, 1.0), Vec3::new(4.0, 0.0, 1.0),
//!         Vec3::new(4.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 1.0),
//!     ],
//!     &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (5, 6),
//!       (6, 7), (7, 4), (0, 4), (1, 5), (2, 6), (3, 7)],
//! ).unwrap();
//! let mut session = BlockingSession::with_graph(graph, Default::default());
//! session.build(&BuildOptions::default()).unwrap();
//!
//! let descriptor = session
//!     .set_grading(EdgeId(0), EdgeGrading::start_layer(0.05, 1.2), CellTarget::Auto, &NoSnapping)
//!     .unwrap();
//! // Every edge parallel to edge 0 now has the same count.
//! for edge in session.aligned_edges(EdgeId(0)).unwrap() {
//!     assert_eq!(session.edge_grading(edge).unwrap().cells, descriptor.cells);
//! }
//! ```

use crate::collab::{edge_span, normalize_patch_name, BoundaryTagger, CurveSnapper};
use crate::config::BlockingConfig;
use crate::error::{BlockingError, BlockingResult};
use crate::export::MeshPayload;
use crate::finder::{BlockFinder, BuildOptions};
use crate::grading::{CellTarget, GradingDescriptor, GradingRequest, GradingSolver};
use crate::graph::{EdgeAttributes, EdgeGrading, EdgeId, GraphModel, MappingType, VertexId};
use crate::repair::{RepairReport, TopologyRepair};
use crate::topology::{BlockId, BuildDiagnostics, FaceId, GroupMember, Topology};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// Summary of a successful build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// Accepted blocks
    pub blocks: usize,
    /// Faces between or around blocks
    pub faces: usize,
    /// Parallel edge groups
    pub groups: usize,
    /// Non-fatal findings
    pub diagnostics: BuildDiagnostics,
    /// Visibility changes of the repair pass that followed
    pub repair: RepairReport,
}

/// A selection did not match any block exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionWarning {
    /// Selected vertices shared with the chosen block
    pub overlap: usize,
    /// Size of the selection
    pub selected: usize,
}

/// Block chosen for a vertex selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSelection {
    /// Chosen block
    pub block: BlockId,
    /// Set when the match was a best guess
    pub warning: Option<SelectionWarning>,
}

/// Sketch, derived topology and user state of one blocking object.
#[derive(Debug, Clone, Default)]
pub struct BlockingSession {
    graph: GraphModel,
    topology: Topology,
    named_groups: BTreeMap<String, Vec<EdgeId>>,
    config: BlockingConfig,
}

impl BlockingSession {
    /// Creates a session with an empty sketch
    pub fn new(config: BlockingConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Creates a session over an existing sketch
    pub fn with_graph(graph: GraphModel, config: BlockingConfig) -> Self {
        Self {
            graph,
            config,
            ..Default::default()
        }
    }

    /// The sketch
    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// Mutable sketch. Edits take effect on the next build.
    pub fn graph_mut(&mut self) -> &mut GraphModel {
        &mut self.graph
    }

    /// Topology of the last successful build
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Active configuration
    pub fn config(&self) -> &BlockingConfig {
        &self.config
    }

    /// A build has produced blocks
    pub fn is_built(&self) -> bool {
        !self.topology.is_empty()
    }

    // =========================================================================
    // BUILD
    // =========================================================================

    /// Derives blocks, faces and edge groups from the sketch, replacing the
    /// previous derivation.
    ///
    /// Blocks whose vertex set survives the rebuild keep their enabled flag
    /// and region. On failure every derived structure is cleared.
    pub fn build(&mut self, options: &BuildOptions) -> BlockingResult<BuildReport> {
        let previous: HashMap<[VertexId; 8], (bool, Option<String>)> = self
            .topology
            .blocks
            .iter()
            .map(|b| (b.key(), (b.enabled, b.region.clone())))
            .collect();
        let result = BlockFinder::new(&self.graph, self.config).run(options);
        self.clear_derived();
        let mut topology = result?;

        for block in &mut topology.blocks {
            if let Some((enabled, region)) = previous.get(&block.key()) {
                block.enabled = *enabled;
                block.region = region.clone();
            }
        }
        self.assign_groups(&topology)?;

        let repair = TopologyRepair::new(&mut self.graph, &mut topology).run();
        let report = BuildReport {
            blocks: topology.blocks.len(),
            faces: topology.faces.len(),
            groups: topology.groups.len(),
            diagnostics: topology.diagnostics.clone(),
            repair,
        };
        self.topology = topology;
        info!(blocks = report.blocks, groups = report.groups, "session rebuilt");
        Ok(report)
    }

    /// Drops the topology and every per-edge trace of it.
    fn clear_derived(&mut self) {
        self.topology = Topology::default();
        let ids: Vec<EdgeId> = self.graph.edges().map(|(id, _)| id).collect();
        for id in ids {
            if let Ok(edge) = self.graph.edge_mut(id) {
                edge.attributes.group = None;
                edge.hidden = false;
            }
        }
    }

    /// Writes group ids into edge attributes and gives every member the cell
    /// count of its group's reference edge.
    fn assign_groups(&mut self, topology: &Topology) -> BlockingResult<()> {
        for group in &topology.groups {
            let cells = self.graph.edge_attributes(group.reference)?.cells;
            for edge in group.edges() {
                let attributes = self.graph.edge_attributes_mut(edge)?;
                attributes.group = Some(group.id);
                attributes.cells = cells;
            }
        }
        Ok(())
    }

    // =========================================================================
    // EDGES
    // =========================================================================

    /// Group membership of `edge`, or the edge alone when it is ungrouped.
    fn members_of(&self, edge: EdgeId) -> BlockingResult<Vec<GroupMember>> {
        self.graph.edge(edge)?;
        Ok(self
            .topology
            .group_of(edge)
            .map(|g| g.members.clone())
            .unwrap_or_else(|| vec![GroupMember { edge, aligned: true }]))
    }

    /// Solves the grading of `edge` and applies it to every parallel edge.
    ///
    /// The solve runs on the length the edge is meshed along: the arc length
    /// of its curve when `snapper` resolves its snap, the chord otherwise.
    /// The count is shared by the whole group; the boundary-layer parameters
    /// are mirrored onto members stored against the edge's direction. Nothing
    /// changes when the request is rejected.
    pub fn set_grading(
        &mut self,
        edge: EdgeId,
        grading: EdgeGrading,
        target: CellTarget,
        snapper: &dyn CurveSnapper,
    ) -> BlockingResult<GradingDescriptor> {
        let length = edge_span(&self.graph, edge, snapper)?;
        let descriptor = GradingSolver::new(self.config)
            .solve(&GradingRequest::new(length, grading, target))
            .map_err(|source| BlockingError::grading(edge, source))?;

        let members = self.members_of(edge)?;
        let source_aligned = members
            .iter()
            .find(|m| m.edge == edge)
            .map_or(true, |m| m.aligned);
        let (mapping, cell_size) = match target {
            CellTarget::CellSize(dx) => (MappingType::CellSize, Some(dx)),
            _ => (MappingType::CellCount, None),
        };
        // Counts entered directly leave the last cell size in place.
        for member in members {
            let attributes = self.graph.edge_attributes_mut(member.edge)?;
            attributes.cells = descriptor.cells;
            attributes.grading = grading.oriented(member.aligned != source_aligned);
            attributes.mapping = mapping;
            if let Some(dx) = cell_size {
                attributes.cell_size = dx;
            }
        }
        Ok(descriptor)
    }

    /// Uniform grading from a cell size: `N = round(L / dx)`.
    pub fn set_cell_size(
        &mut self,
        edge: EdgeId,
        dx: f64,
        snapper: &dyn CurveSnapper,
    ) -> BlockingResult<GradingDescriptor> {
        self.set_grading(edge, EdgeGrading::uniform(), CellTarget::CellSize(dx), snapper)
    }

    /// Stored attributes of one edge
    pub fn edge_grading(&self, edge: EdgeId) -> BlockingResult<&EdgeAttributes> {
        self.graph.edge_attributes(edge)
    }

    /// Cell distribution the stored attributes give along the edge, snapped or straight
    pub fn edge_distribution(
        &self,
        edge: EdgeId,
        snapper: &dyn CurveSnapper,
    ) -> BlockingResult<GradingDescriptor> {
        let attributes = self.graph.edge_attributes(edge)?;
        GradingSolver::new(self.config)
            .realize(
                edge_span(&self.graph, edge, snapper)?,
                &attributes.grading,
                attributes.cells,
            )
            .map_err(|source| BlockingError::grading(edge, source))
    }

    /// Every edge parallel to `edge`, itself included
    pub fn aligned_edges(&self, edge: EdgeId) -> BlockingResult<Vec<EdgeId>> {
        Ok(self.members_of(edge)?.into_iter().map(|m| m.edge).collect())
    }

    /// Reverses the stored direction of every edge parallel to `edge`.
    ///
    /// Returns the flipped edges. Flipping twice restores the original state.
    pub fn flip_group(&mut self, edge: EdgeId) -> BlockingResult<Vec<EdgeId>> {
        let edges = self.aligned_edges(edge)?;
        for &member in &edges {
            self.graph.reverse_edge(member)?;
        }
        Ok(edges)
    }

    // =========================================================================
    // BLOCKS AND FACES
    // =========================================================================

    /// Enables or disables a block and repairs visibility
    pub fn set_block_enabled(&mut self, block: BlockId, enabled: bool) -> BlockingResult<RepairReport> {
        self.topology.block_mut(block)?.enabled = enabled;
        Ok(self.repair())
    }

    /// Re-applies the visibility rules to the current enable state
    pub fn repair(&mut self) -> RepairReport {
        TopologyRepair::new(&mut self.graph, &mut self.topology).run()
    }

    /// Names the cell zone of a block; blank names clear it
    pub fn set_block_region(&mut self, block: BlockId, name: Option<&str>) -> BlockingResult<()> {
        let region = name
            .map(normalize_patch_name)
            .filter(|n| !n.is_empty());
        self.topology.block_mut(block)?.region = region;
        Ok(())
    }

    /// Tags a face with a boundary patch; blank names clear it
    pub fn set_face_patch(&mut self, face: FaceId, name: Option<&str>) -> BlockingResult<()> {
        let key = self.topology.face(face)?.key();
        let mut attributes = self.graph.face_attributes(&key);
        attributes.patch = name.map(normalize_patch_name).filter(|n| !n.is_empty());
        self.graph.set_face_attributes(key, attributes);
        Ok(())
    }

    /// Finds the block a vertex selection refers to.
    ///
    /// A block whose eight corners are all selected wins outright. Otherwise
    /// the first block with the largest overlap is chosen and the result
    /// carries a [`SelectionWarning`].
    pub fn select_block(&self, selection: &[VertexId]) -> BlockingResult<BlockSelection> {
        let mut best: Option<(BlockId, usize)> = None;
        for (id, block) in self.topology.blocks() {
            let overlap = block.overlap(selection);
            if overlap == 8 {
                return Ok(BlockSelection {
                    block: id,
                    warning: None,
                });
            }
            if best.map_or(true, |(_, most)| overlap > most) {
                best = Some((id, overlap));
            }
        }
        let (block, overlap) = best.ok_or(BlockingError::NotBuilt)?;
        warn!(?block, overlap, selected = selection.len(), "ambiguous block selection");
        Ok(BlockSelection {
            block,
            warning: Some(SelectionWarning {
                overlap,
                selected: selection.len(),
            }),
        })
    }

    // =========================================================================
    // NAMED EDGE GROUPS
    // =========================================================================

    /// Stores an edge set under a user-chosen name, replacing any previous one
    pub fn set_named_group(&mut self, name: &str, edges: &[EdgeId]) -> BlockingResult<()> {
        for &edge in edges {
            self.graph.edge(edge)?;
        }
        self.named_groups.insert(name.to_string(), edges.to_vec());
        Ok(())
    }

    /// Edges stored under `name`
    pub fn named_group(&self, name: &str) -> BlockingResult<&[EdgeId]> {
        self.named_groups
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| BlockingError::UnknownNamedGroup(name.to_string()))
    }

    /// Deletes a named group and returns its edges
    pub fn remove_named_group(&mut self, name: &str) -> BlockingResult<Vec<EdgeId>> {
        self.named_groups
            .remove(name)
            .ok_or_else(|| BlockingError::UnknownNamedGroup(name.to_string()))
    }

    /// Names of all stored edge sets, sorted
    pub fn named_groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.named_groups.keys().map(String::as_str)
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Assembles the mesh writer payload
    pub fn mesh_payload(
        &self,
        tagger: &dyn BoundaryTagger,
        snapper: &dyn CurveSnapper,
    ) -> BlockingResult<MeshPayload> {
        MeshPayload::assemble(&self.graph, &self.topology, self.config, tagger, snapper)
    }
}
