//! # Block Finder
//!
//! Reconstructs hexahedral blocks and their face adjacency from the raw
//! vertex/edge graph.
//!
//! ## Pipeline
//!
//! ```text
//! active adjacency (enabled, non-excluded vertices)
//!       ↓
//! quad candidates (chordless, non-degenerate 4-cycles)
//!       ↓
//! hexahedral candidates (six quad faces, twelve edges, positive volume)
//!       ↓
//! acceptance by volume + face sides → renumbering → faces
//!       ↓
//! parallel edge groups
//! ```
//!
//! A run is a full recompute: it reads the graph and returns a fresh
//! [`Topology`] or an error, never a partial result.

mod adjacency;
mod cycles;
mod hexa;

use crate::config::BlockingConfig;
use crate::error::{BlockingError, BlockingResult};
use crate::graph::{EdgeId, GraphModel, VertexId};
use crate::groups::EdgeGroupResolver;
use crate::topology::{Block, BuildDiagnostics, Topology};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Per-build options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Vertices left out of the decomposition, typically the centre of an
    /// O-grid.
    pub excluded: BTreeSet<VertexId>,
}

impl BuildOptions {
    /// Options excluding the given vertices.
    pub fn excluding(vertices: impl IntoIterator<Item = VertexId>) -> Self {
        Self {
            excluded: vertices.into_iter().collect(),
        }
    }
}

/// Block finder over one graph.
#[derive(Debug, Clone, Copy)]
pub struct BlockFinder<'a> {
    graph: &'a GraphModel,
    config: BlockingConfig,
}

impl<'a> BlockFinder<'a> {
    /// Creates a finder reading `graph`.
    pub fn new(graph: &'a GraphModel, config: BlockingConfig) -> Self {
        Self { graph, config }
    }

    /// Derives blocks, faces and edge groups.
    ///
    /// # Errors
    /// [`BlockingError::TopologyInference`] when no block can be formed, or in
    /// strict mode when any active edge or vertex is left outside every block.
    pub fn run(&self, options: &BuildOptions) -> BlockingResult<Topology> {
        let graph = self.graph;
        let tolerance = self.config.degeneracy_tolerance;
        let positions = graph.positions();

        let active = cycles::ActiveAdjacency::new(graph, &options.excluded);
        let quads = cycles::quad_candidates(&active, &positions, tolerance);
        debug!(quads = quads.len(), "quad candidates");

        let candidates = hexa::hex_candidates(&active, &quads, &positions, tolerance);
        debug!(hexahedra = candidates.len(), "hexahedral candidates");

        let resolved = adjacency::resolve(&candidates);
        let blocks: Vec<Block> = resolved
            .accepted
            .iter()
            .map(|&i| Block::new(candidates[i].vertices))
            .collect();
        let suppressed_candidates = resolved
            .suppressed
            .iter()
            .map(|&i| candidates[i].vertices)
            .collect();
        if !resolved.suppressed.is_empty() {
            debug!(
                suppressed = resolved.suppressed.len(),
                "suppressed enclosing candidates"
            );
        }

        let (unresolved_vertices, unresolved_edges) = self.unresolved(&active, &blocks);
        if blocks.is_empty() {
            return Err(BlockingError::TopologyInference {
                message: format!(
                    "no hexahedral block found among {} quad candidates",
                    quads.len()
                ),
                unresolved_vertices,
                unresolved_edges,
            });
        }
        if !unresolved_edges.is_empty() || !unresolved_vertices.is_empty() {
            warn!(
                vertices = unresolved_vertices.len(),
                edges = unresolved_edges.len(),
                "sketch elements outside every block"
            );
            if self.config.strict {
                return Err(BlockingError::TopologyInference {
                    message: format!(
                        "{} edges and {} vertices are not part of any block",
                        unresolved_edges.len(),
                        unresolved_vertices.len()
                    ),
                    unresolved_vertices,
                    unresolved_edges,
                });
            }
        }

        let resolution = EdgeGroupResolver::new(graph).resolve(&resolved.faces);
        let topology = Topology {
            blocks,
            faces: resolved.faces,
            groups: resolution.groups,
            diagnostics: BuildDiagnostics {
                unresolved_vertices,
                unresolved_edges,
                suppressed_candidates,
                index_corrections: resolved.corrections,
                orientation_conflicts: resolution.conflicts,
            },
        };
        info!(
            blocks = topology.blocks.len(),
            faces = topology.faces.len(),
            groups = topology.groups.len(),
            "block topology built"
        );
        Ok(topology)
    }

    /// Active vertices and edges that no block accounts for.
    fn unresolved(
        &self,
        active: &cycles::ActiveAdjacency,
        blocks: &[Block],
    ) -> (Vec<VertexId>, Vec<EdgeId>) {
        let covered_vertices: BTreeSet<VertexId> =
            blocks.iter().flat_map(|b| b.vertices).collect();
        let covered_edges: BTreeSet<EdgeId> = blocks
            .iter()
            .flat_map(|b| b.edges())
            .filter_map(|(a, b)| self.graph.find_edge(a, b))
            .collect();

        let vertices = active
            .vertices()
            .filter(|v| !covered_vertices.contains(v))
            .collect();
        let edges = self
            .graph
            .edges()
            .filter(|(id, e)| {
                active.is_active(e.start())
                    && active.is_active(e.end())
                    && !covered_edges.contains(id)
            })
            .map(|(id, _)| id)
            .collect();
        (vertices, edges)
    }
}

#[cfg(test)]
mod tests;
