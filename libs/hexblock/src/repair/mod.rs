//! # Topology Repair
//!
//! Keeps face and edge visibility in step with the per-block enabled flags
//! without re-running the block finder.
//!
//! - A face with blocks on both sides is visible when exactly one of them is
//!   enabled; a face with one block is visible when that block is enabled.
//! - An edge of any block is visible when at least one enabled block has it
//!   among its twelve edges. Edges outside every block are left alone.
//!
//! The pass only writes flags, so running it again with the same enable
//! state changes nothing.

use crate::graph::GraphModel;
use crate::topology::{BlockId, Topology};
use std::collections::BTreeSet;
use tracing::debug;

/// Visibility changes made by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Faces switched to visible
    pub faces_shown: usize,
    /// Faces switched to hidden
    pub faces_hidden: usize,
    /// Edges switched to visible
    pub edges_shown: usize,
    /// Edges switched to hidden
    pub edges_hidden: usize,
}

impl RepairReport {
    /// Nothing changed
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Visibility maintenance over a built topology.
#[derive(Debug)]
pub struct TopologyRepair<'a> {
    graph: &'a mut GraphModel,
    topology: &'a mut Topology,
}

impl<'a> TopologyRepair<'a> {
    /// Creates a repair pass over the given state.
    pub fn new(graph: &'a mut GraphModel, topology: &'a mut Topology) -> Self {
        Self { graph, topology }
    }

    /// Applies the visibility rules.
    pub fn run(self) -> RepairReport {
        let mut report = RepairReport::default();
        let enabled: Vec<bool> = self.topology.blocks.iter().map(|b| b.enabled).collect();
        let is_enabled = |id: Option<BlockId>| {
            id.and_then(|b| enabled.get(b.0 as usize).copied())
                .unwrap_or(false)
        };

        for face in &mut self.topology.faces {
            let visible = match (face.neg, face.pos) {
                (Some(_), Some(_)) => is_enabled(face.neg) != is_enabled(face.pos),
                (Some(_), None) => is_enabled(face.neg),
                (None, Some(_)) => is_enabled(face.pos),
                (None, None) => false,
            };
            if visible != face.enabled {
                face.enabled = visible;
                if visible {
                    report.faces_shown += 1;
                } else {
                    report.faces_hidden += 1;
                }
            }
        }

        let mut member = BTreeSet::new();
        let mut shown = BTreeSet::new();
        for block in &self.topology.blocks {
            for (a, b) in block.edges() {
                if let Some(edge) = self.graph.find_edge(a, b) {
                    member.insert(edge);
                    if block.enabled {
                        shown.insert(edge);
                    }
                }
            }
        }
        for edge in member {
            let visible = shown.contains(&edge);
            if let Ok(record) = self.graph.edge_mut(edge) {
                if record.hidden == visible {
                    record.hidden = !visible;
                    if visible {
                        report.edges_shown += 1;
                    } else {
                        report.edges_hidden += 1;
                    }
                }
            }
        }

        debug!(?report, "topology repair");
        report
    }
}
