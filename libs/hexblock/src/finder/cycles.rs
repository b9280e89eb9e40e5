//! Active adjacency and quad face candidates.

use crate::graph::{GraphModel, QuadKey, VertexId};
use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet};

/// Neighbour sets restricted to enabled, non-excluded vertices.
#[derive(Debug, Clone)]
pub(crate) struct ActiveAdjacency {
    neighbors: Vec<BTreeSet<VertexId>>,
    active: Vec<bool>,
}

impl ActiveAdjacency {
    pub(crate) fn new(graph: &GraphModel, excluded: &BTreeSet<VertexId>) -> Self {
        let active: Vec<bool> = graph
            .vertices()
            .map(|(id, v)| v.enabled && !excluded.contains(&id))
            .collect();
        let mut neighbors = vec![BTreeSet::new(); graph.vertex_count()];
        for (_, edge) in graph.edges() {
            let (a, b) = edge.endpoints();
            if active[a.0 as usize] && active[b.0 as usize] {
                neighbors[a.0 as usize].insert(b);
                neighbors[b.0 as usize].insert(a);
            }
        }
        Self { neighbors, active }
    }

    pub(crate) fn is_active(&self, v: VertexId) -> bool {
        self.active.get(v.0 as usize).copied().unwrap_or(false)
    }

    pub(crate) fn neighbors(&self, v: VertexId) -> &BTreeSet<VertexId> {
        &self.neighbors[v.0 as usize]
    }

    pub(crate) fn connected(&self, a: VertexId, b: VertexId) -> bool {
        self.neighbors
            .get(a.0 as usize)
            .map_or(false, |n| n.contains(&b))
    }

    pub(crate) fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.active.len() as u32)
            .map(VertexId)
            .filter(|&v| self.is_active(v))
    }
}

/// Chordless, non-degenerate 4-cycles keyed by their vertex set.
///
/// Each cycle is stored starting at its smallest vertex.
pub(crate) fn quad_candidates(
    adjacency: &ActiveAdjacency,
    positions: &[DVec3],
    degeneracy_tolerance: f64,
) -> BTreeMap<QuadKey, [VertexId; 4]> {
    let mut quads = BTreeMap::new();
    for a in adjacency.vertices() {
        let around: Vec<VertexId> = adjacency
            .neighbors(a)
            .iter()
            .copied()
            .filter(|&v| v > a)
            .collect();
        for (i, &b) in around.iter().enumerate() {
            for &d in &around[i + 1..] {
                if adjacency.connected(b, d) {
                    continue;
                }
                for &c in adjacency.neighbors(b).intersection(adjacency.neighbors(d)) {
                    if c <= a || adjacency.connected(a, c) {
                        continue;
                    }
                    let cycle = [a, b, c, d];
                    if is_degenerate(&cycle.map(|v| positions[v.0 as usize]), degeneracy_tolerance) {
                        continue;
                    }
                    quads.insert(QuadKey::new(cycle), cycle);
                }
            }
        }
    }
    quads
}

/// Quad area against its longest side.
fn is_degenerate(p: &[DVec3; 4], tolerance: f64) -> bool {
    let area = 0.5 * (p[2] - p[0]).cross(p[3] - p[1]).length();
    let scale = (0..4)
        .map(|i| p[i].distance(p[(i + 1) % 4]))
        .fold(0.0_f64, f64::max);
    area <= tolerance * scale * scale
}
