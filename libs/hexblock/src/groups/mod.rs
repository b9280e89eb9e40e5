//! # Edge Groups
//!
//! Partitions block edges into sets of topologically parallel edges. Opposite
//! edges of every face are merged in a union-find that also tracks, per edge,
//! whether its stored direction agrees with its set's root. Walking a face
//! `a b c d`, the edges `a→b` and `d→c` point the same way, as do `b→c` and
//! `a→d`; an edge stored against its walking direction contributes one
//! reversal.

use crate::graph::{EdgeId, GraphModel, VertexId};
use crate::topology::{EdgeGroup, Face, GroupId, GroupMember};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Union-find with parity to the parent.
#[derive(Debug, Clone, Default)]
struct ParityForest {
    parent: Vec<usize>,
    parity: Vec<bool>,
    rank: Vec<u8>,
}

impl ParityForest {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            parity: vec![false; len],
            rank: vec![0; len],
        }
    }

    /// Root of `x` and whether `x` is reversed relative to it.
    fn find(&mut self, x: usize) -> (usize, bool) {
        let parent = self.parent[x];
        if parent == x {
            return (x, false);
        }
        let (root, above) = self.find(parent);
        self.parity[x] ^= above;
        self.parent[x] = root;
        (root, self.parity[x])
    }

    /// Records that `x` and `y` differ by `reversed`. Returns false when that
    /// contradicts what is already known.
    fn union(&mut self, x: usize, y: usize, reversed: bool) -> bool {
        let (rx, px) = self.find(x);
        let (ry, py) = self.find(y);
        if rx == ry {
            return px ^ py == reversed;
        }
        let (child, root) = if self.rank[rx] < self.rank[ry] {
            (rx, ry)
        } else {
            (ry, rx)
        };
        self.parent[child] = root;
        self.parity[child] = px ^ py ^ reversed;
        if self.rank[rx] == self.rank[ry] {
            self.rank[root] += 1;
        }
        true
    }
}

/// Groups and orientation conflicts of one build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupResolution {
    /// Groups sorted by reference edge
    pub groups: Vec<EdgeGroup>,
    /// Edges whose orientation contradicts their group
    pub conflicts: Vec<EdgeId>,
}

/// Builds parallel edge groups from accepted faces.
#[derive(Debug, Clone, Copy)]
pub struct EdgeGroupResolver<'a> {
    graph: &'a GraphModel,
}

impl<'a> EdgeGroupResolver<'a> {
    /// Creates a resolver reading edge directions from `graph`.
    pub fn new(graph: &'a GraphModel) -> Self {
        Self { graph }
    }

    /// Edge walked from `a` to `b` and whether it is stored the other way.
    fn walk(&self, a: VertexId, b: VertexId) -> Option<(usize, bool)> {
        let id = self.graph.find_edge(a, b)?;
        let edge = self.graph.edge(id).ok()?;
        Some((id.0 as usize, !edge.runs(a, b)))
    }

    /// Merges opposite edges across all faces.
    pub fn resolve(&self, faces: &[Face]) -> GroupResolution {
        let mut forest = ParityForest::new(self.graph.edge_count());
        let mut touched = vec![false; self.graph.edge_count()];
        let mut conflicts = Vec::new();
        let mut merges = 0usize;

        for face in faces {
            let [a, b, c, d] = face.vertices;
            for (first, second) in [((a, b), (d, c)), ((b, c), (a, d))] {
                let (Some((x, px)), Some((y, py))) =
                    (self.walk(first.0, first.1), self.walk(second.0, second.1))
                else {
                    continue;
                };
                touched[x] = true;
                touched[y] = true;
                if forest.union(x, y, px ^ py) {
                    merges += 1;
                } else {
                    warn!(edge = y, "edge group cannot be oriented consistently");
                    conflicts.push(EdgeId(y as u32));
                }
            }
        }
        debug!(merges, "edge group merges");

        let mut by_root: BTreeMap<usize, Vec<(usize, bool)>> = BTreeMap::new();
        for edge in (0..touched.len()).filter(|&e| touched[e]) {
            let (root, parity) = forest.find(edge);
            by_root.entry(root).or_default().push((edge, parity));
        }
        let mut sets: Vec<Vec<(usize, bool)>> = by_root.into_values().collect();
        // Members are pushed in ascending edge order, so the first is the reference.
        sets.sort_by_key(|set| set.first().map(|m| m.0));

        let groups = sets
            .into_iter()
            .enumerate()
            .filter_map(|(i, set)| {
                let &(reference, reference_parity) = set.first()?;
                Some(EdgeGroup {
                    id: GroupId(i as u32),
                    reference: EdgeId(reference as u32),
                    members: set
                        .iter()
                        .map(|&(edge, parity)| GroupMember {
                            edge: EdgeId(edge as u32),
                            aligned: parity == reference_parity,
                        })
                        .collect(),
                })
            })
            .collect();

        conflicts.sort_unstable();
        conflicts.dedup();
        GroupResolution { groups, conflicts }
    }
}
