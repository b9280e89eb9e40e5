//! # Block Topology
//!
//! Derived structures produced by a build: hexahedral blocks, the quad faces
//! between them, and the parallel edge groups. Everything here is replaced
//! wholesale on every build; nothing in it is user-authored except the
//! per-block `enabled` flag and region label.
//!
//! ## Corner Convention
//!
//! ```text
//!       7 ─────── 6
//!      /|        /|        axis 2
//!     4 ─────── 5 |          │  axis 1
//!     | 3 ──────|─ 2         │ /
//!     |/        |/           │/
//!     0 ─────── 1            └──── axis 0
//! ```
//!
//! Corners 0-1-2-3 run counter-clockwise seen from above, 4-7 sit directly
//! over them, and the frame (0→1, 0→3, 0→4) is right-handed.

use crate::error::{BlockingError, BlockingResult};
use crate::graph::{EdgeId, QuadKey, VertexId};

/// Unique identifier for blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// Unique identifier for faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

/// Unique identifier for edge groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

// =============================================================================
// CORNER TABLES
// =============================================================================

/// Corner pairs of the four edges running along each block axis, each pair
/// ordered from the low to the high end of the axis.
pub const AXIS_EDGES: [[(usize, usize); 4]; 3] = [
    [(0, 1), (3, 2), (7, 6), (4, 5)],
    [(0, 3), (1, 2), (5, 6), (4, 7)],
    [(0, 4), (1, 5), (2, 6), (3, 7)],
];

/// Corners of the six faces, each wound so its normal points out of the block.
pub const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [3, 7, 6, 2],
    [0, 4, 7, 3],
    [1, 2, 6, 5],
];

// =============================================================================
// BLOCK
// =============================================================================

/// Hexahedral block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Corners in the convention above
    pub vertices: [VertexId; 8],
    /// Disabled blocks stay in the topology but are not exported
    pub enabled: bool,
    /// Named cell zone
    pub region: Option<String>,
}

impl Block {
    /// Creates an enabled block without a region
    pub fn new(vertices: [VertexId; 8]) -> Self {
        Self {
            vertices,
            enabled: true,
            region: None,
        }
    }

    /// The four vertex pairs running along `axis` (0, 1 or 2)
    pub fn edges_along(&self, axis: usize) -> [(VertexId, VertexId); 4] {
        AXIS_EDGES[axis % 3].map(|(a, b)| (self.vertices[a], self.vertices[b]))
    }

    /// All twelve vertex pairs, grouped by axis
    pub fn edges(&self) -> [(VertexId, VertexId); 12] {
        let mut out = [(VertexId(0), VertexId(0)); 12];
        for axis in 0..3 {
            for (slot, pair) in self.edges_along(axis).into_iter().enumerate() {
                out[axis * 4 + slot] = pair;
            }
        }
        out
    }

    /// The six faces, wound outward
    pub fn faces(&self) -> [[VertexId; 4]; 6] {
        FACE_CORNERS.map(|quad| quad.map(|c| self.vertices[c]))
    }

    /// True when `v` is a corner of this block
    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    /// Number of corners found in `selection`
    pub fn overlap(&self, selection: &[VertexId]) -> usize {
        self.vertices
            .iter()
            .filter(|v| selection.contains(v))
            .count()
    }

    /// Corners sorted by id
    pub fn key(&self) -> [VertexId; 8] {
        let mut key = self.vertices;
        key.sort_unstable();
        key
    }
}

// =============================================================================
// FACE
// =============================================================================

/// Quad face with block adjacency.
///
/// The vertex order is the outward winding of `neg`; `pos` is the block the
/// normal points into. A face produced by a build always has `neg` set.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Corners, wound outward from `neg`
    pub vertices: [VertexId; 4],
    /// Block on the normal side
    pub pos: Option<BlockId>,
    /// Block behind the face
    pub neg: Option<BlockId>,
    /// Visibility maintained by the repair pass
    pub enabled: bool,
}

impl Face {
    /// Both sides have a block
    pub fn is_interior(&self) -> bool {
        self.pos.is_some() && self.neg.is_some()
    }

    /// Exactly one side has a block
    pub fn is_boundary_candidate(&self) -> bool {
        self.pos.is_some() != self.neg.is_some()
    }

    /// Neither side has a block; never emitted
    pub fn is_orphan(&self) -> bool {
        self.pos.is_none() && self.neg.is_none()
    }

    /// Blocks on either side
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> {
        self.neg.into_iter().chain(self.pos)
    }

    /// Attribute key of this face
    pub fn key(&self) -> QuadKey {
        QuadKey::new(self.vertices)
    }
}

// =============================================================================
// EDGE GROUPS
// =============================================================================

/// Member of an edge group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMember {
    /// Edge id
    pub edge: EdgeId,
    /// Stored direction agrees with the group's reference edge
    pub aligned: bool,
}

/// Set of topologically parallel edges that share one cell count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGroup {
    /// Group id
    pub id: GroupId,
    /// Smallest member edge id
    pub reference: EdgeId,
    /// Members sorted by edge id, reference included
    pub members: Vec<GroupMember>,
}

impl EdgeGroup {
    /// Membership record of `edge`
    pub fn member(&self, edge: EdgeId) -> Option<GroupMember> {
        self.members.iter().copied().find(|m| m.edge == edge)
    }

    /// Member edge ids
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.members.iter().map(|m| m.edge)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Groups are never empty once built
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Block renumbering applied after candidates were suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCorrection {
    /// Position among the hexahedral candidates
    pub from: u32,
    /// Final block id
    pub to: BlockId,
}

/// Non-fatal findings of a build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildDiagnostics {
    /// Active vertices not covered by any block
    pub unresolved_vertices: Vec<VertexId>,
    /// Active edges not covered by any block
    pub unresolved_edges: Vec<EdgeId>,
    /// Candidates rejected because a smaller block already claimed a side
    pub suppressed_candidates: Vec<[VertexId; 8]>,
    /// Block ids shifted to close gaps left by suppressed candidates
    pub index_corrections: Vec<IndexCorrection>,
    /// Edges whose orientation could not be made consistent within a group
    pub orientation_conflicts: Vec<EdgeId>,
}

impl BuildDiagnostics {
    /// Every active edge and vertex is covered by a block
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved_vertices.is_empty() && self.unresolved_edges.is_empty()
    }
}

// =============================================================================
// TOPOLOGY
// =============================================================================

/// Result of one build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    /// Blocks, sorted by canonical corner tuple
    pub blocks: Vec<Block>,
    /// Faces, sorted by vertex key
    pub faces: Vec<Face>,
    /// Parallel edge groups, sorted by reference edge
    pub groups: Vec<EdgeGroup>,
    /// Non-fatal findings
    pub diagnostics: BuildDiagnostics,
}

impl Topology {
    /// Nothing has been derived
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Gets a block by ID
    pub fn block(&self, id: BlockId) -> BlockingResult<&Block> {
        self.blocks
            .get(id.0 as usize)
            .ok_or(BlockingError::InvalidBlock(id))
    }

    /// Gets a mutable block by ID
    pub fn block_mut(&mut self, id: BlockId) -> BlockingResult<&mut Block> {
        self.blocks
            .get_mut(id.0 as usize)
            .ok_or(BlockingError::InvalidBlock(id))
    }

    /// Gets a face by ID
    pub fn face(&self, id: FaceId) -> BlockingResult<&Face> {
        self.faces
            .get(id.0 as usize)
            .ok_or(BlockingError::InvalidFace(id))
    }

    /// Blocks with their ids
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (BlockId(i as u32), b))
    }

    /// Faces with their ids
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId(i as u32), f))
    }

    /// Faces touching a block
    pub fn faces_of(&self, block: BlockId) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces()
            .filter(move |(_, f)| f.pos == Some(block) || f.neg == Some(block))
    }

    /// Group containing `edge`
    pub fn group_of(&self, edge: EdgeId) -> Option<&EdgeGroup> {
        self.groups.iter().find(|g| g.member(edge).is_some())
    }

    /// Gets a group by ID
    pub fn group(&self, id: GroupId) -> Option<&EdgeGroup> {
        self.groups.get(id.0 as usize)
    }

    /// Number of enabled blocks
    pub fn enabled_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.enabled).count()
    }
}

#[cfg(test)]
mod tests;
