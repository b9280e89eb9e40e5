//! # Graph Model
//!
//! Arena representation of the user's wireframe sketch: vertices with
//! positions, directed edges with typed attribute records, and face
//! attributes keyed by vertex quads.
//!
//! Ids are dense indices and are never reused. Disabling a vertex takes it and
//! its incident edges out of consideration for the block finder without
//! renumbering anything.

mod attributes;

pub use attributes::{
    EdgeAttributes, EdgeGrading, FaceAttributes, MappingType, QuadKey, SnapRef,
};

use crate::error::{BlockingError, BlockingResult};
use glam::DVec3;
use std::collections::HashMap;

/// Unique identifier for vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Unique identifier for edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

/// Vertex data structure
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Position in 3D space
    pub position: DVec3,
    /// Disabled vertices are ignored by the block finder
    pub enabled: bool,
}

impl Vertex {
    /// Creates an enabled vertex at the given position
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            enabled: true,
        }
    }
}

/// Edge data structure
///
/// The stored direction (`start` → `end`) is the frame in which the grading
/// attributes are expressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    start: VertexId,
    end: VertexId,
    /// Grading, group and snapping payload
    pub attributes: EdgeAttributes,
    /// Hidden edges belong to no enabled block
    pub hidden: bool,
}

impl Edge {
    fn new(start: VertexId, end: VertexId) -> Self {
        Self {
            start,
            end,
            attributes: EdgeAttributes::default(),
            hidden: false,
        }
    }

    /// Start vertex in the stored direction
    pub fn start(&self) -> VertexId {
        self.start
    }

    /// End vertex in the stored direction
    pub fn end(&self) -> VertexId {
        self.end
    }

    /// Both endpoints in the stored direction
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.start, self.end)
    }

    /// True when the edge runs from `a` to `b` in its stored direction
    pub fn runs(&self, a: VertexId, b: VertexId) -> bool {
        self.start == a && self.end == b
    }

    /// The endpoint opposite `v`, if `v` is an endpoint
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.start {
            Some(self.end)
        } else if v == self.end {
            Some(self.start)
        } else {
            None
        }
    }
}

fn pair_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The wireframe sketch.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Incident edges per vertex
    incidence: Vec<Vec<EdgeId>>,
    /// Unordered endpoint pair to edge
    lookup: HashMap<(VertexId, VertexId), EdgeId>,
    faces: HashMap<QuadKey, FaceAttributes>,
}

impl GraphModel {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with specified capacity
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            incidence: Vec::with_capacity(vertices),
            lookup: HashMap::with_capacity(edges),
            faces: HashMap::new(),
        }
    }

    /// Builds a graph from positions and endpoint index pairs.
    ///
    /// # Examples
    /// ```
    /// use hexblock::{GraphModel, Vec3};
    /// let graph = GraphModel::from_parts(
    ///     &[Vec3::ZERO, Vec3::X, Vec3::Y],
    ///     &[(0, 1), (1, 2)],
    /// ).unwrap();
    /// assert_eq!(graph.edge_count(), 2);
    /// ```
    pub fn from_parts(positions: &[DVec3], edges: &[(u32, u32)]) -> BlockingResult<Self> {
        let mut graph = Self::with_capacity(positions.len(), edges.len());
        for &p in positions {
            graph.add_vertex(p);
        }
        for &(a, b) in edges {
            graph.add_edge(VertexId(a), VertexId(b))?;
        }
        Ok(graph)
    }

    /// Adds a vertex to the graph
    pub fn add_vertex(&mut self, position: DVec3) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex::new(position));
        self.incidence.push(Vec::new());
        id
    }

    /// Adds an edge running from `start` to `end`
    pub fn add_edge(&mut self, start: VertexId, end: VertexId) -> BlockingResult<EdgeId> {
        self.vertex(start)?;
        self.vertex(end)?;
        if start == end {
            return Err(BlockingError::SelfLoop(start));
        }
        let key = pair_key(start, end);
        if let Some(&existing) = self.lookup.get(&key) {
            return Err(BlockingError::DuplicateEdge {
                a: start,
                b: end,
                existing,
            });
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge::new(start, end));
        self.incidence[start.0 as usize].push(id);
        self.incidence[end.0 as usize].push(id);
        self.lookup.insert(key, id);
        Ok(id)
    }

    /// Gets a vertex by ID
    pub fn vertex(&self, id: VertexId) -> BlockingResult<&Vertex> {
        self.vertices
            .get(id.0 as usize)
            .ok_or(BlockingError::InvalidVertex(id))
    }

    /// Position of a vertex
    pub fn position(&self, id: VertexId) -> BlockingResult<DVec3> {
        self.vertex(id).map(|v| v.position)
    }

    /// Moves a vertex
    pub fn set_vertex_position(&mut self, id: VertexId, position: DVec3) -> BlockingResult<()> {
        self.vertices
            .get_mut(id.0 as usize)
            .ok_or(BlockingError::InvalidVertex(id))?
            .position = position;
        Ok(())
    }

    /// Enables or disables a vertex
    pub fn set_vertex_enabled(&mut self, id: VertexId, enabled: bool) -> BlockingResult<()> {
        self.vertices
            .get_mut(id.0 as usize)
            .ok_or(BlockingError::InvalidVertex(id))?
            .enabled = enabled;
        Ok(())
    }

    /// True for existing, enabled vertices
    pub fn is_vertex_enabled(&self, id: VertexId) -> bool {
        self.vertices
            .get(id.0 as usize)
            .map_or(false, |v| v.enabled)
    }

    /// Gets an edge by ID
    pub fn edge(&self, id: EdgeId) -> BlockingResult<&Edge> {
        self.edges
            .get(id.0 as usize)
            .ok_or(BlockingError::InvalidEdge(id))
    }

    /// Gets a mutable edge by ID
    pub fn edge_mut(&mut self, id: EdgeId) -> BlockingResult<&mut Edge> {
        self.edges
            .get_mut(id.0 as usize)
            .ok_or(BlockingError::InvalidEdge(id))
    }

    /// Attribute record of an edge
    pub fn edge_attributes(&self, id: EdgeId) -> BlockingResult<&EdgeAttributes> {
        self.edge(id).map(|e| &e.attributes)
    }

    /// Mutable attribute record of an edge
    pub fn edge_attributes_mut(&mut self, id: EdgeId) -> BlockingResult<&mut EdgeAttributes> {
        self.edge_mut(id).map(|e| &mut e.attributes)
    }

    /// Swaps the stored direction of an edge. Attributes are left as they are.
    pub fn reverse_edge(&mut self, id: EdgeId) -> BlockingResult<()> {
        let edge = self.edge_mut(id)?;
        std::mem::swap(&mut edge.start, &mut edge.end);
        Ok(())
    }

    /// Edge joining `a` and `b` in either direction
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.lookup.get(&pair_key(a, b)).copied()
    }

    /// Edges incident to a vertex, including inactive ones
    pub fn incident_edges(&self, id: VertexId) -> BlockingResult<&[EdgeId]> {
        self.incidence
            .get(id.0 as usize)
            .map(Vec::as_slice)
            .ok_or(BlockingError::InvalidVertex(id))
    }

    /// An edge is active when both endpoints are enabled
    pub fn is_edge_active(&self, id: EdgeId) -> bool {
        self.edge(id).map_or(false, |e| {
            self.is_vertex_enabled(e.start) && self.is_vertex_enabled(e.end)
        })
    }

    /// Enabled neighbours of an enabled vertex
    pub fn neighbors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let active = self.is_vertex_enabled(id);
        self.incidence
            .get(id.0 as usize)
            .into_iter()
            .flatten()
            .filter(move |_| active)
            .filter_map(move |&e| self.edges[e.0 as usize].other(id))
            .filter(|&v| self.is_vertex_enabled(v))
    }

    /// Straight-line length of an edge
    pub fn edge_length(&self, id: EdgeId) -> BlockingResult<f64> {
        let edge = self.edge(id)?;
        Ok(self.position(edge.start)?.distance(self.position(edge.end)?))
    }

    /// Returns the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All vertices with their ids
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v))
    }

    /// All edges with their ids
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    /// Edges whose endpoints are both enabled
    pub fn active_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges().filter(|&(id, _)| self.is_edge_active(id))
    }

    /// Vertex positions in id order
    pub fn positions(&self) -> Vec<DVec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Attributes of the face spanned by a quad; untouched faces read as default
    pub fn face_attributes(&self, key: &QuadKey) -> FaceAttributes {
        self.faces.get(key).cloned().unwrap_or_default()
    }

    /// Replaces the attributes of the face spanned by a quad
    pub fn set_face_attributes(&mut self, key: QuadKey, attributes: FaceAttributes) {
        if attributes == FaceAttributes::default() {
            self.faces.remove(&key);
        } else {
            self.faces.insert(key, attributes);
        }
    }
}

#[cfg(test)]
mod tests;
