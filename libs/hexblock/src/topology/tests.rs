use super::*;
use crate::fixtures;

fn unit_block() -> Block {
    Block::new([0, 1, 2, 3, 4, 5, 6, 7].map(VertexId))
}

#[test]
fn test_block_edges_exist_in_cube_sketch() {
    let graph = fixtures::cube();
    let block = unit_block();
    for (a, b) in block.edges() {
        assert!(graph.find_edge(a, b).is_some(), "missing {a:?}-{b:?}");
    }
}

#[test]
fn test_axis_edges_are_parallel() {
    let graph = fixtures::cube();
    let block = unit_block();
    for axis in 0..3 {
        let mut expected = glam::DVec3::ZERO;
        expected[axis] = 1.0;
        for (a, b) in block.edges_along(axis) {
            let d = graph.position(b).expect("exists") - graph.position(a).expect("exists");
            assert_eq!(d, expected, "axis {axis}: {a:?}->{b:?}");
        }
    }
}

#[test]
fn test_faces_wind_outward() {
    let graph = fixtures::cube();
    let centre = glam::DVec3::splat(0.5);
    for quad in unit_block().faces() {
        let p = quad.map(|v| graph.position(v).expect("exists"));
        let normal = (p[1] - p[0]).cross(p[2] - p[0]);
        let mid = (p[0] + p[1] + p[2] + p[3]) / 4.0;
        assert!(normal.dot(mid - centre) > 0.0, "{quad:?} points inward");
    }
}

#[test]
fn test_face_classification() {
    let mut face = Face {
        vertices: [0, 1, 2, 3].map(VertexId),
        pos: None,
        neg: Some(BlockId(0)),
        enabled: true,
    };
    assert!(face.is_boundary_candidate());
    assert!(!face.is_interior());
    face.pos = Some(BlockId(1));
    assert!(face.is_interior());
    assert_eq!(face.blocks().collect::<Vec<_>>(), vec![BlockId(0), BlockId(1)]);
    face.pos = None;
    face.neg = None;
    assert!(face.is_orphan());
}

#[test]
fn test_overlap_and_key() {
    let block = Block::new([4, 2, 7, 1, 0, 3, 6, 5].map(VertexId));
    assert_eq!(block.key(), [0, 1, 2, 3, 4, 5, 6, 7].map(VertexId));
    assert_eq!(block.overlap(&[VertexId(1), VertexId(9), VertexId(6)]), 2);
    assert!(block.contains(VertexId(7)));
}

#[test]
fn test_topology_lookups() {
    let mut topology = Topology::default();
    assert!(topology.is_empty());
    assert!(matches!(
        topology.block(BlockId(0)),
        Err(BlockingError::InvalidBlock(BlockId(0)))
    ));
    topology.blocks.push(unit_block());
    topology.groups.push(EdgeGroup {
        id: GroupId(0),
        reference: EdgeId(0),
        members: vec![
            GroupMember { edge: EdgeId(0), aligned: true },
            GroupMember { edge: EdgeId(4), aligned: false },
        ],
    });
    topology.block_mut(BlockId(0)).expect("exists").enabled = false;
    assert_eq!(topology.enabled_blocks(), 0);
    let group = topology.group_of(EdgeId(4)).expect("grouped");
    assert_eq!(group.len(), 2);
    assert_eq!(group.member(EdgeId(4)).map(|m| m.aligned), Some(false));
    assert!(topology.group_of(EdgeId(1)).is_none());
}
