use super::*;
use crate::fixtures;
use crate::topology::{BlockId, IndexCorrection};
use crate::Vec3;

fn build(graph: &GraphModel) -> Topology {
    BlockFinder::new(graph, BlockingConfig::default())
        .run(&BuildOptions::default())
        .expect("sketch forms blocks")
}

fn assert_right_handed(graph: &GraphModel, topology: &Topology) {
    for block in &topology.blocks {
        let corners = block.vertices.map(|v| graph.position(v).expect("vertex exists"));
        assert!(hexa::signed_volume(&corners) > 0.0, "{block:?} is left-handed");
    }
}

#[test]
fn test_single_cube() {
    let graph = fixtures::cube();
    let topology = build(&graph);
    assert_eq!(topology.blocks.len(), 1);
    assert_eq!(
        topology.blocks[0].vertices,
        [0, 1, 2, 3, 4, 5, 6, 7].map(VertexId)
    );
    assert_eq!(topology.faces.len(), 6);
    assert!(topology.faces.iter().all(|f| f.is_boundary_candidate()));
    assert!(topology.faces.iter().all(|f| f.neg == Some(BlockId(0))));
    assert!(topology.diagnostics.is_fully_resolved());
    assert_right_handed(&graph, &topology);
}

#[test]
fn test_lattice_shares_one_face() {
    let graph = fixtures::lattice_2x1x1();
    let topology = build(&graph);
    assert_eq!(topology.blocks.len(), 2);
    assert_eq!(topology.faces.len(), 11);
    let interior: Vec<_> = topology.faces.iter().filter(|f| f.is_interior()).collect();
    assert_eq!(interior.len(), 1);
    let mut shared = interior[0].vertices;
    shared.sort_unstable();
    assert_eq!(shared, [1, 4, 7, 10].map(VertexId));
    assert_right_handed(&graph, &topology);
}

#[test]
fn test_every_block_edge_exists() {
    for graph in [fixtures::cube(), fixtures::lattice_2x1x1(), fixtures::o_grid()] {
        let topology = build(&graph);
        for block in &topology.blocks {
            for (a, b) in block.edges() {
                assert!(graph.find_edge(a, b).is_some());
            }
        }
    }
}

#[test]
fn test_o_grid_suppresses_enclosing_hull() {
    let graph = fixtures::o_grid();
    let topology = build(&graph);
    assert_eq!(topology.blocks.len(), 5);
    assert_eq!(
        topology.diagnostics.suppressed_candidates,
        vec![[0, 1, 2, 3, 8, 9, 10, 11].map(VertexId)]
    );
    // The hull sorts first, so every accepted block moves down by one.
    assert_eq!(
        topology.diagnostics.index_corrections,
        (1..=5u32)
            .map(|from| IndexCorrection {
                from,
                to: BlockId(from - 1),
            })
            .collect::<Vec<_>>()
    );
    assert_eq!(topology.faces.len(), 22);
    assert_eq!(topology.faces.iter().filter(|f| f.is_interior()).count(), 8);
    assert!(topology
        .faces
        .iter()
        .flat_map(|f| f.blocks())
        .all(|b| (b.0 as usize) < topology.blocks.len()));
    assert!(topology.diagnostics.is_fully_resolved());
    assert_right_handed(&graph, &topology);
}

#[test]
fn test_face_adjacency_bound() {
    let graph = fixtures::o_grid();
    let topology = build(&graph);
    for (id, _) in topology.blocks() {
        assert_eq!(topology.faces_of(id).count(), 6);
    }
}

#[test]
fn test_excluded_vertex_leaves_remainder_unresolved() {
    let graph = fixtures::lattice_2x1x1();
    let options = BuildOptions::excluding([VertexId(2)]);
    let topology = BlockFinder::new(&graph, BlockingConfig::default())
        .run(&options)
        .expect("left block remains");
    assert_eq!(topology.blocks.len(), 1);
    assert_eq!(
        topology.diagnostics.unresolved_vertices,
        vec![VertexId(5), VertexId(8), VertexId(11)]
    );
    assert_eq!(topology.diagnostics.unresolved_edges.len(), 5);

    let strict = BlockFinder::new(&graph, BlockingConfig::default().strict()).run(&options);
    assert!(matches!(
        strict,
        Err(BlockingError::TopologyInference { ref unresolved_edges, .. }) if unresolved_edges.len() == 5
    ));
}

#[test]
fn test_dangling_edge_is_reported() {
    let mut graph = fixtures::cube();
    let tip = graph.add_vertex(Vec3::new(2.0, 0.0, 0.0));
    let dangling = graph.add_edge(VertexId(1), tip).expect("new edge");
    let topology = build(&graph);
    assert_eq!(topology.blocks.len(), 1);
    assert_eq!(topology.diagnostics.unresolved_edges, vec![dangling]);
    assert_eq!(topology.diagnostics.unresolved_vertices, vec![tip]);
}

#[test]
fn test_no_blocks_is_an_error() {
    let graph = GraphModel::from_parts(
        &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
        &[(0, 1), (1, 3), (3, 2), (2, 0)],
    )
    .expect("valid square");
    let result = BlockFinder::new(&graph, BlockingConfig::default()).run(&BuildOptions::default());
    match result {
        Err(BlockingError::TopologyInference {
            unresolved_vertices,
            unresolved_edges,
            ..
        }) => {
            assert_eq!(unresolved_vertices.len(), 4);
            assert_eq!(unresolved_edges.len(), 4);
        }
        other => panic!("expected inference failure, got {other:?}"),
    }
}

#[test]
fn test_disabled_vertex_behaves_like_exclusion() {
    let mut graph = fixtures::cube();
    graph.set_vertex_enabled(VertexId(6), false).expect("vertex exists");
    let result = BlockFinder::new(&graph, BlockingConfig::default()).run(&BuildOptions::default());
    assert!(matches!(result, Err(BlockingError::TopologyInference { .. })));
}

#[test]
fn test_flat_hexahedron_is_degenerate() {
    // Both squares in one plane: topologically a hexahedron, zero volume.
    let mut positions = Vec::new();
    for (x, y) in [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)] {
        positions.push(Vec3::new(x, y, 0.0));
    }
    for (x, y) in [(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)] {
        positions.push(Vec3::new(x, y, 0.0));
    }
    let edges = [
        (0, 1), (1, 2), (2, 3), (3, 0),
        (4, 5), (5, 6), (6, 7), (7, 4),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];
    let graph = GraphModel::from_parts(&positions, &edges).expect("valid sketch");
    let result = BlockFinder::new(&graph, BlockingConfig::default()).run(&BuildOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_build_is_deterministic() {
    let graph = fixtures::o_grid();
    assert_eq!(build(&graph), build(&graph));
}

#[test]
fn test_edge_order_and_direction_do_not_change_blocks() {
    let forward = fixtures::cube();
    let positions = forward.positions();
    let mut pairs: Vec<(u32, u32)> = forward
        .edges()
        .map(|(_, e)| (e.end().0, e.start().0))
        .collect();
    pairs.reverse();
    let backward = GraphModel::from_parts(&positions, &pairs).expect("same cube");
    let a = build(&forward);
    let b = build(&backward);
    assert_eq!(a.blocks, b.blocks);
    assert_eq!(a.faces, b.faces);
}
