use super::*;
use crate::Vec3;

fn triangle() -> GraphModel {
    GraphModel::from_parts(
        &[Vec3::ZERO, Vec3::X, Vec3::Y],
        &[(0, 1), (1, 2), (2, 0)],
    )
    .expect("valid triangle")
}

#[test]
fn test_add_edge_rejects_self_loop_and_duplicates() {
    let mut graph = triangle();
    assert!(matches!(
        graph.add_edge(VertexId(1), VertexId(1)),
        Err(BlockingError::SelfLoop(VertexId(1)))
    ));
    // Reversed pair is still a duplicate.
    assert!(matches!(
        graph.add_edge(VertexId(1), VertexId(0)),
        Err(BlockingError::DuplicateEdge {
            existing: EdgeId(0),
            ..
        })
    ));
    assert!(matches!(
        graph.add_edge(VertexId(0), VertexId(9)),
        Err(BlockingError::InvalidVertex(VertexId(9)))
    ));
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_find_edge_is_direction_agnostic() {
    let graph = triangle();
    assert_eq!(graph.find_edge(VertexId(0), VertexId(1)), Some(EdgeId(0)));
    assert_eq!(graph.find_edge(VertexId(1), VertexId(0)), Some(EdgeId(0)));
    assert_eq!(graph.find_edge(VertexId(0), VertexId(0)), None);
}

#[test]
fn test_neighbors_skip_disabled_vertices() {
    let mut graph = triangle();
    let mut around: Vec<_> = graph.neighbors(VertexId(0)).collect();
    around.sort();
    assert_eq!(around, vec![VertexId(1), VertexId(2)]);

    graph.set_vertex_enabled(VertexId(2), false).expect("vertex exists");
    let around: Vec<_> = graph.neighbors(VertexId(0)).collect();
    assert_eq!(around, vec![VertexId(1)]);
    assert_eq!(graph.neighbors(VertexId(2)).count(), 0);
    assert!(!graph.is_edge_active(EdgeId(1)));
    assert_eq!(graph.active_edges().count(), 1);
    // Incidence keeps inactive edges.
    assert_eq!(graph.incident_edges(VertexId(2)).expect("exists").len(), 2);
}

#[test]
fn test_reverse_edge_keeps_attributes() {
    let mut graph = triangle();
    graph
        .edge_attributes_mut(EdgeId(0))
        .expect("edge exists")
        .grading = EdgeGrading::start_layer(0.1, 1.2);
    graph.reverse_edge(EdgeId(0)).expect("edge exists");
    let edge = graph.edge(EdgeId(0)).expect("edge exists");
    assert!(edge.runs(VertexId(1), VertexId(0)));
    assert_eq!(edge.attributes.grading.x1, 0.1);
    assert_eq!(edge.other(VertexId(1)), Some(VertexId(0)));
    assert_eq!(edge.other(VertexId(2)), None);
}

#[test]
fn test_edge_length_follows_positions() {
    let mut graph = triangle();
    assert_eq!(graph.edge_length(EdgeId(0)).expect("edge exists"), 1.0);
    graph
        .set_vertex_position(VertexId(1), Vec3::new(3.0, 4.0, 0.0))
        .expect("vertex exists");
    assert_eq!(graph.edge_length(EdgeId(0)).expect("edge exists"), 5.0);
    assert!(graph.edge_length(EdgeId(7)).is_err());
}

#[test]
fn test_face_attributes_keyed_by_unordered_quad() {
    let mut graph = GraphModel::new();
    let key = QuadKey::new([VertexId(3), VertexId(0), VertexId(2), VertexId(1)]);
    assert_eq!(graph.face_attributes(&key), FaceAttributes::default());

    graph.set_face_attributes(
        key,
        FaceAttributes {
            patch: Some("inlet".into()),
            snap: None,
        },
    );
    let same = QuadKey::new([VertexId(0), VertexId(1), VertexId(2), VertexId(3)]);
    assert_eq!(graph.face_attributes(&same).patch.as_deref(), Some("inlet"));

    graph.set_face_attributes(same, FaceAttributes::default());
    assert_eq!(graph.face_attributes(&key), FaceAttributes::default());
}

#[test]
fn test_default_edge_attributes() {
    let attrs = EdgeAttributes::default();
    assert_eq!(attrs.cells, ::config::constants::DEFAULT_CELLS);
    assert_eq!(attrs.mapping, MappingType::CellCount);
    assert!(attrs.grading.is_uniform());
    assert!(attrs.group.is_none());
}

#[test]
fn test_grading_validation() {
    assert!(EdgeGrading::uniform().validate().is_ok());
    assert!(matches!(
        EdgeGrading::start_layer(-0.1, 1.2).validate(),
        Err(crate::GradingError::NegativeCellSize(_))
    ));
    assert!(matches!(
        EdgeGrading::end_layer(0.1, 0.9).validate(),
        Err(crate::GradingError::InvalidRatio(_))
    ));
    assert!(matches!(
        EdgeGrading::start_layer(f64::NAN, 1.2).validate(),
        Err(crate::GradingError::NonFiniteCellSize(x)) if x.is_nan()
    ));
    assert_eq!(
        EdgeGrading::end_layer(f64::INFINITY, 1.2).validate(),
        Err(crate::GradingError::NonFiniteCellSize(f64::INFINITY))
    );
}
