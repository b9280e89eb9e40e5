//! Property-based tests for grading and block inference.
//!
//! Invariants that hold for every input in range:
//! - Grading: the realized series covers the edge with the fewest cells
//! - Build: the decomposition depends on the geometry, not on edge order
//!   or stored direction
//! - Groups: flipping is an involution and counts stay shared

mod common;

use approx::relative_eq;
use hexblock::{
    BlockingConfig, BlockingSession, BuildOptions, CellTarget, EdgeGrading, GradingError,
    GradingRequest, GradingSolver, NoSnapping,
};
use proptest::prelude::*;

fn built(graph: hexblock::GraphModel) -> BlockingSession {
    let mut session = BlockingSession::with_graph(graph, BlockingConfig::default());
    session.build(&BuildOptions::default()).expect("lattice forms blocks");
    session
}

fn lattice_dims() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..=3, 1u32..=3, 1u32..=2)
}

// ============================================================================
// Grading
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_single_layer_is_minimal(
        length in 0.5f64..20.0,
        first in 0.002f64..0.4,
        ratio in 1.01f64..1.6,
    ) {
        let solver = GradingSolver::default();
        let grading = EdgeGrading::start_layer(first, ratio);
        let descriptor = solver
            .solve(&GradingRequest::new(length, grading, CellTarget::Auto))
            .expect("in-domain request");

        prop_assert!(descriptor.cells >= 1);
        prop_assert!(relative_eq!(descriptor.realized_length(), length, max_relative = 1e-8));
        if f64::from(descriptor.cells) * first <= length {
            let realized_first = descriptor.first_cell().expect("one segment");
            prop_assert!(relative_eq!(realized_first, first, max_relative = 1e-8));
        }

        // One cell fewer cannot reach the end of the edge.
        if descriptor.cells > 1 {
            let fewer = solver.solve(&GradingRequest::new(
                length,
                grading,
                CellTarget::Count(descriptor.cells - 1),
            ));
            let is_non_convergent = matches!(
                fewer,
                Err(GradingError::NonConvergent { required, .. }) if required == descriptor.cells
            );
            prop_assert!(is_non_convergent);
        }
    }

    #[test]
    fn prop_double_sided_counts_add_up(
        length in 1.0f64..10.0,
        x1 in 0.01f64..0.2,
        x2 in 0.01f64..0.2,
        r1 in 1.05f64..1.4,
        r2 in 1.05f64..1.4,
        extra in 0u32..20,
    ) {
        let solver = GradingSolver::default();
        let grading = EdgeGrading::new(x1, x2, r1, r2);
        let minimal = solver
            .solve(&GradingRequest::new(length, grading, CellTarget::Auto))
            .expect("in-domain request");
        prop_assert_eq!(minimal.segments.len(), 2);

        let requested = minimal.cells + extra;
        let descriptor = solver
            .solve(&GradingRequest::new(length, grading, CellTarget::Count(requested)))
            .expect("count above the minimum");
        prop_assert_eq!(descriptor.cells, requested);
        let per_segment: u32 = descriptor.segments.iter().map(|s| s.cells).sum();
        prop_assert_eq!(per_segment, requested);
        prop_assert!(relative_eq!(descriptor.realized_length(), length, max_relative = 1e-8));

        let reversed = descriptor.reversed();
        prop_assert!(relative_eq!(
            reversed.first_cell().expect("segment"),
            descriptor.last_cell().expect("segment"),
            max_relative = 1e-12
        ));
    }

    #[test]
    fn prop_uniform_cell_size_rounds(length in 0.1f64..50.0, dx in 0.05f64..2.0) {
        let descriptor = GradingSolver::default()
            .solve(&GradingRequest::new(length, EdgeGrading::uniform(), CellTarget::CellSize(dx)))
            .expect("in-domain request");
        let expected = ((length / dx).round() as u32).max(1);
        prop_assert_eq!(descriptor.cells, expected);
        prop_assert!(descriptor.is_uniform());
    }
}

// ============================================================================
// Block inference
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_lattice_decomposition(dims in lattice_dims()) {
        let (nx, ny, nz) = dims;
        let session = built(common::lattice(nx, ny, nz));
        let topology = session.topology();
        prop_assert_eq!(topology.blocks.len() as u32, nx * ny * nz);
        prop_assert_eq!(topology.faces.len(), common::lattice_faces(nx, ny, nz));
        prop_assert_eq!(topology.groups.len() as u32, nx + ny + nz);
        prop_assert!(topology.diagnostics.is_fully_resolved());

        let interior = topology.faces.iter().filter(|f| f.is_interior()).count();
        let expected_interior = (nx - 1) * ny * nz + nx * (ny - 1) * nz + nx * ny * (nz - 1);
        prop_assert_eq!(interior as u32, expected_interior);

        let again = built(common::lattice(nx, ny, nz));
        prop_assert_eq!(again.topology(), topology);
    }

    #[test]
    fn prop_edge_order_does_not_matter(
        dims in lattice_dims(),
        rotate in 0usize..64,
        flips in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let (nx, ny, nz) = dims;
        let graph = common::lattice(nx, ny, nz);
        let shuffled = common::reshuffled(&graph, rotate, &flips);
        let a = built(graph);
        let b = built(shuffled);
        prop_assert_eq!(&a.topology().blocks, &b.topology().blocks);
        prop_assert_eq!(&a.topology().faces, &b.topology().faces);
        prop_assert_eq!(a.topology().groups.len(), b.topology().groups.len());
    }

    #[test]
    fn prop_flip_is_involution(dims in lattice_dims(), pick in 0usize..1000) {
        let (nx, ny, nz) = dims;
        let mut session = built(common::lattice(nx, ny, nz));
        let endpoints = |s: &BlockingSession| -> Vec<_> {
            s.graph().edges().map(|(_, e)| e.endpoints()).collect()
        };
        let before = endpoints(&session);
        let edge = session
            .graph()
            .edges()
            .nth(pick % before.len())
            .map(|(id, _)| id)
            .expect("non-empty graph");

        let flipped = session.flip_group(edge).expect("valid edge");
        prop_assert!(flipped.contains(&edge));
        prop_assert_ne!(endpoints(&session), before.clone());
        session.flip_group(edge).expect("valid edge");
        prop_assert_eq!(endpoints(&session), before);
    }

    #[test]
    fn prop_group_shares_cell_count(
        dims in lattice_dims(),
        pick in 0usize..1000,
        first in 0.01f64..0.2,
        ratio in 1.05f64..1.3,
    ) {
        let (nx, ny, nz) = dims;
        let mut session = built(common::lattice(nx, ny, nz));
        let count = session.graph().edge_count();
        let edge = session
            .graph()
            .edges()
            .nth(pick % count)
            .map(|(id, _)| id)
            .expect("non-empty graph");

        let descriptor = session
            .set_grading(
                edge,
                EdgeGrading::start_layer(first, ratio),
                CellTarget::Auto,
                &NoSnapping,
            )
            .expect("unit edges accept the layer");
        let source = session.edge_grading(edge).expect("edge").clone();
        for member in session.aligned_edges(edge).expect("grouped") {
            let attributes = session.edge_grading(member).expect("edge");
            prop_assert_eq!(attributes.cells, descriptor.cells);
            prop_assert_eq!(attributes.group, source.group);
            // Lattice edges all run along +x, +y or +z.
            prop_assert_eq!(attributes.grading, source.grading);
        }
    }
}
