//! Sketches shared by unit tests.

use crate::graph::GraphModel;
use crate::Vec3;

/// Unit cube, edges drawn in the order a user would sketch them.
pub(crate) fn cube() -> GraphModel {
    GraphModel::from_parts(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
        &[
            (0, 1), (1, 2), (2, 3), (3, 0),
            (4, 5), (5, 6), (6, 7), (7, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ],
    )
    .expect("cube sketch is valid")
}

/// Two unit cubes side by side along x, sharing the face at x = 1.
///
/// Vertices: bottom row 0..=5 as (x, y) = (0,0) (1,0) (2,0) (0,1) (1,1) (2,1)
/// at z = 0, then the same at z = 1 as 6..=11.
pub(crate) fn lattice_2x1x1() -> GraphModel {
    let mut positions = Vec::new();
    for z in [0.0, 1.0] {
        for y in [0.0, 1.0] {
            for x in [0.0, 1.0, 2.0] {
                positions.push(Vec3::new(x, y, z));
            }
        }
    }
    let mut edges = Vec::new();
    for layer in [0u32, 6] {
        edges.extend([
            (layer, layer + 1),
            (layer + 1, layer + 2),
            (layer + 3, layer + 4),
            (layer + 4, layer + 5),
            (layer, layer + 3),
            (layer + 1, layer + 4),
            (layer + 2, layer + 5),
        ]);
    }
    for v in 0..6 {
        edges.push((v, v + 6));
    }
    GraphModel::from_parts(&positions, &edges).expect("lattice sketch is valid")
}

/// Square duct around a square core: four blocks around one central block.
///
/// Outer square 0..=3 and inner square 4..=7 at z = 0, copied to z = 1 as
/// 8..=15. The outer hull also closes into a hexahedron, which must be
/// suppressed in favour of the five smaller blocks.
pub(crate) fn o_grid() -> GraphModel {
    let outer = [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)];
    let inner = [(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)];
    let mut positions = Vec::new();
    for z in [0.0, 1.0] {
        for &(x, y) in outer.iter().chain(inner.iter()) {
            positions.push(Vec3::new(x, y, z));
        }
    }
    let mut edges = Vec::new();
    for layer in [0u32, 8] {
        for i in 0..4 {
            let j = (i + 1) % 4;
            edges.push((layer + i, layer + j));
            edges.push((layer + 4 + i, layer + 4 + j));
            edges.push((layer + i, layer + 4 + i));
        }
    }
    for v in 0..8 {
        edges.push((v, v + 8));
    }
    GraphModel::from_parts(&positions, &edges).expect("o-grid sketch is valid")
}
