//! Sketch builders shared by the integration tests.
#![allow(dead_code)]

use hexblock::{GraphModel, Vec3};

/// Structured `nx × ny × nz` lattice of unit cubes.
///
/// Vertex `(i, j, k)` has index `i + (nx + 1) * (j + (ny + 1) * k)`.
pub fn lattice(nx: u32, ny: u32, nz: u32) -> GraphModel {
    let index = |i: u32, j: u32, k: u32| i + (nx + 1) * (j + (ny + 1) * k);
    let mut positions = Vec::new();
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                positions.push(Vec3::new(f64::from(i), f64::from(j), f64::from(k)));
            }
        }
    }
    let mut edges = Vec::new();
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                if i < nx {
                    edges.push((index(i, j, k), index(i + 1, j, k)));
                }
                if j < ny {
                    edges.push((index(i, j, k), index(i, j + 1, k)));
                }
                if k < nz {
                    edges.push((index(i, j, k), index(i, j, k + 1)));
                }
            }
        }
    }
    GraphModel::from_parts(&positions, &edges).expect("lattice sketch is valid")
}

/// Number of distinct quad faces in a lattice.
pub fn lattice_faces(nx: u32, ny: u32, nz: u32) -> usize {
    (nx * ny * (nz + 1) + nx * (ny + 1) * nz + (nx + 1) * ny * nz) as usize
}

/// Same sketch with edges inserted in another order and some directions
/// reversed.
pub fn reshuffled(graph: &GraphModel, rotate: usize, flips: &[bool]) -> GraphModel {
    let positions = graph.positions();
    let mut pairs: Vec<(u32, u32)> = graph
        .edges()
        .map(|(_, e)| (e.start().0, e.end().0))
        .collect();
    if !pairs.is_empty() {
        let by = rotate % pairs.len();
        pairs.rotate_left(by);
    }
    for (pair, &flip) in pairs.iter_mut().zip(flips.iter().cycle()) {
        if flip {
            *pair = (pair.1, pair.0);
        }
    }
    GraphModel::from_parts(&positions, &pairs).expect("same sketch")
}

/// Square duct around a square core, with a centre vertex wired to the core
/// corners on both layers (an O-grid centre).
///
/// Vertices 0..=7 at z = 0 (outer then inner square), 8..=15 at z = 1,
/// centre 16 at z = 0 and 17 at z = 1.
pub fn o_grid_with_centre() -> GraphModel {
    let outer = [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)];
    let inner = [(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)];
    let mut positions = Vec::new();
    for z in [0.0, 1.0] {
        for &(x, y) in outer.iter().chain(inner.iter()) {
            positions.push(Vec3::new(x, y, z));
        }
    }
    positions.push(Vec3::new(1.5, 1.5, 0.0));
    positions.push(Vec3::new(1.5, 1.5, 1.0));

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
    for (centre, layer) in [(16u32, 0u32), (17, 8)] {
        for i in 4..8 {
            edges.push((centre, layer + i));
        }
    }
    edges.push((16, 17));
    GraphModel::from_parts(&positions, &edges).expect("o-grid sketch is valid")
}
