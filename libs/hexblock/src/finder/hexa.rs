//! Hexahedral candidates assembled from quad candidates.
//!
//! A candidate is a bottom quad `a b c d` lifted along four edges to a top
//! quad `e f g h`, with all six faces present as quad candidates and no
//! further edges among the eight corners.

use super::cycles::ActiveAdjacency;
use crate::graph::{QuadKey, VertexId};
use crate::topology::FACE_CORNERS;
use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet};

/// Corner permutation applied as `new[i] = old[perm[i]]`.
type Permutation = [usize; 8];

const IDENTITY: Permutation = [0, 1, 2, 3, 4, 5, 6, 7];
/// Quarter turn about block axis 2.
const TURN_Z: Permutation = [3, 0, 1, 2, 7, 4, 5, 6];
/// Quarter turn about block axis 0.
const TURN_X: Permutation = [4, 5, 1, 0, 7, 6, 2, 3];
/// Reflection swapping the 0→1 and 0→3 axes.
const MIRROR: Permutation = [0, 3, 2, 1, 4, 7, 6, 5];

/// Hexahedron that passed every local check.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HexCandidate {
    /// Canonical right-handed corner tuple
    pub vertices: [VertexId; 8],
    /// Enclosed volume, positive
    pub volume: f64,
}

fn permute(vertices: &[VertexId; 8], perm: &Permutation) -> [VertexId; 8] {
    perm.map(|i| vertices[i])
}

/// The 24 proper rotations of the corner tuple.
fn rotations() -> Vec<Permutation> {
    let mut found = vec![IDENTITY];
    let mut next = 0;
    while next < found.len() {
        let current = found[next];
        for turn in [TURN_Z, TURN_X] {
            let composed = turn.map(|i| current[i]);
            if !found.contains(&composed) {
                found.push(composed);
            }
        }
        next += 1;
    }
    found
}

/// Lexicographically smallest rotation of a right-handed tuple.
pub(crate) fn canonical(vertices: &[VertexId; 8]) -> [VertexId; 8] {
    rotations()
        .iter()
        .map(|perm| permute(vertices, perm))
        .min()
        .unwrap_or(*vertices)
}

/// Signed volume over the outward-wound faces, each split into two triangles.
pub(super) fn signed_volume(corners: &[DVec3; 8]) -> f64 {
    FACE_CORNERS
        .iter()
        .map(|q| {
            let [p0, p1, p2, p3] = q.map(|c| corners[c]);
            p0.dot(p1.cross(p2)) + p0.dot(p2.cross(p3))
        })
        .sum::<f64>()
        / 6.0
}

/// Every hexahedron spanned by the quad candidates, deduplicated by vertex set
/// and sorted by canonical tuple.
pub(crate) fn hex_candidates(
    adjacency: &ActiveAdjacency,
    quads: &BTreeMap<QuadKey, [VertexId; 4]>,
    positions: &[DVec3],
    degeneracy_tolerance: f64,
) -> Vec<HexCandidate> {
    let mut seen = BTreeSet::new();
    let mut found = Vec::new();
    let n = |v: VertexId| adjacency.neighbors(v);

    for &[a, b, c, d] in quads.values() {
        let bottom = [a, b, c, d];
        for &e in n(a) {
            if bottom.contains(&e) {
                continue;
            }
            for &f in n(b).intersection(n(e)) {
                if bottom.contains(&f) {
                    continue;
                }
                for &g in n(c).intersection(n(f)) {
                    if bottom.contains(&g) || g == e {
                        continue;
                    }
                    for &h in n(d).intersection(n(g)) {
                        if bottom.contains(&h) || h == f || !n(e).contains(&h) {
                            continue;
                        }
                        let vertices = [a, b, c, d, e, f, g, h];
                        let mut key = vertices;
                        key.sort_unstable();
                        if seen.contains(&key) {
                            continue;
                        }
                        if let Some(candidate) =
                            check(vertices, adjacency, quads, positions, degeneracy_tolerance)
                        {
                            seen.insert(key);
                            found.push(candidate);
                        }
                    }
                }
            }
        }
    }
    found.sort_by(|x, y| x.vertices.cmp(&y.vertices));
    found
}

fn check(
    vertices: [VertexId; 8],
    adjacency: &ActiveAdjacency,
    quads: &BTreeMap<QuadKey, [VertexId; 4]>,
    positions: &[DVec3],
    degeneracy_tolerance: f64,
) -> Option<HexCandidate> {
    let distinct: BTreeSet<_> = vertices.iter().collect();
    if distinct.len() != 8 {
        return None;
    }
    let all_faces = FACE_CORNERS
        .iter()
        .all(|q| quads.contains_key(&QuadKey::new(q.map(|c| vertices[c]))));
    if !all_faces {
        return None;
    }
    let induced = vertices
        .iter()
        .enumerate()
        .map(|(i, &u)| vertices[i + 1..].iter().filter(|&&w| adjacency.connected(u, w)).count())
        .sum::<usize>();
    if induced != 12 {
        return None;
    }

    let corners = vertices.map(|v| positions[v.0 as usize]);
    let mut volume = signed_volume(&corners);
    let mut oriented = vertices;
    if volume < 0.0 {
        oriented = permute(&vertices, &MIRROR);
        volume = -volume;
    }
    let scale = corners
        .iter()
        .map(|p| p.distance(corners[0]))
        .fold(0.0_f64, f64::max);
    if volume <= degeneracy_tolerance * scale.powi(3) {
        return None;
    }
    Some(HexCandidate {
        vertices: canonical(&oriented),
        volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_group_has_24_elements() {
        let all = rotations();
        assert_eq!(all.len(), 24);
        assert!(!all.contains(&MIRROR));
    }

    #[test]
    fn test_canonical_is_rotation_invariant() {
        let block = [5, 9, 2, 7, 11, 3, 8, 1].map(VertexId);
        let reference = canonical(&block);
        for perm in rotations() {
            assert_eq!(canonical(&permute(&block, &perm)), reference);
        }
        assert_eq!(reference[0], VertexId(1));
    }

    #[test]
    fn test_unit_cube_volume_sign() {
        let corners = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        ];
        assert!((signed_volume(&corners) - 1.0).abs() < 1e-12);
        let mirrored = MIRROR.map(|i| corners[i]);
        assert!((signed_volume(&mirrored) + 1.0).abs() < 1e-12);
        for perm in rotations() {
            let turned = perm.map(|i| corners[i]);
            assert!((signed_volume(&turned) - 1.0).abs() < 1e-12);
        }
    }
}
