//! Candidate acceptance, face adjacency and block renumbering.
//!
//! A quad has two sides. The first block to claim a quad fixes its stored
//! winding (outward from that block, which becomes `neg`); a later block may
//! only claim the opposite side. A candidate that would share a side with an
//! accepted block overlaps it and is suppressed. Candidates are visited from
//! the smallest volume up, so a hexahedron enclosing several accepted blocks
//! loses to them.

use super::hexa::HexCandidate;
use crate::graph::{QuadKey, VertexId};
use crate::topology::{BlockId, Face, IndexCorrection, FACE_CORNERS};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One quad and the candidates on either side of it.
#[derive(Debug, Clone)]
struct Slot {
    winding: [VertexId; 4],
    neg: usize,
    pos: Option<usize>,
}

/// Accepted candidates, their faces and the renumbering record.
#[derive(Debug, Clone, Default)]
pub(crate) struct Adjacency {
    /// Candidate positions of accepted blocks, ascending
    pub accepted: Vec<usize>,
    /// Candidate positions of suppressed blocks, ascending
    pub suppressed: Vec<usize>,
    /// Faces referring to final block ids, sorted by key
    pub faces: Vec<Face>,
    /// Block ids that differ from the candidate position
    pub corrections: Vec<IndexCorrection>,
}

/// Relation between two windings of the same quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Winding {
    Same,
    Opposite,
}

fn compare(reference: &[VertexId; 4], other: &[VertexId; 4]) -> Winding {
    let start = reference.iter().position(|v| *v == other[0]).unwrap_or(0);
    if reference[(start + 1) % 4] == other[1] {
        Winding::Same
    } else {
        Winding::Opposite
    }
}

/// Rotates a winding to start at its smallest vertex.
fn normalized(winding: [VertexId; 4]) -> [VertexId; 4] {
    let start = (0..4).min_by_key(|&i| winding[i]).unwrap_or(0);
    [0, 1, 2, 3].map(|i| winding[(start + i) % 4])
}

fn outward_faces(vertices: &[VertexId; 8]) -> [[VertexId; 4]; 6] {
    FACE_CORNERS.map(|q| q.map(|c| vertices[c]))
}

pub(crate) fn resolve(candidates: &[HexCandidate]) -> Adjacency {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&x, &y| {
        candidates[x]
            .volume
            .total_cmp(&candidates[y].volume)
            .then(x.cmp(&y))
    });

    let mut slots: BTreeMap<QuadKey, Slot> = BTreeMap::new();
    let mut accepted = Vec::new();
    let mut suppressed = Vec::new();

    for index in order {
        let faces = outward_faces(&candidates[index].vertices);
        let blocked = faces.iter().any(|w| match slots.get(&QuadKey::new(*w)) {
            None => false,
            Some(slot) => match compare(&slot.winding, w) {
                Winding::Same => true,
                Winding::Opposite => slot.pos.is_some(),
            },
        });
        if blocked {
            debug!(candidate = index, "suppressed overlapping hexahedron");
            suppressed.push(index);
            continue;
        }
        for w in faces {
            slots
                .entry(QuadKey::new(w))
                .and_modify(|slot| slot.pos = Some(index))
                .or_insert(Slot {
                    winding: w,
                    neg: index,
                    pos: None,
                });
        }
        accepted.push(index);
    }
    accepted.sort_unstable();
    suppressed.sort_unstable();

    // Close the gaps suppressed candidates leave in the numbering.
    let mut renumber = BTreeMap::new();
    let mut corrections = Vec::new();
    for &old in &accepted {
        let shift = suppressed.partition_point(|&s| s < old);
        let new = BlockId((old - shift) as u32);
        if shift > 0 {
            corrections.push(IndexCorrection {
                from: old as u32,
                to: new,
            });
        }
        renumber.insert(old, new);
    }
    if !corrections.is_empty() {
        warn!(
            corrections = corrections.len(),
            suppressed = suppressed.len(),
            "renumbered blocks after suppressed candidates"
        );
    }

    let faces = slots
        .into_values()
        .map(|slot| Face {
            vertices: normalized(slot.winding),
            neg: renumber.get(&slot.neg).copied(),
            pos: slot.pos.and_then(|p| renumber.get(&p).copied()),
            enabled: true,
        })
        .collect();

    Adjacency {
        accepted,
        suppressed,
        faces,
        corrections,
    }
}
