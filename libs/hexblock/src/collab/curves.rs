//! Curve snapping onto named polylines.

use super::CurveSnapper;
use crate::graph::SnapRef;
use ::config::constants::EPSILON_TOLERANCE;
use glam::DVec3;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered points an edge follows instead of a straight line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedCurve {
    /// Points from the edge's start side to its end side
    pub points: Vec<DVec3>,
    /// Cumulative arc length
    pub length: f64,
}

impl SnappedCurve {
    /// Builds a curve through `points` and measures it.
    pub fn through(points: Vec<DVec3>) -> Self {
        let length = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        Self { points, length }
    }

    /// Same curve walked the other way
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
            length: self.length,
        }
    }
}

/// Leaves every edge straight.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapping;

impl CurveSnapper for NoSnapping {
    fn snap(&self, _snap: &SnapRef, _from: DVec3, _to: DVec3) -> Option<SnappedCurve> {
        None
    }
}

/// Named polylines given as unordered line segments.
///
/// An edge snapped to a polyline follows the part of it between the edge's
/// endpoints; both endpoints must lie on the polyline within `tolerance`. On a
/// closed loop the shorter of the two arcs is taken.
#[derive(Debug, Clone)]
pub struct PolylineSnapper {
    curves: BTreeMap<SnapRef, Vec<(DVec3, DVec3)>>,
    tolerance: f64,
}

impl Default for PolylineSnapper {
    fn default() -> Self {
        Self::new(EPSILON_TOLERANCE)
    }
}

impl PolylineSnapper {
    /// Creates a snapper merging segment endpoints closer than `tolerance` and
    /// accepting edge endpoints within `tolerance` of a curve
    pub fn new(tolerance: f64) -> Self {
        Self {
            curves: BTreeMap::new(),
            tolerance,
        }
    }

    /// Adds or replaces a curve
    pub fn insert(&mut self, name: SnapRef, segments: Vec<(DVec3, DVec3)>) {
        self.curves.insert(name, segments);
    }

    /// Chains the segments of one curve into a single ordered point list.
    ///
    /// Returns `None` unless the segments form exactly one open chain or one
    /// closed loop.
    fn chain(&self, segments: &[(DVec3, DVec3)]) -> Option<Chain> {
        let mut nodes: Vec<DVec3> = Vec::new();
        let mut node_of = |p: DVec3| -> usize {
            match nodes.iter().position(|n| n.distance(p) <= self.tolerance) {
                Some(i) => i,
                None => {
                    nodes.push(p);
                    nodes.len() - 1
                }
            }
        };
        let links: Vec<(usize, usize)> = segments
            .iter()
            .map(|&(a, b)| (node_of(a), node_of(b)))
            .filter(|(a, b)| a != b)
            .collect();
        if links.is_empty() {
            return None;
        }

        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (i, &(a, b)) in links.iter().enumerate() {
            incident[a].push(i);
            incident[b].push(i);
        }
        if incident.iter().any(|s| s.len() > 2) {
            return None;
        }
        let ends: Vec<usize> = (0..nodes.len()).filter(|&n| incident[n].len() == 1).collect();
        let start = match ends.as_slice() {
            [first, _] => *first,
            [] => (0..nodes.len()).find(|&n| !incident[n].is_empty())?,
            _ => return None,
        };

        let mut used = vec![false; links.len()];
        let mut points = vec![nodes[start]];
        let mut at = start;
        while let Some(&link) = incident[at].iter().find(|&&l| !used[l]) {
            used[link] = true;
            let (a, b) = links[link];
            at = if a == at { b } else { a };
            points.push(nodes[at]);
        }
        used.iter()
            .all(|&u| u)
            .then(|| Chain::new(points, ends.is_empty()))
    }
}

impl CurveSnapper for PolylineSnapper {
    fn snap(&self, snap: &SnapRef, from: DVec3, to: DVec3) -> Option<SnappedCurve> {
        let chain = self.chain(self.curves.get(snap)?)?;
        let tolerance = self.tolerance;
        let start = chain.locate(from, tolerance)?;
        let end = chain.locate(to, tolerance)?;

        let points = if chain.closed {
            let total = chain.length();
            let ahead = (end.station - start.station).rem_euclid(total);
            if ahead <= tolerance || total - ahead <= tolerance {
                return None;
            }
            if ahead <= total - ahead {
                chain.walk(start, ahead, end, tolerance)
            } else {
                let mut back = chain.walk(end, total - ahead, start, tolerance);
                back.reverse();
                back
            }
        } else if end.station > start.station + tolerance {
            chain.walk(start, end.station - start.station, end, tolerance)
        } else if start.station > end.station + tolerance {
            let mut back = chain.walk(end, start.station - end.station, start, tolerance);
            back.reverse();
            back
        } else {
            return None;
        };
        Some(SnappedCurve::through(points))
    }
}

// =============================================================================
// CHAINED POLYLINE
// =============================================================================

/// Point on a chain and its arc-length station.
#[derive(Debug, Clone, Copy)]
struct Location {
    station: f64,
    point: DVec3,
}

/// Ordered polyline with cumulative arc length per node.
///
/// A closed chain repeats its first node at the end.
#[derive(Debug, Clone)]
struct Chain {
    points: Vec<DVec3>,
    stations: Vec<f64>,
    closed: bool,
}

impl Chain {
    fn new(points: Vec<DVec3>, closed: bool) -> Self {
        let mut stations = Vec::with_capacity(points.len());
        let mut travelled = 0.0;
        stations.push(travelled);
        for w in points.windows(2) {
            travelled += w[0].distance(w[1]);
            stations.push(travelled);
        }
        Self {
            points,
            stations,
            closed,
        }
    }

    fn length(&self) -> f64 {
        self.stations.last().copied().unwrap_or(0.0)
    }

    /// Closest point of the chain to `p`, if within `tolerance`.
    fn locate(&self, p: DVec3, tolerance: f64) -> Option<Location> {
        let mut best: Option<(f64, Location)> = None;
        for (i, w) in self.points.windows(2).enumerate() {
            let span = w[1] - w[0];
            let length_sq = span.length_squared();
            if length_sq == 0.0 {
                continue;
            }
            let t = ((p - w[0]).dot(span) / length_sq).clamp(0.0, 1.0);
            let point = w[0] + span * t;
            let distance = p.distance(point);
            if best.map_or(true, |(d, _)| distance < d) {
                let station = self.stations[i] + t * length_sq.sqrt();
                best = Some((distance, Location { station, point }));
            }
        }
        best.filter(|&(d, _)| d <= tolerance).map(|(_, at)| at)
    }

    /// Points from `start` along the chain for `length`, ending at `end`.
    fn walk(&self, start: Location, length: f64, end: Location, tolerance: f64) -> Vec<DVec3> {
        let total = self.length();
        // The repeated closing node is skipped.
        let nodes = if self.closed {
            self.points.len() - 1
        } else {
            self.points.len()
        };
        let mut inner: Vec<(f64, DVec3)> = (0..nodes)
            .filter_map(|i| {
                let offset = self.stations[i] - start.station;
                let offset = if self.closed {
                    offset.rem_euclid(total)
                } else {
                    offset
                };
                (offset > tolerance && offset < length - tolerance)
                    .then_some((offset, self.points[i]))
            })
            .collect();
        inner.sort_by(|x, y| x.0.total_cmp(&y.0));

        let mut points = Vec::with_capacity(inner.len() + 2);
        points.push(start.point);
        points.extend(inner.into_iter().map(|(_, p)| p));
        points.push(end.point);
        points
    }
}
