/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashSet;
use log::debug;
use crate::algorithms::contraction::Blossom;
use crate::error::MatchingError;
use crate::graph::Graph;
use crate::matching::Matching;
use crate::types::{AugmentingPath, Edge, Vertex};

/// How a contracted path is carried back through a blossom
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// The path is already valid in the original graph
    PassThrough,
    /// The blossom ends the path: enter it and walk around to its free stem
    Terminal,
    /// The path crosses the blossom: enter on the left, walk around, leave on the right
    Bridge,
}

/// A path edge that touches the stem in the contracted graph
#[derive(Clone, Copy, Debug)]
struct StemEdge {
    outside: Vertex,
    /// Matched in the contracted matching
    matched: bool,
    /// The same edge exists in the original graph with the same matched state
    realizable: bool,
}

/// Lift an augmenting path of the contracted graph through `blossom` into an augmenting path of
/// `graph` with respect to `matching`. `contracted` is the matching the path was found for.
pub fn lift(
    path: &AugmentingPath,
    blossom: &Blossom,
    graph: &Graph,
    matching: &Matching,
    contracted: &Matching,
) -> Result<AugmentingPath, MatchingError> {
    Lifter { blossom, graph, matching }.lift(path, contracted)
}

struct Lifter<'a> {
    blossom: &'a Blossom,
    graph: &'a Graph,
    matching: &'a Matching,
}

impl Lifter<'_> {
    fn lift(&self, path: &AugmentingPath, contracted: &Matching) -> Result<AugmentingPath, MatchingError> {
        let stem = self.blossom.stem();
        let mut vertices = path.vertices().to_vec();

        // If the stem ends the path, make it the last vertex so that its only edge is on the left
        if vertices.first() == Some(&stem) {
            vertices.reverse();
        }

        let position = vertices.iter().position(|&v| v == stem);
        let (left, right) = match position {
            None => (None, None),
            Some(i) => (
                i.checked_sub(1).map(|j| self.stem_edge(vertices[j], contracted)),
                vertices.get(i + 1).map(|&v| self.stem_edge(v, contracted)),
            ),
        };

        let stem_edges = left.iter().chain(right.iter()).count();
        let left_realizable = left.map_or(false, |e| e.realizable);
        let right_realizable = right.map_or(false, |e| e.realizable);

        let strategy = match (stem_edges, left_realizable, right_realizable) {
            (0, _, _) => Strategy::PassThrough,
            (1, true, _) if self.matching.is_free(stem) => Strategy::PassThrough,
            (1, _, _) => Strategy::Terminal,
            (2, true, true) => Strategy::PassThrough,
            _ => Strategy::Bridge,
        };

        debug!("lifting {path} through blossom {:?} ({strategy:?})", self.blossom.cycle());

        let lifted = match (strategy, position, left, right) {
            (Strategy::Terminal, Some(i), Some(entry), _) => {
                let walk = self.terminal(entry)?;
                let mut lifted = vertices[..i].to_vec();
                lifted.extend(walk);
                lifted
            }
            (Strategy::Bridge, Some(i), Some(entry), Some(exit)) => {
                let walk = self.bridge(entry, exit)?;
                let mut lifted = vertices[..i].to_vec();
                lifted.extend(walk);
                lifted.extend_from_slice(&vertices[i + 1..]);
                lifted
            }
            _ => vertices,
        };

        Ok(AugmentingPath::new(lifted))
    }

    fn stem_edge(&self, outside: Vertex, contracted: &Matching) -> StemEdge {
        let edge = Edge::new(outside, self.blossom.stem());
        let matched = contracted.contains(edge);

        StemEdge {
            outside,
            matched,
            realizable: self.graph.has_edge(edge) && self.matching.contains(edge) == matched,
        }
    }

    /// Blossom vertices joined to the outside end of `edge` by an original edge in the same
    /// matched state
    fn attachments(&self, edge: StemEdge) -> Vec<Vertex> {
        self.blossom
            .cycle()
            .iter()
            .copied()
            .filter(|&u| {
                let e = Edge::new(u, edge.outside);
                self.graph.has_edge(e) && self.matching.contains(e) == edge.matched
            })
            .collect()
    }

    /// Enter the blossom over `entry` and walk to a free vertex
    fn terminal(&self, entry: StemEdge) -> Result<Vec<Vertex>, MatchingError> {
        self.attachments(entry)
            .into_iter()
            .find_map(|start| self.walk_any(start, !entry.matched, |v, _| self.matching.is_free(v)))
            .ok_or_else(|| MatchingError::LiftFailed {
                stem: self.blossom.stem(),
                from: entry.outside,
                to: "a free vertex".into(),
            })
    }

    /// Enter the blossom over `entry`, walk around and leave over `exit`. The walk may only stop
    /// at an exit vertex when the next edge it would need is the exit edge's state.
    fn bridge(&self, entry: StemEdge, exit: StemEdge) -> Result<Vec<Vertex>, MatchingError> {
        let enders: HashSet<_> = self.attachments(exit).into_iter().collect();

        self.attachments(entry)
            .into_iter()
            .find_map(|start| self.walk_any(start, !entry.matched, |v, want| {
                enders.contains(&v) && want == exit.matched
            }))
            .ok_or_else(|| MatchingError::LiftFailed {
                stem: self.blossom.stem(),
                from: entry.outside,
                to: exit.outside.to_string(),
            })
    }

    /// Try the walk from `start` in both directions around the cycle
    fn walk_any(&self, start: Vertex, want: bool, done: impl Fn(Vertex, bool) -> bool) -> Option<Vec<Vertex>> {
        if done(start, want) {
            return Some(vec![start]);
        }

        self.blossom
            .neighbors(start)?
            .into_iter()
            .find_map(|first| self.walk(start, first, want, &done))
    }

    /// Walk around the cycle from `start` towards `first`. Each edge taken must be matched iff
    /// `want` is set, and `want` flips after every edge. Stops as soon as `done(vertex, want)`
    /// holds. Gives up on an edge in the wrong state or when the walk comes back to `start`.
    fn walk(
        &self,
        start: Vertex,
        first: Vertex,
        mut want: bool,
        done: &impl Fn(Vertex, bool) -> bool,
    ) -> Option<Vec<Vertex>> {
        let mut walk = vec![start];
        let (mut prev, mut current) = (start, first);

        loop {
            if self.matching.contains(Edge::new(prev, current)) != want {
                return None;
            }

            want = !want;
            walk.push(current);
            if done(current, want) {
                return Some(walk);
            }

            let next = self.blossom.next_along(current, prev)?;
            if next == start {
                return None;
            }

            (prev, current) = (current, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(Vertex, Vertex)]) -> Graph {
        Graph::from_edges(n, edges.iter().copied()).unwrap()
    }

    fn matching(g: &Graph, edges: &[(Vertex, Vertex)]) -> Matching {
        Matching::from_edges(g, edges.iter().map(|&e| e.into())).unwrap()
    }

    /// Free 0, stem 1=2, pentagon 2-3=4-5=6-2 and an exit 3-7=8-9 with 9 free
    fn crossed_pentagon() -> (Graph, Matching, Blossom) {
        let g = graph(10, &[
            (0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 2), (3, 7), (7, 8), (8, 9),
        ]);
        let m = matching(&g, &[(1, 2), (3, 4), (5, 6), (7, 8)]);
        (g, m, Blossom::new(vec![2, 3, 4, 5, 6]))
    }

    #[test]
    fn bridges_through_the_long_side() {
        let (g, m, b) = crossed_pentagon();
        let (_, cm) = b.contract(&g, &m).unwrap();
        let contracted = AugmentingPath::new(vec![0, 1, 2, 7, 8, 9]);

        let lifted = lift(&contracted, &b, &g, &m, &cm).unwrap();
        assert_eq!(lifted.vertices(), &[0, 1, 2, 6, 5, 4, 3, 7, 8, 9]);
        assert!(lifted.len() >= contracted.len());
        m.check_augmenting(&g, &lifted).unwrap();
    }

    #[test]
    fn bridges_in_reverse_direction() {
        let (g, m, b) = crossed_pentagon();
        let (_, cm) = b.contract(&g, &m).unwrap();
        let contracted = AugmentingPath::new(vec![9, 8, 7, 2, 1, 0]);

        let lifted = lift(&contracted, &b, &g, &m, &cm).unwrap();
        assert_eq!(lifted.vertices(), &[9, 8, 7, 3, 4, 5, 6, 2, 1, 0]);
        m.check_augmenting(&g, &lifted).unwrap();
    }

    #[test]
    fn terminal_walk_reaches_free_stem() {
        // Triangle 0-1=2-0 with free stem 0 and an outside vertex 3 hanging off 1
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (1, 3)]);
        let m = matching(&g, &[(1, 2)]);
        let b = Blossom::new(vec![0, 1, 2]);
        let (_, cm) = b.contract(&g, &m).unwrap();

        for contracted in [vec![0, 3], vec![3, 0]] {
            let lifted = lift(&AugmentingPath::new(contracted), &b, &g, &m, &cm).unwrap();
            assert_eq!(lifted.vertices(), &[3, 1, 2, 0]);
            m.check_augmenting(&g, &lifted).unwrap();
        }
    }

    #[test]
    fn realizable_stem_edges_pass_through() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (0, 3)]);
        let m = matching(&g, &[(1, 2)]);
        let b = Blossom::new(vec![0, 1, 2]);
        let (_, cm) = b.contract(&g, &m).unwrap();

        let lifted = lift(&AugmentingPath::new(vec![0, 3]), &b, &g, &m, &cm).unwrap();
        assert_eq!(lifted.len(), 1);
        m.check_augmenting(&g, &lifted).unwrap();
    }

    #[test]
    fn paths_avoiding_the_stem_are_unchanged() {
        let (g, m, b) = crossed_pentagon();
        let (_, cm) = b.contract(&g, &m).unwrap();
        let contracted = AugmentingPath::new(vec![9, 8]);

        assert_eq!(lift(&contracted, &b, &g, &m, &cm).unwrap(), contracted);
    }

    #[test]
    fn fails_loudly_without_alternating_walk() {
        // Not an alternating cycle at all, so no walk can connect 3 and 4
        let g = graph(5, &[(0, 1), (1, 2), (2, 0), (1, 3), (2, 4)]);
        let m = Matching::empty(5);
        let b = Blossom::new(vec![0, 1, 2]);
        let (_, cm) = b.contract(&g, &m).unwrap();

        let result = lift(&AugmentingPath::new(vec![3, 0, 4]), &b, &g, &m, &cm);
        assert!(matches!(result, Err(MatchingError::LiftFailed { stem: 0, from: 3, .. })));
    }
}
