/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{error, fmt};
use crate::graph::Graph;
use crate::matching::Matching;

/// Vertices are plain indices in `0..n`.
pub type Vertex = usize;

/// An undirected edge. The endpoints are stored smallest first, so `Edge::new(u, v)` and
/// `Edge::new(v, u)` compare and hash identically.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    a: Vertex,
    b: Vertex,
}

impl Edge {
    pub fn new(u: Vertex, v: Vertex) -> Self {
        if u <= v {
            Self { a: u, b: v }
        } else {
            Self { a: v, b: u }
        }
    }

    /// Both endpoints, smallest first
    pub fn endpoints(&self) -> (Vertex, Vertex) {
        (self.a, self.b)
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.a == v || self.b == v
    }

    /// The endpoint opposite to `v`, if `v` is an endpoint at all
    pub fn other(&self, v: Vertex) -> Option<Vertex> {
        match v {
            _ if v == self.a => Some(self.b),
            _ if v == self.b => Some(self.a),
            _ => None,
        }
    }

    /// Apply `f` to both endpoints. Returns `None` if the result would be a self loop.
    pub fn map(&self, f: impl Fn(Vertex) -> Vertex) -> Option<Self> {
        let (a, b) = (f(self.a), f(self.b));
        (a != b).then(|| Self::new(a, b))
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})--({})", self.a, self.b)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.a, self.b)
    }
}

impl From<(Vertex, Vertex)> for Edge {
    fn from((u, v): (Vertex, Vertex)) -> Self {
        Self::new(u, v)
    }
}

/// A path given as its vertex sequence. Consecutive vertices are joined by an edge, so a path of
/// `k + 1` vertices has `k` edges. Used for augmenting paths in the original and contracted
/// graphs alike.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentingPath {
    vertices: Vec<Vertex>,
}

impl AugmentingPath {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    /// The edges of the path in walking order
    pub fn edges(&self) -> impl Iterator<Item=Edge> + '_ {
        self.vertices.windows(2).map(|w| Edge::new(w[0], w[1]))
    }

    /// Number of edges on the path
    pub fn len(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self, v: Vertex) -> Option<usize> {
        self.vertices.iter().position(|&u| u == v)
    }

    pub fn first(&self) -> Option<Vertex> {
        self.vertices.first().copied()
    }

    pub fn last(&self) -> Option<Vertex> {
        self.vertices.last().copied()
    }
}

impl fmt::Display for AugmentingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for v in &self.vertices {
            if !first {
                write!(f, " - ")?;
            }
            write!(f, "{v}")?;
            first = false;
        }
        Ok(())
    }
}

/// A maximum-cardinality matching algorithm. Implementors are stateless, every call works on its
/// own copy of whatever bookkeeping it needs.
pub trait MatchingAlgorithm {
    type Error: error::Error + Send + Sync + 'static;

    /// Algorithm name retrieval function.
    fn name() -> String;

    /// Compute a maximum matching of the given graph.
    fn maximum_matching(graph: &Graph) -> Result<Matching, Self::Error>;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use super::*;

    #[test]
    fn edge_is_direction_insensitive() {
        assert_eq!(Edge::new(3, 1), Edge::new(1, 3));

        let set: HashSet<_> = [Edge::new(0, 4), Edge::new(4, 0), Edge::new(2, 4)].into();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Edge::new(4, 2)));
    }

    #[test]
    fn edge_other_endpoint() {
        let e = Edge::new(5, 2);
        assert_eq!(e.endpoints(), (2, 5));
        assert_eq!(e.other(5), Some(2));
        assert_eq!(e.other(2), Some(5));
        assert_eq!(e.other(7), None);
    }

    #[test]
    fn edge_map_drops_self_loops() {
        let e = Edge::new(1, 2);
        assert_eq!(e.map(|v| if v == 2 { 0 } else { v }), Some(Edge::new(0, 1)));
        assert_eq!(e.map(|_| 0), None);
    }

    #[test]
    fn path_edges_follow_vertex_order() {
        let p = AugmentingPath::new(vec![4, 1, 2, 0]);
        let edges: Vec<_> = p.edges().collect();
        assert_eq!(edges, vec![Edge::new(1, 4), Edge::new(1, 2), Edge::new(0, 2)]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.to_string(), "4 - 1 - 2 - 0");
    }
}
