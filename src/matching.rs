/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{BTreeSet, HashMap, HashSet};
use crate::error::MatchingError;
use crate::graph::Graph;
use crate::types::{AugmentingPath, Edge, Vertex};

/// A set of edges of which no two share a vertex, together with the derived `mate` table. Every
/// change produces a new value, the `mate` table is rebuilt from the edge set each time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    edges: BTreeSet<Edge>,
    mate: Vec<Option<Vertex>>,
}

impl Matching {
    /// The empty matching on `vertex_count` vertices
    pub fn empty(vertex_count: usize) -> Self {
        Self {
            edges: BTreeSet::new(),
            mate: vec![None; vertex_count],
        }
    }

    /// Build a matching of `graph` from the given edges. Every edge must be part of the graph
    /// and no vertex may be covered twice.
    pub fn from_edges(
        graph: &Graph,
        edges: impl IntoIterator<Item=Edge>,
    ) -> Result<Self, MatchingError> {
        let edges: BTreeSet<_> = edges.into_iter().collect();
        if let Some(&missing) = edges.iter().find(|&&e| !graph.has_edge(e)) {
            return Err(MatchingError::MissingEdge(missing));
        }

        let matching = Self::from_edge_set(graph.vertex_count(), edges);
        matching.validate()?;
        Ok(matching)
    }

    /// Unchecked construction, callers validate where it matters. Edges reaching past
    /// `vertex_count` stay in the edge set so that [`Matching::validate`] reports them.
    fn from_edge_set(vertex_count: usize, edges: BTreeSet<Edge>) -> Self {
        let mut mate = vec![None; vertex_count];
        for e in &edges {
            let (a, b) = e.endpoints();
            if b < vertex_count {
                mate[a] = Some(b);
                mate[b] = Some(a);
            }
        }

        Self { edges, mate }
    }

    pub fn vertex_count(&self) -> usize {
        self.mate.len()
    }

    /// Number of matched edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Does the matching cover every vertex?
    pub fn is_perfect(&self) -> bool {
        2 * self.len() == self.vertex_count()
    }

    pub fn edges(&self) -> impl Iterator<Item=Edge> + '_ {
        self.edges.iter().copied()
    }

    /// The matched pairs, smallest vertex first, in ascending order
    pub fn pairs(&self) -> Vec<(Vertex, Vertex)> {
        self.edges.iter().map(Edge::endpoints).collect()
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.edges.contains(&edge)
    }

    pub fn mate_of(&self, v: Vertex) -> Option<Vertex> {
        self.mate.get(v).copied().flatten()
    }

    pub fn is_free(&self, v: Vertex) -> bool {
        self.mate_of(v).is_none()
    }

    pub fn free_vertices(&self) -> impl Iterator<Item=Vertex> + '_ {
        self.mate.iter().enumerate().filter(|(_, m)| m.is_none()).map(|(v, _)| v)
    }

    /// Flip the matching along `path`: edges in exactly one of the two sets survive. The result
    /// is not validated, see [`Matching::validate`].
    pub fn symmetric_difference(&self, path: &AugmentingPath) -> Matching {
        let path_edges: BTreeSet<_> = path.edges().collect();
        let edges = self.edges.symmetric_difference(&path_edges).copied().collect();
        Self::from_edge_set(self.vertex_count(), edges)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check that every edge lies within the vertex range and no vertex is covered by more than
    /// one edge
    pub fn validate(&self) -> Result<(), MatchingError> {
        let mut covered: HashMap<Vertex, Edge> = HashMap::new();
        for &e in &self.edges {
            let (a, b) = e.endpoints();
            if b >= self.vertex_count() {
                return Err(MatchingError::EdgeOutOfRange { edge: e, count: self.vertex_count() });
            }

            for v in [a, b] {
                if let Some(&first) = covered.get(&v) {
                    return Err(MatchingError::SharedVertex { vertex: v, first, second: e });
                }
                covered.insert(v, e);
            }
        }

        Ok(())
    }

    /// The matching seen through a blossom contraction: edges leaving the blossom are re-pointed
    /// to `stem` and edges inside it disappear
    pub fn contract(&self, blossom: &HashSet<Vertex>, stem: Vertex) -> Matching {
        let edges = self.edges
            .iter()
            .filter_map(|e| e.map(|v| if blossom.contains(&v) { stem } else { v }))
            .collect();

        Self::from_edge_set(self.vertex_count(), edges)
    }

    /// Check that `path` is an augmenting path of `graph` with respect to this matching: a simple
    /// path of graph edges between two distinct free vertices whose edges alternate between
    /// unmatched and matched, starting and ending unmatched.
    pub fn check_augmenting(&self, graph: &Graph, path: &AugmentingPath) -> Result<(), MatchingError> {
        let fail = |reason: String| MatchingError::NotAugmenting {
            path: path.to_string(),
            reason,
        };

        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Err(fail("path is empty".into()));
        };

        if path.len() % 2 == 0 {
            return Err(fail(format!("even number of edges ({})", path.len())));
        }

        for end in [first, last] {
            if !self.is_free(end) {
                return Err(fail(format!("endpoint {end} is matched")));
            }
        }

        let mut seen = HashSet::new();
        if let Some(v) = path.vertices().iter().find(|&&v| !seen.insert(v)) {
            return Err(fail(format!("vertex {v} repeats")));
        }

        for (i, e) in path.edges().enumerate() {
            if !graph.has_edge(e) {
                return Err(MatchingError::MissingEdge(e));
            }

            if self.contains(e) != (i % 2 == 1) {
                return Err(fail(format!("edge {e} breaks the alternation")));
            }
        }

        Ok(())
    }
}
