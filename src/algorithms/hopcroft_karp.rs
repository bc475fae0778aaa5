/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::VecDeque;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::matching::Matching;
use crate::types::{Edge, MatchingAlgorithm, Vertex};

/// Hopcroft-Karp maximum matching for bipartite graphs. Each phase layers the graph by a
/// breadth-first search from the free left vertices and then augments along a maximal set of
/// vertex-disjoint shortest paths with depth-first searches. **WARNING:** Rejects graphs that are
/// not bipartite, there is no blossom handling here.
pub struct HopcroftKarp;

impl MatchingAlgorithm for HopcroftKarp {
    type Error = GraphError;

    fn name() -> String {
        "Hopcroft-Karp".into()
    }

    fn maximum_matching(graph: &Graph) -> Result<Matching, GraphError> {
        let left = graph.bipartition().ok_or(GraphError::NotBipartite)?;
        let mut phases = Phases::new(graph, left);
        while phases.layer() {
            phases.augment_all();
        }

        Ok(Matching::from_edges(graph, phases.matched_edges())?)
    }
}

struct Phases<'a> {
    graph: &'a Graph,
    left: Vec<bool>,
    mate: Vec<Option<Vertex>>,
    // Layer index of left vertices, `None` when unreachable in the current phase
    dist: Vec<Option<usize>>,
}

impl<'a> Phases<'a> {
    fn new(graph: &'a Graph, left: Vec<bool>) -> Self {
        let n = graph.vertex_count();
        Self { graph, left, mate: vec![None; n], dist: vec![None; n] }
    }

    fn left_vertices(&self) -> impl Iterator<Item=Vertex> + '_ {
        self.graph.vertices().filter(|&v| self.left[v])
    }

    /// Build the layers from the free left vertices. Returns whether some free right vertex is
    /// reachable, i.e. whether this phase can augment at all.
    fn layer(&mut self) -> bool {
        let mut queue = VecDeque::new();
        for v in self.graph.vertices() {
            self.dist[v] = None;
        }

        let free: Vec<_> = self.left_vertices().filter(|&v| self.mate[v].is_none()).collect();
        for v in free {
            self.dist[v] = Some(0);
            queue.push_back(v);
        }

        let mut found = false;
        while let Some(u) = queue.pop_front() {
            let d = self.dist[u].unwrap_or(0);
            for w in self.graph.neighbors(u) {
                match self.mate[w] {
                    None => found = true,
                    Some(x) if self.dist[x].is_none() => {
                        self.dist[x] = Some(d + 1);
                        queue.push_back(x);
                    }
                    Some(_) => {}
                }
            }
        }

        found
    }

    fn augment_all(&mut self) {
        let free: Vec<_> = self.left_vertices().filter(|&v| self.mate[v].is_none()).collect();
        for v in free {
            self.augment(v);
        }
    }

    /// Depth-first search along the layers from the left vertex `u`
    fn augment(&mut self, u: Vertex) -> bool {
        let Some(d) = self.dist[u] else {
            return false;
        };

        for w in self.graph.neighbors(u) {
            let advance = match self.mate[w] {
                None => true,
                Some(x) => self.dist[x] == Some(d + 1) && self.augment(x),
            };

            if advance {
                self.mate[u] = Some(w);
                self.mate[w] = Some(u);
                return true;
            }
        }

        // Dead end, keep other searches of this phase away from `u`
        self.dist[u] = None;
        false
    }

    fn matched_edges(&self) -> Vec<Edge> {
        self.left_vertices()
            .filter_map(|v| self.mate[v].map(|w| Edge::new(v, w)))
            .collect()
    }
}
