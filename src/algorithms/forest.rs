/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{HashSet, VecDeque};
use log::trace;
use crate::graph::Graph;
use crate::matching::Matching;
use crate::types::{AugmentingPath, Edge, Vertex};

/// Parity of a vertex in the alternating forest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    Unlabeled,
    Even,
    Odd,
}

/// Alternating forest over one graph/matching pair. Every tree is rooted at a free vertex, even
/// vertices are an even number of alternating edges away from their root and odd vertices an odd
/// number. Built from scratch for every search.
#[derive(Clone, Debug)]
pub struct Forest {
    label: Vec<Label>,
    root: Vec<Vertex>,
    parent: Vec<Option<Vertex>>,
}

impl Forest {
    fn new(vertex_count: usize) -> Self {
        Self {
            label: vec![Label::Unlabeled; vertex_count],
            root: (0..vertex_count).collect(),
            parent: vec![None; vertex_count],
        }
    }

    /// Make `v` the even root of its own tree
    fn plant(&mut self, v: Vertex) {
        self.label[v] = Label::Even;
        self.root[v] = v;
        self.parent[v] = None;
    }

    /// Attach the matched pair `w`-`x` below the even vertex `v`
    fn grow(&mut self, v: Vertex, w: Vertex, x: Vertex) {
        let root = self.root[v];

        self.label[w] = Label::Odd;
        self.root[w] = root;
        self.parent[w] = Some(v);

        self.label[x] = Label::Even;
        self.root[x] = root;
        self.parent[x] = Some(w);
    }

    pub fn label(&self, v: Vertex) -> Label {
        self.label[v]
    }

    pub fn root(&self, v: Vertex) -> Vertex {
        self.root[v]
    }

    pub fn parent(&self, v: Vertex) -> Option<Vertex> {
        self.parent[v]
    }

    /// The vertices from `v` up to and including its root
    pub fn chain(&self, v: Vertex) -> Vec<Vertex> {
        let mut chain = vec![v];
        let mut current = v;
        while let Some(p) = self.parent[current] {
            chain.push(p);
            current = p;
        }

        chain
    }

    /// Join the trees of the even vertices `v` and `w` over the edge `v`-`w`. The result runs
    /// from the root of `v` to the root of `w`.
    fn path_between(&self, v: Vertex, w: Vertex) -> AugmentingPath {
        let mut vertices = self.chain(v);
        vertices.reverse();
        vertices.extend(self.chain(w));
        AugmentingPath::new(vertices)
    }
}

/// Result of a single augmenting path search
#[derive(Debug)]
pub enum SearchOutcome {
    /// Two trees met over an edge between even vertices
    AugmentingPath(AugmentingPath),
    /// An edge between two even vertices of the same tree closed an odd cycle. The forest is
    /// handed over so the blossom can be traced back to its stem.
    Blossom { forest: Forest, v: Vertex, w: Vertex },
    /// No augmenting path exists for this graph and matching
    Exhausted,
}

/// Grow an alternating forest from every free vertex until two trees meet (augmenting path), a
/// tree closes an odd cycle (blossom) or no even vertex has unexamined edges left.
pub fn search(graph: &Graph, matching: &Matching) -> SearchOutcome {
    let mut forest = Forest::new(graph.vertex_count());
    let mut fresh = VecDeque::new();
    let mut examined = HashSet::new();

    for v in matching.free_vertices() {
        forest.plant(v);
        fresh.push_back(v);
    }

    while let Some(v) = fresh.pop_front() {
        for w in graph.neighbors(v) {
            if !examined.insert(Edge::new(v, w)) {
                continue;
            }

            match forest.label(w) {
                Label::Unlabeled => {
                    // All free vertices are roots, so an unlabeled vertex is always matched
                    if let Some(x) = matching.mate_of(w) {
                        trace!("growing tree of {} with {v} -> {w} => {x}", forest.root(v));
                        forest.grow(v, w, x);
                        fresh.push_back(x);
                    }
                }
                Label::Odd => {}
                Label::Even if forest.root(v) != forest.root(w) => {
                    return SearchOutcome::AugmentingPath(forest.path_between(v, w));
                }
                Label::Even => {
                    trace!("odd cycle closed by {v} -- {w} in tree of {}", forest.root(v));
                    return SearchOutcome::Blossom { forest, v, w };
                }
            }
        }
    }

    SearchOutcome::Exhausted
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

    #[test]
    fn single_edge_is_augmenting() {
        let g = graph(2, &[(0, 1)]);
        match search(&g, &Matching::empty(2)) {
            SearchOutcome::AugmentingPath(p) => assert_eq!(p.vertices(), &[0, 1]),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn grows_through_matched_pairs() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let m = matching(&g, &[(1, 2)]);

        match search(&g, &m) {
            SearchOutcome::AugmentingPath(p) => {
                assert_eq!(p.len(), 3);
                m.check_augmenting(&g, &p).unwrap();
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn detects_blossom_in_single_tree() {
        // Free vertex 4 with a stem 4-0=1 leading into the triangle 1-2=3-1
        let g = graph(5, &[(4, 0), (0, 1), (1, 2), (2, 3), (3, 1)]);
        let m = matching(&g, &[(0, 1), (2, 3)]);

        match search(&g, &m) {
            SearchOutcome::Blossom { forest, v, w } => {
                assert_eq!((v, w), (1, 3));
                assert_eq!(forest.label(v), Label::Even);
                assert_eq!(forest.label(w), Label::Even);
                assert_eq!(forest.label(2), Label::Odd);
                assert_eq!(forest.root(w), 4);
                assert_eq!(forest.chain(1), vec![1, 0, 4]);
                assert_eq!(forest.parent(4), None);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn exhausted_when_maximum() {
        let g = graph(3, &[(0, 1), (1, 2)]);
        let m = matching(&g, &[(0, 1)]);
        assert!(matches!(search(&g, &m), SearchOutcome::Exhausted));
    }

    #[test]
    fn isolated_vertices_are_harmless_roots() {
        let g = graph(3, &[]);
        assert!(matches!(search(&g, &Matching::empty(3)), SearchOutcome::Exhausted));
    }
}
