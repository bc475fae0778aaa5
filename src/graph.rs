/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{HashSet, VecDeque};
use std::io::Read;
use petgraph::algo::{connected_components, has_path_connecting, is_cyclic_undirected};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{EdgeReference, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use crate::error::GraphError;
use crate::matching::Matching;
use crate::types::{Edge, Vertex};

/// A simple undirected graph on the vertices `0..n`. The graph is immutable once built, blossom
/// contraction produces a new graph instead of modifying an existing one.
#[derive(Clone, Debug)]
pub struct Graph {
    // Node weights carry the vertex index, which also makes the DOT output readable
    inner: UnGraph<Vertex, ()>,
}

impl Graph {
    /// Build a graph with `vertex_count` vertices from the given edge list. Duplicate edges (in
    /// either direction) are merged, self loops and unknown vertices are rejected.
    pub fn from_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item=(Vertex, Vertex)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::with_vertices(vertex_count);
        let mut seen = HashSet::new();

        for (u, v) in edges {
            for vertex in [u, v] {
                if vertex >= vertex_count {
                    return Err(GraphError::VertexOutOfRange { vertex, count: vertex_count });
                }
            }

            if u == v {
                return Err(GraphError::SelfLoop(u));
            }

            if seen.insert(Edge::new(u, v)) {
                graph.add_edge(u, v);
            }
        }

        Ok(graph)
    }

    /// Build a graph from a square, symmetric adjacency matrix with a zero diagonal. Any nonzero
    /// entry denotes an edge, its value is otherwise ignored.
    pub fn from_adjacency_matrix<R: AsRef<[i64]>>(rows: &[R]) -> Result<Self, GraphError> {
        let n = rows.len();
        if n == 0 {
            return Err(GraphError::Empty);
        }

        for (row, entries) in rows.iter().enumerate() {
            let len = entries.as_ref().len();
            if len != n {
                return Err(GraphError::NotSquare { row, len, expected: n });
            }
        }

        let mut graph = Self::with_vertices(n);
        for i in 0..n {
            let row = rows[i].as_ref();
            if row[i] != 0 {
                return Err(GraphError::SelfLoop(i));
            }

            for j in (i + 1)..n {
                if (row[j] != 0) != (rows[j].as_ref()[i] != 0) {
                    return Err(GraphError::Asymmetric { row: i, col: j });
                }

                if row[j] != 0 {
                    graph.add_edge(i, j);
                }
            }
        }

        Ok(graph)
    }

    /// Parse a whitespace-separated adjacency matrix, one row per line. Blank lines are skipped.
    pub fn parse_matrix(text: &str) -> Result<Self, GraphError> {
        let rows = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                line.split_whitespace()
                    .map(|token| token.parse::<i64>().map_err(|_| GraphError::Parse {
                        line: i + 1,
                        token: token.into(),
                    }))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_adjacency_matrix(&rows)
    }

    /// Read and parse an adjacency matrix from the given reader, e.g. standard input
    pub fn read_matrix(mut reader: impl Read) -> Result<Self, GraphError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse_matrix(&text)
    }

    fn with_vertices(n: usize) -> Self {
        let mut inner = UnGraph::with_capacity(n, 0);
        (0..n).for_each(|v| {
            inner.add_node(v);
        });

        Self { inner }
    }

    fn add_edge(&mut self, u: Vertex, v: Vertex) {
        // Keep the lower index as the source so that the DOT output reads naturally
        let (a, b) = Edge::new(u, v).endpoints();
        self.inner.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All vertices, in index order
    pub fn vertices(&self) -> impl Iterator<Item=Vertex> {
        0..self.vertex_count()
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> impl Iterator<Item=Edge> + '_ {
        self.inner
            .edge_references()
            .map(|e| Edge::new(e.source().index(), e.target().index()))
    }

    /// Neighbors of `v` in the order their edges were added. Unknown vertices have none.
    pub fn neighbors(&self, v: Vertex) -> Vec<Vertex> {
        if v >= self.vertex_count() {
            return Vec::new();
        }

        // The edges are iterated in reverse order in `petgraph` so some fiddling is needed here
        let mut vd = VecDeque::new();
        self.inner.neighbors(NodeIndex::new(v)).for_each(|w| vd.push_front(w.index()));
        vd.into()
    }

    /// Edges incident to `v`
    pub fn adjacent(&self, v: Vertex) -> Vec<Edge> {
        self.neighbors(v).into_iter().map(|w| Edge::new(v, w)).collect()
    }

    pub fn degree(&self, v: Vertex) -> usize {
        if v >= self.vertex_count() {
            return 0;
        }

        self.inner.neighbors(NodeIndex::new(v)).count()
    }

    pub fn max_degree(&self) -> usize {
        self.vertices().map(|v| self.degree(v)).max().unwrap_or(0)
    }

    pub fn degree_sum(&self) -> usize {
        2 * self.edge_count()
    }

    /// Direction-insensitive edge lookup
    pub fn has_edge(&self, edge: Edge) -> bool {
        let (a, b) = edge.endpoints();
        b < self.vertex_count()
            && self.inner.find_edge(NodeIndex::new(a), NodeIndex::new(b)).is_some()
    }

    /// Contract the given blossom into `stem`. Edges with exactly one endpoint in the blossom are
    /// re-pointed to the stem, edges inside the blossom are dropped and parallel edges created by
    /// re-pointing are merged. The vertex count is unchanged, the non-stem blossom vertices are
    /// simply left isolated.
    pub fn contract(&self, blossom: &HashSet<Vertex>, stem: Vertex) -> Graph {
        let mut contracted = Self::with_vertices(self.vertex_count());
        let mut seen = HashSet::new();

        self.edges()
            .filter_map(|e| e.map(|v| if blossom.contains(&v) { stem } else { v }))
            .for_each(|e| {
                if seen.insert(e) {
                    let (a, b) = e.endpoints();
                    contracted.add_edge(a, b);
                }
            });

        contracted
    }

    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    pub fn component_count(&self) -> usize {
        connected_components(&self.inner)
    }

    /// Is there a path between `u` and `v`? Unknown vertices are never connected.
    pub fn has_path(&self, u: Vertex, v: Vertex) -> bool {
        let n = self.vertex_count();
        u < n && v < n
            && has_path_connecting(&self.inner, NodeIndex::new(u), NodeIndex::new(v), None)
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_undirected(&self.inner)
    }

    pub fn is_tree(&self) -> bool {
        self.is_connected() && !self.has_cycle()
    }

    pub fn is_forest(&self) -> bool {
        !self.has_cycle()
    }

    /// Two-color the graph by breadth-first search over every component. Returns `None` if the
    /// graph contains an odd cycle, otherwise `side[v]` tells which partition `v` belongs to.
    pub fn bipartition(&self) -> Option<Vec<bool>> {
        let n = self.vertex_count();
        let mut side: Vec<Option<bool>> = vec![None; n];
        let mut queue = VecDeque::new();

        for start in 0..n {
            if side[start].is_some() {
                continue;
            }

            side[start] = Some(true);
            queue.push_back(start);

            while let Some(v) = queue.pop_front() {
                let color = side[v]?;
                for w in self.neighbors(v) {
                    match side[w] {
                        Some(c) if c == color => return None,
                        Some(_) => {}
                        None => {
                            side[w] = Some(!color);
                            queue.push_back(w);
                        }
                    }
                }
            }
        }

        side.into_iter().collect()
    }

    /// Borrow the underlying `petgraph` graph, e.g. to run other `petgraph` algorithms on it
    pub fn as_petgraph(&self) -> &UnGraph<Vertex, ()> {
        &self.inner
    }

    /// Render the graph in the [Graphviz DOT format](https://graphviz.org/doc/info/lang.html),
    /// drawing the edges of `matching` (if given) in bold red
    pub fn to_dot(&self, matching: Option<&Matching>) -> String {
        let matched = |er: EdgeReference<()>| matching
            .map(|m| m.contains(Edge::new(er.source().index(), er.target().index())))
            .unwrap_or(false);

        // Helper for formatting an edge depending on whether it is matched
        let edge_format = |_, er| if matched(er) {
            "color = \"red\" penwidth = 2 ".to_string()
        } else {
            String::new()
        };

        let dot = Dot::with_attr_getters(
            &self.inner,
            &[Config::EdgeNoLabel],
            &edge_format,
            &|_, _| String::new(),
        );

        format!("{:?}", dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_tail() -> Graph {
        Graph::from_edges(5, [(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap()
    }

    #[test]
    fn parses_adjacency_matrix() {
        let g = Graph::parse_matrix("0 1 0\n1 0 5\n\n0 5 0\n").unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(Edge::new(2, 1)));
        assert!(!g.has_edge(Edge::new(0, 2)));
    }

    #[test]
    fn rejects_malformed_matrices() {
        assert!(matches!(Graph::parse_matrix(""), Err(GraphError::Empty)));
        assert!(matches!(
            Graph::parse_matrix("0 1\n1 0 0"),
            Err(GraphError::NotSquare { row: 1, len: 3, expected: 2 })
        ));
        assert!(matches!(
            Graph::parse_matrix("0 1\n0 0"),
            Err(GraphError::Asymmetric { row: 0, col: 1 })
        ));
        assert!(matches!(Graph::parse_matrix("1 0\n0 0"), Err(GraphError::SelfLoop(0))));
        assert!(matches!(Graph::parse_matrix("0 x\n1 0"), Err(GraphError::Parse { line: 1, .. })));
    }

    #[test]
    fn rejects_bad_edge_lists() {
        assert!(matches!(Graph::from_edges(2, [(0, 2)]), Err(GraphError::VertexOutOfRange { vertex: 2, count: 2 })));
        assert!(matches!(Graph::from_edges(2, [(1, 1)]), Err(GraphError::SelfLoop(1))));

        let g = Graph::from_edges(2, [(0, 1), (1, 0)]).unwrap();
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn neighbors_in_insertion_order() {
        let g = Graph::from_edges(4, [(0, 3), (0, 1), (2, 0)]).unwrap();
        assert_eq!(g.neighbors(0), vec![3, 1, 2]);
        assert_eq!(g.adjacent(1), vec![Edge::new(0, 1)]);
        assert_eq!(g.degree(0), 3);
        assert!(g.neighbors(9).is_empty());
    }

    #[test]
    fn contraction_repoints_and_merges_edges() {
        // Square 1-2-3-4 with a triangle 1-2-3 inside and outside vertices 0 and 5
        let g = Graph::from_edges(6, [(0, 1), (0, 2), (1, 2), (2, 3), (3, 1), (3, 5), (4, 5)]).unwrap();
        let blossom: HashSet<_> = [1, 2, 3].into();
        let c = g.contract(&blossom, 1);

        assert_eq!(c.vertex_count(), 6);
        assert!(c.has_edge(Edge::new(0, 1)));
        assert!(c.has_edge(Edge::new(1, 5)));
        assert!(c.has_edge(Edge::new(4, 5)));
        // Both 0-1 and 0-2 collapse into a single edge
        assert_eq!(c.edge_count(), 3);
        assert_eq!(c.degree(2), 0);
        assert_eq!(c.degree(3), 0);
    }

    #[test]
    fn utility_queries() {
        let g = triangle_with_tail();
        assert!(!g.is_connected());
        assert_eq!(g.component_count(), 2);
        assert!(g.has_path(0, 3));
        assert!(!g.has_path(0, 4));
        assert!(g.has_cycle());
        assert!(!g.is_forest());
        assert_eq!(g.max_degree(), 3);
        assert_eq!(g.degree_sum(), 8);

        let path = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        assert!(path.is_tree());
    }

    #[test]
    fn bipartition_detects_odd_cycles() {
        assert!(triangle_with_tail().bipartition().is_none());

        let square = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let sides = square.bipartition().unwrap();
        assert_ne!(sides[0], sides[1]);
        assert_eq!(sides[0], sides[2]);
        assert_ne!(sides[2], sides[3]);
    }

    #[test]
    fn dot_highlights_matched_edges() {
        let g = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        let m = Matching::from_edges(&g, [Edge::new(1, 2)]).unwrap();
        let dot = g.to_dot(Some(&m));

        assert!(dot.starts_with("graph {"));
        assert_eq!(dot.matches("color = \"red\"").count(), 1);
    }
}
