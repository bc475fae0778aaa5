/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use rand::Rng;
use rand::seq::SliceRandom;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::matching::Matching;
use crate::types::{Edge, Vertex};

fn check_probability(p: f64) -> Result<(), GraphError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(GraphError::InvalidProbability(p))
    }
}

/// A uniformly random simple graph with `n` vertices and exactly `m` edges
pub fn general<R: Rng + ?Sized>(n: usize, m: usize, rng: &mut R) -> Result<Graph, GraphError> {
    let max_edges = n * n.saturating_sub(1) / 2;
    if m > max_edges {
        return Err(GraphError::TooManyEdges { vertices: n, edges: m });
    }

    let pairs: Vec<_> = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))).collect();
    Graph::from_edges(n, pairs.choose_multiple(rng, m).copied())
}

/// A random bipartite graph on `n` vertices. The first partition takes a random share of
/// `1..n` vertices, every pair across the partitions is joined with probability `p`.
pub fn bipartite<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Result<Graph, GraphError> {
    check_probability(p)?;
    if n < 2 {
        return Graph::from_edges(n, []);
    }

    let split = rng.gen_range(1..n);
    let mut edges = Vec::new();
    for i in 0..split {
        for j in split..n {
            if rng.gen_bool(p) {
                edges.push((i, j));
            }
        }
    }

    Graph::from_edges(n, edges)
}

/// A random balanced bipartite graph on an even number of vertices with a planted perfect
/// matching: vertex `i` of the first half is always joined to vertex `i + n/2`, all other pairs
/// across the halves with probability `p`
pub fn perfect_bipartite<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Result<Graph, GraphError> {
    check_probability(p)?;
    if n % 2 == 1 {
        return Err(GraphError::OddVertexCount(n));
    }

    let half = n / 2;
    let mut edges = Vec::new();
    for i in 0..half {
        for j in half..n {
            if j - half == i || rng.gen_bool(p) {
                edges.push((i, j));
            }
        }
    }

    Graph::from_edges(n, edges)
}

/// A blossom trap: a free root `0` leads over the matched stem `1`=`2` into an odd cycle of
/// `2k + 1` vertices starting at `2`, the cycle neighbor `3` of the stem leads out over a matched
/// pair to another free vertex. Returns the graph with the matching that forces the search to
/// contract the cycle. `k` is raised to at least one.
pub fn planted_blossom(k: usize) -> Result<(Graph, Matching), GraphError> {
    let k = k.max(1);
    let cycle_end = 2 * k + 2; // cycle is 2..=cycle_end
    let (exit, exit_mate, target) = (cycle_end + 1, cycle_end + 2, cycle_end + 3);
    let n = target + 1;

    let mut edges: Vec<(Vertex, Vertex)> = vec![(0, 1), (1, 2)];
    edges.extend((2..cycle_end).map(|v| (v, v + 1)));
    edges.push((cycle_end, 2));
    edges.extend([(3, exit), (exit, exit_mate), (exit_mate, target)]);

    let mut matched: Vec<Edge> = vec![Edge::new(1, 2), Edge::new(exit, exit_mate)];
    matched.extend((3..cycle_end).step_by(2).map(|v| Edge::new(v, v + 1)));

    let graph = Graph::from_edges(n, edges)?;
    let matching = Matching::from_edges(&graph, matched)?;
    Ok((graph, matching))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use super::*;

    #[test]
    fn general_has_exact_edge_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = general(10, 20, &mut rng).unwrap();
        assert_eq!(g.vertex_count(), 10);
        assert_eq!(g.edge_count(), 20);

        assert_eq!(general(5, 10, &mut rng).unwrap().edge_count(), 10);
        assert!(matches!(general(5, 11, &mut rng), Err(GraphError::TooManyEdges { .. })));
    }

    #[test]
    fn bipartite_graphs_are_bipartite() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            assert!(bipartite(12, 0.5, &mut rng).unwrap().bipartition().is_some());
        }

        assert!(matches!(bipartite(4, 1.5, &mut rng), Err(GraphError::InvalidProbability(_))));
    }

    #[test]
    fn perfect_bipartite_plants_matching() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = perfect_bipartite(8, 0.0, &mut rng).unwrap();
        assert_eq!(g.edge_count(), 4);
        assert!((0..4).all(|i| g.has_edge(Edge::new(i, i + 4))));

        assert!(matches!(perfect_bipartite(7, 0.5, &mut rng), Err(GraphError::OddVertexCount(7))));
    }

    #[test]
    fn planted_blossom_shape() {
        let (g, m) = planted_blossom(2).unwrap();
        assert_eq!(g.vertex_count(), 10);
        assert_eq!(g.edge_count(), 10);
        assert_eq!(m.pairs(), vec![(1, 2), (3, 4), (5, 6), (7, 8)]);
        assert_eq!(m.free_vertices().collect::<Vec<_>>(), vec![0, 9]);
    }
}
