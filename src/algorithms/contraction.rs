/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{HashMap, HashSet};
use crate::algorithms::forest::Forest;
use crate::error::MatchingError;
use crate::graph::Graph;
use crate::matching::Matching;
use crate::types::Vertex;

/// An odd alternating cycle found during a search. The stem is the vertex closest to the root of
/// the tree, it is the only cycle vertex that may be matched to something outside the cycle.
#[derive(Clone, Debug)]
pub struct Blossom {
    stem: Vertex,
    cycle: Vec<Vertex>,
    members: HashSet<Vertex>,
    neighbors: HashMap<Vertex, [Vertex; 2]>,
}

impl Blossom {
    /// Build a blossom from its cycle, listed in walking order starting at the stem. The cycle
    /// must be odd and hold at least three vertices.
    pub fn new(cycle: Vec<Vertex>) -> Self {
        let len = cycle.len();
        debug_assert!(len >= 3 && len % 2 == 1, "blossom cycle must be odd, got {cycle:?}");

        let neighbors = cycle
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, [cycle[(i + len - 1) % len], cycle[(i + 1) % len]]))
            .collect();

        Self {
            stem: cycle[0],
            members: cycle.iter().copied().collect(),
            cycle,
            neighbors,
        }
    }

    /// Trace the cycle closed by the edge between the even vertices `v` and `w` of the same tree.
    /// The stem is their nearest common ancestor.
    pub fn from_forest(forest: &Forest, v: Vertex, w: Vertex) -> Self {
        let v_chain = forest.chain(v);
        let on_v_chain: HashSet<_> = v_chain.iter().copied().collect();

        // Both chains end in the shared root, so the walk up from `w` always hits `v`'s chain
        let w_chain = forest.chain(w);
        let stem = w_chain
            .iter()
            .copied()
            .find(|u| on_v_chain.contains(u))
            .unwrap_or_else(|| forest.root(v));

        // stem, (v's side from the stem down to v), (w's side from w up to the stem)
        let v_side: Vec<_> = v_chain.into_iter().take_while(|&u| u != stem).collect();
        let mut cycle = vec![stem];
        cycle.extend(v_side.into_iter().rev());
        cycle.extend(w_chain.into_iter().take_while(|&u| u != stem));

        Self::new(cycle)
    }

    pub fn stem(&self) -> Vertex {
        self.stem
    }

    /// The cycle in walking order, starting at the stem
    pub fn cycle(&self) -> &[Vertex] {
        &self.cycle
    }

    pub fn members(&self) -> &HashSet<Vertex> {
        &self.members
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.members.contains(&v)
    }

    pub fn len(&self) -> usize {
        self.cycle.len()
    }

    /// The two cycle neighbors of `v`, `None` for vertices outside the blossom
    pub fn neighbors(&self, v: Vertex) -> Option<[Vertex; 2]> {
        self.neighbors.get(&v).copied()
    }

    /// Continue around the cycle: the neighbor of `v` that is not `prev`
    pub fn next_along(&self, v: Vertex, prev: Vertex) -> Option<Vertex> {
        let [a, b] = self.neighbors(v)?;
        Some(if a == prev { b } else { a })
    }

    /// Contract the blossom into its stem in both the graph and the matching. The contracted
    /// matching must still be a matching, otherwise the blossom was not alternating.
    pub fn contract(&self, graph: &Graph, matching: &Matching) -> Result<(Graph, Matching), MatchingError> {
        let contracted_graph = graph.contract(&self.members, self.stem);
        let contracted_matching = matching.contract(&self.members, self.stem);
        contracted_matching.validate()?;

        Ok((contracted_graph, contracted_matching))
    }
}

#[cfg(test)]
mod tests {
    use crate::algorithms::forest::{search, SearchOutcome};
    use crate::types::Edge;
    use super::*;

    /// Free root 0, stem path 0-1=2 and the 5-cycle 2-3=4-5=6-2
    fn stemmed_pentagon() -> (Graph, Matching) {
        let g = Graph::from_edges(7, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 2)]).unwrap();
        let m = Matching::from_edges(&g, [(1, 2), (3, 4), (5, 6)].map(Edge::from)).unwrap();
        (g, m)
    }

    #[test]
    fn neighbor_map_wraps_around() {
        let b = Blossom::new(vec![2, 3, 4, 5, 6]);
        assert_eq!(b.stem(), 2);
        assert_eq!(b.neighbors(2), Some([6, 3]));
        assert_eq!(b.neighbors(6), Some([5, 2]));
        assert_eq!(b.neighbors(7), None);
        assert_eq!(b.next_along(3, 2), Some(4));
        assert_eq!(b.next_along(3, 4), Some(2));
    }

    #[test]
    fn traces_blossom_from_forest() {
        let (g, m) = stemmed_pentagon();
        let SearchOutcome::Blossom { forest, v, w } = search(&g, &m) else {
            panic!("expected a blossom");
        };

        let b = Blossom::from_forest(&forest, v, w);
        assert_eq!(b.stem(), 2);
        assert_eq!(b.len(), 5);
        assert_eq!(b.members(), &HashSet::from([2, 3, 4, 5, 6]));

        // Every cycle vertex has two distinct neighbors that are themselves on the cycle
        for &u in b.cycle() {
            let [a, c] = b.neighbors(u).unwrap();
            assert_ne!(a, c);
            assert!(b.contains(a) && b.contains(c));
            assert!(g.has_edge(Edge::new(u, a)));
        }
    }

    #[test]
    fn contraction_keeps_stem_matched() {
        let (g, m) = stemmed_pentagon();
        let b = Blossom::new(vec![2, 3, 4, 5, 6]);
        let (cg, cm) = b.contract(&g, &m).unwrap();

        assert_eq!(cg.edge_count(), 2);
        assert!(cg.has_edge(Edge::new(1, 2)));
        assert_eq!(cm.pairs(), vec![(1, 2)]);
        assert!(cm.is_free(4));
    }
}
