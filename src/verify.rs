/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Brute-force certificate for Berge's theorem: a matching is maximum iff no augmenting path
//! exists. The search enumerates every simple alternating path from every free vertex, so it
//! takes exponential time and is only meant for small graphs.

use crate::graph::Graph;
use crate::matching::Matching;
use crate::types::{AugmentingPath, Vertex};

/// Find any augmenting path by exhaustive search, `None` proves that `matching` is maximum
pub fn find_augmenting_path_exhaustive(graph: &Graph, matching: &Matching) -> Option<AugmentingPath> {
    let mut on_path = vec![false; graph.vertex_count()];

    matching.free_vertices().find_map(|root| {
        let mut path = vec![root];
        on_path[root] = true;
        let found = extend(graph, matching, &mut path, &mut on_path);
        on_path[root] = false;
        found.then(|| AugmentingPath::new(path))
    })
}

/// Extend the alternating path whose last vertex was reached over a matched edge (or is the
/// free root) with an unmatched edge, then with the matched edge of the vertex reached
fn extend(graph: &Graph, matching: &Matching, path: &mut Vec<Vertex>, on_path: &mut [bool]) -> bool {
    let Some(&v) = path.last() else {
        return false;
    };

    for w in graph.neighbors(v) {
        if on_path[w] || matching.mate_of(v) == Some(w) {
            continue;
        }

        let Some(x) = matching.mate_of(w) else {
            // A free vertex other than the root ends an augmenting path
            path.push(w);
            return true;
        };

        if on_path[x] {
            continue;
        }

        path.extend([w, x]);
        on_path[w] = true;
        on_path[x] = true;

        if extend(graph, matching, path, on_path) {
            return true;
        }

        path.truncate(path.len() - 2);
        on_path[w] = false;
        on_path[x] = false;
    }

    false
}

/// Does `matching` admit no augmenting path at all?
pub fn is_maximum(graph: &Graph, matching: &Matching) -> bool {
    find_augmenting_path_exhaustive(graph, matching).is_none()
}

#[cfg(test)]
mod tests {
    use crate::types::Edge;
    use super::*;

    #[test]
    fn finds_path_around_odd_cycle() {
        // Pentagon with a stem and an exit, the only augmenting path goes the long way round
        let g = Graph::from_edges(10, [
            (0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 2), (3, 7), (7, 8), (8, 9),
        ]).unwrap();
        let m = Matching::from_edges(&g, [(1, 2), (3, 4), (5, 6), (7, 8)].map(Edge::from)).unwrap();

        let path = find_augmenting_path_exhaustive(&g, &m).unwrap();
        m.check_augmenting(&g, &path).unwrap();
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn certifies_maximum_matchings() {
        let triangle = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
        let m = Matching::from_edges(&triangle, [Edge::new(0, 1)]).unwrap();
        assert!(is_maximum(&triangle, &m));
        assert!(!is_maximum(&triangle, &Matching::empty(3)));
    }
}
