/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use petgraph::algo::maximum_matching;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use blossom_matching::generators;
use blossom_matching::verify::{find_augmenting_path_exhaustive, is_maximum};
use blossom_matching::{EdmondsBlossom, Graph, HopcroftKarp, Matching, MatchingAlgorithm};

fn random_general(rng: &mut StdRng, max_vertices: usize) -> Graph {
    let n = rng.gen_range(1..=max_vertices);
    let m = rng.gen_range(0..=n * (n - 1) / 2);
    generators::general(n, m, rng).unwrap()
}

#[test]
fn agrees_with_petgraph() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..300 {
        let graph = random_general(&mut rng, 20);
        let outcome = EdmondsBlossom::solve(&graph).unwrap();
        assert_eq!(outcome.size(), maximum_matching(graph.as_petgraph()).len());
    }
}

#[test]
fn agrees_with_hopcroft_karp_on_bipartite_graphs() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..200 {
        let n = rng.gen_range(2..24);
        let p = rng.gen_range(0.05..0.6);
        let graph = generators::bipartite(n, p, &mut rng).unwrap();

        let blossom = EdmondsBlossom::solve(&graph).unwrap();
        let hopcroft_karp = HopcroftKarp::maximum_matching(&graph).unwrap();
        assert_eq!(blossom.size(), hopcroft_karp.len());
    }
}

#[test]
fn no_augmenting_path_remains() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..150 {
        let graph = random_general(&mut rng, 11);
        let outcome = EdmondsBlossom::solve(&graph).unwrap();
        assert!(
            find_augmenting_path_exhaustive(&graph, &outcome.matching).is_none(),
            "{}", graph.to_dot(Some(&outcome.matching)),
        );
    }
}

#[test]
fn every_augmentation_adds_one_edge() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..100 {
        let graph = random_general(&mut rng, 18);
        let outcome = EdmondsBlossom::solve(&graph).unwrap();

        assert_eq!(outcome.stats.augmentations, outcome.size());
        assert_eq!(outcome.stats.searches, outcome.size() + 1);
    }
}

#[test]
fn matchings_are_valid_subsets_of_the_graph() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        let graph = random_general(&mut rng, 18);
        let matching = EdmondsBlossom::solve(&graph).unwrap().matching;

        matching.validate().unwrap();
        assert!(matching.edges().all(|e| graph.has_edge(e)));
        assert_eq!(matching.vertex_count(), graph.vertex_count());
    }
}

#[test]
fn restarting_from_a_maximum_matching_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..50 {
        let graph = random_general(&mut rng, 16);
        let first = EdmondsBlossom::solve(&graph).unwrap();
        let second = EdmondsBlossom::solve_from(&graph, first.matching.clone()).unwrap();

        assert_eq!(second.stats.augmentations, 0);
        assert_eq!(second.stats.searches, 1);
        assert_eq!(second.matching.pairs(), first.matching.pairs());
    }
}

#[test]
fn starting_matching_is_extended() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let n = 2 * rng.gen_range(1..10);
        let graph = generators::perfect_bipartite(n, 0.3, &mut rng).unwrap();

        // Greedy start, the driver only has to finish the job
        let mut greedy = Vec::new();
        let mut used = vec![false; n];
        for edge in graph.edges() {
            let (a, b) = edge.endpoints();
            if !used[a] && !used[b] {
                used[a] = true;
                used[b] = true;
                greedy.push(edge);
            }
        }

        let start = Matching::from_edges(&graph, greedy).unwrap();
        let outcome = EdmondsBlossom::solve_from(&graph, start.clone()).unwrap();
        assert_eq!(outcome.stats.augmentations, outcome.size() - start.len());
        assert!(outcome.is_perfect());
        assert!(is_maximum(&graph, &outcome.matching));
    }
}
