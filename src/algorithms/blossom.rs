/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::{debug, info};
use crate::algorithms::contraction::Blossom;
use crate::algorithms::forest::{search, SearchOutcome};
use crate::algorithms::lifting::lift;
use crate::error::MatchingError;
use crate::graph::Graph;
use crate::matching::Matching;
use crate::types::{AugmentingPath, MatchingAlgorithm};

/// Edmonds' blossom algorithm for maximum-cardinality matching in general graphs. Repeatedly
/// searches for an augmenting path, contracting odd cycles on the way and lifting the path back
/// through them, and flips the matching along it until no path is left.
pub struct EdmondsBlossom;

/// Counters collected over one run of the driver
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Top-level augmenting path searches, including the final unsuccessful one
    pub searches: usize,
    pub augmentations: usize,
    /// Blossoms contracted over all levels and searches
    pub contractions: usize,
    /// Deepest blossom nesting reached by a single search
    pub max_depth: usize,
}

/// A maximum matching together with how it was found
#[derive(Clone, Debug)]
pub struct MatchingOutcome {
    pub matching: Matching,
    pub stats: SearchStats,
}

impl MatchingOutcome {
    pub fn size(&self) -> usize {
        self.matching.len()
    }

    pub fn is_perfect(&self) -> bool {
        self.matching.is_perfect()
    }
}

impl EdmondsBlossom {
    /// Compute a maximum matching starting from the empty matching
    pub fn solve(graph: &Graph) -> Result<MatchingOutcome, MatchingError> {
        Self::solve_from(graph, Matching::empty(graph.vertex_count()))
    }

    /// Compute a maximum matching starting from `initial`, which must be a valid matching of
    /// `graph`
    pub fn solve_from(graph: &Graph, initial: Matching) -> Result<MatchingOutcome, MatchingError> {
        let mut matching = Matching::from_edges(graph, initial.edges())?;
        let mut stats = SearchStats::default();

        loop {
            stats.searches += 1;
            let Some(path) = find_augmenting_path(graph, &matching, &mut stats)? else {
                break;
            };

            matching.check_augmenting(graph, &path)?;
            let next = matching.symmetric_difference(&path);
            if next.len() != matching.len() + 1 {
                return Err(MatchingError::NoGrowth { before: matching.len(), after: next.len() });
            }
            next.validate()?;

            debug!("augmented along {path}, matching size is now {}", next.len());
            stats.augmentations += 1;
            matching = next;
        }

        matching.validate()?;
        info!(
            "maximum matching of size {} found in {} searches with {} contractions (max depth {})",
            matching.len(), stats.searches, stats.contractions, stats.max_depth,
        );

        Ok(MatchingOutcome { matching, stats })
    }
}

impl MatchingAlgorithm for EdmondsBlossom {
    type Error = MatchingError;

    fn name() -> String {
        "Edmonds' Blossom".into()
    }

    fn maximum_matching(graph: &Graph) -> Result<Matching, MatchingError> {
        Self::solve(graph).map(|outcome| outcome.matching)
    }
}

/// Find an augmenting path of `graph` with respect to `matching`, or `None` if the matching is
/// already maximum
pub fn find_augmenting_path(
    graph: &Graph,
    matching: &Matching,
    stats: &mut SearchStats,
) -> Result<Option<AugmentingPath>, MatchingError> {
    descend(graph, matching, 0, stats)
}

/// Search one contraction level. A blossom is contracted and the smaller problem searched
/// recursively, a path found down there is lifted back through the blossom on the way up.
fn descend(
    graph: &Graph,
    matching: &Matching,
    depth: usize,
    stats: &mut SearchStats,
) -> Result<Option<AugmentingPath>, MatchingError> {
    stats.max_depth = stats.max_depth.max(depth);

    match search(graph, matching) {
        SearchOutcome::AugmentingPath(path) => Ok(Some(path)),
        SearchOutcome::Exhausted => Ok(None),
        SearchOutcome::Blossom { forest, v, w } => {
            let blossom = Blossom::from_forest(&forest, v, w);
            stats.contractions += 1;
            debug!(
                "depth {depth}: contracting blossom {:?} into stem {}",
                blossom.cycle(), blossom.stem(),
            );

            let (contracted_graph, contracted_matching) = blossom.contract(graph, matching)?;
            match descend(&contracted_graph, &contracted_matching, depth + 1, stats)? {
                None => Ok(None),
                Some(path) => lift(&path, &blossom, graph, matching, &contracted_matching).map(Some),
            }
        }
    }
}
