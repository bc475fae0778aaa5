/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Maximum-cardinality matching in general undirected graphs using Edmonds' blossom algorithm.
//!
//! ```
//! use blossom_matching::{EdmondsBlossom, Graph};
//!
//! // A 5-cycle with a pendant vertex has a perfect matching
//! let graph = Graph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (4, 5)]).unwrap();
//! let outcome = EdmondsBlossom::solve(&graph).unwrap();
//! assert_eq!(outcome.size(), 3);
//! assert!(outcome.is_perfect());
//! ```

pub mod algorithms;
pub mod crosscheck;
pub mod error;
pub mod generators;
pub mod graph;
pub mod matching;
pub mod roster;
pub mod types;
pub mod verify;

pub use algorithms::{EdmondsBlossom, HopcroftKarp, MatchingOutcome, SearchStats};
pub use error::{GraphError, MatchingError, RosterError};
pub use graph::Graph;
pub use matching::Matching;
pub use types::{AugmentingPath, Edge, MatchingAlgorithm, Vertex};
