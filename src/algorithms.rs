/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod blossom;
pub mod contraction;
pub mod forest;
pub mod hopcroft_karp;
pub mod lifting;

// Re-exports to allow direct access to the algorithms
pub use blossom::{EdmondsBlossom, MatchingOutcome, SearchStats};
pub use hopcroft_karp::HopcroftKarp;
