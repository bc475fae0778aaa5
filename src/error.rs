/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use crate::types::{Edge, Vertex};

/// Problems with the input graph, reported before any matching work starts.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("adjacency matrix is empty")]
    Empty,

    #[error("adjacency matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("adjacency matrix is not symmetric at ({row}, {col})")]
    Asymmetric { row: usize, col: usize },

    #[error("self loop on vertex {0} (nonzero diagonal entry)")]
    SelfLoop(Vertex),

    #[error("vertex {vertex} out of range for a graph with {count} vertices")]
    VertexOutOfRange { vertex: Vertex, count: usize },

    #[error("invalid matrix entry {token:?} on line {line}")]
    Parse { line: usize, token: String },

    #[error("probability {0} is not within [0, 1]")]
    InvalidProbability(f64),

    #[error("cannot place {edges} edges in a simple graph with {vertices} vertices")]
    TooManyEdges { vertices: usize, edges: usize },

    #[error("{0} vertices cannot carry a perfect matching")]
    OddVertexCount(usize),

    #[error("graph is not bipartite")]
    NotBipartite,

    #[error("failed to read graph: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Matching(#[from] MatchingError),
}

/// Internal consistency failures of the matching machinery. None of these can be triggered by a
/// valid graph, they indicate a defect and abort the computation.
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("vertex {vertex} is covered by both {first} and {second}")]
    SharedVertex { vertex: Vertex, first: Edge, second: Edge },

    #[error("edge {0} is not part of the graph")]
    MissingEdge(Edge),

    #[error("matched edge {edge} leaves the {count} vertices of the matching")]
    EdgeOutOfRange { edge: Edge, count: usize },

    #[error("path {path} is not augmenting: {reason}")]
    NotAugmenting { path: String, reason: String },

    #[error("no alternating walk through the blossom at stem {stem} connects {from} to {to}")]
    LiftFailed { stem: Vertex, from: Vertex, to: String },

    #[error("augmentation changed the matching size from {before} to {after}")]
    NoGrowth { before: usize, after: usize },
}

/// Errors while turning class rosters into a pairing problem.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("invalid roster file name {0:?}, expected G[K12345]-<Section>.csv")]
    FileName(String),

    #[error("{file}:{line}: expected \"Last,First\", found {row:?}")]
    Row { file: String, line: usize, row: String },

    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Matching(#[from] MatchingError),
}
