/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use crossbeam_channel::{bounded, RecvTimeoutError};
use log::{debug, error, info, warn};
use petgraph::algo::maximum_matching;
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::algorithms::{EdmondsBlossom, HopcroftKarp};
use crate::error::GraphError;
use crate::generators;
use crate::graph::Graph;
use crate::types::{AugmentingPath, MatchingAlgorithm};
use crate::verify::find_augmenting_path_exhaustive;

/// Settings for a cross-checking run
#[derive(Clone, Debug)]
pub struct CheckConfig {
    /// Number of random graphs to check
    pub trials: u64,
    /// Vertices per random graph
    pub vertices: usize,
    /// Edge density of the random graphs
    pub edge_probability: f64,
    /// Worker threads, each checks one graph at a time
    pub workers: usize,
    /// Seed of the first trial, trial `i` uses `seed + i`
    pub seed: u64,
    /// How long to wait for the next result before giving up
    pub timeout: Duration,
    /// Graphs up to this size are also certified by exhaustive search
    pub exhaustive_limit: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            trials: 200,
            vertices: 16,
            edge_probability: 0.2,
            workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
            seed: 0,
            timeout: Duration::from_secs(30),
            exhaustive_limit: 12,
        }
    }
}

/// Family of the random graph used by a trial
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphKind {
    General,
    Bipartite,
    PerfectBipartite,
}

impl From<u64> for GraphKind {
    fn from(seed: u64) -> Self {
        match seed % 3 {
            0 => GraphKind::General,
            1 => GraphKind::Bipartite,
            _ => GraphKind::PerfectBipartite,
        }
    }
}

/// Outcome of checking a single graph
#[derive(Clone, Debug)]
pub enum Verdict {
    Agreed { size: usize },
    SizeMismatch { blossom: usize, oracle: usize, oracle_name: String },
    NotMaximum { path: AugmentingPath },
    Failed { error: String },
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Agreed { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Agreed { size } => write!(f, "agreed on size {size}"),
            Verdict::SizeMismatch { blossom, oracle, oracle_name } =>
                write!(f, "blossom found {blossom} edges, {oracle_name} found {oracle}"),
            Verdict::NotMaximum { path } => write!(f, "augmenting path {path} left over"),
            Verdict::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrialResult {
    pub seed: u64,
    pub kind: GraphKind,
    pub vertices: usize,
    pub edges: usize,
    pub verdict: Verdict,
}

#[derive(Clone, Debug, Default)]
pub struct CheckReport {
    pub results: Vec<TrialResult>,
    /// Trials without a collected result: never started, or finished only after the collection
    /// loop gave up waiting
    pub missing: u64,
}

impl CheckReport {
    pub fn failures(&self) -> impl Iterator<Item=&TrialResult> {
        self.results.iter().filter(|r| !r.verdict.is_ok())
    }

    pub fn is_success(&self) -> bool {
        self.missing == 0 && self.failures().next().is_none()
    }
}

/// Compare the blossom algorithm against independent oracles on many seeded random graphs. The
/// graphs are spread over a pool of worker threads, every graph is still solved single-threaded.
pub struct CrossCheck {
    config: CheckConfig,
}

impl CrossCheck {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> CheckReport {
        let config = &self.config;
        let workers = config.workers.max(1);
        info!(
            "Cross-checking {} on {} random graphs with {} vertices using {} workers...",
            EdmondsBlossom::name(), config.trials, config.vertices, workers,
        );

        let (job_sender, job_receiver) = bounded::<u64>(workers);
        let (result_sender, result_receiver) = bounded::<TrialResult>(workers);

        // A thread scope allows for spawning a set of threads and waiting for them to finish
        let results = thread::scope(|s| {
            for _ in 0..workers {
                let jobs = job_receiver.clone();
                let sender = result_sender.clone();

                s.spawn(move || {
                    for seed in jobs.iter() {
                        // Result channel was closed, the run was abandoned
                        if sender.send(run_trial(config, seed)).is_err() {
                            break;
                        }
                    }
                });
            }

            // Only the workers hold the channel ends from here on
            drop(job_receiver);
            drop(result_sender);

            s.spawn(move || {
                for seed in (0..config.trials).map(|i| config.seed.wrapping_add(i)) {
                    if job_sender.send(seed).is_err() {
                        break;
                    }
                }
            });

            let mut results = Vec::new();
            while (results.len() as u64) < config.trials {
                match result_receiver.recv_deadline(Instant::now() + config.timeout) {
                    Ok(result) => {
                        if result.verdict.is_ok() {
                            debug!("seed {}: {}", result.seed, result.verdict);
                        } else {
                            warn!("seed {} ({:?}): {}", result.seed, result.kind, result.verdict);
                        }
                        results.push(result);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        // Trials already running cannot be interrupted, the scope still joins them
                        error!(
                            "no result within {:?}, skipping the remaining trials once the running ones finish",
                            config.timeout,
                        );
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            // Close the channel to notify the workers of completion
            drop(result_receiver);
            results
        });

        let report = CheckReport {
            missing: config.trials - results.len() as u64,
            results,
        };

        if report.is_success() {
            info!("Cross-check successful! All {} graphs agreed.", report.results.len());
        } else {
            error!(
                "Cross-check FAILED! {} disagreement(s), {} graph(s) unchecked.",
                report.failures().count(), report.missing,
            );
        }

        report
    }
}

fn run_trial(config: &CheckConfig, seed: u64) -> TrialResult {
    let kind = GraphKind::from(seed);
    let (vertices, verdict, edges) = match random_graph(config, kind, seed) {
        Ok(graph) => (graph.vertex_count(), check_graph(&graph, config.exhaustive_limit), graph.edge_count()),
        Err(e) => (config.vertices, Verdict::Failed { error: e.to_string() }, 0),
    };

    TrialResult { seed, kind, vertices, edges, verdict }
}

fn random_graph(config: &CheckConfig, kind: GraphKind, seed: u64) -> Result<Graph, GraphError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (n, p) = (config.vertices, config.edge_probability);

    match kind {
        GraphKind::General => {
            let max_edges = n * n.saturating_sub(1) / 2;
            let m = (p.clamp(0.0, 1.0) * max_edges as f64).round() as usize;
            generators::general(n, m, &mut rng)
        }
        GraphKind::Bipartite => generators::bipartite(n, p, &mut rng),
        GraphKind::PerfectBipartite => generators::perfect_bipartite(n + n % 2, p, &mut rng),
    }
}

/// Solve `graph` with the blossom algorithm and compare against Hopcroft-Karp (bipartite graphs)
/// or `petgraph`'s matching (everything else). Graphs with at most `exhaustive_limit` vertices
/// are additionally certified by exhaustive augmenting path search.
pub fn check_graph(graph: &Graph, exhaustive_limit: usize) -> Verdict {
    let outcome = match EdmondsBlossom::solve(graph) {
        Ok(outcome) => outcome,
        Err(e) => return Verdict::Failed { error: e.to_string() },
    };

    let oracle = match graph.bipartition() {
        Some(_) => oracle_size::<HopcroftKarp>(graph),
        None => Ok(("petgraph".to_string(), maximum_matching(graph.as_petgraph()).len())),
    };

    let (oracle_name, oracle) = match oracle {
        Ok(result) => result,
        Err(error) => return Verdict::Failed { error },
    };

    if oracle != outcome.size() {
        return Verdict::SizeMismatch { blossom: outcome.size(), oracle, oracle_name };
    }

    if graph.vertex_count() <= exhaustive_limit {
        if let Some(path) = find_augmenting_path_exhaustive(graph, &outcome.matching) {
            return Verdict::NotMaximum { path };
        }
    }

    Verdict::Agreed { size: outcome.size() }
}

fn oracle_size<A: MatchingAlgorithm>(graph: &Graph) -> Result<(String, usize), String> {
    A::maximum_matching(graph)
        .map(|m| (A::name(), m.len()))
        .map_err(|e| e.to_string())
}
