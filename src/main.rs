/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info, LevelFilter};
use blossom_matching::crosscheck::{CheckConfig, CrossCheck};
use blossom_matching::roster::{load_rosters, pair_students};
use blossom_matching::{EdmondsBlossom, Graph, HopcroftKarp, Matching, MatchingAlgorithm};

/// Maximum-cardinality matching in general graphs
#[derive(Parser)]
#[command(name = "blossom", version, about)]
struct Cli {
    /// Verbosity level (-v, -vv), RUST_LOG takes over when not given
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a maximum matching of a graph given as an adjacency matrix
    ///
    /// The matrix has one row per line with whitespace separated entries, any nonzero entry
    /// denotes an edge.
    Solve {
        /// Matrix file, read from stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the graph with the matching highlighted in DOT format
        #[arg(long)]
        dot: bool,

        /// Use Hopcroft-Karp instead, the graph must be bipartite
        #[arg(long)]
        hopcroft_karp: bool,
    },
    /// Cross-check the blossom algorithm against independent oracles on random graphs
    Check {
        #[arg(short, long, default_value_t = 200)]
        trials: u64,

        #[arg(short = 'n', long, default_value_t = 16)]
        vertices: usize,

        #[arg(short = 'p', long, default_value_t = 0.2)]
        edge_probability: f64,

        /// Worker threads, defaults to the available parallelism
        #[arg(short, long)]
        workers: Option<usize>,

        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Seconds to wait for each result
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Certify graphs up to this many vertices by exhaustive search
        #[arg(long, default_value_t = 12)]
        exhaustive_limit: usize,
    },
    /// Pair students of the same grade across class sections
    ///
    /// Roster files are named G<grade>-<Section>.csv with grade K or 1-5 and contain one
    /// "Last,First" row per student.
    Pair {
        #[arg(required = true)]
        rosters: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG applies unless verbosity was requested explicitly
    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    match cli.verbose {
        0 => (),
        1 => { logger.filter_level(LevelFilter::Debug); }
        _ => { logger.filter_level(LevelFilter::Trace); }
    }
    logger.init();

    let result = match cli.command {
        Commands::Solve { input, dot, hopcroft_karp } => solve(input, dot, hopcroft_karp),
        Commands::Check {
            trials, vertices, edge_probability, workers, seed, timeout, exhaustive_limit,
        } => {
            let defaults = CheckConfig::default();
            check(CheckConfig {
                trials,
                vertices,
                edge_probability,
                workers: workers.unwrap_or(defaults.workers),
                seed,
                timeout: Duration::from_secs(timeout),
                exhaustive_limit,
            })
        }
        Commands::Pair { rosters } => pair(&rosters),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn solve(input: Option<PathBuf>, dot: bool, hopcroft_karp: bool) -> Result<bool, Box<dyn Error>> {
    let graph = match input {
        Some(path) => Graph::read_matrix(File::open(path)?)?,
        None => Graph::read_matrix(io::stdin().lock())?,
    };

    info!(
        "graph has {} vertices and {} edges (connected: {}, bipartite: {}, cyclic: {})",
        graph.vertex_count(),
        graph.edge_count(),
        graph.is_connected(),
        graph.bipartition().is_some(),
        graph.has_cycle(),
    );

    let matching: Matching = if hopcroft_karp {
        HopcroftKarp::maximum_matching(&graph)?
    } else {
        let outcome = EdmondsBlossom::solve(&graph)?;
        info!(
            "{} searches, {} augmentations, {} contractions, max depth {}",
            outcome.stats.searches,
            outcome.stats.augmentations,
            outcome.stats.contractions,
            outcome.stats.max_depth,
        );
        outcome.matching
    };

    for (u, v) in matching.pairs() {
        println!("{u} {v}");
    }

    println!("size: {}", matching.len());
    println!("perfect: {}", matching.is_perfect());

    if dot {
        println!("\n{}", graph.to_dot(Some(&matching)));
    }

    Ok(true)
}

fn check(config: CheckConfig) -> Result<bool, Box<dyn Error>> {
    let report = CrossCheck::new(config).run();

    for failure in report.failures() {
        println!(
            "seed {} ({:?}, {} vertices, {} edges): {}",
            failure.seed, failure.kind, failure.vertices, failure.edges, failure.verdict,
        );
    }

    Ok(report.is_success())
}

fn pair(rosters: &[PathBuf]) -> Result<bool, Box<dyn Error>> {
    let students = load_rosters(rosters)?;
    let pairing = pair_students(&students)?;

    print!("{pairing}");

    Ok(true)
}
