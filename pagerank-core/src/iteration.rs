//! Fixed-point iteration of the PageRank equation
//!
//! ```text
//! rank(p) = (1 - d) / N + d * Σ contribution(i, p)
//! ```
//!
//! A page `i ≠ p` that links to `p` contributes `rank(i) / outdegree(i)`. A
//! sink spreads its rank evenly over the whole corpus, itself included,
//! contributing `rank(i) / N` to every page. This is the same walk the
//! transition model describes, so the ranks keep summing to one and the
//! iteration settles on the surfer's stationary distribution.

use crate::config::IterationConfig;
use crate::error::{RankError, Result, check_damping};
use crate::graph::LinkGraph;
use crate::rank::RankMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const SUM_TOLERANCE: f64 = 1e-6;

/// Converged ranks with the details of how they were reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationOutcome {
    pub ranks: RankMap,
    pub iterations: usize,
    /// Largest per-page change in the final iteration
    pub delta: f64,
}

/// Iterate to convergence with the default tolerance and iteration cap.
pub fn iterate_rank(graph: &LinkGraph, damping: f64) -> Result<RankMap> {
    iterate_rank_with(graph, damping, &IterationConfig::default()).map(|outcome| outcome.ranks)
}

/// Iterate until no page changes by more than `config.tolerance`.
///
/// Fails with `NonConvergence` once `config.max_iterations` updates have
/// run without settling.
pub fn iterate_rank_with(
    graph: &LinkGraph,
    damping: f64,
    config: &IterationConfig,
) -> Result<IterationOutcome> {
    graph.require_non_empty()?;
    check_damping(damping)?;
    config.validate()?;

    let n = graph.len() as f64;
    info!(
        "Iterating over {} pages (tolerance {}, cap {})",
        graph.len(),
        config.tolerance,
        config.max_iterations
    );

    let mut ranks = RankMap::from_map(graph.pages().map(|p| (p.clone(), 1.0 / n)).collect());
    let mut delta = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let prev = ranks;
        ranks = iteration_step(graph, damping, &prev)?;
        delta = ranks.max_delta(&prev);

        let total = ranks.total();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            warn!("Ranks sum to {} after iteration {}", total, iteration);
        }
        debug!("Iteration {}: max delta {:.6}", iteration, delta);

        if delta <= config.tolerance {
            info!("Converged after {} iterations", iteration);
            return Ok(IterationOutcome {
                ranks,
                iterations: iteration,
                delta,
            });
        }
    }

    warn!(
        "No convergence after {} iterations (delta {})",
        config.max_iterations, delta
    );
    Err(RankError::NonConvergence {
        iterations: config.max_iterations,
        delta,
    })
}

/// Apply one update of the PageRank equation to `prev`.
///
/// `prev` must hold a rank for every page of `graph`.
pub fn iteration_step(graph: &LinkGraph, damping: f64, prev: &RankMap) -> Result<RankMap> {
    graph.require_non_empty()?;
    check_damping(damping)?;

    let n = graph.len() as f64;
    let mut incoming: BTreeMap<&str, f64> = graph.pages().map(|p| (p.as_str(), 0.0)).collect();
    let mut sink_share = 0.0;

    for (page, links) in graph.iter() {
        let rank = prev
            .get(page)
            .ok_or_else(|| RankError::invalid(format!("no previous rank for {}", page)))?;

        if links.is_empty() {
            sink_share += rank / n;
            continue;
        }

        let share = rank / links.len() as f64;
        for target in links {
            if target == page {
                continue;
            }
            if let Some(sum) = incoming.get_mut(target.as_str()) {
                *sum += share;
            }
        }
    }

    let teleport = (1.0 - damping) / n;
    let ranks = incoming
        .into_iter()
        .map(|(page, linked)| {
            (
                page.to_string(),
                teleport + damping * (linked + sink_share),
            )
        })
        .collect();

    Ok(RankMap::from_map(ranks))
}
