//! Monte Carlo estimate of PageRank.
//!
//! A random surfer starts on a uniformly chosen page and takes `n - 1`
//! further steps, each drawn from the transition model of the page it is
//! on. A page's rank is the share of the chain spent on it.

use crate::error::{RankError, Result, check_damping};
use crate::graph::LinkGraph;
use crate::rank::RankMap;
use crate::transition::transition;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Estimate ranks from a chain of `n` pages, using the thread-local RNG.
pub fn sample_rank(graph: &LinkGraph, damping: f64, n: usize) -> Result<RankMap> {
    sample_rank_with_rng(graph, damping, n, &mut rand::thread_rng())
}

/// Estimate ranks from a chain of `n` pages drawn with `rng`.
///
/// `damping` must be in (0, 1) whenever a transition is taken. A chain of
/// one page never consults the transition model, so any damping in (0, 1]
/// is accepted for `n == 1`.
pub fn sample_rank_with_rng<R: Rng>(
    graph: &LinkGraph,
    damping: f64,
    n: usize,
    rng: &mut R,
) -> Result<RankMap> {
    graph.require_non_empty()?;
    if n < 1 {
        return Err(RankError::invalid("sample count must be at least 1"));
    }
    if n > 1 || damping != 1.0 {
        check_damping(damping)?;
    }

    let pages: Vec<&String> = graph.pages().collect();
    info!("Sampling {} steps over {} pages", n, pages.len());

    // One sampler per page, built the first time the surfer lands there
    let mut samplers: Vec<Option<WeightedIndex<f64>>> = vec![None; pages.len()];
    let mut counts = vec![0usize; pages.len()];

    let mut current = rng.gen_range(0..pages.len());
    counts[current] += 1;

    for _ in 1..n {
        if samplers[current].is_none() {
            let dist = transition(graph, pages[current], damping)?;
            let sampler = WeightedIndex::new(dist.weights()).map_err(|e| {
                RankError::invalid(format!(
                    "bad transition weights for {}: {}",
                    pages[current], e
                ))
            })?;
            samplers[current] = Some(sampler);
        }
        if let Some(sampler) = &samplers[current] {
            current = sampler.sample(rng);
        }
        counts[current] += 1;
    }

    debug!(
        "Built {} of {} transition samplers",
        samplers.iter().filter(|s| s.is_some()).count(),
        pages.len()
    );

    let ranks: BTreeMap<String, f64> = pages
        .iter()
        .zip(counts)
        .map(|(page, count)| ((*page).clone(), count as f64 / n as f64))
        .collect();

    Ok(RankMap::from_map(ranks))
}
