//! Random-surfer transition model
//!
//! From a page with links the surfer follows one of them with probability
//! `d`, split evenly, and jumps to any page of the corpus with probability
//! `1 - d`. From a sink the surfer jumps uniformly.

use crate::error::{RankError, Result, check_damping};
use crate::graph::{LinkGraph, PageId};
use std::collections::BTreeMap;

/// Next-click probabilities over every page of the corpus
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionDistribution {
    probabilities: BTreeMap<PageId, f64>,
}

impl TransitionDistribution {
    pub fn get(&self, page: &str) -> Option<f64> {
        self.probabilities.get(page).copied()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probabilities in page order, matching `LinkGraph::pages`
    pub fn iter(&self) -> impl Iterator<Item = (&PageId, f64)> {
        self.probabilities.iter().map(|(page, p)| (page, *p))
    }

    pub fn weights(&self) -> Vec<f64> {
        self.probabilities.values().copied().collect()
    }

    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }
}

/// Probability distribution of the page visited after `page`.
pub fn transition(graph: &LinkGraph, page: &str, damping: f64) -> Result<TransitionDistribution> {
    graph.require_non_empty()?;
    check_damping(damping)?;
    let links = graph
        .links(page)
        .ok_or_else(|| RankError::invalid(format!("page not in corpus: {}", page)))?;

    let n = graph.len() as f64;
    let probabilities = if links.is_empty() {
        graph.pages().map(|p| (p.clone(), 1.0 / n)).collect()
    } else {
        let teleport = (1.0 - damping) / n;
        let follow = damping / links.len() as f64;
        graph
            .pages()
            .map(|p| {
                let probability = if links.contains(p) {
                    follow + teleport
                } else {
                    teleport
                };
                (p.clone(), probability)
            })
            .collect()
    };

    Ok(TransitionDistribution { probabilities })
}
