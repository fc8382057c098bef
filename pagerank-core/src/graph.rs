//! The link graph of a closed corpus.
//!
//! Every page is a key; every link target is itself a page. Self-links are
//! never stored. Pages and links are kept in sorted containers so that any
//! walk over the graph visits pages in the same order on every run.

use crate::error::{RankError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Opaque page identifier (a filename for HTML corpora)
pub type PageId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkGraph {
    pages: BTreeMap<PageId, BTreeSet<PageId>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from raw outgoing links, repairing it into a closed corpus.
    ///
    /// Self-links and links to pages that are not keys of `links` are dropped.
    pub fn from_links<I, P, L>(links: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<PageId>,
        L: IntoIterator,
        L::Item: Into<PageId>,
    {
        let raw: BTreeMap<PageId, Vec<PageId>> = links
            .into_iter()
            .map(|(page, targets)| (page.into(), targets.into_iter().map(Into::into).collect()))
            .collect();

        let mut graph = LinkGraph::new();
        for page in raw.keys() {
            graph.insert_page(page.clone());
        }

        let mut dropped_self = 0usize;
        let mut dropped_dangling = 0usize;
        for (page, targets) in raw.iter() {
            for target in targets {
                if target == page {
                    dropped_self += 1;
                } else if !raw.contains_key(target) {
                    dropped_dangling += 1;
                } else {
                    // Both ends are known pages, so this cannot fail
                    let _ = graph.add_link(page, target);
                }
            }
        }

        if dropped_self > 0 || dropped_dangling > 0 {
            warn!(
                "Dropped {} self-link(s) and {} link(s) leaving the corpus",
                dropped_self, dropped_dangling
            );
        }
        debug!(
            "Built link graph with {} pages and {} links",
            graph.len(),
            graph.edge_count()
        );

        graph
    }

    /// Add a page with no outgoing links. Existing links are kept.
    pub fn insert_page(&mut self, page: impl Into<PageId>) {
        self.pages.entry(page.into()).or_default();
    }

    /// Add a link between two pages already in the graph.
    ///
    /// Returns `Ok(false)` for a self-link, which is ignored.
    pub fn add_link(&mut self, from: &str, to: &str) -> Result<bool> {
        if !self.pages.contains_key(to) {
            return Err(RankError::invalid(format!("unknown link target: {}", to)));
        }
        if from == to {
            return Ok(false);
        }
        let targets = self
            .pages
            .get_mut(from)
            .ok_or_else(|| RankError::invalid(format!("unknown page: {}", from)))?;
        Ok(targets.insert(to.to_string()))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    /// All pages, in sorted order
    pub fn pages(&self) -> impl Iterator<Item = &PageId> {
        self.pages.keys()
    }

    pub fn links(&self, page: &str) -> Option<&BTreeSet<PageId>> {
        self.pages.get(page)
    }

    pub fn out_degree(&self, page: &str) -> Option<usize> {
        self.pages.get(page).map(BTreeSet::len)
    }

    pub fn is_sink(&self, page: &str) -> bool {
        self.pages.get(page).is_some_and(BTreeSet::is_empty)
    }

    pub fn sinks(&self) -> impl Iterator<Item = &PageId> {
        self.pages
            .iter()
            .filter(|(_, links)| links.is_empty())
            .map(|(page, _)| page)
    }

    pub fn edge_count(&self) -> usize {
        self.pages.values().map(BTreeSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageId, &BTreeSet<PageId>)> {
        self.pages.iter()
    }

    pub(crate) fn require_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(RankError::invalid("corpus contains no pages"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_links_strips_self_and_dangling() {
        let graph = LinkGraph::from_links([
            ("a.html", vec!["a.html", "b.html", "missing.html"]),
            ("b.html", vec![]),
        ]);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.out_degree("a.html"), Some(1));
        assert!(graph.links("a.html").unwrap().contains("b.html"));
        assert!(graph.is_sink("b.html"));
    }

    #[test]
    fn test_add_link_unknown_target() {
        let mut graph = LinkGraph::new();
        graph.insert_page("a");
        assert!(graph.add_link("a", "b").is_err());
    }

    #[test]
    fn test_add_link_self_is_ignored() {
        let mut graph = LinkGraph::new();
        graph.insert_page("a");
        assert_eq!(graph.add_link("a", "a"), Ok(false));
        assert!(graph.is_sink("a"));
    }
}
