use pagerank_core::{LinkGraph, PageId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Links found in one page of the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScan {
    pub page: PageId,
    /// Every distinct `href` target other than the page itself
    pub links_found: Vec<String>,
    /// Targets that are pages of the corpus
    pub links_kept: usize,
}

impl PageScan {
    pub fn new(page: PageId) -> Self {
        Self {
            page,
            links_found: Vec::new(),
            links_kept: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlOutput {
    pub graph: LinkGraph,
    pub scans: Vec<PageScan>,
    /// Files that looked like pages but could not be read
    pub skipped: Vec<(PathBuf, String)>,
}

impl CrawlOutput {
    pub fn total_links_found(&self) -> usize {
        self.scans.iter().map(|s| s.links_found.len()).sum()
    }
}
