use crate::error::{Result, ScanError};
use crate::result::{CrawlOutput, PageScan};
use futures::stream::{self, StreamExt};
use pagerank_core::{LinkGraph, PageId};
use scraper::{Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// Reads a directory of HTML pages into a link graph
pub struct Crawler {
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        Self {
            workers: 8,
            progress_callback: None,
        }
    }

    /// Number of files read concurrently
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl(&self, directory: &Path) -> Result<CrawlOutput> {
        info!(
            "Starting crawl of {} with {} workers",
            directory.display(),
            self.workers
        );

        let metadata = tokio::fs::metadata(directory).await?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(directory.to_path_buf()));
        }

        let files = Self::list_pages(directory).await?;
        if files.is_empty() {
            return Err(ScanError::EmptyCorpus(directory.to_path_buf()));
        }

        let progress_cb = self.progress_callback.clone();
        let loaded: Vec<(PathBuf, PageId, std::io::Result<String>)> =
            stream::iter(files.into_iter().enumerate())
                .map(|(idx, (path, page))| {
                    let progress_cb = progress_cb.clone();
                    async move {
                        if let Some(ref callback) = progress_cb {
                            callback(idx, page.clone());
                        }
                        debug!("Reading {}", path.display());
                        let contents = tokio::fs::read_to_string(&path).await;
                        (path, page, contents)
                    }
                })
                .buffer_unordered(self.workers)
                .collect()
                .await;

        let mut raw_links: BTreeMap<PageId, Vec<String>> = BTreeMap::new();
        let mut skipped = Vec::new();

        for (path, page, contents) in loaded {
            match contents {
                Ok(html) => {
                    let links: Vec<String> = extract_links(&html)
                        .into_iter()
                        .filter(|link| link != &page)
                        .collect();
                    debug!("{}: {} link(s)", page, links.len());
                    raw_links.insert(page, links);
                }
                Err(e) => {
                    warn!("Skipping unreadable page {}: {}", path.display(), e);
                    skipped.push((path, e.to_string()));
                }
            }
        }

        if raw_links.is_empty() {
            return Err(ScanError::EmptyCorpus(directory.to_path_buf()));
        }

        let graph = LinkGraph::from_links(
            raw_links
                .iter()
                .map(|(page, links)| (page.clone(), links.clone())),
        );

        let scans: Vec<PageScan> = raw_links
            .into_iter()
            .map(|(page, links_found)| {
                let links_kept = graph.out_degree(&page).unwrap_or(0);
                PageScan {
                    page,
                    links_found,
                    links_kept,
                }
            })
            .collect();

        info!(
            "Crawl complete. Read {} pages, {} links kept, {} skipped",
            graph.len(),
            graph.edge_count(),
            skipped.len()
        );

        Ok(CrawlOutput {
            graph,
            scans,
            skipped,
        })
    }

    /// Regular files directly inside `directory` whose name ends in `.html`
    async fn list_pages(directory: &Path) -> Result<Vec<(PathBuf, PageId)>> {
        let mut entries = tokio::fs::read_dir(directory).await?;
        let mut pages = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!("Ignoring non UTF-8 file name {:?}", file_name);
                continue;
            };
            if !name.ends_with(".html") {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            pages.push((entry.path(), name.to_string()));
        }

        pages.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(pages)
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct `href` values of the anchors in `html`, sorted
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
