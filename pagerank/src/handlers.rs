use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pagerank_core::report::{RankReport, ReportFormat, SamplingSection, generate_report, save_report};
use pagerank_core::{
    IterationConfig, LinkGraph, RankConfig, iterate_rank_with, sample_rank, sample_rank_with_rng,
};
use pagerank_corpus::{CrawlOutput, Crawler};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Which estimators a `rank` run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Sample,
    Iterate,
    Both,
}

impl Method {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sample" => Some(Method::Sample),
            "iterate" => Some(Method::Iterate),
            "both" => Some(Method::Both),
            _ => None,
        }
    }

    pub fn samples(&self) -> bool {
        matches!(self, Method::Sample | Method::Both)
    }

    pub fn iterates(&self) -> bool {
        matches!(self, Method::Iterate | Method::Both)
    }
}

/// Options for a `rank` run, resolved from the command line
#[derive(Debug, Clone)]
pub struct RankOptions {
    pub corpus: PathBuf,
    pub config: RankConfig,
    pub method: Method,
    pub workers: usize,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub show_progress: bool,
}

/// Expand a leading `~` in a user-supplied path
pub fn resolve_corpus_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn rank_options_from_matches(args: &ArgMatches, quiet: bool) -> Result<RankOptions> {
    let corpus = args
        .get_one::<String>("CORPUS")
        .ok_or_else(|| anyhow!("a corpus directory is required"))?;

    let iteration = IterationConfig::new()
        .with_tolerance(*args.get_one::<f64>("tolerance").unwrap_or(&0.001))
        .with_max_iterations(*args.get_one::<usize>("max-iterations").unwrap_or(&10_000));
    let config = RankConfig::new()
        .with_damping(*args.get_one::<f64>("damping").unwrap_or(&0.85))
        .with_samples(*args.get_one::<usize>("samples").unwrap_or(&10_000))
        .with_seed(args.get_one::<u64>("seed").copied())
        .with_iteration(iteration);
    config.validate().context("invalid ranking options")?;

    let method_name = args
        .get_one::<String>("method")
        .map(String::as_str)
        .unwrap_or("both");
    let method =
        Method::from_str(method_name).ok_or_else(|| anyhow!("unknown method: {}", method_name))?;

    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("unknown report format: {}", format_name))?;

    Ok(RankOptions {
        corpus: resolve_corpus_path(corpus),
        config,
        method,
        workers: *args.get_one::<usize>("workers").unwrap_or(&8),
        format,
        output: args.get_one::<PathBuf>("output").cloned(),
        show_progress: !quiet,
    })
}

fn spinner(show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Crawl `corpus` into a link graph, with a spinner when `show_progress` is set
pub async fn load_corpus(corpus: &Path, workers: usize, show_progress: bool) -> Result<CrawlOutput> {
    let progress_bar = spinner(show_progress).map(Arc::new);

    let mut crawler = Crawler::new().with_workers(workers);
    if let Some(ref pb) = progress_bar {
        pb.set_message(format!("Reading {}", corpus.display()));
        let pb_clone = pb.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |_idx: usize, page: String| {
            pb_clone.set_message(format!("Reading {}", page));
        }));
    }

    let result = crawler.crawl(corpus).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let output = result.with_context(|| format!("failed to crawl {}", corpus.display()))?;

    if show_progress {
        eprintln!(
            "{} Crawled {} pages ({} links) from {}",
            "✓".green().bold(),
            output.graph.len(),
            output.graph.edge_count(),
            corpus.display().to_string().bright_white()
        );
        for (path, reason) in &output.skipped {
            eprintln!("{} Skipped {}: {}", "⚠".yellow().bold(), path.display(), reason);
        }
    }

    Ok(output)
}

/// Run the selected estimators over `graph` concurrently.
pub async fn rank_graph(
    graph: Arc<LinkGraph>,
    config: &RankConfig,
    method: Method,
) -> Result<(Option<SamplingSection>, Option<pagerank_core::IterationOutcome>)> {
    let sample_task = method.samples().then(|| {
        let graph = graph.clone();
        let config = config.clone();
        tokio::task::spawn_blocking(move || match config.seed {
            Some(seed) => sample_rank_with_rng(
                &graph,
                config.damping,
                config.samples,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => sample_rank(&graph, config.damping, config.samples),
        })
    });

    let iterate_task = method.iterates().then(|| {
        let graph = graph.clone();
        let damping = config.damping;
        let iteration = config.iteration;
        tokio::task::spawn_blocking(move || iterate_rank_with(&graph, damping, &iteration))
    });

    let sampling = match sample_task {
        Some(handle) => {
            let ranks = handle
                .await
                .context("sampling task failed")?
                .context("sampling estimator failed")?;
            Some(SamplingSection {
                samples: config.samples,
                seed: config.seed,
                ranks,
            })
        }
        None => None,
    };

    let iteration = match iterate_task {
        Some(handle) => Some(
            handle
                .await
                .context("iteration task failed")?
                .context("iterative estimator failed")?,
        ),
        None => None,
    };

    Ok((sampling, iteration))
}

/// Crawl the corpus and rank it according to `options`.
pub async fn run_rank(options: &RankOptions) -> Result<RankReport> {
    let output = load_corpus(&options.corpus, options.workers, options.show_progress).await?;
    let graph = Arc::new(output.graph);

    info!(
        "Ranking {} pages with damping {} ({:?})",
        graph.len(),
        options.config.damping,
        options.method
    );

    let progress_bar = spinner(options.show_progress);
    if let Some(ref pb) = progress_bar {
        pb.set_message("Ranking pages...");
    }
    let ranked = rank_graph(graph.clone(), &options.config, options.method).await;
    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }
    let (sampling, iteration) = ranked?;

    Ok(RankReport {
        corpus: options.corpus.display().to_string(),
        total_pages: graph.len(),
        total_links: graph.edge_count(),
        config: options.config.clone(),
        sampling,
        iteration,
    })
}

pub async fn handle_rank(args: &ArgMatches, quiet: bool) -> Result<()> {
    let options = rank_options_from_matches(args, quiet)?;
    let report = run_rank(&options).await?;
    let content = generate_report(&report, options.format).context("failed to render report")?;

    match options.output {
        Some(ref path) => {
            save_report(&content, path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", content),
    }

    Ok(())
}

/// Render the crawled graph as `page -> targets` lines or as JSON
pub fn generate_graph_listing(output: &CrawlOutput, format: &str) -> Result<String> {
    let graph = &output.graph;

    if format == "json" {
        let json = serde_json::json!({
            "pages": graph,
            "total_pages": graph.len(),
            "total_links": graph.edge_count(),
            "sinks": graph.sinks().collect::<Vec<_>>(),
            "skipped": output
                .skipped
                .iter()
                .map(|(path, reason)| serde_json::json!({
                    "path": path.display().to_string(),
                    "reason": reason
                }))
                .collect::<Vec<_>>(),
        });
        return serde_json::to_string_pretty(&json).context("failed to render graph");
    }

    let mut listing = String::new();
    for (page, links) in graph.iter() {
        if links.is_empty() {
            listing.push_str(&format!("{} -> (sink)\n", page));
        } else {
            let targets: Vec<&str> = links.iter().map(String::as_str).collect();
            listing.push_str(&format!("{} -> {}\n", page, targets.join(", ")));
        }
    }
    listing.push_str(&format!(
        "\n{} pages, {} links, {} sinks\n",
        graph.len(),
        graph.edge_count(),
        graph.sinks().count()
    ));

    Ok(listing)
}

pub async fn handle_graph(args: &ArgMatches, quiet: bool) -> Result<()> {
    let corpus = args
        .get_one::<String>("CORPUS")
        .map(|raw| resolve_corpus_path(raw))
        .ok_or_else(|| anyhow!("a corpus directory is required"))?;
    let workers = *args.get_one::<usize>("workers").unwrap_or(&8);
    let format = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");

    let output = load_corpus(&corpus, workers, !quiet).await?;
    print!("{}", generate_graph_listing(&output, format)?);

    Ok(())
}
