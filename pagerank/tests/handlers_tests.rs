use pagerank::commands::command_argument_builder;
use pagerank::handlers::*;
use pagerank_core::report::ReportFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn write_page(dir: &Path, name: &str, body: &str) {
    std::fs::write(
        dir.join(name),
        format!("<html><body>{}</body></html>", body),
    )
    .unwrap();
}

/// 1 -> 2; 2 -> 1, 3; 3 -> 2, 4; 4 -> 2
fn corpus0() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_page(dir.path(), "1.html", r#"<a href="2.html">2</a>"#);
    write_page(
        dir.path(),
        "2.html",
        r#"<a href="1.html">1</a><a href="3.html">3</a>"#,
    );
    write_page(
        dir.path(),
        "3.html",
        r#"<a href="2.html">2</a><a href="4.html">4</a>"#,
    );
    write_page(dir.path(), "4.html", r#"<a href="2.html">2</a>"#);
    dir
}

fn rank_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["pagerank", "rank"];
    full.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(full)
        .unwrap();
    matches.subcommand_matches("rank").unwrap().clone()
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_method_from_str() {
    assert_eq!(Method::from_str("sample"), Some(Method::Sample));
    assert_eq!(Method::from_str("ITERATE"), Some(Method::Iterate));
    assert_eq!(Method::from_str("both"), Some(Method::Both));
    assert_eq!(Method::from_str("guess"), None);

    assert!(Method::Both.samples() && Method::Both.iterates());
    assert!(!Method::Sample.iterates());
    assert!(!Method::Iterate.samples());
}

#[test]
fn test_resolve_corpus_path_plain() {
    assert_eq!(resolve_corpus_path("corpus0"), PathBuf::from("corpus0"));
    assert_eq!(
        resolve_corpus_path("/tmp/corpus0"),
        PathBuf::from("/tmp/corpus0")
    );
}

#[test]
fn test_resolve_corpus_path_expands_home() {
    if std::env::var("HOME").is_err() {
        return;
    }
    let resolved = resolve_corpus_path("~/corpus0");
    assert!(!resolved.starts_with("~"));
    assert!(resolved.ends_with("corpus0"));
}

#[test]
fn test_rank_options_defaults() {
    let args = rank_matches(&["corpus0"]);
    let options = rank_options_from_matches(&args, false).unwrap();

    assert_eq!(options.corpus, PathBuf::from("corpus0"));
    assert_eq!(options.config.damping, 0.85);
    assert_eq!(options.config.samples, 10_000);
    assert_eq!(options.config.seed, None);
    assert_eq!(options.config.iteration.tolerance, 0.001);
    assert_eq!(options.method, Method::Both);
    assert_eq!(options.format, ReportFormat::Text);
    assert_eq!(options.workers, 8);
    assert!(options.output.is_none());
    assert!(options.show_progress);
}

#[test]
fn test_rank_options_overrides() {
    let args = rank_matches(&[
        "corpus0",
        "--damping",
        "0.5",
        "-n",
        "500",
        "--seed",
        "7",
        "-m",
        "iterate",
        "-f",
        "md",
        "--tolerance",
        "0.0001",
        "--max-iterations",
        "50",
        "-o",
        "out.md",
    ]);
    let options = rank_options_from_matches(&args, true).unwrap();

    assert_eq!(options.config.damping, 0.5);
    assert_eq!(options.config.samples, 500);
    assert_eq!(options.config.seed, Some(7));
    assert_eq!(options.config.iteration.tolerance, 0.0001);
    assert_eq!(options.config.iteration.max_iterations, 50);
    assert_eq!(options.method, Method::Iterate);
    assert_eq!(options.format, ReportFormat::Markdown);
    assert_eq!(options.output, Some(PathBuf::from("out.md")));
    assert!(!options.show_progress);
}

#[test]
fn test_rank_options_rejects_bad_damping() {
    for damping in ["1.5", "0", "1"] {
        let args = rank_matches(&["corpus0", "--damping", damping]);
        assert!(
            rank_options_from_matches(&args, true).is_err(),
            "damping {} should be rejected",
            damping
        );
    }
}

#[test]
fn test_rank_options_rejects_zero_samples() {
    let args = rank_matches(&["corpus0", "-n", "0"]);
    assert!(rank_options_from_matches(&args, true).is_err());
}

#[test]
fn test_cli_rejects_unknown_method() {
    let result =
        command_argument_builder().try_get_matches_from(["pagerank", "rank", "c", "-m", "guess"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_requires_subcommand() {
    assert!(command_argument_builder()
        .try_get_matches_from(["pagerank"])
        .is_err());
}

#[test]
fn test_cli_global_flags() {
    let matches = command_argument_builder()
        .try_get_matches_from(["pagerank", "graph", "corpus0", "-q", "-vv"])
        .unwrap();
    assert!(matches.get_flag("quiet"));
    assert_eq!(matches.get_count("verbose"), 2);
}

// ============================================================================
// Ranking
// ============================================================================

fn options_for(dir: &Path, method: Method) -> RankOptions {
    let args = rank_matches(&[
        dir.to_str().unwrap(),
        "-n",
        "20000",
        "--seed",
        "42",
        "--tolerance",
        "0.000001",
    ]);
    let mut options = rank_options_from_matches(&args, true).unwrap();
    options.method = method;
    options
}

#[tokio::test]
async fn test_run_rank_both_estimators() {
    let dir = corpus0();
    let report = run_rank(&options_for(dir.path(), Method::Both))
        .await
        .unwrap();

    assert_eq!(report.total_pages, 4);
    assert_eq!(report.total_links, 6);

    let iteration = report.iteration.expect("iteration section");
    assert!((iteration.ranks.get("1.html").unwrap() - 0.2199).abs() < 1e-3);
    assert!((iteration.ranks.get("2.html").unwrap() - 0.4292).abs() < 1e-3);
    assert!((iteration.ranks.get("4.html").unwrap() - 0.1310).abs() < 1e-3);

    let sampling = report.sampling.expect("sampling section");
    assert_eq!(sampling.samples, 20_000);
    assert_eq!(sampling.seed, Some(42));
    assert!((sampling.ranks.total() - 1.0).abs() < 1e-9);
    assert!((sampling.ranks.get("2.html").unwrap() - 0.4292).abs() < 0.02);
}

#[tokio::test]
async fn test_run_rank_seed_is_reproducible() {
    let dir = corpus0();
    let options = options_for(dir.path(), Method::Sample);

    let first = run_rank(&options).await.unwrap();
    let second = run_rank(&options).await.unwrap();

    assert!(first.iteration.is_none());
    assert_eq!(
        first.sampling.unwrap().ranks,
        second.sampling.unwrap().ranks
    );
}

#[tokio::test]
async fn test_run_rank_iterate_only() {
    let dir = corpus0();
    let report = run_rank(&options_for(dir.path(), Method::Iterate))
        .await
        .unwrap();
    assert!(report.sampling.is_none());
    assert!(report.iteration.is_some());
}

#[tokio::test]
async fn test_run_rank_missing_corpus() {
    let dir = TempDir::new().unwrap();
    let options = options_for(&dir.path().join("missing"), Method::Both);
    assert!(run_rank(&options).await.is_err());
}

#[tokio::test]
async fn test_run_rank_empty_corpus() {
    let dir = TempDir::new().unwrap();
    let err = run_rank(&options_for(dir.path(), Method::Both))
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("No .html pages"));
}

#[tokio::test]
async fn test_rank_graph_reports_non_convergence() {
    let dir = corpus0();
    let output = load_corpus(dir.path(), 2, false).await.unwrap();
    let mut options = options_for(dir.path(), Method::Iterate);
    options.config.iteration.max_iterations = 1;

    let result = rank_graph(Arc::new(output.graph), &options.config, options.method).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_handle_rank_writes_report() -> Result<(), Box<dyn std::error::Error>> {
    let dir = corpus0();
    let out = TempDir::new()?;
    let report_path = out.path().join("ranks.txt");

    let args = rank_matches(&[
        dir.path().to_str().unwrap(),
        "-n",
        "200",
        "--seed",
        "3",
        "-o",
        report_path.to_str().unwrap(),
    ]);
    handle_rank(&args, true).await?;

    let content = std::fs::read_to_string(&report_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "PageRank Results from Sampling (n = 200)");
    assert_eq!(lines[1].trim_start().split(':').next(), Some("1.html"));
    assert_eq!(lines[5], "PageRank Results from Iteration");
    assert_eq!(lines.len(), 10);

    Ok(())
}

// ============================================================================
// Graph listing
// ============================================================================

#[tokio::test]
async fn test_graph_listing_text() {
    let dir = corpus0();
    write_page(dir.path(), "5.html", "dead end");
    let output = load_corpus(dir.path(), 4, false).await.unwrap();

    let listing = generate_graph_listing(&output, "text").unwrap();

    assert!(listing.contains("2.html -> 1.html, 3.html\n"));
    assert!(listing.contains("5.html -> (sink)\n"));
    assert!(listing.contains("5 pages, 6 links, 1 sinks"));
}

#[tokio::test]
async fn test_graph_listing_json() -> Result<(), Box<dyn std::error::Error>> {
    let dir = corpus0();
    let output = load_corpus(dir.path(), 4, false).await?;

    let listing = generate_graph_listing(&output, "json")?;
    let value: serde_json::Value = serde_json::from_str(&listing)?;

    assert_eq!(value["total_pages"], 4);
    assert_eq!(value["total_links"], 6);
    assert_eq!(value["pages"]["3.html"], serde_json::json!(["2.html", "4.html"]));
    assert_eq!(value["sinks"], serde_json::json!([]));

    Ok(())
}
