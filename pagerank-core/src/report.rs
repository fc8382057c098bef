// Report generation from ranking results

use crate::config::RankConfig;
use crate::iteration::IterationOutcome;
use crate::rank::RankMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingSection {
    pub samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub ranks: RankMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankReport {
    pub corpus: String,
    pub total_pages: usize,
    pub total_links: usize,
    pub config: RankConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<IterationOutcome>,
}

pub fn generate_report(data: &RankReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data),
        ReportFormat::Csv => Ok(generate_csv_report(data)),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

/// Plain listing, one page per line with four decimals
pub fn generate_text_report(data: &RankReport) -> String {
    let mut report = String::new();

    if let Some(ref sampling) = data.sampling {
        report.push_str(&format!(
            "PageRank Results from Sampling (n = {})\n",
            sampling.samples
        ));
        push_rank_lines(&mut report, &sampling.ranks);
    }

    if let Some(ref iteration) = data.iteration {
        report.push_str("PageRank Results from Iteration\n");
        push_rank_lines(&mut report, &iteration.ranks);
    }

    report
}

fn push_rank_lines(report: &mut String, ranks: &RankMap) {
    for (page, rank) in ranks.sorted() {
        report.push_str(&format!("  {}: {:.4}\n", page, rank));
    }
}

pub fn generate_json_report(data: &RankReport) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "pagerank",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "corpus": {
                "path": data.corpus,
                "total_pages": data.total_pages,
                "total_links": data.total_links
            },
            "config": data.config,
            "sampling": data.sampling,
            "iteration": data.iteration
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// One row per page; a column is empty when that estimator did not run
pub fn generate_csv_report(data: &RankReport) -> String {
    let mut report = String::from("page,sampled,iterated\n");

    for page in report_pages(data) {
        let sampled = data
            .sampling
            .as_ref()
            .and_then(|s| s.ranks.get(page))
            .map(|r| format!("{:.6}", r))
            .unwrap_or_default();
        let iterated = data
            .iteration
            .as_ref()
            .and_then(|i| i.ranks.get(page))
            .map(|r| format!("{:.6}", r))
            .unwrap_or_default();
        report.push_str(&format!("{},{},{}\n", csv_field(page), sampled, iterated));
    }

    report
}

pub fn generate_markdown_report(data: &RankReport) -> String {
    let mut report = String::new();
    report.push_str("# PageRank Report\n\n");
    report.push_str(&format!("- **Corpus:** `{}`\n", data.corpus));
    report.push_str(&format!("- **Pages:** {}\n", data.total_pages));
    report.push_str(&format!("- **Links:** {}\n", data.total_links));
    report.push_str(&format!("- **Damping:** {}\n", data.config.damping));

    if let Some(ref sampling) = data.sampling {
        report.push_str(&format!("- **Samples:** {}\n", sampling.samples));
        if let Some(seed) = sampling.seed {
            report.push_str(&format!("- **Seed:** {}\n", seed));
        }
    }
    if let Some(ref iteration) = data.iteration {
        report.push_str(&format!(
            "- **Iterations:** {} (tolerance {}, final delta {:.6})\n",
            iteration.iterations, data.config.iteration.tolerance, iteration.delta
        ));
    }

    report.push_str("\n| Page | Sampled | Iterated |\n");
    report.push_str("|------|---------|----------|\n");
    for page in report_pages(data) {
        let cell = |rank: Option<f64>| rank.map(|r| format!("{:.4}", r)).unwrap_or_else(|| "-".to_string());
        report.push_str(&format!(
            "| {} | {} | {} |\n",
            page,
            cell(data.sampling.as_ref().and_then(|s| s.ranks.get(page))),
            cell(data.iteration.as_ref().and_then(|i| i.ranks.get(page))),
        ));
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

// Helper functions
fn report_pages(data: &RankReport) -> Vec<&str> {
    let mut pages: Vec<&str> = data
        .sampling
        .iter()
        .flat_map(|s| s.ranks.iter().map(|(p, _)| p.as_str()))
        .chain(
            data.iteration
                .iter()
                .flat_map(|i| i.ranks.iter().map(|(p, _)| p.as_str())),
        )
        .collect();
    pages.sort_unstable();
    pages.dedup();
    pages
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
