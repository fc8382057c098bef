use clap::{arg, command};
use std::path::PathBuf;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn corpus_arg() -> clap::Arg {
    arg!(<CORPUS>)
        .required(true)
        .help("Directory containing the .html pages of the corpus")
}

fn workers_arg() -> clap::Arg {
    arg!(-t --"workers" <NUM_WORKERS>)
        .required(false)
        .help("Number of pages read concurrently while crawling the corpus")
        .value_parser(clap::value_parser!(usize))
        .default_value("8")
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagerank")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagerank")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress progress and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v debug, -vv trace)")
                .required(false)
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("rank")
                .about(
                    "Rank the pages of a corpus by random-surfer sampling and by iterating \
                the PageRank equation",
                )
                .arg(corpus_arg())
                .arg(
                    arg!(-d --"damping" <FACTOR>)
                        .required(false)
                        .help("Probability that the surfer follows a link, in (0, 1)")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("0.85"),
                )
                .arg(
                    arg!(-n --"samples" <N>)
                        .required(false)
                        .help("Length of the sampled surfer chain")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10000"),
                )
                .arg(
                    arg!(--"tolerance" <DELTA>)
                        .required(false)
                        .help("Largest per-page change at which iteration stops")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("0.001"),
                )
                .arg(
                    arg!(--"max-iterations" <N>)
                        .required(false)
                        .help("Give up iterating after this many updates")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10000"),
                )
                .arg(
                    arg!(-s --"seed" <SEED>)
                        .required(false)
                        .help("Seed the sampler for a reproducible run")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-m --"method" <METHOD>)
                        .required(false)
                        .help("Which estimator to run")
                        .value_parser(["sample", "iterate", "both"])
                        .default_value("both"),
                )
                .arg(workers_arg())
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            command!("graph")
                .about("Show the link graph crawled from a corpus")
                .arg(corpus_arg())
                .arg(workers_arg())
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
}
