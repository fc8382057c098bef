pub mod commands;
pub mod handlers;

// Re-export the handler entry points used by the binary and tests
pub use handlers::{
    Method, RankOptions, generate_graph_listing, load_corpus, rank_graph,
    rank_options_from_matches, resolve_corpus_path, run_rank,
};
