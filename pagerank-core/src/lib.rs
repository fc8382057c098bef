pub mod config;
pub mod error;
pub mod graph;
pub mod iteration;
pub mod rank;
pub mod report;
pub mod sampling;
pub mod transition;

pub use config::{IterationConfig, RankConfig};
pub use error::{RankError, Result};
pub use graph::{LinkGraph, PageId};
pub use iteration::{IterationOutcome, iterate_rank, iterate_rank_with, iteration_step};
pub use rank::RankMap;
pub use sampling::{sample_rank, sample_rank_with_rng};
pub use transition::{TransitionDistribution, transition};
