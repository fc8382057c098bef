use crate::error::{RankError, Result, check_damping};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAMPING: f64 = 0.85;
pub const DEFAULT_SAMPLES: usize = 10_000;
pub const DEFAULT_TOLERANCE: f64 = 0.001;
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Convergence settings for the iterative estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationConfig {
    /// Largest per-page change that still counts as converged
    pub tolerance: f64,
    /// Iterations allowed before giving up with `NonConvergence`
    pub max_iterations: usize,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl IterationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(RankError::invalid(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(RankError::invalid("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Settings for one ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    pub damping: f64,
    pub samples: usize,
    /// Seed for the sampling estimator; `None` draws from the thread RNG
    pub seed: Option<u64>,
    pub iteration: IterationConfig,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            samples: DEFAULT_SAMPLES,
            seed: None,
            iteration: IterationConfig::default(),
        }
    }
}

impl RankConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_iteration(mut self, iteration: IterationConfig) -> Self {
        self.iteration = iteration;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping)?;
        if self.samples == 0 {
            return Err(RankError::invalid("sample count must be at least 1"));
        }
        self.iteration.validate()
    }
}
