use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Iteration did not converge after {iterations} iterations (last delta {delta:.6})")]
    NonConvergence { iterations: usize, delta: f64 },
}

impl RankError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RankError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RankError>;

/// Reject damping factors outside the open interval (0, 1).
pub(crate) fn check_damping(damping: f64) -> Result<()> {
    if damping.is_finite() && damping > 0.0 && damping < 1.0 {
        Ok(())
    } else {
        Err(RankError::invalid(format!(
            "damping factor must be in (0, 1), got {}",
            damping
        )))
    }
}
