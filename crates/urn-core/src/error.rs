use thiserror::Error;

/// Failures surfaced by urn construction, drawing, simulation and the exact solver.
///
/// `Exhausted` is a caller contract violation (drawing from an empty urn); every
/// other variant rejects an argument before any randomness is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrnError {
    #[error("total ball count does not fit in memory addressing ({total} balls)")]
    TooManyBalls { total: u64 },
    #[error("too many color classes ({colors}); a color label is a u32")]
    TooManyColors { colors: usize },
    #[error("compare must be at least 1")]
    ZeroCompare,
    #[error("trials must be at least 1")]
    ZeroTrials,
    #[error("{required} balls are required but the urn holds {available}")]
    InsufficientBalls { required: u64, available: u64 },
    #[error("draw called on an empty urn")]
    Exhausted,
}

impl UrnError {
    /// True for the argument-validation family (everything except a draw on an empty urn).
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, UrnError::Exhausted)
    }
}
