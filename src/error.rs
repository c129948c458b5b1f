//! Error types for the scoring core.
//!
//! Input coercion never fails (bad numbers become 0), so the only errors the
//! core can produce are domain violations in the score conversion and invalid
//! scorecard parameters. Batch failures wrap the per-row error with its index.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    /// The log-odds transform is only defined for `0 < pd < 1`.
    #[error("probability of default {pd} is outside the open interval (0, 1)")]
    ProbabilityOutOfDomain { pd: f64 },

    #[error("invalid scorecard parameters: base_score={base_score}, pdo={pdo}")]
    InvalidScorecard { base_score: f64, pdo: f64 },

    #[error("row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<ScoringError>,
    },
}

impl ScoringError {
    pub fn at_row(self, index: usize) -> Self {
        Self::Row {
            index,
            source: Box::new(self),
        }
    }

    /// Zero-based row index for batch failures.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::Row { index, .. } => Some(*index),
            _ => None,
        }
    }
}
