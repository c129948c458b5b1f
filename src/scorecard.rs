//! # Scorecard
//! Points-to-double-odds (PDO) scaling of a default probability into a score.
//!
//! odds   = (1 - pd) / pd
//! factor = pdo / ln 2
//! offset = base_score - factor * ln 20
//! score  = offset + factor * ln(odds)
//!
//! The score equals `base_score` at odds 20:1 and moves by `pdo` points for
//! every doubling of the odds of non-default.

use serde::Serialize;

use crate::error::ScoringError;

pub const DEFAULT_BASE_SCORE: f64 = 600.0;
pub const DEFAULT_PDO: f64 = 50.0;
/// Odds of non-default anchored at `base_score`.
pub const REFERENCE_ODDS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scorecard {
    base_score: f64,
    pdo: f64,
}

impl Default for Scorecard {
    fn default() -> Self {
        Self {
            base_score: DEFAULT_BASE_SCORE,
            pdo: DEFAULT_PDO,
        }
    }
}

impl Scorecard {
    pub fn new(base_score: f64, pdo: f64) -> Result<Self, ScoringError> {
        if !base_score.is_finite() || !pdo.is_finite() || pdo <= 0.0 {
            return Err(ScoringError::InvalidScorecard { base_score, pdo });
        }
        Ok(Self { base_score, pdo })
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn pdo(&self) -> f64 {
        self.pdo
    }

    pub fn factor(&self) -> f64 {
        self.pdo / std::f64::consts::LN_2
    }

    pub fn offset(&self) -> f64 {
        self.base_score - self.factor() * REFERENCE_ODDS.ln()
    }

    /// Convert a default probability into a score.
    ///
    /// Fails for `pd` outside the open interval (0, 1) instead of returning an
    /// infinite or NaN score.
    pub fn to_score(&self, pd: f64) -> Result<f64, ScoringError> {
        if !(pd > 0.0 && pd < 1.0) {
            return Err(ScoringError::ProbabilityOutOfDomain { pd });
        }
        let odds = (1.0 - pd) / pd;
        Ok(self.offset() + self.factor() * odds.ln())
    }
}

/// `to_score` with the default 600 / 50 scorecard.
pub fn to_score(pd: f64) -> Result<f64, ScoringError> {
    Scorecard::default().to_score(pd)
}
