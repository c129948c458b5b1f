//! decision.rs — output shapes for a scored applicant.
//!
//! - `Decision`: binary risk label used in batch results and CSV exports.
//! - `Recommendation`: three-tier advice shown for single applications.
//! - `ScoredRecord`: the applicant plus PD, score and decision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::applicant::ApplicantRecord;

/// PD at or above this value is labelled high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.5;
/// Below this PD approval is recommended.
pub const APPROVE_BELOW: f64 = 0.2;
/// Below this PD (and at or above `APPROVE_BELOW`) manual review is recommended.
pub const REVIEW_BELOW: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    HighRisk,
    LowRisk,
}

impl Decision {
    pub fn from_pd(pd: f64) -> Self {
        if pd >= HIGH_RISK_THRESHOLD {
            Self::HighRisk
        } else {
            Self::LowRisk
        }
    }

    /// Stable code written to CSV/JSON.
    pub fn code(self) -> &'static str {
        match self {
            Self::HighRisk => "HIGH_RISK",
            Self::LowRisk => "LOW_RISK",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HighRisk => "High risk",
            Self::LowRisk => "Low risk",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown decision label '{0}'")]
pub struct UnknownDecision(pub String);

impl FromStr for Decision {
    type Err = UnknownDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "HIGH_RISK" => Ok(Self::HighRisk),
            "LOW_RISK" => Ok(Self::LowRisk),
            other => Err(UnknownDecision(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    ManualReview,
    Reject,
}

impl Recommendation {
    pub fn from_pd(pd: f64) -> Self {
        if pd < APPROVE_BELOW {
            Self::Approve
        } else if pd < REVIEW_BELOW {
            Self::ManualReview
        } else {
            Self::Reject
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Approve => "Approval recommended",
            Self::ManualReview => "Manual review recommended",
            Self::Reject => "Rejection recommended",
        }
    }
}

/// An applicant together with its derived risk figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub applicant: ApplicantRecord,
    pub probability_of_default: f64,
    pub credit_score: f64,
    pub decision: Decision,
}

impl ScoredRecord {
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_pd(self.probability_of_default)
    }

    pub fn is_high_risk(&self) -> bool {
        self.decision == Decision::HighRisk
    }
}
