//! # Scoring engine
//! Pure, testable glue between the risk model and the scorecard.
//! No I/O; both the HTML pages and the JSON API call into this module.
//!
//! Policy: PD from `risk`, score from `scorecard`, then `Decision::from_pd`.
//! Batches map 1:1 and keep row order; the first failure aborts the batch and
//! carries its row index.

use tracing::debug;

use crate::applicant::ApplicantRecord;
use crate::decision::{Decision, ScoredRecord};
use crate::error::ScoringError;
use crate::risk;
use crate::scorecard::Scorecard;

/// Score a single applicant.
pub fn score_applicant(
    record: ApplicantRecord,
    scorecard: &Scorecard,
) -> Result<ScoredRecord, ScoringError> {
    let pd = risk::probability_of_default(&record);
    let score = scorecard.to_score(pd)?;
    debug!(pd, score, "applicant scored");
    Ok(ScoredRecord {
        applicant: record,
        probability_of_default: pd,
        credit_score: score,
        decision: Decision::from_pd(pd),
    })
}

/// Score every record in order.
pub fn score_batch<I>(
    records: I,
    scorecard: &Scorecard,
) -> Result<Vec<ScoredRecord>, ScoringError>
where
    I: IntoIterator<Item = ApplicantRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| score_applicant(record, scorecard).map_err(|e| e.at_row(index)))
        .collect()
}

/// Aggregate counts for a scored batch.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct BatchSummary {
    pub rows: usize,
    pub high_risk: usize,
    pub low_risk: usize,
    pub mean_pd: Option<f64>,
}

impl BatchSummary {
    pub fn of(scored: &[ScoredRecord]) -> Self {
        let high_risk = scored.iter().filter(|s| s.is_high_risk()).count();
        let mean_pd = if scored.is_empty() {
            None
        } else {
            let total: f64 = scored.iter().map(|s| s.probability_of_default).sum();
            Some(total / scored.len() as f64)
        };
        Self {
            rows: scored.len(),
            high_risk,
            low_risk: scored.len() - high_risk,
            mean_pd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(income: f64, credit: f64, years: f64) -> ApplicantRecord {
        ApplicantRecord::with_financials(income, credit, years)
    }

    #[test]
    fn single_applicant_low_risk() {
        let s = score_applicant(rec(50_000.0, 10_000.0, 10.0), &Scorecard::default()).unwrap();
        // 0.15 + 0.02 - 0.10 = 0.07
        assert!((s.probability_of_default - 0.07).abs() < 1e-6);
        assert_eq!(s.decision, Decision::LowRisk);
        assert!(s.credit_score > 570.0 && s.credit_score < 571.0, "{}", s.credit_score);
    }

    #[test]
    fn single_applicant_high_risk() {
        let s = score_applicant(rec(1000.0, 10_000.0, 5.0), &Scorecard::default()).unwrap();
        assert_eq!(s.probability_of_default, risk::MAX_PD);
        assert_eq!(s.decision, Decision::HighRisk);
    }

    #[test]
    fn batch_preserves_order_and_count() {
        let input = vec![
            rec(0.0, 0.0, 0.0),
            rec(1000.0, 10_000.0, 5.0),
            rec(100_000.0, 0.0, 30.0),
        ];
        let out = score_batch(input.clone(), &Scorecard::default()).unwrap();
        assert_eq!(out.len(), 3);
        for (scored, original) in out.iter().zip(&input) {
            assert_eq!(&scored.applicant, original);
        }
        assert!((out[0].probability_of_default - 0.15).abs() < 1e-12);
        assert_eq!(out[1].probability_of_default, risk::MAX_PD);
        assert_eq!(out[2].probability_of_default, risk::MIN_PD);
    }

    #[test]
    fn empty_batch_is_empty() {
        let out = score_batch(Vec::new(), &Scorecard::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(BatchSummary::of(&out).mean_pd, None);
    }

    #[test]
    fn summary_counts_decisions() {
        let out = score_batch(
            vec![rec(1000.0, 10_000.0, 0.0), rec(0.0, 0.0, 0.0)],
            &Scorecard::default(),
        )
        .unwrap();
        let summary = BatchSummary::of(&out);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.high_risk, 1);
        assert_eq!(summary.low_risk, 1);
        let mean = summary.mean_pd.unwrap();
        assert!((mean - (0.95 + 0.15) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn score_is_function_of_pd_only() {
        // same PD from different inputs → same score
        let a = score_applicant(rec(10_000.0, 20_000.0, 4.0), &Scorecard::default()).unwrap();
        let b = score_applicant(rec(20_000.0, 40_000.0, 4.0), &Scorecard::default()).unwrap();
        assert!((a.probability_of_default - b.probability_of_default).abs() < 1e-9);
        assert!((a.credit_score - b.credit_score).abs() < 1e-6);
    }
}
