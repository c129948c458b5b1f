//! # Risk model
//! Placeholder linear probability-of-default model.
//!
//! `pd = clamp(0.15 + 0.10 * min(credit / (income + 1e-6), 10) - 0.01 * min(years, 30), 0.01, 0.95)`
//!
//! The clamp keeps every output strictly inside (0, 1), which is what makes
//! the log-odds transform in `scorecard` safe to chain after it.

use crate::applicant::ApplicantRecord;

pub const BASE_PD: f64 = 0.15;
pub const RATIO_WEIGHT: f64 = 0.10;
pub const TENURE_WEIGHT: f64 = 0.01;
pub const RATIO_CAP: f64 = 10.0;
pub const TENURE_CAP_YEARS: f64 = 30.0;
pub const MIN_PD: f64 = 0.01;
pub const MAX_PD: f64 = 0.95;

/// Guards the credit-to-income ratio against a zero income.
const INCOME_EPSILON: f64 = 1e-6;

/// Estimate the probability of default for one applicant.
pub fn probability_of_default(record: &ApplicantRecord) -> f64 {
    pd_from_financials(
        record.income,
        record.credit_amount,
        record.years_in_current_job,
    )
}

/// Same model over the raw scalars. Total: non-finite inputs are treated as 0.
pub fn pd_from_financials(income: f64, credit_amount: f64, years_in_current_job: f64) -> f64 {
    let income = finite_or_zero(income);
    let credit_amount = finite_or_zero(credit_amount);
    let years = finite_or_zero(years_in_current_job);

    let ratio = (credit_amount / (income + INCOME_EPSILON)).min(RATIO_CAP);
    let tenure = years.min(TENURE_CAP_YEARS);

    let raw = BASE_PD + RATIO_WEIGHT * ratio - TENURE_WEIGHT * tenure;
    raw.clamp(MIN_PD, MAX_PD)
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}
