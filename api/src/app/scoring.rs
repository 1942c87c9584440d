//! Response scoring
//!
//! Pure functions turning a response into a qualification score in [0, 1].

use crate::domain::entities::{QualificationCriteria, QualificationRules, Response};

/// Normalized company-size factor
pub fn company_size_tier(employee_count: u32) -> f64 {
    if employee_count > 500 {
        1.0
    } else if employee_count > 100 {
        0.7
    } else {
        0.3
    }
}

/// Weighted sum of interest, company size and decision-maker status,
/// clamped to [0, 1]. Misconfigured weights are absorbed by the clamp and a
/// NaN total scores 0.
pub fn score(response: &Response, rules: &QualificationRules) -> f64 {
    let weights = &rules.weights;

    let interest = weights.interest_level * f64::from(response.interest_level.value()) / 3.0;
    let size = weights.company_size * company_size_tier(response.prospect.employee_count);
    let decision_maker = if response.is_decision_maker {
        weights.decision_maker
    } else {
        0.0
    };

    let total = interest + size + decision_maker;
    if total.is_nan() {
        return 0.0;
    }
    total.clamp(0.0, 1.0)
}

/// Whether a scored response passes the score threshold and optional filters
pub fn qualifies(response: &Response, score: f64, criteria: &QualificationCriteria) -> bool {
    if score < criteria.minimum_score {
        return false;
    }
    if criteria
        .minimum_interest
        .is_some_and(|floor| response.interest_level < floor)
    {
        return false;
    }
    !(criteria.require_decision_maker && !response.is_decision_maker)
}
