use super::super::domain::{ConstructScore, RoleWeightSet};

/// Weighted mean of construct percentiles for one role.
///
/// Only constructs present in both the scores and the weights contribute; the divisor is
/// the actual contributing weight, so totals that drift from 100 are normalized. A zero
/// total yields 0.
pub fn composite_percentile(scores: &[ConstructScore], weights: &RoleWeightSet) -> u8 {
    let mut weighted_sum: u64 = 0;
    let mut total_weight: u64 = 0;

    for score in scores {
        if let Some(weight) = weights.weight(score.construct) {
            weighted_sum += u64::from(score.percentile) * u64::from(weight);
            total_weight += u64::from(weight);
        }
    }

    if total_weight == 0 {
        return 0;
    }

    // Integer round-half-up keeps the result exact under uniform weight scaling.
    ((2 * weighted_sum + total_weight) / (2 * total_weight)) as u8
}
