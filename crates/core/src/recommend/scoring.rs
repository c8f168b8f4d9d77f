//! Scoring primitives for the recommendation strategies

use std::cmp::Ordering;

use crate::domain::subscription::SubscriptionType;

use super::{
    CONTENT_WEIGHT, COLLAB_WEIGHT, PRICE_WEIGHT, RENEWAL_MISMATCH, RENEWAL_WEIGHT,
    YEARLY_BOOST, YEARLY_BOOST_PRICE,
};

/// Content score for one candidate plan: weighted blend of price proximity
/// and auto-renewal agreement, boosted for yearly-preferring users looking
/// at higher-priced plans.
pub(crate) fn content_score(
    user_price_norm: f64,
    plan_price_norm: f64,
    user_prefers_renewal: bool,
    plan_allows_renewal: bool,
    preferred_type: SubscriptionType,
    plan_price: f64,
) -> f64 {
    let price_score = 1.0 - (user_price_norm - plan_price_norm).abs();
    let renewal_match =
        if user_prefers_renewal == plan_allows_renewal { 1.0 } else { RENEWAL_MISMATCH };
    let type_boost = if preferred_type == SubscriptionType::Yearly
        && plan_price > YEARLY_BOOST_PRICE
    {
        YEARLY_BOOST
    } else {
        1.0
    };

    (price_score * PRICE_WEIGHT + renewal_match * RENEWAL_WEIGHT) * type_boost
}

/// Cosine distance between two rating rows. A zero-norm row has no
/// direction, so it is treated as maximally distant.
pub(crate) fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a * norm_b)
}

/// Indices of the `k` rows nearest to the row at `target`, measured by
/// cosine distance over the full matrix rows, target row included.
/// Brute-force exact search; distance ties break by row order so results
/// are deterministic.
pub(crate) fn nearest_rows(values: &[Vec<f64>], target: usize, k: usize) -> Vec<usize> {
    let target_row = &values[target];
    let mut distances: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .map(|(row, candidate)| (row, cosine_distance(target_row, candidate)))
        .collect();

    distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    distances.into_iter().take(k).map(|(row, _)| row).collect()
}

/// Hybrid blend with presence/absence semantics: a source that produced no
/// score for the plan contributes nothing, it is not zero-filled.
pub(crate) fn combine_hybrid(content: Option<f64>, collab: Option<f64>) -> f64 {
    content.map_or(0.0, |score| score * CONTENT_WEIGHT)
        + collab.map_or(0.0, |score| score * COLLAB_WEIGHT)
}
