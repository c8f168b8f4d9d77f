//! Plan recommendation engine
//!
//! Blends content-based scoring (profile attributes against plan
//! attributes) with neighbor-based collaborative scoring (cosine
//! similarity over a synthetic rating matrix), falls back to raw
//! popularity when personalization is unavailable, and produces
//! human-readable explanations for any (user, plan) pair.

mod engine;
mod explain;
mod features;
mod interactions;
mod scoring;
mod types;

pub use engine::RecommendationEngine;
pub use features::FeatureSpace;
pub use interactions::{derive_interactions, Interaction, InteractionMatrix};
pub use types::{Recommendation, Strategy};

/// Content-based share of the hybrid blend.
pub const CONTENT_WEIGHT: f64 = 0.7;
/// Collaborative share of the hybrid blend.
pub const COLLAB_WEIGHT: f64 = 0.3;

/// Weight of price proximity inside the content score.
pub const PRICE_WEIGHT: f64 = 0.6;
/// Weight of auto-renewal agreement inside the content score.
pub const RENEWAL_WEIGHT: f64 = 0.4;
/// Renewal component value when the flags disagree.
pub const RENEWAL_MISMATCH: f64 = 0.3;
/// Multiplier applied when a yearly-preferring user meets a plan priced
/// above the boost threshold.
pub const YEARLY_BOOST: f64 = 1.2;
/// Plan price above which the yearly boost applies.
pub const YEARLY_BOOST_PRICE: f64 = 50.0;

/// Neighborhood size cap for collaborative scoring.
pub const NEIGHBORHOOD_SIZE: usize = 5;

/// Placeholder score attached to popularity-fallback results.
pub const POPULAR_PLAN_SCORE: f64 = 0.8;

/// Default result count when the caller does not specify one.
pub const DEFAULT_TOP_N: usize = 5;
