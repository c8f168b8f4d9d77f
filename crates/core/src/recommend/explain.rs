//! Explanation generation
//!
//! Produces the ordered list of human-readable reasons behind a
//! recommendation. Reasons are evaluated in a fixed order; the price,
//! renewal and loyalty checks are independent while the subscription-type
//! messages are mutually exclusive. The result is never empty: a generic
//! fallback covers unknown users, unknown plans and the no-signal case.

use crate::domain::plan::PlanId;
use crate::domain::subscription::SubscriptionType;
use crate::domain::user::UserId;

use super::engine::RecommendationEngine;

/// Absolute price distance below which the price-match reason fires.
pub const PRICE_MATCH_WINDOW: f64 = 20.0;
/// Retention rate above which the loyalty reason fires.
pub const LOYALTY_THRESHOLD: f64 = 0.7;
/// Plan price above which the yearly-subscriber reason fires.
const YEARLY_REASON_PRICE: f64 = 50.0;

const FALLBACK_REASON: &str = "This plan is popular among users with similar profiles";

impl RecommendationEngine {
    /// Ordered reasons why `plan_id` suits `user_id`. Always returns at
    /// least one entry.
    pub fn explain(&self, user_id: &UserId, plan_id: &PlanId) -> Vec<String> {
        let (Some(profile), Some(plan)) = (self.profile(user_id), self.plan(plan_id)) else {
            return vec![FALLBACK_REASON.to_string()];
        };

        let mut reasons = Vec::new();

        let price_diff = (profile.avg_price_preference - plan.price).abs();
        if price_diff < PRICE_MATCH_WINDOW {
            reasons.push(format!(
                "Great price match: plan costs ${:.2}, close to your usual spend of ${:.2}",
                plan.price, profile.avg_price_preference
            ));
        }

        if profile.prefers_auto_renewal == plan.auto_renewal.allowed() {
            reasons.push(format!(
                "Auto-renewal setting ({}) matches your preference",
                plan.auto_renewal.as_str()
            ));
        }

        if profile.preferred_type == SubscriptionType::Yearly && plan.price > YEARLY_REASON_PRICE
        {
            reasons.push("Premium plan suitable for yearly subscribers".to_string());
        } else if profile.preferred_type == SubscriptionType::Monthly {
            reasons.push("Flexible plan, a good fit for monthly subscribers".to_string());
        }

        if profile.retention_rate > LOYALTY_THRESHOLD {
            reasons.push(
                "You are a loyal customer and this plan rewards long-term users".to_string(),
            );
        }

        if reasons.is_empty() {
            reasons.push(FALLBACK_REASON.to_string());
        }

        reasons
    }
}
