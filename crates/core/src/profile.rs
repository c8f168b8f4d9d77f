//! User profile derivation from subscription history
//!
//! One behavioral profile is built per user by joining that user's
//! subscriptions against the plan table. Profiles are recomputed wholesale
//! every time a dataset is loaded; there is no incremental update path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::plan::{Plan, PlanId};
use crate::domain::subscription::{Subscription, SubscriptionStatus, SubscriptionType};
use crate::domain::user::{User, UserId, UserStatus};

/// Price preference assumed for users with no usable price history.
pub const DEFAULT_PRICE_PREFERENCE: f64 = 50.0;

/// Spend band derived from a user's average historical price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    Budget,
    Standard,
    Premium,
}

impl PriceCategory {
    /// Band thresholds: below 40 is Budget, 40 up to (but excluding) 70 is
    /// Standard, 70 and above is Premium.
    pub fn from_price(price: f64) -> Self {
        if price < 40.0 {
            Self::Budget
        } else if price < 70.0 {
            Self::Standard
        } else {
            Self::Premium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }
}

/// Derived per-user behavioral summary. This is the sole input the
/// content-based scorer reads about a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub name: String,
    pub user_status: UserStatus,
    pub avg_price_preference: f64,
    pub preferred_type: SubscriptionType,
    pub prefers_auto_renewal: bool,
    pub total_subscriptions: usize,
    pub active_subscriptions: usize,
    /// active / total, 0.0 when the user has no subscriptions.
    pub retention_rate: f64,
    pub price_category: PriceCategory,
    /// Plan identifiers of this user's currently active subscriptions, in
    /// subscription-row order.
    pub current_plans: Vec<PlanId>,
}

impl UserProfile {
    /// Fixed defaults for a user with zero subscription history.
    fn cold_start(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            user_status: user.status,
            avg_price_preference: DEFAULT_PRICE_PREFERENCE,
            preferred_type: SubscriptionType::Monthly,
            prefers_auto_renewal: true,
            total_subscriptions: 0,
            active_subscriptions: 0,
            retention_rate: 0.0,
            price_category: PriceCategory::Standard,
            current_plans: Vec::new(),
        }
    }
}

/// Build one profile per input user, in input user order. Pure function:
/// no error paths, users without history get the cold-start defaults.
pub fn build_user_profiles(
    users: &[User],
    subscriptions: &[Subscription],
    plans: &[Plan],
) -> Vec<UserProfile> {
    let plan_index: HashMap<&PlanId, &Plan> =
        plans.iter().map(|plan| (&plan.id, plan)).collect();

    let mut by_user: HashMap<&UserId, Vec<&Subscription>> = HashMap::new();
    for subscription in subscriptions {
        by_user.entry(&subscription.user_id).or_default().push(subscription);
    }

    users
        .iter()
        .map(|user| match by_user.get(&user.id) {
            Some(subs) if !subs.is_empty() => profile_from_history(user, subs, &plan_index),
            _ => UserProfile::cold_start(user),
        })
        .collect()
}

fn profile_from_history(
    user: &User,
    subs: &[&Subscription],
    plan_index: &HashMap<&PlanId, &Plan>,
) -> UserProfile {
    let total_subscriptions = subs.len();
    let active_subscriptions =
        subs.iter().filter(|sub| sub.status == SubscriptionStatus::Active).count();
    let retention_rate = active_subscriptions as f64 / total_subscriptions as f64;

    // Join against the plan table. Rows whose plan is missing from the
    // catalog contribute nothing to the price average or the renewal vote
    // numerator, but still count in the vote denominator.
    let joined_prices: Vec<f64> = subs
        .iter()
        .filter_map(|sub| plan_index.get(&sub.plan_id).map(|plan| plan.price))
        .collect();
    let avg_price_preference = if joined_prices.is_empty() {
        DEFAULT_PRICE_PREFERENCE
    } else {
        joined_prices.iter().sum::<f64>() / joined_prices.len() as f64
    };

    let renewal_votes = subs
        .iter()
        .filter(|sub| {
            plan_index.get(&sub.plan_id).is_some_and(|plan| plan.auto_renewal.allowed())
        })
        .count();
    let prefers_auto_renewal = renewal_votes * 2 > total_subscriptions;

    let current_plans: Vec<PlanId> = subs
        .iter()
        .filter(|sub| sub.status == SubscriptionStatus::Active)
        .map(|sub| sub.plan_id.clone())
        .collect();

    UserProfile {
        user_id: user.id.clone(),
        name: user.name.clone(),
        user_status: user.status,
        avg_price_preference,
        preferred_type: dominant_type(subs),
        prefers_auto_renewal,
        total_subscriptions,
        active_subscriptions,
        retention_rate,
        price_category: PriceCategory::from_price(avg_price_preference),
        current_plans,
    }
}

/// Mode of the subscription types, ties resolved in favor of the type
/// encountered first in row order.
fn dominant_type(subs: &[&Subscription]) -> SubscriptionType {
    let mut counts: Vec<(SubscriptionType, usize)> = Vec::new();
    for sub in subs {
        match counts.iter_mut().find(|(kind, _)| *kind == sub.subscription_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((sub.subscription_type, 1)),
        }
    }

    counts
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(kind, _)| *kind)
        .unwrap_or(SubscriptionType::Monthly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::AutoRenewal;

    fn user(id: &str) -> User {
        User {
            id: UserId(id.to_string()),
            name: format!("User {id}"),
            status: UserStatus::Active,
        }
    }

    fn plan(id: &str, price: f64, renewal: AutoRenewal) -> Plan {
        Plan {
            id: PlanId(id.to_string()),
            name: format!("Plan {id}"),
            price,
            auto_renewal: renewal,
        }
    }

    fn sub(
        user_id: &str,
        plan_id: &str,
        status: SubscriptionStatus,
        kind: SubscriptionType,
    ) -> Subscription {
        Subscription {
            user_id: UserId(user_id.to_string()),
            plan_id: PlanId(plan_id.to_string()),
            status,
            subscription_type: kind,
            start_date: None,
            last_billed_date: None,
            last_renewed_date: None,
        }
    }

    #[test]
    fn user_without_history_gets_cold_start_defaults() {
        let profiles = build_user_profiles(&[user("u1")], &[], &[]);

        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.avg_price_preference, 50.0);
        assert_eq!(profile.preferred_type, SubscriptionType::Monthly);
        assert!(profile.prefers_auto_renewal);
        assert_eq!(profile.total_subscriptions, 0);
        assert_eq!(profile.retention_rate, 0.0);
        assert_eq!(profile.price_category, PriceCategory::Standard);
        assert!(profile.current_plans.is_empty());
    }

    #[test]
    fn price_category_boundaries() {
        assert_eq!(PriceCategory::from_price(39.99), PriceCategory::Budget);
        assert_eq!(PriceCategory::from_price(40.00), PriceCategory::Standard);
        assert_eq!(PriceCategory::from_price(69.99), PriceCategory::Standard);
        assert_eq!(PriceCategory::from_price(70.00), PriceCategory::Premium);
    }

    #[test]
    fn profile_aggregates_history() {
        let plans = vec![
            plan("p1", 30.0, AutoRenewal::Yes),
            plan("p2", 60.0, AutoRenewal::Yes),
            plan("p3", 90.0, AutoRenewal::No),
        ];
        let subs = vec![
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u1", "p2", SubscriptionStatus::Paused, SubscriptionType::Yearly),
            sub("u1", "p3", SubscriptionStatus::Active, SubscriptionType::Monthly),
        ];

        let profiles = build_user_profiles(&[user("u1")], &subs, &plans);
        let profile = &profiles[0];

        assert_eq!(profile.avg_price_preference, 60.0);
        assert_eq!(profile.total_subscriptions, 3);
        assert_eq!(profile.active_subscriptions, 2);
        assert!((profile.retention_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(profile.preferred_type, SubscriptionType::Monthly);
        // 2 of 3 joined plans allow auto-renewal: majority vote passes.
        assert!(profile.prefers_auto_renewal);
        assert_eq!(profile.price_category, PriceCategory::Standard);
        assert_eq!(
            profile.current_plans,
            vec![PlanId("p1".to_string()), PlanId("p3".to_string())]
        );
    }

    #[test]
    fn dominant_type_tie_resolves_to_first_encountered() {
        let plans = vec![plan("p1", 20.0, AutoRenewal::Yes)];
        let subs = vec![
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Yearly),
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
        ];

        let profiles = build_user_profiles(&[user("u1")], &subs, &plans);
        assert_eq!(profiles[0].preferred_type, SubscriptionType::Yearly);
    }

    #[test]
    fn renewal_vote_requires_strict_majority() {
        let plans = vec![
            plan("p1", 20.0, AutoRenewal::Yes),
            plan("p2", 20.0, AutoRenewal::No),
        ];
        // One yes vote out of two subscriptions is not a majority.
        let subs = vec![
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u1", "p2", SubscriptionStatus::Active, SubscriptionType::Monthly),
        ];

        let profiles = build_user_profiles(&[user("u1")], &subs, &plans);
        assert!(!profiles[0].prefers_auto_renewal);
    }

    #[test]
    fn unmatched_plan_rows_fall_back_to_default_price() {
        // Subscription references a plan missing from the catalog: no price
        // evidence, so the default preference and its Standard band apply.
        let subs = vec![sub("u1", "ghost", SubscriptionStatus::Active, SubscriptionType::Monthly)];

        let profiles = build_user_profiles(&[user("u1")], &subs, &[]);
        let profile = &profiles[0];
        assert_eq!(profile.avg_price_preference, DEFAULT_PRICE_PREFERENCE);
        assert_eq!(profile.total_subscriptions, 1);
        assert_eq!(profile.current_plans, vec![PlanId("ghost".to_string())]);
    }
}
