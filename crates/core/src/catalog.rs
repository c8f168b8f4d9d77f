//! Plan catalog queries
//!
//! Filtered, sorted views of the plan table with population subscription
//! counts attached. Pure functions over the loaded tables.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::plan::{AutoRenewal, Plan, PlanId};
use crate::domain::subscription::Subscription;

/// Inclusive price bounds and an optional auto-renewal constraint.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub auto_renewal: Option<AutoRenewal>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSort {
    PriceAsc,
    PriceDesc,
    Popularity,
}

impl PlanSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Popularity => "popularity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "popularity" => Some(Self::Popularity),
            _ => None,
        }
    }
}

/// One catalog row annotated with its population subscription count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanListing {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub price: f64,
    pub auto_renewal: AutoRenewal,
    pub subscribers: usize,
}

pub fn explore_plans(
    plans: &[Plan],
    subscriptions: &[Subscription],
    filter: &PlanFilter,
    sort: PlanSort,
) -> Vec<PlanListing> {
    let mut counts: HashMap<&PlanId, usize> = HashMap::new();
    for subscription in subscriptions {
        *counts.entry(&subscription.plan_id).or_insert(0) += 1;
    }

    let mut listings: Vec<PlanListing> = plans
        .iter()
        .filter(|plan| filter.min_price.map_or(true, |min| plan.price >= min))
        .filter(|plan| filter.max_price.map_or(true, |max| plan.price <= max))
        .filter(|plan| {
            filter.auto_renewal.map_or(true, |renewal| plan.auto_renewal == renewal)
        })
        .map(|plan| PlanListing {
            plan_id: plan.id.clone(),
            plan_name: plan.name.clone(),
            price: plan.price,
            auto_renewal: plan.auto_renewal,
            subscribers: counts.get(&plan.id).copied().unwrap_or(0),
        })
        .collect();

    match sort {
        PlanSort::PriceAsc => listings.sort_by(|a, b| {
            a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
        }),
        PlanSort::PriceDesc => listings.sort_by(|a, b| {
            b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal)
        }),
        PlanSort::Popularity => listings.sort_by(|a, b| {
            b.subscribers.cmp(&a.subscribers).then_with(|| a.plan_id.cmp(&b.plan_id))
        }),
    }

    listings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::{SubscriptionStatus, SubscriptionType};
    use crate::domain::user::UserId;

    fn plan(id: &str, price: f64, renewal: AutoRenewal) -> Plan {
        Plan {
            id: PlanId(id.to_string()),
            name: format!("Plan {id}"),
            price,
            auto_renewal: renewal,
        }
    }

    fn sub(user_id: &str, plan_id: &str) -> Subscription {
        Subscription {
            user_id: UserId(user_id.to_string()),
            plan_id: PlanId(plan_id.to_string()),
            status: SubscriptionStatus::Active,
            subscription_type: SubscriptionType::Monthly,
            start_date: None,
            last_billed_date: None,
            last_renewed_date: None,
        }
    }

    fn catalog() -> Vec<Plan> {
        vec![
            plan("p1", 20.0, AutoRenewal::Yes),
            plan("p2", 50.0, AutoRenewal::No),
            plan("p3", 80.0, AutoRenewal::Yes),
        ]
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let listings = explore_plans(
            &catalog(),
            &[],
            &PlanFilter { min_price: Some(20.0), max_price: Some(50.0), auto_renewal: None },
            PlanSort::PriceAsc,
        );

        let ids: Vec<&str> = listings.iter().map(|l| l.plan_id.0.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn renewal_filter_selects_matching_plans() {
        let listings = explore_plans(
            &catalog(),
            &[],
            &PlanFilter { auto_renewal: Some(AutoRenewal::Yes), ..PlanFilter::default() },
            PlanSort::PriceDesc,
        );

        let ids: Vec<&str> = listings.iter().map(|l| l.plan_id.0.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1"]);
    }

    #[test]
    fn popularity_sort_counts_subscriptions_with_id_tie_break() {
        let subscriptions = vec![sub("u1", "p2"), sub("u2", "p2"), sub("u1", "p3")];

        let listings = explore_plans(
            &catalog(),
            &subscriptions,
            &PlanFilter::default(),
            PlanSort::Popularity,
        );

        let ids: Vec<&str> = listings.iter().map(|l| l.plan_id.0.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);
        assert_eq!(listings[0].subscribers, 2);
    }
}
