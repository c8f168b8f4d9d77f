//! Aggregate reporting over the loaded dataset
//!
//! Deterministic summaries of the numbers the operator dashboard displays:
//! population counts, subscription trends and billing outcomes. These
//! aggregates never feed back into recommendation scoring.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingRecord, PaymentStatus};
use crate::domain::plan::{Plan, PlanId};
use crate::domain::subscription::{Subscription, SubscriptionStatus, SubscriptionType};
use crate::domain::user::User;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_users: usize,
    pub active_subscriptions: usize,
    pub total_plans: usize,
    pub avg_plan_price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub active: usize,
    pub paused: usize,
    pub other: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub monthly: usize,
    pub yearly: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanPopularity {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub subscriptions: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub status: StatusBreakdown,
    pub types: TypeBreakdown,
    pub top_plans: Vec<PlanPopularity>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanRevenue {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub revenue: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub total_billed: f64,
    pub average_bill: f64,
    /// Fraction of billing rows with a paid status; 0.0 with no rows.
    pub payment_success_rate: f64,
    pub revenue_by_plan: Vec<PlanRevenue>,
}

pub fn dataset_summary(
    users: &[User],
    subscriptions: &[Subscription],
    plans: &[Plan],
) -> DatasetSummary {
    let active_subscriptions = subscriptions
        .iter()
        .filter(|sub| sub.status == SubscriptionStatus::Active)
        .count();
    let avg_plan_price = if plans.is_empty() {
        0.0
    } else {
        plans.iter().map(|plan| plan.price).sum::<f64>() / plans.len() as f64
    };

    DatasetSummary {
        total_users: users.len(),
        active_subscriptions,
        total_plans: plans.len(),
        avg_plan_price,
    }
}

pub fn subscription_trends(
    subscriptions: &[Subscription],
    plans: &[Plan],
    top_n: usize,
) -> TrendReport {
    let mut status = StatusBreakdown { active: 0, paused: 0, other: 0 };
    let mut types = TypeBreakdown { monthly: 0, yearly: 0 };

    for subscription in subscriptions {
        match subscription.status {
            SubscriptionStatus::Active => status.active += 1,
            SubscriptionStatus::Paused => status.paused += 1,
            SubscriptionStatus::Other => status.other += 1,
        }
        match subscription.subscription_type {
            SubscriptionType::Monthly => types.monthly += 1,
            SubscriptionType::Yearly => types.yearly += 1,
        }
    }

    let mut counts: HashMap<&PlanId, usize> = HashMap::new();
    for subscription in subscriptions {
        *counts.entry(&subscription.plan_id).or_insert(0) += 1;
    }
    let plan_names: HashMap<&PlanId, &str> =
        plans.iter().map(|plan| (&plan.id, plan.name.as_str())).collect();

    let mut top_plans: Vec<PlanPopularity> = counts
        .into_iter()
        .filter_map(|(plan_id, count)| {
            plan_names.get(plan_id).map(|name| PlanPopularity {
                plan_id: plan_id.clone(),
                plan_name: (*name).to_string(),
                subscriptions: count,
            })
        })
        .collect();
    top_plans.sort_by(|a, b| {
        b.subscriptions.cmp(&a.subscriptions).then_with(|| a.plan_id.cmp(&b.plan_id))
    });
    top_plans.truncate(top_n);

    TrendReport { status, types, top_plans }
}

pub fn revenue_report(
    subscriptions: &[Subscription],
    plans: &[Plan],
    billing: &[BillingRecord],
    top_n: usize,
) -> RevenueReport {
    let total_billed: f64 = billing.iter().map(|record| record.amount).sum();
    let (average_bill, payment_success_rate) = if billing.is_empty() {
        (0.0, 0.0)
    } else {
        let paid = billing
            .iter()
            .filter(|record| record.status == PaymentStatus::Paid)
            .count();
        (total_billed / billing.len() as f64, paid as f64 / billing.len() as f64)
    };

    // Revenue attribution follows the subscription-to-plan join: each
    // subscription row contributes its plan's list price.
    let plan_index: HashMap<&PlanId, &Plan> =
        plans.iter().map(|plan| (&plan.id, plan)).collect();
    let mut revenue: HashMap<&PlanId, f64> = HashMap::new();
    for subscription in subscriptions {
        if let Some(plan) = plan_index.get(&subscription.plan_id) {
            *revenue.entry(&plan.id).or_insert(0.0) += plan.price;
        }
    }

    let mut revenue_by_plan: Vec<PlanRevenue> = revenue
        .into_iter()
        .map(|(plan_id, amount)| PlanRevenue {
            plan_id: plan_id.clone(),
            plan_name: plan_index[plan_id].name.clone(),
            revenue: amount,
        })
        .collect();
    revenue_by_plan.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.plan_id.cmp(&b.plan_id))
    });
    revenue_by_plan.truncate(top_n);

    RevenueReport { total_billed, average_bill, payment_success_rate, revenue_by_plan }
}
