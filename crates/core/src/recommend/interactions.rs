//! Synthetic user-plan rating matrix
//!
//! Subscription rows are turned into ratings on a 1-5 scale and pivoted
//! into a dense user-by-plan matrix. A cell of exactly 0.0 means "no
//! interaction", never "rated zero"; consumers must skip zero cells when
//! averaging neighbor ratings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::plan::PlanId;
use crate::domain::subscription::{Subscription, SubscriptionStatus, SubscriptionType};
use crate::domain::user::UserId;

const BASE_RATING: f64 = 3.0;
const ACTIVE_BOOST: f64 = 1.5;
const PAUSED_PENALTY: f64 = 0.5;
const YEARLY_BOOST: f64 = 0.5;
const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

/// One derived (user, plan, rating) triple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub rating: f64,
}

/// Rating formula: base 3.0, +1.5 for active, -0.5 for paused, +0.5 for
/// yearly commitment, clamped into [1.0, 5.0].
pub fn interaction_rating(subscription: &Subscription) -> f64 {
    let mut rating = BASE_RATING;

    match subscription.status {
        SubscriptionStatus::Active => rating += ACTIVE_BOOST,
        SubscriptionStatus::Paused => rating -= PAUSED_PENALTY,
        SubscriptionStatus::Other => {}
    }

    if subscription.subscription_type == SubscriptionType::Yearly {
        rating += YEARLY_BOOST;
    }

    rating.clamp(MIN_RATING, MAX_RATING)
}

/// One interaction per subscription row, in row order.
pub fn derive_interactions(subscriptions: &[Subscription]) -> Vec<Interaction> {
    subscriptions
        .iter()
        .map(|subscription| Interaction {
            user_id: subscription.user_id.clone(),
            plan_id: subscription.plan_id.clone(),
            rating: interaction_rating(subscription),
        })
        .collect()
}

/// Dense user-by-plan rating matrix. Row and column order follow first
/// appearance in the interaction list; repeated (user, plan) pairs keep
/// the last written rating.
#[derive(Clone, Debug, Default)]
pub struct InteractionMatrix {
    users: Vec<UserId>,
    plans: Vec<PlanId>,
    user_index: HashMap<UserId, usize>,
    plan_index: HashMap<PlanId, usize>,
    values: Vec<Vec<f64>>,
}

impl InteractionMatrix {
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        let mut matrix = Self::default();

        for interaction in interactions {
            let row = matrix.user_row(&interaction.user_id);
            let col = matrix.plan_col(&interaction.plan_id);
            matrix.values[row][col] = interaction.rating;
        }

        matrix
    }

    fn user_row(&mut self, user_id: &UserId) -> usize {
        if let Some(&row) = self.user_index.get(user_id) {
            return row;
        }
        let row = self.users.len();
        self.users.push(user_id.clone());
        self.user_index.insert(user_id.clone(), row);
        self.values.push(vec![0.0; self.plans.len()]);
        row
    }

    fn plan_col(&mut self, plan_id: &PlanId) -> usize {
        if let Some(&col) = self.plan_index.get(plan_id) {
            return col;
        }
        let col = self.plans.len();
        self.plans.push(plan_id.clone());
        self.plan_index.insert(plan_id.clone(), col);
        for row in &mut self.values {
            row.push(0.0);
        }
        col
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    pub fn plans(&self) -> &[PlanId] {
        &self.plans
    }

    pub fn contains_user(&self, user_id: &UserId) -> bool {
        self.user_index.contains_key(user_id)
    }

    pub fn row_of(&self, user_id: &UserId) -> Option<usize> {
        self.user_index.get(user_id).copied()
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row]
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// 0.0 for unknown users or plans, which is indistinguishable from "no
    /// interaction" on purpose.
    pub fn rating(&self, user_id: &UserId, plan_id: &PlanId) -> f64 {
        match (self.user_index.get(user_id), self.plan_index.get(plan_id)) {
            (Some(&row), Some(&col)) => self.values[row][col],
            _ => 0.0,
        }
    }
}
