//! Min-max feature normalization over the plan catalog
//!
//! Plan prices are scaled into [0, 1] against the global price range; user
//! price preferences are scaled with the same bounds and may legitimately
//! fall outside [0, 1] when a user's history sits outside the catalog
//! range. When every plan carries the same price the range is degenerate
//! and all normalized values collapse to 0.5.

use std::collections::HashMap;

use crate::domain::plan::{Plan, PlanId};

/// Normalized value used when the observed price range is degenerate.
pub const DEGENERATE_NORM: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct FeatureSpace {
    price_min: f64,
    price_range: Option<f64>,
    plan_price_norm: HashMap<PlanId, f64>,
}

impl FeatureSpace {
    pub fn from_plans(plans: &[Plan]) -> Self {
        let mut prices = plans.iter().map(|plan| plan.price);
        let first = prices.next();

        let (price_min, price_max) = match first {
            Some(initial) => prices.fold((initial, initial), |(lo, hi), price| {
                (lo.min(price), hi.max(price))
            }),
            None => (0.0, 0.0),
        };

        let price_range = (price_max > price_min).then_some(price_max - price_min);

        let mut space = Self { price_min, price_range, plan_price_norm: HashMap::new() };
        for plan in plans {
            let norm = space.normalize_price(plan.price);
            space.plan_price_norm.insert(plan.id.clone(), norm);
        }
        space
    }

    /// Scale a price against the catalog range. Unclamped: user preference
    /// values outside the observed range map outside [0, 1].
    pub fn normalize_price(&self, price: f64) -> f64 {
        match self.price_range {
            Some(range) => (price - self.price_min) / range,
            None => DEGENERATE_NORM,
        }
    }

    pub fn plan_price_norm(&self, plan_id: &PlanId) -> Option<f64> {
        self.plan_price_norm.get(plan_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::AutoRenewal;

    fn plan(id: &str, price: f64) -> Plan {
        Plan {
            id: PlanId(id.to_string()),
            name: format!("Plan {id}"),
            price,
            auto_renewal: AutoRenewal::Yes,
        }
    }

    #[test]
    fn plan_prices_scale_into_unit_interval() {
        let space = FeatureSpace::from_plans(&[
            plan("p1", 20.0),
            plan("p2", 60.0),
            plan("p3", 100.0),
        ]);

        assert_eq!(space.plan_price_norm(&PlanId("p1".into())), Some(0.0));
        assert_eq!(space.plan_price_norm(&PlanId("p2".into())), Some(0.5));
        assert_eq!(space.plan_price_norm(&PlanId("p3".into())), Some(1.0));
    }

    #[test]
    fn user_preference_outside_range_is_not_clamped() {
        let space = FeatureSpace::from_plans(&[plan("p1", 20.0), plan("p2", 100.0)]);

        assert_eq!(space.normalize_price(180.0), 2.0);
        assert_eq!(space.normalize_price(-60.0), -1.0);
    }

    #[test]
    fn uniform_prices_collapse_to_midpoint() {
        let space = FeatureSpace::from_plans(&[plan("p1", 50.0), plan("p2", 50.0)]);

        assert_eq!(space.plan_price_norm(&PlanId("p1".into())), Some(DEGENERATE_NORM));
        assert_eq!(space.plan_price_norm(&PlanId("p2".into())), Some(DEGENERATE_NORM));
        // The same fallback applies to user preferences in the degenerate case.
        assert_eq!(space.normalize_price(80.0), DEGENERATE_NORM);
    }

    #[test]
    fn empty_catalog_is_degenerate() {
        let space = FeatureSpace::from_plans(&[]);
        assert_eq!(space.normalize_price(42.0), DEGENERATE_NORM);
        assert_eq!(space.plan_price_norm(&PlanId("p1".into())), None);
    }
}
