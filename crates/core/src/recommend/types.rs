//! Types crossing the engine boundary

use serde::{Deserialize, Serialize};

use crate::domain::plan::{AutoRenewal, Plan, PlanId};

/// One ranked recommendation as returned by every engine query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub price: f64,
    pub auto_renewal: AutoRenewal,
    /// Strategy-specific score; popularity-fallback entries carry a fixed
    /// placeholder value.
    pub score: f64,
}

impl Recommendation {
    pub(crate) fn for_plan(plan: &Plan, score: f64) -> Self {
        Self {
            plan_id: plan.id.clone(),
            plan_name: plan.name.clone(),
            price: plan.price,
            auto_renewal: plan.auto_renewal,
            score,
        }
    }
}

/// Scoring strategy selector for callers that dispatch by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Content,
    Collaborative,
    Hybrid,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Collaborative => "collaborative",
            Self::Hybrid => "hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "content" => Some(Self::Content),
            "collaborative" | "collab" => Some(Self::Collaborative),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_round_trips() {
        for strategy in [Strategy::Content, Strategy::Collaborative, Strategy::Hybrid] {
            assert_eq!(Strategy::parse(strategy.as_str()), Some(strategy));
        }
        assert_eq!(Strategy::parse("collab"), Some(Strategy::Collaborative));
        assert_eq!(Strategy::parse("popular"), None);
    }
}
