use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::plan::PlanId;
use super::user::UserId;

/// Lifecycle state of a subscription row. The exports mix casings
/// (`active`, `PAUSED`), so parsing is case-insensitive; anything outside
/// the known states maps to `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Other,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "paused" => Self::Paused,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionType {
    Monthly,
    Yearly,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yearly" => Self::Yearly,
            _ => Self::Monthly,
        }
    }
}

/// A single subscription event row. Subscriptions have no identifier of
/// their own; they are keyed by (user, plan) when pivoted into the
/// interaction matrix. The three timestamps are optional because any of
/// them may fail to parse in the export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub subscription_type: SubscriptionType,
    pub start_date: Option<NaiveDateTime>,
    pub last_billed_date: Option<NaiveDateTime>,
    pub last_renewed_date: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_tolerates_export_casing() {
        assert_eq!(SubscriptionStatus::parse("active"), SubscriptionStatus::Active);
        assert_eq!(SubscriptionStatus::parse("PAUSED"), SubscriptionStatus::Paused);
        assert_eq!(SubscriptionStatus::parse("cancelled"), SubscriptionStatus::Other);
    }

    #[test]
    fn type_parsing_defaults_to_monthly() {
        assert_eq!(SubscriptionType::parse("yearly"), SubscriptionType::Yearly);
        assert_eq!(SubscriptionType::parse("YEARLY"), SubscriptionType::Yearly);
        assert_eq!(SubscriptionType::parse("monthly"), SubscriptionType::Monthly);
        assert_eq!(SubscriptionType::parse("weekly"), SubscriptionType::Monthly);
    }
}
