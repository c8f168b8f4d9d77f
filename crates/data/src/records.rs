//! Raw CSV row shapes and their conversion into domain types
//!
//! The exports carry spaced headers (`User Id`, `Auto Renewal Allowed`),
//! so each table gets a serde row struct with explicit renames, converted
//! into the core domain model after deserialization.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use planwise_core::domain::billing::{BillingRecord, PaymentStatus};
use planwise_core::domain::plan::{AutoRenewal, Plan, PlanId};
use planwise_core::domain::subscription::{
    Subscription, SubscriptionStatus, SubscriptionType,
};
use planwise_core::domain::user::{User, UserId, UserStatus};

#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    #[serde(rename = "User Id")]
    pub user_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.user_id),
            name: row.name,
            status: UserStatus::parse(&row.status),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubscriptionRow {
    #[serde(rename = "User Id")]
    pub user_id: String,
    #[serde(rename = "Product Id")]
    pub product_id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Subscription Type")]
    pub subscription_type: String,
    #[serde(rename = "Start Date", default)]
    pub start_date: Option<String>,
    #[serde(rename = "Last Billed Date", default)]
    pub last_billed_date: Option<String>,
    #[serde(rename = "Last Renewed Date", default)]
    pub last_renewed_date: Option<String>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            user_id: UserId(row.user_id),
            plan_id: PlanId(row.product_id),
            status: SubscriptionStatus::parse(&row.status),
            subscription_type: SubscriptionType::parse(&row.subscription_type),
            start_date: row.start_date.as_deref().and_then(parse_timestamp),
            last_billed_date: row.last_billed_date.as_deref().and_then(parse_timestamp),
            last_renewed_date: row.last_renewed_date.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlanRow {
    #[serde(rename = "Product Id")]
    pub product_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Auto Renewal Allowed")]
    pub auto_renewal: String,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Plan {
            id: PlanId(row.product_id),
            name: row.name,
            price: row.price,
            auto_renewal: AutoRenewal::parse(&row.auto_renewal),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BillingRow {
    pub amount: f64,
    pub payment_status: String,
}

impl From<BillingRow> for BillingRecord {
    fn from(row: BillingRow) -> Self {
        BillingRecord { amount: row.amount, status: PaymentStatus::parse(&row.payment_status) }
    }
}

/// Lenient timestamp parsing for the subscription date columns. A value
/// that matches none of the accepted shapes becomes absent rather than an
/// error.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.naive_utc());
    }

    None
}
