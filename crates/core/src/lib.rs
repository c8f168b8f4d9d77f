pub mod analytics;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod profile;
pub mod recommend;

pub use analytics::{DatasetSummary, RevenueReport, TrendReport};
pub use catalog::{explore_plans, PlanFilter, PlanListing, PlanSort};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::billing::{BillingRecord, PaymentStatus};
pub use domain::plan::{AutoRenewal, Plan, PlanId};
pub use domain::subscription::{Subscription, SubscriptionStatus, SubscriptionType};
pub use domain::user::{User, UserId, UserStatus};
pub use profile::{build_user_profiles, PriceCategory, UserProfile};
pub use recommend::{Recommendation, RecommendationEngine, Strategy};
