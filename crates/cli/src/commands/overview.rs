use std::path::PathBuf;

use serde::Serialize;

use planwise_core::analytics::{
    dataset_summary, revenue_report, subscription_trends, DatasetSummary, RevenueReport,
    TrendReport,
};

use super::{load_context, CommandResult};

/// Number of plans shown in the trend and revenue rankings.
const REPORT_TOP_N: usize = 10;

#[derive(Debug, Serialize)]
struct OverviewReport {
    summary: DatasetSummary,
    trends: TrendReport,
    revenue: RevenueReport,
}

pub fn run(data_dir: Option<PathBuf>) -> CommandResult {
    let context = match load_context("overview", data_dir) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let dataset = &context.dataset;
    let report = OverviewReport {
        summary: dataset_summary(&dataset.users, &dataset.subscriptions, &dataset.plans),
        trends: subscription_trends(&dataset.subscriptions, &dataset.plans, REPORT_TOP_N),
        revenue: revenue_report(
            &dataset.subscriptions,
            &dataset.plans,
            &dataset.billing,
            REPORT_TOP_N,
        ),
    };

    let message = format!(
        "{} users, {} active subscriptions across {} plans",
        report.summary.total_users,
        report.summary.active_subscriptions,
        report.summary.total_plans
    );
    match serde_json::to_value(&report) {
        Ok(data) => CommandResult::with_data("overview", message, data),
        Err(error) => CommandResult::failure("overview", "serialization", error.to_string(), 1),
    }
}
