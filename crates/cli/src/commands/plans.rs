use std::path::PathBuf;

use planwise_core::catalog::{explore_plans, PlanFilter, PlanSort};
use planwise_core::domain::plan::AutoRenewal;

use super::{load_context, CommandResult};

pub fn run(
    data_dir: Option<PathBuf>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    auto_renewal: Option<&str>,
    sort: &str,
) -> CommandResult {
    let Some(sort) = PlanSort::parse(sort) else {
        return CommandResult::failure(
            "plans",
            "invalid_sort",
            format!("unknown sort `{sort}` (expected price-asc|price-desc|popularity)"),
            1,
        );
    };

    let renewal_filter = match auto_renewal {
        None => None,
        Some(flag) => match flag.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(AutoRenewal::Yes),
            "no" => Some(AutoRenewal::No),
            other => {
                return CommandResult::failure(
                    "plans",
                    "invalid_filter",
                    format!("unknown auto-renewal filter `{other}` (expected yes|no)"),
                    1,
                )
            }
        },
    };

    let context = match load_context("plans", data_dir) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let filter = PlanFilter { min_price, max_price, auto_renewal: renewal_filter };
    let listings = explore_plans(
        &context.dataset.plans,
        &context.dataset.subscriptions,
        &filter,
        sort,
    );

    let message = format!("{} plans matched, sorted by {}", listings.len(), sort.as_str());
    match serde_json::to_value(&listings) {
        Ok(data) => CommandResult::with_data("plans", message, data),
        Err(error) => CommandResult::failure("plans", "serialization", error.to_string(), 1),
    }
}
