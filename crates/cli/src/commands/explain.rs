use std::path::PathBuf;

use planwise_core::domain::plan::PlanId;
use planwise_core::domain::user::UserId;

use super::{load_context, CommandResult};

pub fn run(data_dir: Option<PathBuf>, user: String, plan: String) -> CommandResult {
    let context = match load_context("explain", data_dir) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let user_id = UserId(user);
    let plan_id = PlanId(plan);
    let reasons = context.engine.explain(&user_id, &plan_id);

    let message = format!("{} reasons for `{plan_id}` and user `{user_id}`", reasons.len());
    match serde_json::to_value(&reasons) {
        Ok(data) => CommandResult::with_data("explain", message, data),
        Err(error) => CommandResult::failure("explain", "serialization", error.to_string(), 1),
    }
}
