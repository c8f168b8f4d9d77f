use std::path::PathBuf;

use planwise_core::domain::user::UserId;
use planwise_core::recommend::Strategy;

use super::{load_context, CommandResult};

pub fn run(
    data_dir: Option<PathBuf>,
    user: String,
    top: Option<usize>,
    strategy: &str,
) -> CommandResult {
    let Some(strategy) = Strategy::parse(strategy) else {
        return CommandResult::failure(
            "recommend",
            "invalid_strategy",
            format!("unknown strategy `{strategy}` (expected hybrid|content|collaborative)"),
            1,
        );
    };

    let context = match load_context("recommend", data_dir) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let top_n = top.unwrap_or(context.config.engine.default_top_n);
    let user_id = UserId(user);
    let recommendations = context.engine.recommend(strategy, &user_id, top_n);

    let message = if context.engine.profile(&user_id).is_none() {
        format!(
            "user `{user_id}` has no profile; returning {} popular plans instead",
            recommendations.len()
        )
    } else {
        format!(
            "{} {} recommendations for `{user_id}`",
            recommendations.len(),
            strategy.as_str()
        )
    };

    match serde_json::to_value(&recommendations) {
        Ok(data) => CommandResult::with_data("recommend", message, data),
        Err(error) => CommandResult::failure("recommend", "serialization", error.to_string(), 1),
    }
}
