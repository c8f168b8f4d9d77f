use std::path::PathBuf;

use planwise_core::domain::user::UserId;

use super::{load_context, CommandResult, EXIT_UNKNOWN_ID};

pub fn run(data_dir: Option<PathBuf>, user: String) -> CommandResult {
    let context = match load_context("profile", data_dir) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let user_id = UserId(user);
    let Some(profile) = context.engine.profile(&user_id) else {
        return CommandResult::failure(
            "profile",
            "unknown_user",
            format!("no profile for user `{user_id}`"),
            EXIT_UNKNOWN_ID,
        );
    };

    let message = format!(
        "profile for `{user_id}`: {} subscriptions, {} active, {} spend band",
        profile.total_subscriptions,
        profile.active_subscriptions,
        profile.price_category.as_str()
    );
    match serde_json::to_value(profile) {
        Ok(data) => CommandResult::with_data("profile", message, data),
        Err(error) => CommandResult::failure("profile", "serialization", error.to_string(), 1),
    }
}
