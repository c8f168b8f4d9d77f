use std::path::PathBuf;

use super::{load_context, CommandResult};

pub fn run(data_dir: Option<PathBuf>, top: Option<usize>) -> CommandResult {
    let context = match load_context("popular", data_dir) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let top_n = top.unwrap_or(context.config.engine.default_top_n);
    let plans = context.engine.popular(top_n);

    let message = format!("{} most subscribed plans", plans.len());
    match serde_json::to_value(&plans) {
        Ok(data) => CommandResult::with_data("popular", message, data),
        Err(error) => CommandResult::failure("popular", "serialization", error.to_string(), 1),
    }
}
