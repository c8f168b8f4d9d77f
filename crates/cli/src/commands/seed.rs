use std::path::PathBuf;

use planwise_data::write_demo_dataset;

use super::{load_config, CommandResult};

pub fn run(data_dir: Option<PathBuf>) -> CommandResult {
    let config = match load_config("seed", data_dir) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    match write_demo_dataset(&config.data.dir) {
        Ok((paths, summary)) => {
            tracing::info!(dir = %config.data.dir.display(), "demo dataset written");
            CommandResult::success(
                "seed",
                format!(
                    "demo dataset written to `{}`:\n  - {} users ({})\n  - {} subscriptions ({})\n  - {} plans ({})\n  - {} billing rows ({})\n  - {} log rows ({})",
                    config.data.dir.display(),
                    summary.users,
                    paths.users.display(),
                    summary.subscriptions,
                    paths.subscriptions.display(),
                    summary.plans,
                    paths.plans.display(),
                    summary.billing_rows,
                    paths.billing.display(),
                    summary.log_rows,
                    paths.logs.display(),
                ),
            )
        }
        Err(error) => CommandResult::failure(
            "seed",
            "seed_write",
            format!("could not write demo dataset: {error}"),
            1,
        ),
    }
}
