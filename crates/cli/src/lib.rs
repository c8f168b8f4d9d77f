pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "planwise",
    about = "Planwise plan recommendation CLI",
    long_about = "Query plan recommendations, explanations, analytics and catalog views \
                  over the loaded subscription dataset.",
    after_help = "Examples:\n  planwise recommend --user U001\n  planwise explain --user U001 --plan P003\n  planwise doctor --json"
)]
pub struct Cli {
    /// Override the data directory from configuration
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank plans for a user with the chosen scoring strategy")]
    Recommend {
        #[arg(long, help = "User identifier to recommend for")]
        user: String,
        #[arg(long, help = "Number of recommendations to return")]
        top: Option<usize>,
        #[arg(
            long,
            default_value = "hybrid",
            help = "Scoring strategy: hybrid, content or collaborative"
        )]
        strategy: String,
    },
    #[command(about = "Explain why a plan suits a user")]
    Explain {
        #[arg(long, help = "User identifier")]
        user: String,
        #[arg(long, help = "Plan identifier")]
        plan: String,
    },
    #[command(about = "List the most subscribed plans across the population")]
    Popular {
        #[arg(long, help = "Number of plans to return")]
        top: Option<usize>,
    },
    #[command(about = "Show the derived behavioral profile for a user")]
    Profile {
        #[arg(long, help = "User identifier")]
        user: String,
    },
    #[command(about = "Summarize the loaded dataset: population, trends and revenue")]
    Overview,
    #[command(about = "Filter and sort the plan catalog with subscriber counts")]
    Plans {
        #[arg(long, help = "Minimum price, inclusive")]
        min_price: Option<f64>,
        #[arg(long, help = "Maximum price, inclusive")]
        max_price: Option<f64>,
        #[arg(long, help = "Filter by auto-renewal flag: yes or no")]
        auto_renewal: Option<String>,
        #[arg(
            long,
            default_value = "price-asc",
            help = "Sort order: price-asc, price-desc or popularity"
        )]
        sort: String,
    },
    #[command(about = "Write the deterministic demo dataset into the data directory")]
    Seed,
    #[command(about = "Validate config, data file readiness and engine construction")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let data_dir = cli.data_dir;

    let result = match cli.command {
        Command::Recommend { user, top, strategy } => {
            commands::recommend::run(data_dir, user, top, &strategy)
        }
        Command::Explain { user, plan } => commands::explain::run(data_dir, user, plan),
        Command::Popular { top } => commands::popular::run(data_dir, top),
        Command::Profile { user } => commands::profile::run(data_dir, user),
        Command::Overview => commands::overview::run(data_dir),
        Command::Plans { min_price, max_price, auto_renewal, sort } => {
            commands::plans::run(data_dir, min_price, max_price, auto_renewal.as_deref(), &sort)
        }
        Command::Seed => commands::seed::run(data_dir),
        Command::Doctor { json } => commands::CommandResult {
            exit_code: 0,
            output: commands::doctor::run(data_dir, json),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
