use std::process::ExitCode;

fn main() -> ExitCode {
    planwise_cli::run()
}
