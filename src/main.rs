use clap::Parser;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use nestplan::cli::{Cli, Command, resolve_port};
use nestplan::core::{
    PlanInputs, TaxInputs, ValidationError, run_income_tax, run_plan, run_retirement_age_sweep,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = nestplan::api::run_http_server(resolve_port(port)).await {
                error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Plan(args) => print_outcome(run_plan(&PlanInputs::from(args))),
        Command::Sweep(args) => print_outcome(run_retirement_age_sweep(&PlanInputs::from(args))),
        Command::Tax(args) => print_outcome(run_income_tax(&TaxInputs::from(args))),
    }
}

fn print_outcome<T: Serialize>(outcome: Result<T, ValidationError>) {
    let value = match outcome {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}
