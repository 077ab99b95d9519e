use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use lvis_consistency::{run, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.to_pipeline_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid arguments: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting the conversion process...");

    match run(&config) {
        Ok(report) => {
            report.print_summary();
            info!("Conversion process completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
