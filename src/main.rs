use clap::Parser;
use log::{error, info};
use redflow::cli::{Cli, Commands, RunArgs};
use redflow::config::AppConfig;
use redflow::models::ExecutionItem;
use redflow::operations::{Dispatcher, SUPPORTED_OPERATIONS};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Operations => {
            for (resource, operation) in SUPPORTED_OPERATIONS {
                println!("{} {}", resource.as_str(), operation);
            }
            ExitCode::SUCCESS
        }
        Commands::Run(args) => run(args).await,
    }
}

async fn run(args: &RunArgs) -> ExitCode {
    let items = match args.input_items() {
        Ok(items) => items,
        Err(err) => {
            error!("Failed to read input items: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let config = AppConfig::load();
    if !config.has_credentials() {
        info!("No Reddit credentials configured; only public resources will work");
    }
    let client = match config.create_client() {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to set up the Reddit client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let dispatcher = Dispatcher::new(&client).continue_on_fail(args.continue_on_fail);
    match dispatcher.run(&items).await {
        Ok(records) => print_records(&records),
        Err(err) => {
            error!("{}", err);
            if !err.completed.is_empty() {
                print_records(&err.completed);
            }
            ExitCode::FAILURE
        }
    }
}

fn print_records(records: &[ExecutionItem]) -> ExitCode {
    match serde_json::to_string_pretty(records) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Failed to serialize output: {}", err);
            ExitCode::FAILURE
        }
    }
}
