mod app;
mod cli;
mod config;
mod output;

use std::process::ExitCode;

use clap::Parser;

use llmledger::utils::init_logging;

use cli::Cli;
use config::Config;

fn main() -> ExitCode {
    let config = Config::load();
    let cli = Cli::parse().with_config(&config);
    init_logging(cli.debug);

    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
