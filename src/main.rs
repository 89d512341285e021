// ABOUTME: Entry point for the yardcheck CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;
use yardcheck::config::{self, Config};
use yardcheck::error::Result;
use yardcheck::output::{Output, OutputMode};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));
    if let Err(e) = run(cli.command, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: &mut Output) -> Result<()> {
    match command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Validate { numbers } => commands::validate(&numbers, output),
        Commands::CheckDigit { prefix } => commands::check_digit(&prefix, output),
        Commands::Status { number } => {
            let config = Config::discover(&env::current_dir()?)?;
            commands::status(&config, &number, output).await
        }
        Commands::Submit {
            number,
            activity,
            input,
            yes,
        } => {
            let config = Config::discover(&env::current_dir()?)?;
            commands::submit(&config, &number, activity, &input, yes, output).await
        }
    }
}
