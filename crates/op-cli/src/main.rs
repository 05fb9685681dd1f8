//! OpenPoint CLI binary entrypoint.
//!
//! This is the main entry point for the `openpoint` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use op_cli::cli::{Cli, Commands};
use op_cli::commands::{ConnectorsCommand, Session, TypesCommand};
use op_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), op_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let session = Session::from_cli(&cli);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Types { command } => {
            let cmd = TypesCommand::new(&session);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Connectors { command } => {
            let cmd = ConnectorsCommand::new(&session);
            cmd.execute(&mut stdout, &format, command).await?;
        }
    }

    Ok(())
}
