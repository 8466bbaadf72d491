//! StreamShare CLI - Command-line interface
//!
//! Shares files with devices on the local network from the terminal.

mod commands;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

#[derive(Parser)]
#[command(name = "streamshare")]
#[command(version)]
#[command(about = "Share files with any device on your local network")]
struct Cli {
    #[command(subcommand)]
    command: Option<commands::Commands>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("Welcome to StreamShare!");
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::FAILURE;
    };

    match commands::handle_command(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
