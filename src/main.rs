// PbiLink - Command-line companion for the pbi-tools Power BI toolkit
mod cli;
mod core;
mod domain;
mod infrastructure;

use clap::Parser;
use cli::args::Args;
use cli::commands::execute_command;
use domain::error::PbiLinkError;

#[tokio::main]
async fn main() -> Result<(), PbiLinkError> {
    let args = Args::parse();

    match execute_command(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
