//! thermocal server entry point.

use std::process::ExitCode;

use clap::Parser;

use thermocal_core::init_tracing;
use thermocal_server::cli::Cli;
use thermocal_server::error::ServerResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    init_tracing(cli.tracing_config()?)?;
    thermocal_server::run(cli.server_config()).await
}
