//! wfhubby-cli: command-line front end for the content API.
//! Drives the same list controller, admin service and session the site uses.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use std::process::ExitCode;

use clap::Parser;
use wfhubby::infra::telemetry;

use args::{Cli, Commands};
use client::{CliError, Ctx, load_settings};
use handlers::{auth, posts, uploads};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(&cli)?;
    telemetry::init(&settings.logging)?;
    let ctx = Ctx::from_settings(settings)?;

    match cli.command {
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Commands::Uploads(cmd) => uploads::handle(&ctx, cmd.action).await?,
        Commands::Auth(cmd) => auth::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
