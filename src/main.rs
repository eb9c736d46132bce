// ABOUTME: Entry point for the dockclean CLI application.
// ABOUTME: Parses arguments, loads configuration, and runs the clean command.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use dockclean::cleanup::CleanupMode;
use dockclean::config::Config;
use dockclean::error::Result;
use dockclean::output::Output;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --debug picks the level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());

    if let Err(e) = run(cli).await {
        output.error(&e.to_string());
        if let Some(hint) = e.hint() {
            output.hint(hint);
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Flag validation happens before anything touches the runtime.
    let mode = CleanupMode::resolve(&cli.mode_flags())?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover_or_default(&env::current_dir()?)?,
    };
    let config = config.with_overrides(cli.overrides());

    commands::clean(config, mode, Output::new(cli.output_mode())).await
}
