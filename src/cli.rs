// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Mode flags, runtime overrides, and output options.

use clap::Parser;
use dockclean::cleanup::ModeFlags;
use dockclean::config::Overrides;
use dockclean::output::OutputMode;
use dockclean::runtime::RuntimeType;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockclean")]
#[command(about = "Reclaim disk space by removing unused Docker and Podman images")]
#[command(version)]
pub struct Cli {
    /// List unused images without removing them
    #[arg(long)]
    pub dry_run: bool,

    /// Remove images used only by stopped containers, then those containers
    #[arg(long)]
    pub remove_stopped: bool,

    /// Remove unused images and show a table of what was removed
    #[arg(short, long)]
    pub verbose: bool,

    /// Only remove unused images larger than this (requires --unit)
    #[arg(long, value_name = "SIZE", allow_negative_numbers = true)]
    pub size_limit: Option<f64>,

    /// Unit for --size-limit: B, KB, MB or GB
    #[arg(long, value_name = "UNIT")]
    pub unit: Option<String>,

    /// Remove images concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Maximum concurrent removals [default: 8]
    #[arg(long, value_name = "N")]
    pub max_workers: Option<NonZeroUsize>,

    /// Path to a configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Container runtime to use (docker or podman)
    #[arg(long)]
    pub runtime: Option<RuntimeType>,

    /// Runtime socket path
    #[arg(long, value_name = "PATH")]
    pub socket: Option<String>,

    /// Only print final results
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn mode_flags(&self) -> ModeFlags {
        ModeFlags {
            dry_run: self.dry_run,
            remove_stopped: self.remove_stopped,
            verbose: self.verbose,
            size_limit: self.size_limit,
            unit: self.unit.clone(),
            concurrent: self.concurrent,
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            runtime: self.runtime,
            socket: self.socket.clone(),
            max_workers: self.max_workers,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}
