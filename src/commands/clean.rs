// ABOUTME: Clean command implementation.
// ABOUTME: Connects to the runtime, runs one cleanup pass, and reports the outcome.

use super::runtime_connection::connect_to_runtime;
use dockclean::cleanup::{CleanupMode, Report, execute};
use dockclean::config::Config;
use dockclean::error::{Error, Result};
use dockclean::output::Output;
use std::sync::Arc;

/// Run the cleanup pass selected by `mode`.
///
/// Only the default prune mode turns a removal failure into an error; the
/// other modes report failures and succeed.
pub async fn clean(config: Config, mode: CleanupMode, mut output: Output) -> Result<()> {
    output.start_timer();

    let runtime = Arc::new(connect_to_runtime(&config, &output).await?);
    output.progress(&format!("  → Running {} cleanup...", mode.name()));

    let report = execute(runtime, mode, config.execute_options()).await?;

    let result = match report {
        Report::DryRun { images } => {
            output.dry_run(&images);
            return Ok(());
        }
        Report::Removal { result, .. } => result,
    };

    match mode {
        CleanupMode::Verbose => {
            if result.attempted() == 0 && result.not_attempted() == 0 {
                output.success("No unused images found");
                return Ok(());
            }
            output.removals(&result, true);
            output.summary(&result);
        }
        CleanupMode::SizeLimit(limit) => {
            output.removals(&result, false);
            output.size_limit_summary(&result, &limit);
        }
        _ => {
            output.removals(&result, false);
            output.summary(&result);
        }
    }

    if mode.fails_on_removal_error()
        && let Some((image, reason)) = result.first_failure()
    {
        return Err(Error::Removal {
            image: image.clone(),
            reason: reason.to_string(),
        });
    }

    Ok(())
}
